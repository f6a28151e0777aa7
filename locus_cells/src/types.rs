// Copyright 2025 the Locus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types and helpers.

use core::cmp::Ordering;
use core::fmt::Debug;
use core::ops::{Add, Div, Mul, Neg, Sub};

/// One of the three coordinate axes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    /// The x axis.
    X,
    /// The y axis.
    Y,
    /// The z axis.
    Z,
}

impl Axis {
    /// All axes in ascending order.
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];
}

/// Numeric scalar abstraction for point coordinates.
///
/// Besides plain arithmetic this carries an associated widened accumulator
/// type (`f32`→`f64`) for surface-area costs, and the tolerances used by the
/// parametric inversion in [`CellShape`](crate::CellShape).
pub trait Scalar:
    Copy
    + PartialOrd
    + Debug
    + Default
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    /// Widened accumulator type suitable for area/cost computations.
    type Acc: Copy
        + PartialOrd
        + Add<Output = Self::Acc>
        + Sub<Output = Self::Acc>
        + Mul<Output = Self::Acc>
        + Debug
        + Send
        + Sync;

    /// Additive identity.
    const ZERO: Self;

    /// Multiplicative identity.
    const ONE: Self;

    /// Slack allowed outside a shape's parametric domain when testing containment.
    const PARAMETRIC_TOLERANCE: Self;

    /// Step size below which the Newton inversion is considered converged.
    const NEWTON_TOLERANCE: Self;

    /// Convert from `f64`, rounding if needed.
    fn from_f64(v: f64) -> Self;

    /// Convert a count to the scalar type.
    fn from_usize(n: usize) -> Self;

    /// Absolute value.
    fn abs(self) -> Self;

    /// True unless the value is infinite or NaN.
    fn is_finite(self) -> bool;

    /// Max of the scalar value and zero.
    fn max_zero(v: Self) -> Self;

    /// Convert a scalar to the accumulator type.
    fn widen(v: Self) -> Self::Acc;

    /// Convert a `usize` to the accumulator type (for SAH weighting).
    fn acc_from_usize(n: usize) -> Self::Acc;
}

impl Scalar for f32 {
    type Acc = f64;

    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;
    const PARAMETRIC_TOLERANCE: Self = 1e-4;
    const NEWTON_TOLERANCE: Self = 1e-6;

    #[inline]
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Narrowing to f32 is the point of this conversion."
    )]
    fn from_f64(v: f64) -> Self {
        v as f32
    }

    #[inline]
    fn from_usize(n: usize) -> Self {
        n as f32
    }

    #[inline]
    fn abs(self) -> Self {
        if self < 0.0 { -self } else { self }
    }

    #[inline]
    fn is_finite(self) -> bool {
        Self::is_finite(self)
    }

    #[inline]
    fn max_zero(v: Self) -> Self {
        v.max(0.0)
    }

    #[inline]
    fn widen(v: Self) -> Self::Acc {
        v as f64
    }

    #[inline]
    fn acc_from_usize(n: usize) -> Self::Acc {
        n as f64
    }
}

impl Scalar for f64 {
    type Acc = Self;

    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;
    const PARAMETRIC_TOLERANCE: Self = 1e-8;
    const NEWTON_TOLERANCE: Self = 1e-12;

    #[inline]
    fn from_f64(v: f64) -> Self {
        v
    }

    #[inline]
    fn from_usize(n: usize) -> Self {
        n as Self
    }

    #[inline]
    fn abs(self) -> Self {
        if self < 0.0 { -self } else { self }
    }

    #[inline]
    fn is_finite(self) -> bool {
        Self::is_finite(self)
    }

    #[inline]
    fn max_zero(v: Self) -> Self {
        v.max(0.0)
    }

    #[inline]
    fn widen(v: Self) -> Self::Acc {
        v
    }

    #[inline]
    fn acc_from_usize(n: usize) -> Self::Acc {
        n as Self::Acc
    }
}

/// A point or vector in 3D.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vec3<T> {
    /// x component
    pub x: T,
    /// y component
    pub y: T,
    /// z component
    pub z: T,
}

impl<T> Vec3<T> {
    /// Create a new vector.
    pub const fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }
}

impl<T: Copy> Vec3<T> {
    /// Component along `axis`.
    #[inline]
    pub fn get(&self, axis: Axis) -> T {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Components as an array.
    pub fn to_array(self) -> [T; 3] {
        [self.x, self.y, self.z]
    }
}

impl<T: Scalar> Vec3<T> {
    /// The zero vector.
    pub const ZERO: Self = Self::new(T::ZERO, T::ZERO, T::ZERO);

    /// Component-wise scale.
    #[inline]
    pub fn scale(self, s: T) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s)
    }

    /// Largest absolute component.
    pub fn max_abs(self) -> T {
        max_t(max_t(self.x.abs(), self.y.abs()), self.z.abs())
    }
}

impl<T: Scalar> Add for Vec3<T> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl<T: Scalar> Sub for Vec3<T> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// Axis-aligned bounding box in 3D.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb3D<T> {
    /// Minimum corner
    pub min: Vec3<T>,
    /// Maximum corner
    pub max: Vec3<T>,
}

impl<T> Aabb3D<T> {
    /// Create a new AABB from min/max corners.
    pub const fn new(min: Vec3<T>, max: Vec3<T>) -> Self {
        Self { min, max }
    }
}

impl<T: Copy> Aabb3D<T> {
    /// A degenerate box around a single point.
    pub const fn from_point(p: Vec3<T>) -> Self {
        Self { min: p, max: p }
    }
}

impl<T: Copy + PartialOrd> Aabb3D<T> {
    /// Whether this AABB contains the point (boundary inclusive).
    pub fn contains_point(&self, p: Vec3<T>) -> bool {
        le(self.min.x, p.x)
            && le(self.min.y, p.y)
            && le(self.min.z, p.z)
            && le(p.x, self.max.x)
            && le(p.y, self.max.y)
            && le(p.z, self.max.z)
    }

    /// Smallest box containing both.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: Vec3::new(
                min_t(self.min.x, other.min.x),
                min_t(self.min.y, other.min.y),
                min_t(self.min.z, other.min.z),
            ),
            max: Vec3::new(
                max_t(self.max.x, other.max.x),
                max_t(self.max.y, other.max.y),
                max_t(self.max.z, other.max.z),
            ),
        }
    }

    /// Grow the box to include `p`.
    pub fn include(&mut self, p: Vec3<T>) {
        *self = self.union(&Self::from_point(p));
    }
}

impl<T: Scalar> Aabb3D<T> {
    /// Extent along `axis` (never negative).
    #[inline]
    pub fn extent(&self, axis: Axis) -> T {
        T::max_zero(self.max.get(axis) - self.min.get(axis))
    }

    /// Largest extent over the three axes.
    pub fn max_extent(&self) -> T {
        Axis::ALL
            .iter()
            .fold(T::ZERO, |acc, &a| max_t(acc, self.extent(a)))
    }

    /// The box grown by `pad` on every side.
    pub fn inflate(&self, pad: T) -> Self {
        let d = Vec3::new(pad, pad, pad);
        Self::new(self.min - d, self.max + d)
    }
}

/// Half the surface area of an AABB, in the scalar's widened accumulator type.
///
/// The factor of two is irrelevant for cost comparisons and is dropped.
#[inline]
pub fn half_area<T: Scalar>(a: &Aabb3D<T>) -> T::Acc {
    let dx = T::widen(a.extent(Axis::X));
    let dy = T::widen(a.extent(Axis::Y));
    let dz = T::widen(a.extent(Axis::Z));
    dx * dy + dy * dz + dz * dx
}

/// Helper alias for the widened accumulator type associated with a scalar `T`.
pub type ScalarAcc<T> = <T as Scalar>::Acc;

/// Smaller of two values under `PartialOrd`; returns `a` when unordered.
pub fn min_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Greater) => b,
        _ => a,
    }
}

/// Larger of two values under `PartialOrd`; returns `a` when unordered.
pub fn max_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Less) => b,
        _ => a,
    }
}

pub(crate) fn le<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o != Ordering::Greater)
        .unwrap_or(false)
}
