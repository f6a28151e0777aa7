// Copyright 2025 the Locus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coordinate arrays: point positions by point id.

use alloc::vec::Vec;

use crate::types::{Scalar, Vec3};

/// Source of point positions.
pub trait Coordinates<T: Scalar>: Send + Sync {
    /// Number of points.
    fn num_points(&self) -> usize;

    /// Position of point `id`. Callers keep `id < num_points()`.
    fn point(&self, id: usize) -> Vec3<T>;
}

/// Explicit point positions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointArray<T> {
    points: Vec<Vec3<T>>,
}

impl<T> PointArray<T> {
    /// Wrap a vector of positions.
    pub fn new(points: Vec<Vec3<T>>) -> Self {
        Self { points }
    }

    /// The positions.
    pub fn as_slice(&self) -> &[Vec3<T>] {
        &self.points
    }
}

impl<T> From<Vec<Vec3<T>>> for PointArray<T> {
    fn from(points: Vec<Vec3<T>>) -> Self {
        Self::new(points)
    }
}

impl<T: Scalar> Coordinates<T> for PointArray<T> {
    fn num_points(&self) -> usize {
        self.points.len()
    }

    fn point(&self, id: usize) -> Vec3<T> {
        self.points[id]
    }
}

/// Implicit positions of a regular lattice: `origin + spacing * (i, j, k)`.
///
/// Point ids are x-fastest, matching [`StructuredCellSet`](crate::StructuredCellSet).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct UniformCoordinates<T> {
    dims: [usize; 3],
    origin: Vec3<T>,
    spacing: Vec3<T>,
}

impl<T: Scalar> UniformCoordinates<T> {
    /// Lattice with `dims` points per axis.
    pub const fn new(dims: [usize; 3], origin: Vec3<T>, spacing: Vec3<T>) -> Self {
        Self {
            dims,
            origin,
            spacing,
        }
    }

    /// Unit-spaced lattice at the origin.
    pub fn unit(dims: [usize; 3]) -> Self {
        Self::new(dims, Vec3::ZERO, Vec3::new(T::ONE, T::ONE, T::ONE))
    }

    /// Points per axis.
    pub const fn dims(&self) -> [usize; 3] {
        self.dims
    }
}

impl<T: Scalar> Coordinates<T> for UniformCoordinates<T> {
    fn num_points(&self) -> usize {
        self.dims.iter().product()
    }

    fn point(&self, id: usize) -> Vec3<T> {
        let [nx, ny, _] = self.dims;
        let i = id % nx;
        let j = (id / nx) % ny;
        let k = id / (nx * ny);
        Vec3::new(
            self.origin.x + self.spacing.x * T::from_usize(i),
            self.origin.y + self.spacing.y * T::from_usize(j),
            self.origin.z + self.spacing.z * T::from_usize(k),
        )
    }
}
