// Copyright 2025 the Locus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Linear volumetric cell shapes and their parametric math.
//!
//! Point ordering and parametric spaces:
//!
//! - `Tetra`: `(0,0,0) (1,0,0) (0,1,0) (0,0,1)`; domain `r, s, t >= 0`, `r + s + t <= 1`.
//! - `Hexahedron`: bottom quad `(0,0,0) (1,0,0) (1,1,0) (0,1,0)`, then the same at `t = 1`;
//!   domain is the unit cube.
//! - `Wedge`: bottom triangle `(0,0,0) (1,0,0) (0,1,0)`, then the same at `t = 1`;
//!   domain `r, s >= 0`, `r + s <= 1`, `t` in `[0, 1]`.
//! - `Pyramid`: base quad as for the hexahedron, apex last; domain is the unit cube with the
//!   top face collapsed onto the apex.

use crate::types::{Scalar, Vec3, le};

/// Largest number of points any supported shape has.
pub const MAX_CELL_POINTS: usize = 8;

/// Iteration cap for [`CellShape::world_to_parametric`].
pub const MAX_NEWTON_ITERATIONS: usize = 16;

/// Shape tag of a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CellShape {
    /// Four-point tetrahedron.
    Tetra,
    /// Eight-point hexahedron (trilinear).
    Hexahedron,
    /// Six-point triangular prism.
    Wedge,
    /// Five-point pyramid.
    Pyramid,
}

const HEX_CORNERS: [[u8; 3]; 8] = [
    [0, 0, 0],
    [1, 0, 0],
    [1, 1, 0],
    [0, 1, 0],
    [0, 0, 1],
    [1, 0, 1],
    [1, 1, 1],
    [0, 1, 1],
];

type Weights<T> = [T; MAX_CELL_POINTS];
type Derivatives<T> = [[T; 3]; MAX_CELL_POINTS];

impl CellShape {
    /// Number of points a cell of this shape references.
    pub const fn num_points(self) -> usize {
        match self {
            Self::Tetra => 4,
            Self::Hexahedron => 8,
            Self::Wedge => 6,
            Self::Pyramid => 5,
        }
    }

    /// Parametric coordinate of the cell's centre.
    pub fn parametric_center<T: Scalar>(self) -> Vec3<T> {
        let (r, s, t) = match self {
            Self::Tetra => (0.25, 0.25, 0.25),
            Self::Hexahedron => (0.5, 0.5, 0.5),
            Self::Wedge => (1.0 / 3.0, 1.0 / 3.0, 0.5),
            Self::Pyramid => (0.5, 0.5, 0.2),
        };
        Vec3::new(T::from_f64(r), T::from_f64(s), T::from_f64(t))
    }

    /// Whether `pc` lies in the shape's parametric domain, allowing `tol` of slack.
    pub fn contains_parametric<T: Scalar>(self, pc: Vec3<T>, tol: T) -> bool {
        let lo = -tol;
        let hi = T::ONE + tol;
        let in_unit = |v: T| le(lo, v) && le(v, hi);
        match self {
            Self::Hexahedron | Self::Pyramid => in_unit(pc.x) && in_unit(pc.y) && in_unit(pc.z),
            Self::Tetra => {
                le(lo, pc.x) && le(lo, pc.y) && le(lo, pc.z) && le(pc.x + pc.y + pc.z, hi)
            }
            Self::Wedge => {
                le(lo, pc.x) && le(lo, pc.y) && le(pc.x + pc.y, hi) && in_unit(pc.z)
            }
        }
    }

    /// Map a parametric coordinate to world space.
    pub fn interpolate<T: Scalar>(self, vertices: &[Vec3<T>], pc: Vec3<T>) -> Vec3<T> {
        debug_assert_eq!(
            vertices.len(),
            self.num_points(),
            "vertex count must match the shape"
        );
        let mut w = [T::ZERO; MAX_CELL_POINTS];
        let mut d = [[T::ZERO; 3]; MAX_CELL_POINTS];
        self.shape_functions(pc, &mut w, &mut d);
        vertices
            .iter()
            .zip(w.iter())
            .fold(Vec3::ZERO, |acc, (v, &wi)| acc + v.scale(wi))
    }

    /// Invert the world mapping of a cell by Newton iteration.
    ///
    /// The iteration runs relative to the first vertex, so large coordinate
    /// offsets do not swamp the residual. Returns `None` when the Jacobian is
    /// singular or the iterate stops being finite. When the step never drops
    /// below [`Scalar::NEWTON_TOLERANCE`] the last iterate is returned. A returned
    /// coordinate may lie outside the domain; use
    /// [`contains_parametric`](Self::contains_parametric) to test containment.
    pub fn world_to_parametric<T: Scalar>(
        self,
        vertices: &[Vec3<T>],
        point: Vec3<T>,
    ) -> Option<Vec3<T>> {
        debug_assert_eq!(
            vertices.len(),
            self.num_points(),
            "vertex count must match the shape"
        );
        let origin = *vertices.first()?;
        let mut local = [Vec3::ZERO; MAX_CELL_POINTS];
        for (l, v) in local.iter_mut().zip(vertices) {
            *l = *v - origin;
        }
        let local = &local[..vertices.len()];
        let target = point - origin;

        let mut w = [T::ZERO; MAX_CELL_POINTS];
        let mut d = [[T::ZERO; 3]; MAX_CELL_POINTS];
        let mut pc = self.parametric_center();
        for _ in 0..MAX_NEWTON_ITERATIONS {
            self.shape_functions(pc, &mut w, &mut d);
            let mut residual = Vec3::ZERO - target;
            let mut jac = [[T::ZERO; 3]; 3];
            for (i, v) in local.iter().enumerate() {
                residual = residual + v.scale(w[i]);
                let v = v.to_array();
                for (row, &vr) in v.iter().enumerate() {
                    for col in 0..3 {
                        jac[row][col] = jac[row][col] + vr * d[i][col];
                    }
                }
            }
            let step = solve3(&jac, residual)?;
            pc = pc - step;
            if !(pc.x.is_finite() && pc.y.is_finite() && pc.z.is_finite()) {
                return None;
            }
            if step.max_abs() < T::NEWTON_TOLERANCE {
                break;
            }
        }
        Some(pc)
    }

    fn shape_functions<T: Scalar>(self, pc: Vec3<T>, w: &mut Weights<T>, d: &mut Derivatives<T>) {
        let one = T::ONE;
        let (r, s, t) = (pc.x, pc.y, pc.z);
        match self {
            Self::Tetra => {
                w[0] = one - r - s - t;
                w[1] = r;
                w[2] = s;
                w[3] = t;
                d[0] = [-one, -one, -one];
                d[1] = [one, T::ZERO, T::ZERO];
                d[2] = [T::ZERO, one, T::ZERO];
                d[3] = [T::ZERO, T::ZERO, one];
            }
            Self::Hexahedron => {
                let f = |c: u8, u: T| if c == 0 { one - u } else { u };
                let g = |c: u8| if c == 0 { -one } else { one };
                for (i, c) in HEX_CORNERS.iter().enumerate() {
                    let (fr, fs, ft) = (f(c[0], r), f(c[1], s), f(c[2], t));
                    w[i] = fr * fs * ft;
                    d[i] = [g(c[0]) * fs * ft, fr * g(c[1]) * ft, fr * fs * g(c[2])];
                }
            }
            Self::Wedge => {
                let a = one - r - s;
                let bt = one - t;
                w[..6].copy_from_slice(&[a * bt, r * bt, s * bt, a * t, r * t, s * t]);
                d[0] = [-bt, -bt, -a];
                d[1] = [bt, T::ZERO, -r];
                d[2] = [T::ZERO, bt, -s];
                d[3] = [-t, -t, a];
                d[4] = [t, T::ZERO, r];
                d[5] = [T::ZERO, t, s];
            }
            Self::Pyramid => {
                let (br, bs, bt) = (one - r, one - s, one - t);
                w[..5].copy_from_slice(&[br * bs * bt, r * bs * bt, r * s * bt, br * s * bt, t]);
                d[0] = [-bs * bt, -br * bt, -br * bs];
                d[1] = [bs * bt, -r * bt, -r * bs];
                d[2] = [s * bt, r * bt, -r * s];
                d[3] = [-s * bt, br * bt, -br * s];
                d[4] = [T::ZERO, T::ZERO, one];
            }
        }
    }
}

/// Solve `m * x = b` by Cramer's rule; `None` for a singular matrix.
fn solve3<T: Scalar>(m: &[[T; 3]; 3], b: Vec3<T>) -> Option<Vec3<T>> {
    let det3 = |c0: [T; 3], c1: [T; 3], c2: [T; 3]| {
        c0[0] * (c1[1] * c2[2] - c1[2] * c2[1]) - c1[0] * (c0[1] * c2[2] - c0[2] * c2[1])
            + c2[0] * (c0[1] * c1[2] - c0[2] * c1[1])
    };
    let col = |j: usize| [m[0][j], m[1][j], m[2][j]];
    let (c0, c1, c2) = (col(0), col(1), col(2));
    let rhs = b.to_array();
    let det = det3(c0, c1, c2);
    if det == T::ZERO || !det.is_finite() {
        return None;
    }
    Some(Vec3::new(
        det3(rhs, c1, c2) / det,
        det3(c0, rhs, c2) / det,
        det3(c0, c1, rhs) / det,
    ))
}
