// Copyright 2025 the Locus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-cell geometry gathered from a cell set and its coordinates.

use crate::cell_set::CellSet;
use crate::coords::Coordinates;
use crate::shape::MAX_CELL_POINTS;
use crate::types::{Aabb3D, Scalar, Vec3};

/// World positions of one cell's points, in shape order.
#[derive(Copy, Clone, Debug)]
pub struct CellVertices<T> {
    points: [Vec3<T>; MAX_CELL_POINTS],
    len: usize,
}

impl<T> CellVertices<T> {
    /// The positions.
    pub fn as_slice(&self) -> &[Vec3<T>] {
        &self.points[..self.len]
    }
}

/// Gather the world positions of `cell`.
///
/// Point ids must be valid for `coords`.
pub fn cell_vertices<T, C, P>(cells: &C, coords: &P, cell: usize) -> CellVertices<T>
where
    T: Scalar,
    C: CellSet + ?Sized,
    P: Coordinates<T> + ?Sized,
{
    let ids = cells.cell_points(cell);
    let mut out = CellVertices {
        points: [Vec3::ZERO; MAX_CELL_POINTS],
        len: ids.len(),
    };
    for (slot, &id) in out.points.iter_mut().zip(ids.as_slice()) {
        *slot = coords.point(id);
    }
    out
}

/// World position of the cell's parametric centre.
pub fn cell_centroid<T, C, P>(cells: &C, coords: &P, cell: usize) -> Vec3<T>
where
    T: Scalar,
    C: CellSet + ?Sized,
    P: Coordinates<T> + ?Sized,
{
    let shape = cells.shape(cell);
    let verts = cell_vertices(cells, coords, cell);
    shape.interpolate(verts.as_slice(), shape.parametric_center())
}

/// Axis-aligned box of the cell's points. `None` for a cell without points.
pub fn cell_bounds<T, C, P>(cells: &C, coords: &P, cell: usize) -> Option<Aabb3D<T>>
where
    T: Scalar,
    C: CellSet + ?Sized,
    P: Coordinates<T> + ?Sized,
{
    bounds_of(cell_vertices(cells, coords, cell).as_slice())
}

/// Axis-aligned box of a point list. `None` when empty.
pub fn bounds_of<T: Scalar>(points: &[Vec3<T>]) -> Option<Aabb3D<T>> {
    let (first, rest) = points.split_first()?;
    let mut acc = Aabb3D::from_point(*first);
    for p in rest {
        acc.include(*p);
    }
    Some(acc)
}
