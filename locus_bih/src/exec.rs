// Copyright 2025 the Locus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Read-only query snapshots.
//!
//! An [`ExecLocator`] borrows a clean [`Locator`](crate::Locator)'s hierarchy and
//! inputs; the borrow keeps the locator from being modified while queries run.
//! Single-point queries are identical on every device. Batches fan out over the
//! `rayon` pool on [`Device::Rayon`].

use alloc::vec::Vec;
use core::fmt;

use smallvec::SmallVec;

use locus_cells::{Aabb3D, CellSet, Coordinates, Scalar, Vec3, cell_vertices};

use crate::device::Device;
use crate::hierarchy::{Hierarchy, Node};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Integer cell id reported by [`FindCell::find_cell_raw`] when no cell contains the point.
pub const NOT_FOUND: i64 = -1;

/// A located point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CellMatch<T> {
    /// Id of the containing cell.
    pub cell: usize,
    /// Parametric coordinates of the point inside that cell.
    pub parametric: Vec3<T>,
}

/// Point-in-cell queries.
pub trait FindCell<T: Scalar> {
    /// The first cell, in traversal order, whose parametric domain contains `point`.
    fn find_cell(&self, point: Vec3<T>) -> Option<CellMatch<T>>;

    /// [`find_cell`](Self::find_cell) with [`NOT_FOUND`] and zero parametric
    /// coordinates for misses.
    fn find_cell_raw(&self, point: Vec3<T>) -> (i64, Vec3<T>) {
        match self.find_cell(point) {
            #[allow(
                clippy::cast_possible_wrap,
                reason = "cell ids are bounded by allocation size, far below i64::MAX"
            )]
            Some(m) => (m.cell as i64, m.parametric),
            None => (NOT_FOUND, Vec3::ZERO),
        }
    }

    /// Locate every point; results follow input order.
    fn find_cells(&self, points: &[Vec3<T>]) -> Vec<Option<CellMatch<T>>> {
        points.iter().map(|&p| self.find_cell(p)).collect()
    }
}

/// Snapshot that answers queries on the calling thread.
#[derive(Copy, Clone)]
pub struct SerialLocator<'a, T: Scalar> {
    nodes: &'a [Node<T>],
    cell_ids: &'a [usize],
    bounds: Aabb3D<T>,
    pad: T,
    depth: usize,
    cells: &'a dyn CellSet,
    coords: &'a dyn Coordinates<T>,
}

impl<T: Scalar> fmt::Debug for SerialLocator<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerialLocator")
            .field("nodes", &self.nodes.len())
            .field("cells", &self.cell_ids.len())
            .field("depth", &self.depth)
            .field("bounds", &self.bounds)
            .field("pad", &self.pad)
            .finish_non_exhaustive()
    }
}

impl<'a, T: Scalar> SerialLocator<'a, T> {
    pub(crate) fn new(
        hierarchy: &'a Hierarchy<T>,
        cells: &'a dyn CellSet,
        coords: &'a dyn Coordinates<T>,
    ) -> Self {
        // Interval tests get the same relative slack as the parametric test, so
        // points on or just beyond a face still reach the cells that own it.
        let pad = hierarchy.bounds().max_extent() * T::PARAMETRIC_TOLERANCE;
        Self {
            nodes: hierarchy.nodes(),
            cell_ids: hierarchy.cell_ids(),
            bounds: hierarchy.bounds().inflate(pad),
            pad,
            depth: hierarchy.depth(),
            cells,
            coords,
        }
    }

    /// Depth of the hierarchy being queried.
    pub fn depth(&self) -> usize {
        self.depth
    }

    fn test_cell(&self, cell: usize, point: Vec3<T>) -> Option<CellMatch<T>> {
        let shape = self.cells.shape(cell);
        let verts = cell_vertices(self.cells, self.coords, cell);
        shape
            .world_to_parametric(verts.as_slice(), point)
            .filter(|&pc| shape.contains_parametric(pc, T::PARAMETRIC_TOLERANCE))
            .map(|parametric| CellMatch { cell, parametric })
    }
}

impl<T: Scalar> FindCell<T> for SerialLocator<'_, T> {
    fn find_cell(&self, point: Vec3<T>) -> Option<CellMatch<T>> {
        if !self.bounds.contains_point(point) {
            return None;
        }
        // At most one pending sibling per level, plus the node being expanded.
        let mut stack: SmallVec<[usize; 64]> = SmallVec::with_capacity(self.depth + 1);
        stack.push(0);
        while let Some(idx) = stack.pop() {
            match self.nodes[idx] {
                Node::Inner {
                    axis,
                    left_max,
                    right_min,
                    child,
                } => {
                    let c = point.get(axis);
                    if c >= right_min - self.pad {
                        stack.push(child + 1);
                    }
                    if c <= left_max + self.pad {
                        stack.push(child);
                    }
                }
                Node::Leaf { start, count } => {
                    let hit = self.cell_ids[start..start + count]
                        .iter()
                        .find_map(|&cell| self.test_cell(cell, point));
                    if hit.is_some() {
                        return hit;
                    }
                }
            }
        }
        None
    }
}

/// Snapshot whose batch queries run on the `rayon` thread pool.
#[cfg(feature = "rayon")]
#[derive(Copy, Clone, Debug)]
pub struct RayonLocator<'a, T: Scalar> {
    inner: SerialLocator<'a, T>,
}

#[cfg(feature = "rayon")]
impl<'a, T: Scalar> From<SerialLocator<'a, T>> for RayonLocator<'a, T> {
    fn from(inner: SerialLocator<'a, T>) -> Self {
        Self { inner }
    }
}

#[cfg(feature = "rayon")]
impl<T: Scalar> FindCell<T> for RayonLocator<'_, T> {
    fn find_cell(&self, point: Vec3<T>) -> Option<CellMatch<T>> {
        self.inner.find_cell(point)
    }

    fn find_cells(&self, points: &[Vec3<T>]) -> Vec<Option<CellMatch<T>>> {
        points.par_iter().map(|&p| self.inner.find_cell(p)).collect()
    }
}

/// A query snapshot bound to one [`Device`].
#[derive(Copy, Clone, Debug)]
pub enum ExecLocator<'a, T: Scalar> {
    /// Calling-thread queries.
    Serial(SerialLocator<'a, T>),
    /// Thread-pool batch queries.
    #[cfg(feature = "rayon")]
    Rayon(RayonLocator<'a, T>),
}

impl<T: Scalar> ExecLocator<'_, T> {
    /// Device this snapshot runs on.
    pub fn device(&self) -> Device {
        match self {
            Self::Serial(_) => Device::Serial,
            #[cfg(feature = "rayon")]
            Self::Rayon(_) => Device::Rayon,
        }
    }

    /// Depth of the hierarchy being queried.
    pub fn depth(&self) -> usize {
        match self {
            Self::Serial(s) => s.depth(),
            #[cfg(feature = "rayon")]
            Self::Rayon(r) => r.inner.depth(),
        }
    }
}

impl<T: Scalar> FindCell<T> for ExecLocator<'_, T> {
    fn find_cell(&self, point: Vec3<T>) -> Option<CellMatch<T>> {
        match self {
            Self::Serial(s) => s.find_cell(point),
            #[cfg(feature = "rayon")]
            Self::Rayon(r) => r.find_cell(point),
        }
    }

    fn find_cells(&self, points: &[Vec3<T>]) -> Vec<Option<CellMatch<T>>> {
        match self {
            Self::Serial(s) => s.find_cells(points),
            #[cfg(feature = "rayon")]
            Self::Rayon(r) => r.find_cells(points),
        }
    }
}
