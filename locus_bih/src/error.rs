// Copyright 2025 the Locus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type for building and preparing a locator.

use locus_cells::CellShape;

use crate::device::Device;

/// Errors surfaced by [`Locator`](crate::Locator) operations.
///
/// Queries never fail: a point inside no cell is reported as `None` by
/// [`FindCell::find_cell`](crate::FindCell::find_cell).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LocatorError {
    /// `num_planes` was zero.
    #[error("number of split planes must be at least 1")]
    InvalidNumPlanes,
    /// `max_leaf_size` was zero.
    #[error("maximum leaf size must be at least 1")]
    InvalidMaxLeafSize,
    /// No cell set was assigned before building.
    #[error("no cell set has been assigned")]
    MissingCellSet,
    /// The cell set has no cells.
    #[error("cell set has no cells")]
    EmptyCellSet,
    /// No coordinates were assigned before building.
    #[error("no coordinates have been assigned")]
    MissingCoordinates,
    /// The coordinate array has no points.
    #[error("coordinate array has no points")]
    EmptyCoordinates,
    /// A cell references a point past the end of the coordinate array.
    #[error("cell {cell} references point {point}, but there are only {num_points} points")]
    PointOutOfRange {
        /// Offending cell.
        cell: usize,
        /// Point id it references.
        point: usize,
        /// Points available.
        num_points: usize,
    },
    /// A cell has the wrong number of points for its shape.
    #[error("cell {cell} is a {shape:?} with {found} points, expected {expected}")]
    ShapeArity {
        /// Offending cell.
        cell: usize,
        /// Its shape.
        shape: CellShape,
        /// Points the shape requires.
        expected: usize,
        /// Points the cell set reported.
        found: usize,
    },
    /// The requested device is not compiled in.
    #[error("execution device {0:?} is not available in this build")]
    BackendUnavailable(Device),
    /// The locator was modified after its last build.
    #[error("locator is dirty; call `update` before preparing it for execution")]
    Dirty,
}

impl LocatorError {
    /// True for misconfiguration detected while building.
    pub fn is_configuration(&self) -> bool {
        !matches!(self, Self::BackendUnavailable(_) | Self::Dirty)
    }
}
