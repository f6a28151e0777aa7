// Copyright 2025 the Locus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cell sets: per-cell shape and point connectivity.

use alloc::vec::Vec;

use crate::shape::{CellShape, MAX_CELL_POINTS};

/// Point indices of one cell, in shape order.
///
/// A fixed-capacity owned buffer so that structured cell sets can produce
/// connectivity on the fly without allocating.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CellPoints {
    ids: [usize; MAX_CELL_POINTS],
    len: usize,
}

impl CellPoints {
    /// Copy point ids from a slice. Returns `None` if it exceeds the capacity.
    pub fn from_slice(ids: &[usize]) -> Option<Self> {
        if ids.len() > MAX_CELL_POINTS {
            return None;
        }
        let mut out = Self {
            ids: [0; MAX_CELL_POINTS],
            len: ids.len(),
        };
        out.ids[..ids.len()].copy_from_slice(ids);
        Some(out)
    }

    /// The point ids.
    pub fn as_slice(&self) -> &[usize] {
        &self.ids[..self.len]
    }

    /// Number of point ids.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the cell references no points.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Source of cell shapes and connectivity.
///
/// Cells are identified by `0..num_cells()`. Implementations must be
/// immutable while a locator built over them is in use.
pub trait CellSet: Send + Sync {
    /// Number of cells.
    fn num_cells(&self) -> usize;

    /// Shape of `cell`.
    fn shape(&self, cell: usize) -> CellShape;

    /// Point ids of `cell`, in the order expected by its shape.
    fn cell_points(&self, cell: usize) -> CellPoints;
}

/// Errors reported when assembling an [`ExplicitCellSet`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CellSetError {
    /// Shape and offset arrays disagree.
    #[error("expected {expected} offsets for {cells} cells, found {found}")]
    OffsetCount {
        /// Number of cells described by the shapes array.
        cells: usize,
        /// Required offsets length.
        expected: usize,
        /// Provided offsets length.
        found: usize,
    },
    /// A cell's connectivity range is reversed or out of bounds.
    #[error("cell {cell} has an invalid connectivity range")]
    BadRange {
        /// Offending cell.
        cell: usize,
    },
    /// A cell does not have as many points as its shape requires.
    #[error("cell {cell} is a {shape:?} with {found} points, expected {expected}")]
    Arity {
        /// Offending cell.
        cell: usize,
        /// Shape of the cell.
        shape: CellShape,
        /// Points the shape requires.
        expected: usize,
        /// Points provided.
        found: usize,
    },
}

/// Unstructured cells with explicit shapes and connectivity.
///
/// Cell `i` uses `connectivity[offsets[i]..offsets[i + 1]]`.
#[derive(Clone, Debug, Default)]
pub struct ExplicitCellSet {
    shapes: Vec<CellShape>,
    offsets: Vec<usize>,
    connectivity: Vec<usize>,
}

impl ExplicitCellSet {
    /// Assemble from raw arrays, checking that every cell has its shape's arity.
    pub fn new(
        shapes: Vec<CellShape>,
        offsets: Vec<usize>,
        connectivity: Vec<usize>,
    ) -> Result<Self, CellSetError> {
        if offsets.len() != shapes.len() + 1 {
            return Err(CellSetError::OffsetCount {
                cells: shapes.len(),
                expected: shapes.len() + 1,
                found: offsets.len(),
            });
        }
        for (cell, (&shape, w)) in shapes.iter().zip(offsets.windows(2)).enumerate() {
            let (a, b) = (w[0], w[1]);
            if a > b || b > connectivity.len() {
                return Err(CellSetError::BadRange { cell });
            }
            if b - a != shape.num_points() {
                return Err(CellSetError::Arity {
                    cell,
                    shape,
                    expected: shape.num_points(),
                    found: b - a,
                });
            }
        }
        Ok(Self {
            shapes,
            offsets,
            connectivity,
        })
    }

    /// Empty cell set to be filled with [`push`](Self::push).
    pub fn empty() -> Self {
        Self {
            shapes: Vec::new(),
            offsets: alloc::vec![0],
            connectivity: Vec::new(),
        }
    }

    /// Append a cell. Returns its id.
    pub fn push(&mut self, shape: CellShape, points: &[usize]) -> Result<usize, CellSetError> {
        let cell = self.shapes.len();
        if points.len() != shape.num_points() {
            return Err(CellSetError::Arity {
                cell,
                shape,
                expected: shape.num_points(),
                found: points.len(),
            });
        }
        if self.offsets.is_empty() {
            self.offsets.push(0);
        }
        self.shapes.push(shape);
        self.connectivity.extend_from_slice(points);
        self.offsets.push(self.connectivity.len());
        Ok(cell)
    }
}

impl CellSet for ExplicitCellSet {
    fn num_cells(&self) -> usize {
        self.shapes.len()
    }

    fn shape(&self, cell: usize) -> CellShape {
        self.shapes[cell]
    }

    fn cell_points(&self, cell: usize) -> CellPoints {
        let range = self.offsets[cell]..self.offsets[cell + 1];
        // Arity was checked on insertion, so the slice always fits.
        CellPoints::from_slice(&self.connectivity[range]).unwrap_or(CellPoints {
            ids: [0; MAX_CELL_POINTS],
            len: 0,
        })
    }
}

/// Hexahedral cells of a regular 3D point lattice.
///
/// Points are numbered x-fastest: `i + nx * (j + ny * k)`; cells likewise over
/// the `(nx - 1) * (ny - 1) * (nz - 1)` lattice cells.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StructuredCellSet {
    point_dims: [usize; 3],
}

impl StructuredCellSet {
    /// Cell set over a lattice with `point_dims` points per axis.
    pub const fn new(point_dims: [usize; 3]) -> Self {
        Self { point_dims }
    }

    /// Points per axis.
    pub const fn point_dims(&self) -> [usize; 3] {
        self.point_dims
    }

    /// Cells per axis.
    pub fn cell_dims(&self) -> [usize; 3] {
        self.point_dims.map(|n| n.saturating_sub(1))
    }
}

impl CellSet for StructuredCellSet {
    fn num_cells(&self) -> usize {
        self.cell_dims().iter().product()
    }

    fn shape(&self, _cell: usize) -> CellShape {
        CellShape::Hexahedron
    }

    fn cell_points(&self, cell: usize) -> CellPoints {
        let [cx, cy, _] = self.cell_dims();
        let [nx, ny, _] = self.point_dims;
        let i = cell % cx;
        let j = (cell / cx) % cy;
        let k = cell / (cx * cy);
        let p = |di: usize, dj: usize, dk: usize| (i + di) + nx * ((j + dj) + ny * (k + dk));
        CellPoints {
            ids: [
                p(0, 0, 0),
                p(1, 0, 0),
                p(1, 1, 0),
                p(0, 1, 0),
                p(0, 0, 1),
                p(1, 0, 1),
                p(1, 1, 1),
                p(0, 1, 1),
            ],
            len: 8,
        }
    }
}
