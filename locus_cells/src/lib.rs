// Copyright 2025 the Locus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Locus Cells: the mesh-side collaborators of a point locator.
//!
//! - [`CellSet`]: per-cell shape and point connectivity. [`ExplicitCellSet`] stores
//!   unstructured cells; [`StructuredCellSet`] derives hexahedra from a point lattice.
//! - [`Coordinates`]: point positions. [`PointArray`] stores them; [`UniformCoordinates`]
//!   computes them from an origin and spacing.
//! - [`CellShape`]: parametric math for the linear volumetric shapes
//!   (tetrahedron, hexahedron, wedge, pyramid): interpolation, Newton inversion of the
//!   world mapping, and the parametric containment test.
//!
//! Coordinates are generic over [`Scalar`] (`f32` or `f64`); each scalar carries its own
//! containment and convergence tolerances.
//!
//! # Example
//!
//! ```rust
//! use locus_cells::{CellSet, StructuredCellSet, UniformCoordinates, Vec3, cell_vertices};
//!
//! let cells = StructuredCellSet::new([3, 3, 3]);
//! let coords = UniformCoordinates::<f64>::unit([3, 3, 3]);
//! assert_eq!(cells.num_cells(), 8);
//!
//! let shape = cells.shape(7);
//! let verts = cell_vertices(&cells, &coords, 7);
//! let pc = shape
//!     .world_to_parametric(verts.as_slice(), Vec3::new(1.25, 1.5, 1.75))
//!     .unwrap();
//! assert!(shape.contains_parametric(pc, 1e-8));
//! assert!((pc.x - 0.25).abs() < 1e-12);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod cell_set;
pub mod coords;
pub mod geometry;
pub mod shape;
pub mod types;

pub use cell_set::{CellPoints, CellSet, CellSetError, ExplicitCellSet, StructuredCellSet};
pub use coords::{Coordinates, PointArray, UniformCoordinates};
pub use geometry::{CellVertices, bounds_of, cell_bounds, cell_centroid, cell_vertices};
pub use shape::{CellShape, MAX_CELL_POINTS};
pub use types::{Aabb3D, Axis, Scalar, ScalarAcc, Vec3, half_area};
