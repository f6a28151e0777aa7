// Copyright 2025 the Locus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Locus BIH: a bounding interval hierarchy for point-in-cell queries.
//!
//! Given a volumetric cell set and its point coordinates, a [`Locator`] builds a
//! binary hierarchy over the cells and answers "which cell contains this point, and
//! at what parametric coordinates?".
//!
//! - Each inner node stores one axis and two possibly overlapping intervals, the
//!   bounds of its children's cells along that axis.
//! - Splits are chosen among `num_planes` evenly spaced candidates per axis with a
//!   surface-area heuristic. Segments of at most `max_leaf_size` cells become leaves;
//!   segments whose centroids cannot be separated become *forced* leaves.
//! - The build is level-synchronous: each level is one bulk map and one bulk
//!   partition, run either on the calling thread or on the `rayon` pool ([`Device`]).
//!   Both devices produce identical hierarchies.
//! - Queries walk the tree with a small explicit stack and finish with an exact
//!   parametric containment test in each candidate cell.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use locus_bih::{Device, FindCell, LocatorF64};
//! use locus_cells::{StructuredCellSet, UniformCoordinates, Vec3};
//!
//! let mut locator = LocatorF64::new();
//! locator.set_cell_set(Arc::new(StructuredCellSet::new([5, 5, 5])));
//! locator.set_coords(Arc::new(UniformCoordinates::unit([5, 5, 5])));
//! assert!(locator.update()?);
//!
//! let exec = locator.prepare_for_execution(Device::Serial)?;
//! let hit = exec.find_cell(Vec3::new(2.5, 0.25, 3.75)).unwrap();
//! assert_eq!(hit.cell, 2 + 4 * 4 * 3);
//! assert!((hit.parametric.y - 0.25).abs() < 1e-12);
//!
//! assert!(exec.find_cell(Vec3::new(9.0, 0.0, 0.0)).is_none());
//! # Ok::<(), locus_bih::LocatorError>(())
//! ```
//!
//! ## Lifecycle
//!
//! Every setter marks the locator dirty. [`Locator::update`] rebuilds only when
//! dirty, and [`Locator::prepare_for_execution`] refuses a dirty locator with
//! [`LocatorError::Dirty`] instead of rebuilding behind the caller's back. The
//! snapshot borrows the locator, so it cannot be reconfigured while queries run.
//!
//! ## Features
//!
//! - `rayon` (default): enables [`Device::Rayon`]. Without it the crate is `no_std`
//!   and asking for that device reports [`LocatorError::BackendUnavailable`].
//!
//! Build progress is reported through the `log` facade at `debug` and `trace` level.

#![no_std]

extern crate alloc;

mod builder;
mod device;
mod error;
mod exec;
mod hierarchy;
mod locator;
mod params;
mod split;

pub use builder::HierarchyBuilder;
pub use device::Device;
pub use error::LocatorError;
#[cfg(feature = "rayon")]
pub use exec::RayonLocator;
pub use exec::{CellMatch, ExecLocator, FindCell, NOT_FOUND, SerialLocator};
pub use hierarchy::{BuildStats, Hierarchy, Node};
pub use locator::{Locator, LocatorState};
pub use params::BihParams;
pub use split::{SplitPlane, SplitPlaneEvaluator};

/// Locator over `f32` coordinates.
pub type LocatorF32 = Locator<f32>;
/// Locator over `f64` coordinates.
pub type LocatorF64 = Locator<f64>;
