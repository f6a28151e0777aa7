// Copyright 2025 the Locus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The `Locator` control object: configuration, build orchestration and the
//! Clean/Dirty lifecycle.

use alloc::sync::Arc;
use core::fmt;

use locus_cells::{CellSet, Coordinates, Scalar};

use crate::builder::HierarchyBuilder;
use crate::device::Device;
use crate::error::LocatorError;
use crate::exec::{ExecLocator, SerialLocator};
use crate::hierarchy::Hierarchy;
use crate::params::BihParams;

/// Whether the built hierarchy reflects the current configuration.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum LocatorState {
    /// The hierarchy matches the inputs.
    Clean,
    /// Inputs or parameters changed since the last successful build.
    #[default]
    Dirty,
}

/// Point locator over a cell set and its coordinates.
///
/// Every setter marks the locator [`Dirty`](LocatorState::Dirty). [`update`](Self::update)
/// rebuilds only when dirty; [`prepare_for_execution`](Self::prepare_for_execution)
/// hands out a read-only query snapshot of a clean locator.
pub struct Locator<T: Scalar> {
    cells: Option<Arc<dyn CellSet>>,
    coords: Option<Arc<dyn Coordinates<T>>>,
    params: BihParams,
    build_device: Device,
    state: LocatorState,
    hierarchy: Option<Hierarchy<T>>,
}

impl<T: Scalar> fmt::Debug for Locator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Locator")
            .field("num_cells", &self.cells.as_ref().map(|c| c.num_cells()))
            .field("num_points", &self.coords.as_ref().map(|p| p.num_points()))
            .field("params", &self.params)
            .field("build_device", &self.build_device)
            .field("state", &self.state)
            .field("depth", &self.hierarchy.as_ref().map(Hierarchy::depth))
            .finish_non_exhaustive()
    }
}

impl<T: Scalar> Default for Locator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> Locator<T> {
    /// Dirty locator with default parameters and no inputs.
    pub fn new() -> Self {
        Self::with_params(BihParams::default())
    }

    /// Dirty locator with the given parameters and no inputs.
    pub fn with_params(params: BihParams) -> Self {
        Self {
            cells: None,
            coords: None,
            params,
            build_device: Device::preferred(),
            state: LocatorState::Dirty,
            hierarchy: None,
        }
    }

    /// Assign the cell set.
    pub fn set_cell_set(&mut self, cells: Arc<dyn CellSet>) {
        self.cells = Some(cells);
        self.state = LocatorState::Dirty;
    }

    /// Assign the point coordinates.
    pub fn set_coords(&mut self, coords: Arc<dyn Coordinates<T>>) {
        self.coords = Some(coords);
        self.state = LocatorState::Dirty;
    }

    /// Set the number of candidate planes per axis.
    pub fn set_num_planes(&mut self, num_planes: usize) {
        self.params.num_planes = num_planes;
        self.state = LocatorState::Dirty;
    }

    /// Set the leaf size below which segments stop splitting.
    pub fn set_max_leaf_size(&mut self, max_leaf_size: usize) {
        self.params.max_leaf_size = max_leaf_size;
        self.state = LocatorState::Dirty;
    }

    /// Replace all build parameters.
    pub fn set_params(&mut self, params: BihParams) {
        self.params = params;
        self.state = LocatorState::Dirty;
    }

    /// Device used by [`build`](Self::build). The hierarchy does not depend on it,
    /// so the state is left unchanged.
    pub fn set_build_device(&mut self, device: Device) {
        self.build_device = device;
    }

    /// Current build parameters.
    pub fn params(&self) -> &BihParams {
        &self.params
    }

    /// Device used for builds.
    pub fn build_device(&self) -> Device {
        self.build_device
    }

    /// Lifecycle state.
    pub fn state(&self) -> LocatorState {
        self.state
    }

    /// Shorthand for `state() == LocatorState::Dirty`.
    pub fn is_dirty(&self) -> bool {
        self.state == LocatorState::Dirty
    }

    /// The last successfully built hierarchy, if it is still current.
    pub fn hierarchy(&self) -> Option<&Hierarchy<T>> {
        self.hierarchy.as_ref()
    }

    /// Rebuild unconditionally.
    ///
    /// On success the locator becomes clean. On failure the previous hierarchy
    /// is discarded and the locator stays dirty.
    pub fn build(&mut self) -> Result<(), LocatorError> {
        self.hierarchy = None;
        self.state = LocatorState::Dirty;
        let cells = self.cells.as_deref().ok_or(LocatorError::MissingCellSet)?;
        let coords = self
            .coords
            .as_deref()
            .ok_or(LocatorError::MissingCoordinates)?;
        let hierarchy = HierarchyBuilder::new(self.params, self.build_device).build(cells, coords)?;
        self.hierarchy = Some(hierarchy);
        self.state = LocatorState::Clean;
        Ok(())
    }

    /// Rebuild if dirty. Returns whether a build ran.
    pub fn update(&mut self) -> Result<bool, LocatorError> {
        if self.state == LocatorState::Clean {
            return Ok(false);
        }
        self.build()?;
        Ok(true)
    }

    /// A query snapshot running on `device`.
    ///
    /// Fails with [`LocatorError::Dirty`] unless the locator is clean; it never
    /// rebuilds on its own. Fails with [`LocatorError::BackendUnavailable`] when
    /// `device` is not compiled in.
    pub fn prepare_for_execution(&self, device: Device) -> Result<ExecLocator<'_, T>, LocatorError> {
        if !device.is_available() {
            return Err(LocatorError::BackendUnavailable(device));
        }
        let (LocatorState::Clean, Some(hierarchy), Some(cells), Some(coords)) = (
            self.state,
            self.hierarchy.as_ref(),
            self.cells.as_deref(),
            self.coords.as_deref(),
        ) else {
            return Err(LocatorError::Dirty);
        };
        let serial = SerialLocator::new(hierarchy, cells, coords);
        Ok(match device {
            #[cfg(feature = "rayon")]
            Device::Rayon => ExecLocator::Rayon(serial.into()),
            _ => ExecLocator::Serial(serial),
        })
    }
}
