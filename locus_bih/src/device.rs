// Copyright 2025 the Locus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Execution devices.
//!
//! A [`Device`] names where bulk work runs: the calling thread, or the `rayon`
//! thread pool when the `rayon` feature is enabled. The hierarchy builder is
//! written once against the bulk operations below, so both devices execute the
//! identical algorithm; each operation returns only after every item has been
//! processed, which is the barrier between build levels.

use alloc::vec::Vec;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Execution device for builds and query snapshots.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Device {
    /// Run on the calling thread.
    #[default]
    Serial,
    /// Run on the global `rayon` thread pool. Requires the `rayon` feature.
    Rayon,
}

impl Device {
    /// Whether this device was compiled into the crate.
    pub const fn is_available(self) -> bool {
        match self {
            Self::Serial => true,
            Self::Rayon => cfg!(feature = "rayon"),
        }
    }

    /// The fastest available device.
    pub const fn preferred() -> Self {
        if Self::Rayon.is_available() {
            Self::Rayon
        } else {
            Self::Serial
        }
    }

    /// Map every item to a result, preserving order.
    pub(crate) fn map<I, R, F>(self, items: &[I], f: F) -> Vec<R>
    where
        I: Sync,
        R: Send,
        F: Fn(&I) -> R + Sync + Send,
    {
        match self {
            #[cfg(feature = "rayon")]
            Self::Rayon => items.par_iter().map(f).collect(),
            _ => items.iter().map(f).collect(),
        }
    }

    /// Map every index in `0..n` to a result, preserving order.
    pub(crate) fn map_indices<R, F>(self, n: usize, f: F) -> Vec<R>
    where
        R: Send,
        F: Fn(usize) -> R + Sync + Send,
    {
        match self {
            #[cfg(feature = "rayon")]
            Self::Rayon => (0..n).into_par_iter().map(f).collect(),
            _ => (0..n).map(f).collect(),
        }
    }

    /// Apply `f` to every item in place. Items must not alias.
    pub(crate) fn for_each_mut<I, F>(self, items: &mut [I], f: F)
    where
        I: Send,
        F: Fn(&mut I) + Sync + Send,
    {
        match self {
            #[cfg(feature = "rayon")]
            Self::Rayon => items.par_iter_mut().for_each(f),
            _ => items.iter_mut().for_each(f),
        }
    }
}
