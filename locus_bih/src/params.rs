// Copyright 2025 the Locus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Build parameters.

use crate::error::LocatorError;

/// Tuning knobs for hierarchy construction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BihParams {
    /// Candidate split planes evaluated per axis for each segment.
    pub num_planes: usize,
    /// Segments with at most this many cells become leaves.
    pub max_leaf_size: usize,
}

impl Default for BihParams {
    fn default() -> Self {
        Self {
            num_planes: 4,
            max_leaf_size: 5,
        }
    }
}

impl BihParams {
    /// Parameters with the given plane count and leaf size.
    pub const fn new(num_planes: usize, max_leaf_size: usize) -> Self {
        Self {
            num_planes,
            max_leaf_size,
        }
    }

    /// Reject zero plane counts or leaf sizes.
    pub fn validate(&self) -> Result<(), LocatorError> {
        if self.num_planes < 1 {
            return Err(LocatorError::InvalidNumPlanes);
        }
        if self.max_leaf_size < 1 {
            return Err(LocatorError::InvalidMaxLeafSize);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_values_are_rejected() {
        assert_eq!(BihParams::default().validate(), Ok(()));
        assert_eq!(
            BihParams::new(0, 5).validate(),
            Err(LocatorError::InvalidNumPlanes)
        );
        assert_eq!(
            BihParams::new(3, 0).validate(),
            Err(LocatorError::InvalidMaxLeafSize)
        );
    }
}
