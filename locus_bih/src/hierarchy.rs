// Copyright 2025 the Locus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The built hierarchy: a flat node array plus the cell permutation.

use alloc::vec::Vec;

use locus_cells::{Aabb3D, Axis};

/// One node of the flattened hierarchy. The root is `nodes()[0]`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Node<T> {
    /// Split node. The left child is `child`, the right child `child + 1`.
    ///
    /// The two intervals may overlap: a point qualifies for the left child
    /// when its `axis` coordinate is `<= left_max` and for the right child
    /// when it is `>= right_min`.
    Inner {
        /// Split axis.
        axis: Axis,
        /// Upper bound of the left child's cells along `axis`.
        left_max: T,
        /// Lower bound of the right child's cells along `axis`.
        right_min: T,
        /// Index of the left child; the right child follows it.
        child: usize,
    },
    /// Terminal node covering `cell_ids()[start..start + count]`.
    Leaf {
        /// First entry in the permutation array.
        start: usize,
        /// Number of cells.
        count: usize,
    },
}

impl<T> Node<T> {
    pub(crate) const PLACEHOLDER: Self = Self::Leaf { start: 0, count: 0 };
}

/// Counters recorded while building.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Levels executed by the builder; equals the tree depth.
    pub levels: usize,
    /// Number of inner nodes.
    pub inner_nodes: usize,
    /// Number of leaves.
    pub leaves: usize,
    /// Leaves created because their segment could not be split.
    pub forced_leaves: usize,
    /// Largest leaf cell count.
    pub max_leaf_len: usize,
}

/// An immutable bounding interval hierarchy over one cell set.
#[derive(Clone, Debug, PartialEq)]
pub struct Hierarchy<T> {
    pub(crate) nodes: Vec<Node<T>>,
    pub(crate) cell_ids: Vec<usize>,
    pub(crate) bounds: Aabb3D<T>,
    pub(crate) stats: BuildStats,
}

impl<T> Hierarchy<T> {
    /// Flat node array; the root is at index 0.
    pub fn nodes(&self) -> &[Node<T>] {
        &self.nodes
    }

    /// Permutation of cell ids; every leaf owns a contiguous range.
    pub fn cell_ids(&self) -> &[usize] {
        &self.cell_ids
    }

    /// Bounds of every cell in the hierarchy.
    pub fn bounds(&self) -> &Aabb3D<T> {
        &self.bounds
    }

    /// Number of levels, counting the root level as 1.
    pub fn depth(&self) -> usize {
        self.stats.levels
    }

    /// Build counters.
    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }

    /// Cells of every leaf, in node order.
    pub fn leaves(&self) -> impl Iterator<Item = &[usize]> + '_ {
        self.nodes.iter().filter_map(|n| match *n {
            Node::Leaf { start, count } => Some(&self.cell_ids[start..start + count]),
            Node::Inner { .. } => None,
        })
    }
}
