// Copyright 2025 the Locus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Split-plane selection for one segment of cells.
//!
//! For every axis with a positive centroid extent, `K` planes are placed at
//! `min + extent * (i + 1) / (K + 1)`. A cell goes left when its centroid lies
//! strictly below the plane. Each candidate is scored with a surface-area
//! heuristic over the *cell* bounds of both sides:
//!
//! `cost = half_area(LB) * n_left + half_area(RB) * n_right`
//!
//! Costs use the scalar's widened accumulator. The lowest cost wins and ties
//! keep the earliest candidate in (axis, position) order, so selection is
//! deterministic. Candidates leaving one side empty are never chosen.

use locus_cells::{Aabb3D, Axis, Scalar, ScalarAcc, Vec3, half_area};

/// A scored candidate split of a segment.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SplitPlane<T: Scalar> {
    /// Split axis.
    pub axis: Axis,
    /// Plane position along `axis`.
    pub position: T,
    /// Cells whose centroid lies below `position`.
    pub left_count: usize,
    /// The remaining cells.
    pub right_count: usize,
    /// Union of the left cells' bounds.
    pub left_bounds: Aabb3D<T>,
    /// Union of the right cells' bounds.
    pub right_bounds: Aabb3D<T>,
    /// Surface-area heuristic cost.
    pub cost: ScalarAcc<T>,
}

impl<T: Scalar> SplitPlane<T> {
    /// Upper end of the left child's interval along the split axis.
    pub fn left_max(&self) -> T {
        self.left_bounds.max.get(self.axis)
    }

    /// Lower end of the right child's interval along the split axis.
    pub fn right_min(&self) -> T {
        self.right_bounds.min.get(self.axis)
    }

    /// Whether a cell with this centroid belongs on the left side.
    #[inline]
    pub fn goes_left(&self, centroid: &Vec3<T>) -> bool {
        centroid.get(self.axis) < self.position
    }
}

/// Evaluates candidate planes over segments of cells.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SplitPlaneEvaluator {
    num_planes: usize,
}

impl SplitPlaneEvaluator {
    /// Evaluator trying `num_planes` positions per axis.
    pub const fn new(num_planes: usize) -> Self {
        Self { num_planes }
    }

    /// Candidate positions over `[lo, lo + extent]`, ascending and strictly inside.
    pub fn candidate_positions<T: Scalar>(&self, lo: T, extent: T) -> impl Iterator<Item = T> {
        let denom = T::from_usize(self.num_planes + 1);
        (1..=self.num_planes).map(move |i| lo + extent * T::from_usize(i) / denom)
    }

    /// Pick the best plane for the cells listed in `segment`.
    ///
    /// `centroids` and `bounds` are indexed by cell id. Returns `None` when the
    /// segment is irreducible: its centroids coincide, or no candidate puts
    /// cells on both sides.
    pub fn evaluate<T: Scalar>(
        &self,
        segment: &[usize],
        centroids: &[Vec3<T>],
        bounds: &[Aabb3D<T>],
    ) -> Option<SplitPlane<T>> {
        let (&first, rest) = segment.split_first()?;
        let mut extent = Aabb3D::from_point(centroids[first]);
        for &cell in rest {
            extent.include(centroids[cell]);
        }

        let mut best: Option<SplitPlane<T>> = None;
        for axis in Axis::ALL {
            let width = extent.extent(axis);
            if !(width > T::ZERO) {
                continue;
            }
            for position in self.candidate_positions(extent.min.get(axis), width) {
                let Some(plane) = score_plane(segment, centroids, bounds, axis, position) else {
                    continue;
                };
                if best.as_ref().is_none_or(|b| plane.cost < b.cost) {
                    best = Some(plane);
                }
            }
        }
        best
    }
}

fn score_plane<T: Scalar>(
    segment: &[usize],
    centroids: &[Vec3<T>],
    bounds: &[Aabb3D<T>],
    axis: Axis,
    position: T,
) -> Option<SplitPlane<T>> {
    let mut left: Option<Aabb3D<T>> = None;
    let mut right: Option<Aabb3D<T>> = None;
    let mut left_count = 0;
    for &cell in segment {
        let b = bounds[cell];
        let side = if centroids[cell].get(axis) < position {
            left_count += 1;
            &mut left
        } else {
            &mut right
        };
        *side = Some(side.map_or(b, |acc| acc.union(&b)));
    }
    let (left_bounds, right_bounds) = (left?, right?);
    let right_count = segment.len() - left_count;
    let cost = half_area(&left_bounds) * T::acc_from_usize(left_count)
        + half_area(&right_bounds) * T::acc_from_usize(right_count);
    Some(SplitPlane {
        axis,
        position,
        left_count,
        right_count,
        left_bounds,
        right_bounds,
        cost,
    })
}
