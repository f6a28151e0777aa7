// Copyright 2025 the Locus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Level-synchronous hierarchy construction.
//!
//! The builder keeps a list of *active segments*, contiguous ranges of the
//! cell permutation that still need a decision. Each level runs three bulk
//! steps on the selected [`Device`]:
//!
//! 1. map every active segment to a decision (leaf, forced leaf, or split plane);
//! 2. stably partition the permutation range of every split segment in place,
//!    each segment owning a disjoint slice;
//! 3. emit nodes in segment order, appending the two children of each split
//!    contiguously; the children form the next level's active list.
//!
//! Nothing recurses: the loop ends when a level produces no children.

use alloc::vec;
use alloc::vec::Vec;

use locus_cells::{
    Aabb3D, CellSet, Coordinates, Scalar, Vec3, bounds_of, cell_vertices,
};

use crate::device::Device;
use crate::error::LocatorError;
use crate::hierarchy::{BuildStats, Hierarchy, Node};
use crate::params::BihParams;
use crate::split::{SplitPlane, SplitPlaneEvaluator};

/// Builds a [`Hierarchy`] from a cell set and its coordinates.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct HierarchyBuilder {
    params: BihParams,
    device: Device,
}

#[derive(Copy, Clone, Debug)]
struct Segment {
    start: usize,
    len: usize,
    node: usize,
}

#[derive(Copy, Clone, Debug)]
enum Decision<T: Scalar> {
    Leaf,
    ForcedLeaf,
    Split(SplitPlane<T>),
}

/// One segment's slice of the permutation, with the plane that splits it.
struct PartitionJob<'a, T: Scalar> {
    cells: &'a mut [usize],
    plane: SplitPlane<T>,
}

impl<T: Scalar> PartitionJob<'_, T> {
    /// Move the cells the plane sends left to the front, returning their count.
    fn run(&mut self, centroids: &[Vec3<T>]) -> usize {
        let plane = self.plane;
        stable_partition(self.cells, |c| plane.goes_left(&centroids[c]))
    }
}

impl HierarchyBuilder {
    /// Builder with the given parameters, running on `device`.
    pub const fn new(params: BihParams, device: Device) -> Self {
        Self { params, device }
    }

    /// Build a hierarchy over every cell of `cells`.
    ///
    /// Fails on invalid parameters, an unavailable device, empty inputs, or
    /// connectivity that does not fit `coords`. Nothing is returned on failure.
    pub fn build<T, C, P>(&self, cells: &C, coords: &P) -> Result<Hierarchy<T>, LocatorError>
    where
        T: Scalar,
        C: CellSet + ?Sized,
        P: Coordinates<T> + ?Sized,
    {
        self.params.validate()?;
        if !self.device.is_available() {
            return Err(LocatorError::BackendUnavailable(self.device));
        }
        let num_cells = cells.num_cells();
        if num_cells == 0 {
            return Err(LocatorError::EmptyCellSet);
        }
        if coords.num_points() == 0 {
            return Err(LocatorError::EmptyCoordinates);
        }

        log::debug!(
            "building BIH over {num_cells} cells (planes: {}, max leaf: {}, device: {:?})",
            self.params.num_planes,
            self.params.max_leaf_size,
            self.device,
        );

        let (centroids, bounds) = self.prepare_cells(cells, coords)?;
        let mut mesh_bounds = bounds[0];
        for b in &bounds[1..] {
            mesh_bounds = mesh_bounds.union(b);
        }

        let evaluator = SplitPlaneEvaluator::new(self.params.num_planes);
        let max_leaf = self.params.max_leaf_size;
        let mut cell_ids: Vec<usize> = (0..num_cells).collect();
        let mut nodes: Vec<Node<T>> = vec![Node::PLACEHOLDER];
        let mut stats = BuildStats::default();
        let mut active = vec![Segment {
            start: 0,
            len: num_cells,
            node: 0,
        }];

        while !active.is_empty() {
            stats.levels += 1;

            let decisions = {
                let ids = &cell_ids;
                let (centroids, bounds) = (&centroids, &bounds);
                self.device.map(&active, |seg| {
                    if seg.len <= max_leaf {
                        return Decision::Leaf;
                    }
                    let segment = &ids[seg.start..seg.start + seg.len];
                    match evaluator.evaluate(segment, centroids, bounds) {
                        Some(plane) => Decision::Split(plane),
                        None => Decision::ForcedLeaf,
                    }
                })
            };

            let mut jobs = partition_jobs(&mut cell_ids, &active, &decisions);
            self.device.for_each_mut(&mut jobs, |job| {
                let left = job.run(&centroids);
                debug_assert_eq!(left, job.plane.left_count, "partition must match the scored plane");
            });
            drop(jobs);

            let mut next = Vec::with_capacity(2 * active.len());
            for (seg, decision) in active.iter().zip(&decisions) {
                match decision {
                    Decision::Leaf | Decision::ForcedLeaf => {
                        nodes[seg.node] = Node::Leaf {
                            start: seg.start,
                            count: seg.len,
                        };
                        stats.leaves += 1;
                        stats.max_leaf_len = stats.max_leaf_len.max(seg.len);
                        if matches!(decision, Decision::ForcedLeaf) {
                            stats.forced_leaves += 1;
                            log::debug!(
                                "forced leaf of {} cells at level {}: centroids cannot be separated",
                                seg.len,
                                stats.levels,
                            );
                        }
                    }
                    Decision::Split(plane) => {
                        let child = nodes.len();
                        nodes[seg.node] = Node::Inner {
                            axis: plane.axis,
                            left_max: plane.left_max(),
                            right_min: plane.right_min(),
                            child,
                        };
                        nodes.push(Node::PLACEHOLDER);
                        nodes.push(Node::PLACEHOLDER);
                        stats.inner_nodes += 1;
                        next.push(Segment {
                            start: seg.start,
                            len: plane.left_count,
                            node: child,
                        });
                        next.push(Segment {
                            start: seg.start + plane.left_count,
                            len: plane.right_count,
                            node: child + 1,
                        });
                    }
                }
            }
            log::trace!(
                "level {}: {} segments, {} splits",
                stats.levels,
                active.len(),
                next.len() / 2,
            );
            active = next;
        }

        log::debug!(
            "built BIH: {} levels, {} nodes, {} leaves ({} forced), largest leaf {}",
            stats.levels,
            nodes.len(),
            stats.leaves,
            stats.forced_leaves,
            stats.max_leaf_len,
        );

        Ok(Hierarchy {
            nodes,
            cell_ids,
            bounds: mesh_bounds,
            stats,
        })
    }

    /// Centroid and bounds of every cell, validating connectivity on the way.
    fn prepare_cells<T, C, P>(
        &self,
        cells: &C,
        coords: &P,
    ) -> Result<(Vec<Vec3<T>>, Vec<Aabb3D<T>>), LocatorError>
    where
        T: Scalar,
        C: CellSet + ?Sized,
        P: Coordinates<T> + ?Sized,
    {
        let num_points = coords.num_points();
        let prepared = self.device.map_indices(cells.num_cells(), |cell| {
            let shape = cells.shape(cell);
            let ids = cells.cell_points(cell);
            if ids.len() != shape.num_points() {
                return Err(LocatorError::ShapeArity {
                    cell,
                    shape,
                    expected: shape.num_points(),
                    found: ids.len(),
                });
            }
            if let Some(&point) = ids.as_slice().iter().find(|&&p| p >= num_points) {
                return Err(LocatorError::PointOutOfRange {
                    cell,
                    point,
                    num_points,
                });
            }
            let verts = cell_vertices(cells, coords, cell);
            let centroid = shape.interpolate(verts.as_slice(), shape.parametric_center());
            // Arity is non-zero for every shape, so the box always exists.
            let bounds = bounds_of(verts.as_slice()).unwrap_or(Aabb3D::from_point(centroid));
            Ok((centroid, bounds))
        });

        let mut centroids = Vec::with_capacity(prepared.len());
        let mut bounds = Vec::with_capacity(prepared.len());
        for item in prepared {
            let (c, b) = item?;
            centroids.push(c);
            bounds.push(b);
        }
        Ok((centroids, bounds))
    }
}

/// Hand out the disjoint permutation slices of every split segment.
///
/// `active` is sorted by `start` and its ranges do not overlap.
fn partition_jobs<'a, T: Scalar>(
    cell_ids: &'a mut [usize],
    active: &[Segment],
    decisions: &[Decision<T>],
) -> Vec<PartitionJob<'a, T>> {
    let mut jobs = Vec::new();
    let mut rest = cell_ids;
    let mut offset = 0;
    for (seg, decision) in active.iter().zip(decisions) {
        let Decision::Split(plane) = decision else {
            continue;
        };
        let (_, tail) = core::mem::take(&mut rest).split_at_mut(seg.start - offset);
        let (cells, tail) = tail.split_at_mut(seg.len);
        jobs.push(PartitionJob {
            cells,
            plane: *plane,
        });
        rest = tail;
        offset = seg.start + seg.len;
    }
    jobs
}

/// Move cells for which `goes_left` holds to the front, keeping relative order
/// on both sides. Returns the size of the left side.
fn stable_partition<F: Fn(usize) -> bool>(cells: &mut [usize], goes_left: F) -> usize {
    let mut right = Vec::with_capacity(cells.len());
    let mut left = 0;
    for i in 0..cells.len() {
        let cell = cells[i];
        if goes_left(cell) {
            cells[left] = cell;
            left += 1;
        } else {
            right.push(cell);
        }
    }
    cells[left..].copy_from_slice(&right);
    left
}
