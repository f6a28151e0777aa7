// Copyright 2025 the Locus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests over random soups of possibly overlapping cells.
//!
//! - every cell lands in exactly one leaf
//! - leaves above the size bound hold cells with a single shared centroid
//! - node intervals bound the cells beneath them
//! - every centroid locates some cell that really contains it

use std::sync::Arc;

use locus_bih::{BihParams, Device, FindCell, Hierarchy, Locator, Node};
use locus_cells::{
    CellSet, CellShape, ExplicitCellSet, PointArray, Vec3, cell_bounds, cell_centroid,
    cell_vertices,
};
use proptest::prelude::*;

/// One axis-aligned cell: shape, anchor corner and edge lengths.
type RandomCell = (CellShape, [f64; 3], [f64; 3]);

fn random_cell() -> impl Strategy<Value = RandomCell> {
    (
        prop_oneof![
            Just(CellShape::Tetra),
            Just(CellShape::Hexahedron),
            Just(CellShape::Wedge),
            Just(CellShape::Pyramid),
        ],
        prop::array::uniform3(0.0..20.0),
        prop::array::uniform3(0.2..3.0),
    )
}

/// Corners of the unit-box instance of `shape`, in connectivity order.
fn unit_corners(shape: CellShape) -> &'static [(f64, f64, f64)] {
    match shape {
        CellShape::Tetra => &[
            (0.0, 0.0, 0.0),
            (1.0, 0.0, 0.0),
            (0.0, 1.0, 0.0),
            (0.0, 0.0, 1.0),
        ],
        CellShape::Hexahedron => &[
            (0.0, 0.0, 0.0),
            (1.0, 0.0, 0.0),
            (1.0, 1.0, 0.0),
            (0.0, 1.0, 0.0),
            (0.0, 0.0, 1.0),
            (1.0, 0.0, 1.0),
            (1.0, 1.0, 1.0),
            (0.0, 1.0, 1.0),
        ],
        CellShape::Wedge => &[
            (0.0, 0.0, 0.0),
            (1.0, 0.0, 0.0),
            (0.0, 1.0, 0.0),
            (0.0, 0.0, 1.0),
            (1.0, 0.0, 1.0),
            (0.0, 1.0, 1.0),
        ],
        CellShape::Pyramid => &[
            (0.0, 0.0, 0.0),
            (1.0, 0.0, 0.0),
            (1.0, 1.0, 0.0),
            (0.0, 1.0, 0.0),
            (0.5, 0.5, 1.0),
        ],
    }
}

fn soup(
    cells_in: &[RandomCell],
    duplicates: usize,
) -> (Arc<ExplicitCellSet>, Arc<PointArray<f64>>) {
    let mut points = Vec::new();
    let mut cells = ExplicitCellSet::empty();
    for &(shape, [x, y, z], [a, b, c]) in cells_in {
        let first = points.len();
        for &(dx, dy, dz) in unit_corners(shape) {
            points.push(Vec3::new(x + a * dx, y + b * dy, z + c * dz));
        }
        let ids: Vec<usize> = (first..points.len()).collect();
        cells.push(shape, &ids).unwrap();
    }
    if let Some(&(shape, ..)) = cells_in.first() {
        let ids: Vec<usize> = (0..shape.num_points()).collect();
        for _ in 0..duplicates {
            cells.push(shape, &ids).unwrap();
        }
    }
    (Arc::new(cells), Arc::new(PointArray::new(points)))
}

fn subtree_cells(h: &Hierarchy<f64>, root: usize) -> Vec<usize> {
    let mut out = Vec::new();
    let mut stack = vec![root];
    while let Some(n) = stack.pop() {
        match h.nodes()[n] {
            Node::Inner { child, .. } => stack.extend([child, child + 1]),
            Node::Leaf { start, count } => {
                out.extend_from_slice(&h.cell_ids()[start..start + count]);
            }
        }
    }
    out
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_hierarchy_invariants(
        cells_in in prop::collection::vec(random_cell(), 1..60),
        duplicates in 0_usize..6,
        num_planes in 1_usize..10,
        max_leaf_size in 1_usize..8,
    ) {
        let (cells, coords) = soup(&cells_in, duplicates);
        let num_cells = cells.num_cells();
        let mut loc = Locator::<f64>::with_params(BihParams::new(num_planes, max_leaf_size));
        loc.set_build_device(Device::Serial);
        loc.set_cell_set(cells.clone());
        loc.set_coords(coords.clone());
        prop_assert_eq!(loc.update(), Ok(true));
        let h = loc.hierarchy().unwrap();

        let mut seen = vec![0_u32; num_cells];
        for leaf in h.leaves() {
            for &cell in leaf {
                seen[cell] += 1;
            }
        }
        prop_assert!(seen.iter().all(|&n| n == 1));

        let stats = h.stats();
        prop_assert_eq!(stats.leaves, stats.inner_nodes + 1);
        prop_assert_eq!(h.nodes().len(), 2 * stats.inner_nodes + 1);

        let centroids: Vec<Vec3<f64>> =
            (0..num_cells).map(|c| cell_centroid(&*cells, &*coords, c)).collect();
        for leaf in h.leaves().filter(|l| l.len() > max_leaf_size) {
            let first = centroids[leaf[0]];
            prop_assert!(leaf.iter().all(|&c| centroids[c] == first));
        }

        for node in h.nodes() {
            if let Node::Inner { axis, left_max, right_min, child } = *node {
                for cell in subtree_cells(h, child) {
                    let b = cell_bounds(&*cells, &*coords, cell).unwrap();
                    prop_assert!(b.max.get(axis) <= left_max);
                }
                for cell in subtree_cells(h, child + 1) {
                    let b = cell_bounds(&*cells, &*coords, cell).unwrap();
                    prop_assert!(b.min.get(axis) >= right_min);
                }
            }
        }

        let exec = loc.prepare_for_execution(Device::Serial).unwrap();
        for (cell, &centroid) in centroids.iter().enumerate() {
            let m = exec.find_cell(centroid);
            prop_assert!(m.is_some(), "centroid of cell {} not located", cell);
            let m = m.unwrap();
            let shape = cells.shape(m.cell);
            prop_assert!(shape.contains_parametric(m.parametric, 1e-8));
            let verts = cell_vertices(&*cells, &*coords, m.cell);
            let back = shape.interpolate(verts.as_slice(), m.parametric);
            prop_assert!((back - centroid).max_abs() < 1e-7);
        }
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn prop_devices_agree(
        cells_in in prop::collection::vec(random_cell(), 1..80),
        num_planes in 1_usize..10,
    ) {
        let (cells, coords) = soup(&cells_in, 2);
        let build = |device| {
            let mut loc = Locator::<f64>::with_params(BihParams::new(num_planes, 3));
            loc.set_build_device(device);
            loc.set_cell_set(cells.clone());
            loc.set_coords(coords.clone());
            loc.build().map(|()| loc)
        };
        let serial = build(Device::Serial).unwrap();
        let pooled = build(Device::Rayon).unwrap();
        prop_assert_eq!(serial.hierarchy(), pooled.hierarchy());
    }
}
