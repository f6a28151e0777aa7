// Copyright 2025 the Locus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg(feature = "compare_rstar")]

use std::sync::Arc;

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use locus_bih::{BihParams, Device, FindCell, HierarchyBuilder, Locator};
use locus_cells::{
    CellSet, CellShape, ExplicitCellSet, Scalar, UniformCoordinates, Vec3, cell_bounds,
    cell_vertices,
};

use rstar::RTree;
use rstar::primitives::{GeomWithData, Rectangle};

type CellBox = GeomWithData<Rectangle<[f64; 3]>, usize>;

const KUHN: [[usize; 3]; 6] = [
    [0, 1, 2],
    [0, 2, 1],
    [1, 0, 2],
    [1, 2, 0],
    [2, 0, 1],
    [2, 1, 0],
];

fn gen_tet_grid(n: usize) -> ExplicitCellSet {
    let dims = [n + 1; 3];
    let id = |p: [usize; 3]| p[0] + dims[0] * (p[1] + dims[1] * p[2]);
    let mut cells = ExplicitCellSet::empty();
    for k in 0..n {
        for j in 0..n {
            for i in 0..n {
                for perm in KUHN {
                    let mut p = [i, j, k];
                    let mut ids = [id(p); 4];
                    for (slot, &axis) in perm.iter().enumerate() {
                        p[axis] += 1;
                        ids[slot + 1] = id(p);
                    }
                    cells.push(CellShape::Tetra, &ids).unwrap();
                }
            }
        }
    }
    cells
}

fn gen_query_points(count: usize, extent: f64) -> Vec<Vec3<f64>> {
    let mut x = 0x9E37_79B9_7F4A_7C15_u64;
    let mut next = || {
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        ((x >> 11) as f64) / ((1u64 << 53) as f64) * extent
    };
    (0..count)
        .map(|_| {
            let (a, b, c) = (next(), next(), next());
            Vec3::new(a, b, c)
        })
        .collect()
}

fn to_rstar_boxes(cells: &ExplicitCellSet, coords: &UniformCoordinates<f64>) -> Vec<CellBox> {
    (0..cells.num_cells())
        .map(|cell| {
            let b = cell_bounds(cells, coords, cell).unwrap();
            GeomWithData::new(
                Rectangle::from_corners(b.min.to_array(), b.max.to_array()),
                cell,
            )
        })
        .collect()
}

/// R-tree candidates filtered by the same exact parametric test the locator runs.
fn rstar_find_cell(
    tree: &RTree<CellBox>,
    cells: &ExplicitCellSet,
    coords: &UniformCoordinates<f64>,
    p: Vec3<f64>,
) -> Option<usize> {
    tree.locate_all_at_point(&p.to_array())
        .map(|g| g.data)
        .find(|&cell| {
            let shape = cells.shape(cell);
            let verts = cell_vertices(cells, coords, cell);
            shape
                .world_to_parametric(verts.as_slice(), p)
                .is_some_and(|pc| shape.contains_parametric(pc, f64::PARAMETRIC_TOLERANCE))
        })
}

fn bench_rstar_external_compare_f64(c: &mut Criterion) {
    let mut group = c.benchmark_group("rstar_external_compare_f64");
    for &n in &[8usize, 16] {
        let cells = gen_tet_grid(n);
        let coords = UniformCoordinates::<f64>::unit([n + 1; 3]);
        let points = gen_query_points(10_000, n as f64);
        group.throughput(Throughput::Elements(points.len() as u64));

        group.bench_function(format!("locus_build_n{n}"), |b| {
            let builder = HierarchyBuilder::new(BihParams::default(), Device::Serial);
            b.iter(|| black_box(builder.build(&cells, &coords).unwrap()));
        });

        group.bench_function(format!("rstar_build_bulk_n{n}"), |b| {
            b.iter_batched(
                || to_rstar_boxes(&cells, &coords),
                |boxes| black_box(RTree::bulk_load(boxes)),
                BatchSize::SmallInput,
            );
        });

        let mut loc = Locator::<f64>::new();
        loc.set_cell_set(Arc::new(cells.clone()));
        loc.set_coords(Arc::new(coords));
        loc.update().unwrap();
        let exec = loc.prepare_for_execution(Device::Serial).unwrap();
        group.bench_function(format!("locus_query_n{n}"), |b| {
            b.iter(|| {
                let hits = points
                    .iter()
                    .filter_map(|&p| exec.find_cell(p))
                    .count();
                black_box(hits);
            });
        });

        let tree = RTree::bulk_load(to_rstar_boxes(&cells, &coords));
        group.bench_function(format!("rstar_query_n{n}"), |b| {
            b.iter(|| {
                let hits = points
                    .iter()
                    .filter_map(|&p| rstar_find_cell(&tree, &cells, &coords, p))
                    .count();
                black_box(hits);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_rstar_external_compare_f64);
criterion_main!(benches);
