// Copyright 2025 the Locus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::Arc;

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use locus_bih::{BihParams, Device, FindCell, HierarchyBuilder, Locator};
use locus_cells::{CellShape, ExplicitCellSet, Scalar, StructuredCellSet, UniformCoordinates, Vec3};

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

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

/// Uniform points over `[-0.05 * extent, 1.05 * extent]³`; a few miss the mesh.
fn gen_query_points<T: Scalar>(count: usize, extent: f64, seed: u64) -> Vec<Vec3<T>> {
    let mut rng = Rng::new(seed);
    let mut coord = || T::from_f64((rng.next_f64() * 1.1 - 0.05) * extent);
    (0..count)
        .map(|_| {
            let (x, y, z) = (coord(), coord(), coord());
            Vec3::new(x, y, z)
        })
        .collect()
}

fn tet_locator<T: Scalar>(n: usize, params: BihParams) -> Locator<T> {
    let mut loc = Locator::with_params(params);
    loc.set_cell_set(Arc::new(gen_tet_grid(n)));
    loc.set_coords(Arc::new(UniformCoordinates::<T>::unit([n + 1; 3])));
    loc.update().unwrap();
    loc
}

fn bench_build_planes(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_tet_grid_planes");
    let n = 16;
    let cells = gen_tet_grid(n);
    let coords = UniformCoordinates::<f64>::unit([n + 1; 3]);
    group.throughput(Throughput::Elements((6 * n * n * n) as u64));
    for &k in &[3usize, 4, 6, 9] {
        for device in [Device::Serial, Device::preferred()] {
            let builder = HierarchyBuilder::new(BihParams::new(k, 5), device);
            group.bench_function(format!("k{k}_{device:?}"), |b| {
                b.iter(|| {
                    let h = builder.build(&cells, &coords).unwrap();
                    black_box(h.depth());
                });
            });
        }
    }
    group.finish();
}

fn bench_build_structured(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_hex_grid");
    for &n in &[16usize, 32] {
        let cells = StructuredCellSet::new([n + 1; 3]);
        let coords = UniformCoordinates::<f64>::unit([n + 1; 3]);
        group.throughput(Throughput::Elements((n * n * n) as u64));
        for device in [Device::Serial, Device::preferred()] {
            let builder = HierarchyBuilder::new(BihParams::default(), device);
            group.bench_function(format!("n{n}_{device:?}"), |b| {
                b.iter(|| black_box(builder.build(&cells, &coords).unwrap()));
            });
        }
    }
    group.finish();
}

fn bench_locator_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("locator_update");
    let n = 12;
    group.bench_function(format!("dirty_rebuild_n{n}"), |b| {
        b.iter_batched(
            || {
                let mut loc = Locator::<f64>::new();
                loc.set_cell_set(Arc::new(gen_tet_grid(n)));
                loc.set_coords(Arc::new(UniformCoordinates::unit([n + 1; 3])));
                loc
            },
            |mut loc| {
                black_box(loc.update().unwrap());
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

fn bench_query_f64(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_tet_grid_f64");
    let n = 16;
    let points = gen_query_points::<f64>(20_000, n as f64, 0xCAFE_F00D_DEAD_BEEF);
    group.throughput(Throughput::Elements(points.len() as u64));
    for &k in &[4usize, 9] {
        let loc = tet_locator::<f64>(n, BihParams::new(k, 5));
        for device in [Device::Serial, Device::preferred()] {
            let exec = loc.prepare_for_execution(device).unwrap();
            group.bench_function(format!("k{k}_batch_{device:?}"), |b| {
                b.iter(|| black_box(exec.find_cells(&points)));
            });
        }
        let exec = loc.prepare_for_execution(Device::Serial).unwrap();
        group.bench_function(format!("k{k}_single"), |b| {
            b.iter(|| {
                let hits = points
                    .iter()
                    .filter(|&&p| exec.find_cell(p).is_some())
                    .count();
                black_box(hits);
            });
        });
    }
    group.finish();
}

fn bench_query_f32(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_tet_grid_f32");
    let n = 16;
    let points = gen_query_points::<f32>(20_000, n as f64, 0xFACE_FEED_CAFE_BABE);
    group.throughput(Throughput::Elements(points.len() as u64));
    let loc = tet_locator::<f32>(n, BihParams::default());
    for device in [Device::Serial, Device::preferred()] {
        let exec = loc.prepare_for_execution(device).unwrap();
        group.bench_function(format!("batch_{device:?}"), |b| {
            b.iter(|| black_box(exec.find_cells(&points)));
        });
    }
    group.finish();
}

fn bench_leaf_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_leaf_size");
    let n = 16;
    let points = gen_query_points::<f64>(10_000, n as f64, 0xBADC_F00D_1234_5678);
    group.throughput(Throughput::Elements(points.len() as u64));
    for &l in &[1usize, 5, 16] {
        let loc = tet_locator::<f64>(n, BihParams::new(4, l));
        let exec = loc.prepare_for_execution(Device::Serial).unwrap();
        group.bench_function(format!("l{l}"), |b| {
            b.iter(|| black_box(exec.find_cells(&points)));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_build_planes,
    bench_build_structured,
    bench_locator_update,
    bench_query_f64,
    bench_query_f32,
    bench_leaf_size,
);
criterion_main!(benches);
