// Copyright 2025 the Locus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Locate points in an unstructured mesh of tetrahedra and wedges.
//!
//! The lower half of a warped lattice is split into tetrahedra, the upper half
//! into wedges. Sample points are located and mapped back to world space to
//! check the parametric result.
//!
//! Run:
//! - `RUST_LOG=locus_bih=debug cargo run -p locus_demos --example locate_tet_mesh`

use std::error::Error;
use std::sync::Arc;

use locus_bih::{BihParams, Device, FindCell, LocatorF64};
use locus_cells::{CellSet, CellShape, ExplicitCellSet, PointArray, Vec3, cell_vertices};

const KUHN: [[usize; 3]; 6] = [
    [0, 1, 2],
    [0, 2, 1],
    [1, 0, 2],
    [1, 2, 0],
    [2, 0, 1],
    [2, 1, 0],
];

fn warped_points(n: usize) -> Vec<Vec3<f64>> {
    let mut points = Vec::with_capacity((n + 1).pow(3));
    for k in 0..=n {
        for j in 0..=n {
            for i in 0..=n {
                let (x, y, z) = (i as f64, j as f64, k as f64);
                let bump = 0.15 * (0.7 * x).sin() * (0.5 * y).cos();
                points.push(Vec3::new(x, y, z + bump));
            }
        }
    }
    points
}

fn mixed_cells(n: usize) -> Result<ExplicitCellSet, Box<dyn Error>> {
    let id = |p: [usize; 3]| p[0] + (n + 1) * (p[1] + (n + 1) * p[2]);
    let mut cells = ExplicitCellSet::empty();
    for k in 0..n {
        for j in 0..n {
            for i in 0..n {
                if k < n / 2 {
                    for perm in KUHN {
                        let mut p = [i, j, k];
                        let mut ids = [id(p); 4];
                        for (slot, &axis) in perm.iter().enumerate() {
                            p[axis] += 1;
                            ids[slot + 1] = id(p);
                        }
                        cells.push(CellShape::Tetra, &ids)?;
                    }
                } else {
                    // Two wedges per hexahedron, split along the xy diagonal.
                    let c = |di, dj, dk| id([i + di, j + dj, k + dk]);
                    cells.push(
                        CellShape::Wedge,
                        &[c(0, 0, 0), c(1, 0, 0), c(0, 1, 0), c(0, 0, 1), c(1, 0, 1), c(0, 1, 1)],
                    )?;
                    cells.push(
                        CellShape::Wedge,
                        &[c(1, 0, 0), c(1, 1, 0), c(0, 1, 0), c(1, 0, 1), c(1, 1, 1), c(0, 1, 1)],
                    )?;
                }
            }
        }
    }
    Ok(cells)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let n = 12;
    let cells = Arc::new(mixed_cells(n)?);
    let coords = Arc::new(PointArray::new(warped_points(n)));
    log::info!("mesh: {} cells over {} points", cells.num_cells(), (n + 1).pow(3));

    let mut locator = LocatorF64::with_params(BihParams::new(6, 4));
    locator.set_cell_set(cells.clone());
    locator.set_coords(coords.clone());
    locator.update()?;

    let exec = locator.prepare_for_execution(Device::preferred())?;
    let samples: Vec<Vec3<f64>> = (0..4000)
        .map(|s| {
            let f = s as f64;
            Vec3::new((f * 0.731) % 12.0, (f * 0.377) % 12.0, (f * 0.197) % 12.5 - 0.25)
        })
        .collect();
    let hits = exec.find_cells(&samples);

    let mut found = 0;
    let mut worst: f64 = 0.0;
    for (p, m) in samples.iter().zip(&hits) {
        let Some(m) = m else { continue };
        found += 1;
        let shape = cells.shape(m.cell);
        let verts = cell_vertices(&*cells, &*coords, m.cell);
        let back = shape.interpolate(verts.as_slice(), m.parametric);
        worst = worst.max((back - *p).max_abs());
    }
    println!(
        "{found} of {} samples located on {:?}; worst round-trip error {worst:.2e}",
        samples.len(),
        exec.device()
    );
    Ok(())
}
