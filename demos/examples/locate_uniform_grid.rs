// Copyright 2025 the Locus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Locate points in a uniform hexahedral grid.
//!
//! Build a locator over a 10×8×6 lattice, query a handful of points on both
//! devices, then change a parameter and watch the dirty/update cycle.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p locus_demos --example locate_uniform_grid`

use std::error::Error;
use std::sync::Arc;

use locus_bih::{BihParams, Device, FindCell, LocatorF64};
use locus_cells::{StructuredCellSet, UniformCoordinates, Vec3};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let dims = [11, 9, 7];
    let mut locator = LocatorF64::with_params(BihParams::new(4, 4));
    locator.set_cell_set(Arc::new(StructuredCellSet::new(dims)));
    locator.set_coords(Arc::new(UniformCoordinates::new(
        dims,
        Vec3::new(-5.0, -4.0, 0.0),
        Vec3::new(1.0, 1.0, 0.5),
    )));

    locator.update()?;
    if let Some(h) = locator.hierarchy() {
        let stats = h.stats();
        println!(
            "hierarchy: depth {}, {} nodes, {} leaves, largest leaf {}",
            h.depth(),
            h.nodes().len(),
            stats.leaves,
            stats.max_leaf_len
        );
    }

    let points = [
        Vec3::new(0.0, 0.0, 1.0),
        Vec3::new(-4.75, 3.9, 2.99),
        Vec3::new(4.999, -3.999, 0.001),
        Vec3::new(12.0, 0.0, 1.0),
    ];
    let exec = locator.prepare_for_execution(Device::Serial)?;
    for p in points {
        match exec.find_cell(p) {
            Some(m) => println!(
                "({:6.3}, {:6.3}, {:6.3}) -> cell {:3} at ({:.3}, {:.3}, {:.3})",
                p.x, p.y, p.z, m.cell, m.parametric.x, m.parametric.y, m.parametric.z
            ),
            None => println!("({:6.3}, {:6.3}, {:6.3}) -> outside", p.x, p.y, p.z),
        }
    }

    let pooled = locator.prepare_for_execution(Device::preferred())?;
    let batch = pooled.find_cells(&points);
    assert_eq!(batch, exec.find_cells(&points));
    println!("batch on {:?} agrees with serial queries", pooled.device());

    // Snapshots borrow the locator; reconfigure once they are gone.
    locator.set_max_leaf_size(1);
    match locator.prepare_for_execution(Device::Serial) {
        Err(e) => println!("after set_max_leaf_size: {e}"),
        Ok(_) => unreachable!("setters mark the locator dirty"),
    }
    println!("rebuilt: {}", locator.update()?);
    println!("rebuilt again: {}", locator.update()?);
    Ok(())
}
