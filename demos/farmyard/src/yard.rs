//! Walkable graph for the farmyard demo.
//!
//! A 9×9 lattice with 2 m spacing spanning (-8..8, -8..8), minus a 3×3 pond
//! in the north-east quarter that paths have to route around.

use npc_core::Vec3;
use npc_nav::{NavGraph, NavGraphBuilder};

pub const SPACING: f32 = 2.0;
const SIDE: usize = 9;

fn in_pond(col: usize, row: usize) -> bool {
    (5..=7).contains(&col) && (5..=7).contains(&row)
}

/// World position of lattice cell `(col, row)`.
pub fn cell(col: usize, row: usize) -> Vec3 {
    let half = (SIDE - 1) as f32 * SPACING / 2.0;
    Vec3::new(col as f32 * SPACING - half, 0.0, row as f32 * SPACING - half)
}

pub fn build_yard() -> NavGraph {
    let mut b = NavGraphBuilder::new();

    let mut ids = vec![None; SIDE * SIDE];
    for row in 0..SIDE {
        for col in 0..SIDE {
            if !in_pond(col, row) {
                ids[row * SIDE + col] = Some(b.add_node(cell(col, row)));
            }
        }
    }

    // 4-connected; links into the pond are skipped with its nodes.
    for row in 0..SIDE {
        for col in 0..SIDE {
            let Some(a) = ids[row * SIDE + col] else { continue };
            let east  = (col + 1 < SIDE).then(|| ids[row * SIDE + col + 1]).flatten();
            let north = (row + 1 < SIDE).then(|| ids[(row + 1) * SIDE + col]).flatten();
            for other in [east, north].into_iter().flatten() {
                b.add_link(a, other);
            }
        }
    }

    b.build()
}
