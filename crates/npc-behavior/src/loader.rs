//! CSV waypoint loader.
//!
//! # CSV format
//!
//! One row per waypoint, in patrol order.
//!
//! ```csv
//! x,y,z,wait_secs,rotate_on_arrival,yaw_deg
//! 0,0,0,2.0,true,90
//! 8,0,0,0.5,false,
//! 8,0,8,3.0,true,180
//! ```
//!
//! | Column              | Meaning                                                  |
//! |---------------------|----------------------------------------------------------|
//! | `x`,`y`,`z`         | Position (Y-up)                                          |
//! | `wait_secs`         | Wait after arriving; must be `>= 0`                      |
//! | `rotate_on_arrival` | `true`/`false`                                           |
//! | `yaw_deg`           | Facing in degrees from +Z toward +X; empty means +Z      |

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use npc_core::{Transform, Vec3};

use crate::{BehaviorError, BehaviorResult, Waypoint};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct WaypointRecord {
    x:                 f32,
    y:                 f32,
    z:                 f32,
    wait_secs:         f32,
    rotate_on_arrival: bool,
    yaw_deg:           Option<f32>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load an ordered waypoint list from a CSV file.
pub fn load_waypoints_csv(path: &Path) -> BehaviorResult<Vec<Waypoint>> {
    let file = std::fs::File::open(path)
        .map_err(BehaviorError::Io)?;
    load_waypoints_reader(file)
}

/// Like [`load_waypoints_csv`] but accepts any `Read` source.
pub fn load_waypoints_reader<R: Read>(reader: R) -> BehaviorResult<Vec<Waypoint>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut waypoints = Vec::new();

    for (i, result) in csv_reader.deserialize::<WaypointRecord>().enumerate() {
        let row = result.map_err(|e| BehaviorError::Parse(e.to_string()))?;
        // Header is line 1.
        waypoints.push(to_waypoint(row, i + 2)?);
    }

    tracing::debug!(count = waypoints.len(), "waypoints loaded");
    Ok(waypoints)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn to_waypoint(row: WaypointRecord, line: usize) -> BehaviorResult<Waypoint> {
    if !(row.wait_secs.is_finite() && row.wait_secs >= 0.0) {
        return Err(BehaviorError::Parse(format!(
            "line {line}: wait_secs must be a non-negative number, got {}",
            row.wait_secs
        )));
    }

    let forward = match row.yaw_deg {
        Some(deg) => Transform { position: Vec3::ZERO, yaw: deg.to_radians() }.forward(),
        None => Vec3::FORWARD,
    };

    Ok(Waypoint {
        position:          Vec3::new(row.x, row.y, row.z),
        forward,
        wait_secs:         row.wait_secs,
        rotate_on_arrival: row.rotate_on_arrival,
    })
}
