//! `npc-core`: foundational types for the npc behavior framework.
//!
//! This crate is a dependency of every other `npc-*` crate.  It has no
//! `npc-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `StateId`, `MoveRequestId`, `NodeId`, `EdgeId`  |
//! | [`geo`]         | `Vec3`, `Transform` (Y-up, ground plane = XZ)              |
//! | [`time`]        | `Frame`, `FrameClock`, `Countdown`, `SimConfig`            |
//! | [`rng`]         | `RandomSource` trait, `AgentRng` (per-agent), `SimRng`     |
//! | [`error`]       | `NpcError`, `NpcResult`                                    |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public value types.  |

pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{NpcError, NpcResult};
pub use geo::{Transform, Vec3};
pub use ids::{AgentId, EdgeId, MoveRequestId, NodeId, StateId};
pub use rng::{AgentRng, RandomSource, SimRng};
pub use time::{Countdown, Frame, FrameClock, SimConfig};
