//! `npc-nav`: navigation service contract and a graph-backed reference service.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                      |
//! |-------------|---------------------------------------------------------------|
//! | [`service`] | `NavigationService` trait, `NavPath`, `PathStatus`            |
//! | [`graph`]   | `NavGraph` (CSR links + R-trees), `Anchor`, `NavGraphBuilder` |
//! | [`search`]  | Dijkstra over `NavGraph` producing path corners               |
//! | [`error`]   | `NavError`, `NavResult<T>`                                    |
//!
//! # Pluggability
//!
//! Behavior code only ever sees `&dyn NavigationService`.  A game engine's
//! navmesh is wired in by implementing the trait; [`NavGraph`] exists so the
//! framework, its tests and the demo have a walkable world without one.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public value types.     |

pub mod error;
pub mod graph;
pub mod search;
pub mod service;

#[cfg(test)]
mod tests;

pub use error::{NavError, NavResult};
pub use graph::{Anchor, LinkHit, NavGraph, NavGraphBuilder};
pub use service::{NavPath, NavigationService, PathStatus};
