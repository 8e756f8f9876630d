//! `npc-movement`: movement requests, completion tokens, and path following.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                        |
//! |--------------|-----------------------------------------------------------------|
//! | [`provider`] | `MovementProvider` trait, `MoveCompletion`                      |
//! | [`state`]    | `MovementState`: the path an agent is currently following       |
//! | [`mover`]    | `NavMover`: `MovementProvider` backed by a `NavigationService`  |
//! | [`error`]    | `MovementError`, `MovementResult<T>`                            |
//!
//! # Request model
//!
//! 1. `move_to(target)` issues a request and returns its `MoveRequestId`.
//!    Issuing a new request supersedes the previous one; the superseded
//!    request is dropped and never completes.
//! 2. `update(dt)` advances the agent once per frame and yields at most one
//!    `MoveCompletion`: `arrived = true` on arrival, `arrived = false` when no
//!    complete path existed.  Completions never arrive synchronously from
//!    `move_to`; they always come through the next `update`.
//! 3. `stop()` halts the in-flight request and hands back its
//!    `arrived = false` completion immediately.  A stopped request never
//!    completes a second time.
//!
//! Cancellation and "no path" are both reported as `arrived = false`;
//! callers treat it as "did not complete", not as a specific cause.

pub mod error;
pub mod mover;
pub mod provider;
pub mod state;


pub use error::{MovementError, MovementResult};
pub use mover::{MoverConfig, NavMover};
pub use provider::{MoveCompletion, MovementProvider};
pub use state::MovementState;
