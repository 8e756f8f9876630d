//! `npc-behavior`: the agent state machine and its built-in states.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                          |
//! |--------------|-------------------------------------------------------------------|
//! | [`state`]    | `BehaviorState` enum, `Transition`, `GuardInput`                  |
//! | [`agent`]    | `Agent` (the driver), `AgentBuilder`, `StateChange`               |
//! | [`context`]  | `StateContext<'a>`: borrows lent to a state for one call          |
//! | [`idle`]     | `IdleState`: delayed, periodic idle animation                     |
//! | [`patrol`]   | `PatrolState`: nearest-start cyclic waypoint patrol               |
//! | [`forage`]   | `ForagingState`: roam near home, eat, repeat                      |
//! | [`animator`] | `Animator` capability, `AnimationKind`, `RecordingAnimator`       |
//! | [`waypoint`] | `Waypoint`, `SplineWaypoint`                                      |
//! | [`config`]   | `IdleConfig`, `ForagingConfig`                                    |
//! | [`loader`]   | `load_waypoints_csv`, `load_waypoints_reader`                     |
//! | [`error`]    | `BehaviorError`, `BehaviorResult<T>`                              |
//!
//! # Design notes
//!
//! States are a closed enum owned by their agent.  A state never holds a
//! reference back to the agent; instead every lifecycle call receives a
//! [`StateContext`] built from the agent's movement provider, animator,
//! random source and the shared navigation service.
//!
//! Movement is request-based.  `MovementProvider::move_to` returns a
//! `MoveRequestId`; the agent passes each completion to the active state,
//! which acts on it only if it is the request it is still waiting for.  On
//! `exit` a state stops its request and consumes the resulting failure
//! itself, so nothing it started can reach it after it has been left.
//!
//! All randomness comes from the injected `RandomSource`.

pub mod agent;
pub mod animator;
pub mod config;
pub mod context;
pub mod error;
pub mod forage;
pub mod idle;
pub mod loader;
pub mod patrol;
pub mod state;
pub mod waypoint;


pub use agent::{Agent, AgentBuilder, StateChange};
pub use animator::{
    AnimationKind, AnimationLog, Animator, AnimatorTrigger, NullAnimator, RecordingAnimator,
};
pub use config::{ForagingConfig, IdleConfig};
pub use context::StateContext;
pub use error::{BehaviorError, BehaviorResult};
pub use forage::ForagingState;
pub use idle::{IdlePhase, IdleState};
pub use loader::{load_waypoints_csv, load_waypoints_reader};
pub use patrol::PatrolState;
pub use state::{BehaviorState, Guard, GuardInput, Transition};
pub use waypoint::{SplineWaypoint, Waypoint};
