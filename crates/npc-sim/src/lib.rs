//! `npc-sim`: frame loop driver for populations of npc agents.
//!
//! # Frame loop
//!
//! ```text
//! sim.initialize()                  # every agent enters its initial state
//! for frame in 0..config.total_frames:
//!   ① on_frame_start
//!   ② Agent::update(dt) for each agent (parallel with the `parallel` feature):
//!        movement → animator speed → transitions → state behavior
//!   ③ on_state_change for each transition, in AgentId order
//!   ④ on_frame_end, then on_snapshot every output_interval_frames
//! sim.dispose()                     # every agent exits its active state
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Updates agents on Rayon's thread pool.                 |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use npc_core::SimConfig;
//! use npc_sim::{NoopObserver, SimBuilder};
//!
//! let mut sim = SimBuilder::new(config, nav).agents(agents).build()?;
//! sim.initialize();
//! sim.run(&mut NoopObserver)?;
//! sim.dispose();
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::Sim;
