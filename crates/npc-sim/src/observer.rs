//! Simulation observer trait for progress reporting and data collection.

use npc_behavior::{Agent, StateChange};
use npc_core::Frame;

/// Callbacks invoked by [`Sim`][crate::Sim] at key points in the frame loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.  Callbacks always arrive in ascending
/// `AgentId` order, with or without the `parallel` feature.
///
/// # Example: transition counter
///
/// ```rust,ignore
/// #[derive(Default)]
/// struct TransitionCounter { count: usize }
///
/// impl SimObserver for TransitionCounter {
///     fn on_state_change(&mut self, _frame: Frame, _agent: &Agent, _change: StateChange) {
///         self.count += 1;
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each frame, before any agent updates.
    fn on_frame_start(&mut self, _frame: Frame) {}

    /// Called once for every transition taken this frame, after all agents
    /// have been updated.  `agent` already reflects the new state.
    fn on_state_change(&mut self, _frame: Frame, _agent: &Agent, _change: StateChange) {}

    /// Called at the end of each frame with the number of transitions taken.
    fn on_frame_end(&mut self, _frame: Frame, _changes: usize) {}

    /// Called every `config.output_interval_frames` frames.
    fn on_snapshot(&mut self, _frame: Frame, _agents: &[Agent]) {}

    /// Called once after the final frame of [`Sim::run`][crate::Sim::run].
    fn on_sim_end(&mut self, _final_frame: Frame) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
