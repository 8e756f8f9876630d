//! Per-call borrows lent by an [`Agent`](crate::Agent) to its states.

use npc_core::{AgentId, RandomSource, Vec3};
use npc_movement::MovementProvider;
use npc_nav::NavigationService;

use crate::Animator;

/// Everything a state may touch during one lifecycle call.
///
/// States hold no reference to their agent.  The agent builds a fresh
/// `StateContext` for each `enter`/`update`/`exit`/completion call from its
/// own fields, so the borrows end when the call returns.
pub struct StateContext<'a> {
    /// The agent being driven (for logging).
    pub agent:    AgentId,

    /// Shared read-only navigation service.
    pub nav:      &'a dyn NavigationService,

    /// The agent's movement provider.  `None` means the agent cannot move;
    /// states that need movement silently do nothing.
    pub mover:    Option<&'a mut dyn MovementProvider>,

    pub animator: &'a mut dyn Animator,

    pub rng:      &'a mut dyn RandomSource,
}

impl StateContext<'_> {
    /// Current position, if the agent has a movement provider.
    #[inline]
    pub fn position(&self) -> Option<Vec3> {
        self.mover.as_ref().map(|m| m.position())
    }
}
