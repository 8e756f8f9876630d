//! `BehaviorState`, the closed set of states an agent can be in, plus the
//! transition table entries that connect them.

use std::fmt;

use npc_core::{StateId, Vec3};
use npc_movement::MoveCompletion;

use crate::{BehaviorResult, ForagingState, IdleState, PatrolState, StateContext};

// ── BehaviorState ─────────────────────────────────────────────────────────────

/// One unit of behavior with an enter/update/exit lifecycle.
///
/// `enter` and `exit` are always paired by the owning
/// [`Agent`](crate::Agent).  `exit` stops any in-flight movement the state
/// started and clears its transient flags, so no completion can reach the
/// state after it has been left.
#[derive(Clone, Debug)]
pub enum BehaviorState {
    Idle(IdleState),
    Patrol(PatrolState),
    Foraging(ForagingState),
}

impl BehaviorState {
    pub fn name(&self) -> &'static str {
        match self {
            BehaviorState::Idle(_)     => "idle",
            BehaviorState::Patrol(_)   => "patrol",
            BehaviorState::Foraging(_) => "foraging",
        }
    }

    /// Whether this state is willing to become active.
    ///
    /// Every built-in state always is; the order of an agent's transition
    /// list decides which one is picked.
    pub fn should_enter(&self) -> bool {
        match self {
            BehaviorState::Idle(s)     => s.should_enter(),
            BehaviorState::Patrol(s)   => s.should_enter(),
            BehaviorState::Foraging(s) => s.should_enter(),
        }
    }

    pub fn enter(&mut self, ctx: &mut StateContext<'_>) {
        match self {
            BehaviorState::Idle(s)     => s.enter(ctx),
            BehaviorState::Patrol(s)   => s.enter(ctx),
            BehaviorState::Foraging(s) => s.enter(ctx),
        }
    }

    pub fn exit(&mut self, ctx: &mut StateContext<'_>) {
        match self {
            BehaviorState::Idle(s)     => s.exit(ctx),
            BehaviorState::Patrol(s)   => s.exit(ctx),
            BehaviorState::Foraging(s) => s.exit(ctx),
        }
    }

    /// The state's own per-frame behavior.  Transitions are evaluated by the
    /// agent before this is called.
    pub fn update(&mut self, dt: f32, ctx: &mut StateContext<'_>) -> BehaviorResult<()> {
        match self {
            BehaviorState::Idle(s)     => s.update(dt, ctx),
            BehaviorState::Patrol(s)   => s.update(dt, ctx),
            BehaviorState::Foraging(s) => s.update(dt, ctx),
        }
    }

    /// Deliver a movement completion.  States ignore completions for
    /// requests they are no longer waiting on.
    pub fn on_move_complete(&mut self, completion: MoveCompletion, ctx: &mut StateContext<'_>) {
        match self {
            BehaviorState::Idle(_)     => {}
            BehaviorState::Patrol(s)   => s.on_move_complete(completion, ctx),
            BehaviorState::Foraging(s) => s.on_move_complete(completion, ctx),
        }
    }

    pub fn as_idle(&self) -> Option<&IdleState> {
        match self {
            BehaviorState::Idle(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_patrol(&self) -> Option<&PatrolState> {
        match self {
            BehaviorState::Patrol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_patrol_mut(&mut self) -> Option<&mut PatrolState> {
        match self {
            BehaviorState::Patrol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_foraging(&self) -> Option<&ForagingState> {
        match self {
            BehaviorState::Foraging(s) => Some(s),
            _ => None,
        }
    }
}

impl From<IdleState> for BehaviorState {
    fn from(s: IdleState) -> Self {
        BehaviorState::Idle(s)
    }
}

impl From<PatrolState> for BehaviorState {
    fn from(s: PatrolState) -> Self {
        BehaviorState::Patrol(s)
    }
}

impl From<ForagingState> for BehaviorState {
    fn from(s: ForagingState) -> Self {
        BehaviorState::Foraging(s)
    }
}

// ── Transition ────────────────────────────────────────────────────────────────

/// What a transition guard can see.
pub struct GuardInput<'a> {
    /// The state currently active.
    pub active:        &'a BehaviorState,
    /// The state the transition leads to.
    pub candidate:     &'a BehaviorState,
    /// Seconds since `active` was entered.
    pub time_in_state: f32,
    /// Agent position, when it has a movement provider.
    pub position:      Option<Vec3>,
}

/// A transition predicate.
pub type Guard = fn(&GuardInput<'_>) -> bool;

/// One entry of an agent's transition table.
///
/// Entries for the active state are evaluated in insertion order every
/// frame; the first that is ready is taken and the rest are skipped.
#[derive(Copy, Clone)]
pub struct Transition {
    pub to:    StateId,
    pub guard: Guard,
}

impl Transition {
    /// Transition taken whenever the candidate is willing.
    pub fn to(to: StateId) -> Self {
        Self { to, guard: |_| true }
    }

    /// Transition taken when `guard` holds and the candidate is willing.
    pub fn when(to: StateId, guard: Guard) -> Self {
        Self { to, guard }
    }

    #[inline]
    pub fn is_ready(&self, input: &GuardInput<'_>) -> bool {
        input.candidate.should_enter() && (self.guard)(input)
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition").field("to", &self.to).finish_non_exhaustive()
    }
}
