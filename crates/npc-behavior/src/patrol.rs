//! `PatrolState`: cyclic waypoint patrol with nearest-start selection.
//!
//! # Cycle
//!
//! 1. Move to `waypoints[current]`.
//! 2. On arrival, wait `wait_secs` (turning to face the waypoint's forward
//!    direction first when `rotate_on_arrival` is set).  The arrival frame
//!    does not count toward the wait, so a wait of one frame delta holds the
//!    agent for exactly one further frame.
//! 3. Advance `current = (current + 1) % len` and go to 1.
//!
//! A failed move is retried on the next update.
//!
//! # Starting point
//!
//! The first `enter` resolves `current` by path length, not straight-line
//! distance: every waypoint is queried from the agent's position and the one
//! with the shortest *complete* path wins (first one on ties).  Waypoints
//! without a complete path are never picked.  When none is reachable the
//! patrol stalls until [`PatrolState::reset_route`] is called and the state
//! is entered again.
//!
//! Later `enter`s resume at the stored index.

use npc_core::{Countdown, MoveRequestId, Vec3};
use npc_movement::MoveCompletion;
use npc_nav::NavigationService;

use crate::{BehaviorResult, StateContext, Waypoint};

#[derive(Clone, Debug)]
pub struct PatrolState {
    waypoints: Vec<Waypoint>,
    /// Index of the waypoint being walked to or waited at.
    current:   Option<usize>,
    /// Request this state is waiting on.
    pending:   Option<MoveRequestId>,
    waiting:   bool,
    wait:      Countdown,
    /// The wait started during this frame's movement step.
    skip_tick: bool,
}

impl PatrolState {
    pub fn new(waypoints: Vec<Waypoint>) -> Self {
        Self {
            waypoints,
            current:   None,
            pending:   None,
            waiting:   false,
            wait:      Countdown::default(),
            skip_tick: false,
        }
    }

    /// Patrol over spline waypoints; tangents are dropped.
    pub fn from_spline<I, W>(waypoints: I) -> Self
    where
        I: IntoIterator<Item = W>,
        W: Into<Waypoint>,
    {
        Self::new(waypoints.into_iter().map(Into::into).collect())
    }

    #[inline]
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    #[inline]
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    #[inline]
    pub fn is_waiting(&self) -> bool {
        self.waiting
    }

    #[inline]
    pub fn pending_request(&self) -> Option<MoveRequestId> {
        self.pending
    }

    /// Check every waypoint; `AgentBuilder::build` calls this.
    pub fn validate(&self) -> BehaviorResult<()> {
        self.waypoints.iter().try_for_each(Waypoint::validate)
    }

    /// Forget the current index so the next `enter` searches again.
    pub fn reset_route(&mut self) {
        self.current = None;
    }

    #[inline]
    pub fn should_enter(&self) -> bool {
        true
    }

    /// Index of the waypoint with the shortest complete path from `from`.
    pub fn nearest_waypoint(&self, from: Vec3, nav: &dyn NavigationService) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (i, wp) in self.waypoints.iter().enumerate() {
            let path = nav.find_path(from, wp.position);
            if !path.is_complete() {
                continue;
            }
            let length = path.length();
            // Strict `<` keeps the earliest waypoint on ties.
            if best.is_none_or(|(_, shortest)| length < shortest) {
                best = Some((i, length));
            }
        }
        best.map(|(i, _)| i)
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────────

    pub(crate) fn enter(&mut self, ctx: &mut StateContext<'_>) {
        self.pending   = None;
        self.waiting   = false;
        self.skip_tick = false;

        if self.waypoints.is_empty() {
            return;
        }
        let Some(from) = ctx.position() else {
            return;
        };

        if self.current.is_none() {
            self.current = self.nearest_waypoint(from, ctx.nav);
            match self.current {
                Some(i) => tracing::debug!(agent = %ctx.agent, waypoint = i, "patrol start resolved"),
                None => tracing::warn!(
                    agent = %ctx.agent,
                    waypoints = self.waypoints.len(),
                    "no waypoint reachable by a complete path; patrol stalled"
                ),
            }
        }
        self.move_to_current(ctx);
    }

    pub(crate) fn exit(&mut self, ctx: &mut StateContext<'_>) {
        if let Some(completion) = ctx.mover.as_deref_mut().and_then(|m| m.stop()) {
            self.on_move_complete(completion, ctx);
        }
        self.pending   = None;
        self.waiting   = false;
        self.skip_tick = false;
    }

    pub(crate) fn update(&mut self, dt: f32, ctx: &mut StateContext<'_>) -> BehaviorResult<()> {
        let Some(i) = self.current else {
            return Ok(());
        };

        if self.waiting {
            if !std::mem::take(&mut self.skip_tick) && self.wait.tick(dt) {
                self.waiting = false;
                let next = (i + 1) % self.waypoints.len();
                self.current = Some(next);
                tracing::trace!(agent = %ctx.agent, from = i, to = next, "patrol advance");
                self.move_to_current(ctx);
            }
        } else if self.pending.is_none() {
            self.move_to_current(ctx);
        }
        Ok(())
    }

    pub(crate) fn on_move_complete(&mut self, completion: MoveCompletion, ctx: &mut StateContext<'_>) {
        if self.pending != Some(completion.request) {
            tracing::trace!(agent = %ctx.agent, request = %completion.request, "stale completion ignored");
            return;
        }
        self.pending = None;

        if !completion.arrived {
            return;
        }
        let Some(wp) = self.current.and_then(|i| self.waypoints.get(i)).copied() else {
            return;
        };
        self.waiting   = true;
        self.skip_tick = wp.wait_secs > 0.0;
        self.wait.reset(wp.wait_secs);
        if wp.rotate_on_arrival {
            if let Some(mover) = ctx.mover.as_deref_mut() {
                mover.rotate_to(wp.facing_target());
            }
        }
    }

    fn move_to_current(&mut self, ctx: &mut StateContext<'_>) {
        let Some(wp) = self.current.and_then(|i| self.waypoints.get(i)) else {
            return;
        };
        if let Some(mover) = ctx.mover.as_deref_mut() {
            self.pending = Some(mover.move_to(wp.position));
        }
    }
}
