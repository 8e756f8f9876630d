//! `ForagingState`: roam to random reachable points near home, eat, repeat.

use npc_core::{Countdown, MoveRequestId, Vec3};
use npc_movement::MoveCompletion;

use crate::{BehaviorResult, ForagingConfig, StateContext};

/// Roam-then-eat cycle around a fixed home position.
///
/// On every free update (neither moving nor eating) a roam target is drawn:
/// a uniform offset inside a sphere of `roam_radius`, flattened onto the
/// ground plane, added to home and snapped with
/// `NavigationService::sample_walkable`.  A failed sample or a target with
/// no complete path skips the update; the next one draws again.  The
/// validated path is handed to the mover as is, so each roam costs one path
/// query.  Arriving starts an eating countdown drawn uniformly from
/// `[eat_secs_min, eat_secs_max]`; the arrival frame does not count toward
/// it.
#[derive(Clone, Debug)]
pub struct ForagingState {
    home:     Vec3,
    config:   ForagingConfig,
    pending:  Option<MoveRequestId>,
    eating:   bool,
    eat:      Countdown,
    /// Duration drawn for the current (or last) meal.
    eat_secs: f32,
    /// The meal started during this frame's movement step.
    skip_tick: bool,
}

impl ForagingState {
    pub fn new(home: Vec3, config: ForagingConfig) -> BehaviorResult<Self> {
        config.validate()?;
        Ok(Self {
            home,
            config,
            pending:   None,
            eating:    false,
            eat:       Countdown::default(),
            eat_secs:  0.0,
            skip_tick: false,
        })
    }

    #[inline]
    pub fn home(&self) -> Vec3 {
        self.home
    }

    #[inline]
    pub fn config(&self) -> &ForagingConfig {
        &self.config
    }

    #[inline]
    pub fn is_eating(&self) -> bool {
        self.eating
    }

    /// `true` while a roam request is outstanding.
    #[inline]
    pub fn is_moving(&self) -> bool {
        self.pending.is_some()
    }

    #[inline]
    pub fn eat_secs(&self) -> f32 {
        self.eat_secs
    }

    #[inline]
    pub fn should_enter(&self) -> bool {
        true
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────────

    pub(crate) fn enter(&mut self, ctx: &mut StateContext<'_>) {
        self.pending = None;
        self.set_eating(false, ctx);
    }

    pub(crate) fn exit(&mut self, ctx: &mut StateContext<'_>) {
        if let Some(completion) = ctx.mover.as_deref_mut().and_then(|m| m.stop()) {
            self.on_move_complete(completion, ctx);
        }
        self.pending = None;
        self.set_eating(false, ctx);
    }

    pub(crate) fn update(&mut self, dt: f32, ctx: &mut StateContext<'_>) -> BehaviorResult<()> {
        if self.eating {
            if !std::mem::take(&mut self.skip_tick) && self.eat.tick(dt) {
                self.set_eating(false, ctx);
                tracing::trace!(agent = %ctx.agent, "finished eating");
            }
            return Ok(());
        }
        if self.pending.is_some() {
            return Ok(());
        }
        self.roam(ctx);
        Ok(())
    }

    pub(crate) fn on_move_complete(&mut self, completion: MoveCompletion, ctx: &mut StateContext<'_>) {
        if self.pending != Some(completion.request) {
            tracing::trace!(agent = %ctx.agent, request = %completion.request, "stale completion ignored");
            return;
        }
        self.pending = None;

        if completion.arrived {
            self.eat_secs = ctx.rng.range(self.config.eat_secs_min, self.config.eat_secs_max);
            self.eat.reset(self.eat_secs);
            self.skip_tick = self.eat_secs > 0.0;
            self.set_eating(true, ctx);
            tracing::trace!(agent = %ctx.agent, secs = self.eat_secs, "eating");
        }
    }

    // ── Helpers ───────────────────────────────────────────────────────────────

    /// Draw, validate and issue one roam target.
    fn roam(&mut self, ctx: &mut StateContext<'_>) {
        let Some(mover) = ctx.mover.as_deref_mut() else {
            return;
        };
        let radius    = self.config.roam_radius;
        let offset    = (ctx.rng.inside_unit_sphere() * radius).flatten();
        let candidate = self.home + offset;

        let Some(target) = ctx.nav.sample_walkable(candidate, radius) else {
            tracing::trace!(agent = %ctx.agent, %candidate, "no walkable point near roam candidate");
            return;
        };
        let path = ctx.nav.find_path(mover.position(), target);
        if !path.is_complete() {
            tracing::trace!(agent = %ctx.agent, %target, "roam target unreachable");
            return;
        }
        self.pending = Some(mover.follow_path(path));
    }

    fn set_eating(&mut self, eating: bool, ctx: &mut StateContext<'_>) {
        self.eating = eating;
        if !eating {
            self.skip_tick = false;
        }
        ctx.animator.set_eating(eating);
    }
}
