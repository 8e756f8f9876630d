//! `IdleState`: periodic idle animation pulses.

use npc_core::Countdown;

use crate::{animator, AnimationKind, BehaviorResult, IdleConfig, StateContext};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IdlePhase {
    /// Counting down the start delay.
    WaitingToStart,
    /// Counting down the frequency; fires and restarts at zero.
    Cycling,
}

/// Fires the configured animation trigger every `frequency_secs`, after an
/// initial `start_delay_secs`.
///
/// The first trigger fires `start_delay_secs + frequency_secs` after the
/// state is entered.  With [`AnimationKind::None`] the state does nothing.
#[derive(Clone, Debug)]
pub struct IdleState {
    config: IdleConfig,
    phase:  IdlePhase,
    timer:  Countdown,
}

impl IdleState {
    pub fn new(config: IdleConfig) -> BehaviorResult<Self> {
        config.validate()?;
        let timer = Countdown::new(config.start_delay_secs);
        Ok(Self { config, phase: IdlePhase::WaitingToStart, timer })
    }

    #[inline]
    pub fn config(&self) -> &IdleConfig {
        &self.config
    }

    #[inline]
    pub fn phase(&self) -> IdlePhase {
        self.phase
    }

    #[inline]
    pub fn should_enter(&self) -> bool {
        true
    }

    pub(crate) fn enter(&mut self, _ctx: &mut StateContext<'_>) {
        self.phase = IdlePhase::WaitingToStart;
        self.timer.reset(self.config.start_delay_secs);
    }

    pub(crate) fn exit(&mut self, _ctx: &mut StateContext<'_>) {}

    pub(crate) fn update(&mut self, dt: f32, ctx: &mut StateContext<'_>) -> BehaviorResult<()> {
        if self.config.animation == AnimationKind::None {
            return Ok(());
        }

        match self.phase {
            IdlePhase::WaitingToStart => {
                if self.timer.tick(dt) {
                    self.phase = IdlePhase::Cycling;
                    self.timer.reset(self.config.frequency_secs);
                }
            }
            IdlePhase::Cycling => {
                if self.timer.tick(dt) {
                    animator::play(ctx.animator, self.config.animation)?;
                    tracing::trace!(agent = %ctx.agent, animation = %self.config.animation, "idle pulse");
                    self.timer.reset(self.config.frequency_secs);
                }
            }
        }
        Ok(())
    }
}
