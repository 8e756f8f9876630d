//! The `Sim` struct and its frame loop.

use std::sync::Arc;

use npc_behavior::{Agent, BehaviorResult, StateChange};
use npc_core::{AgentId, Frame, FrameClock, SimConfig, StateId};
use npc_nav::NavigationService;

use crate::{SimError, SimObserver, SimResult};

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The frame-loop driver for a population of agents.
///
/// Every frame each agent gets one [`Agent::update`] with the configured
/// frame delta.  Agents share only the read-only navigation service, so with
/// the `parallel` feature they are updated on Rayon's pool; observer
/// callbacks are replayed afterwards in ascending `AgentId` order either way.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    /// Global configuration (frame delta, total frames, seed, …).
    pub config: SimConfig,

    /// Current frame and the simulated time it maps to.
    pub clock: FrameClock,

    /// Agents, sorted by `AgentId`.
    pub(crate) agents: Vec<Agent>,

    pub(crate) nav: Arc<dyn NavigationService>,

    pub(crate) initialized: bool,
}

impl Sim {
    #[inline]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.position_of(id).map(|i| &self.agents[i])
    }

    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.position_of(id).map(|i| &mut self.agents[i])
    }

    #[inline]
    pub fn nav(&self) -> &Arc<dyn NavigationService> {
        &self.nav
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// The frame the next `step` will run.
    #[inline]
    pub fn current_frame(&self) -> Frame {
        self.clock.current_frame
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Enter every agent's initial state.
    pub fn initialize(&mut self) {
        if self.initialized {
            return;
        }
        let nav = &*self.nav;
        for agent in &mut self.agents {
            agent.initialize(nav);
        }
        self.initialized = true;
        tracing::info!(agents = self.agents.len(), "simulation initialized");
    }

    /// Exit every agent's active state.
    pub fn dispose(&mut self) {
        if !self.initialized {
            return;
        }
        let nav = &*self.nav;
        for agent in &mut self.agents {
            agent.dispose(nav);
        }
        self.initialized = false;
        tracing::info!(frame = %self.clock.current_frame, "simulation disposed");
    }

    /// Force `agent` into state `to` between frames.
    pub fn transition_agent(&mut self, id: AgentId, to: StateId) -> SimResult<StateChange> {
        let i = self.position_of(id).ok_or(SimError::AgentNotFound(id))?;
        let nav = &*self.nav;
        Ok(self.agents[i].transition_to(to, nav)?)
    }

    // ── Frame loop ────────────────────────────────────────────────────────

    /// Run from the current frame to `config.end_frame()`.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        tracing::info!(
            from = %self.clock.current_frame,
            to   = %self.config.end_frame(),
            "simulation run started"
        );
        while self.clock.current_frame < self.config.end_frame() {
            self.step(observer)?;
        }
        observer.on_sim_end(self.clock.current_frame);
        tracing::info!(
            frame   = %self.clock.current_frame,
            elapsed = self.clock.elapsed_secs(),
            "simulation run finished"
        );
        Ok(())
    }

    /// Run exactly `n` frames from the current position (ignores `end_frame`).
    pub fn run_frames<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.step(observer)?;
        }
        Ok(())
    }

    /// Advance every agent by one frame.
    ///
    /// Returns the transitions taken this frame in `AgentId` order.  If an
    /// agent fails, the first error (in `AgentId` order) is returned and the
    /// clock does not advance.
    pub fn step<O: SimObserver>(
        &mut self,
        observer: &mut O,
    ) -> SimResult<Vec<(AgentId, StateChange)>> {
        if !self.initialized {
            return Err(SimError::NotInitialized);
        }
        let now = self.clock.current_frame;
        observer.on_frame_start(now);

        let results = self.update_agents();

        let mut changes = Vec::new();
        for (i, result) in results.into_iter().enumerate() {
            let agent = &self.agents[i];
            match result {
                Ok(Some(change)) => {
                    observer.on_state_change(now, agent, change);
                    changes.push((agent.id(), change));
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::error!(agent = %agent.id(), frame = %now, error = %e, "agent update failed");
                    return Err(e.into());
                }
            }
        }

        observer.on_frame_end(now, changes.len());
        if self.config.output_interval_frames > 0
            && now.0.is_multiple_of(self.config.output_interval_frames)
        {
            observer.on_snapshot(now, &self.agents);
        }
        tracing::trace!(frame = %now, changes = changes.len(), "frame done");

        self.clock.advance();
        Ok(changes)
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    /// One `Agent::update` per agent, results in agent order.
    fn update_agents(&mut self) -> Vec<BehaviorResult<Option<StateChange>>> {
        // Explicit field borrows so the borrow checker sees disjoint access.
        let dt  = self.clock.delta_secs;
        let nav = &*self.nav;

        #[cfg(not(feature = "parallel"))]
        {
            self.agents.iter_mut().map(|a| a.update(dt, nav)).collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            self.agents.par_iter_mut().map(|a| a.update(dt, nav)).collect()
        }
    }

    fn position_of(&self, id: AgentId) -> Option<usize> {
        self.agents.binary_search_by_key(&id, |a| a.id()).ok()
    }
}
