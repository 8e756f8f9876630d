//! Fluent builder for constructing a [`Sim`].

use std::sync::Arc;

use npc_behavior::Agent;
use npc_core::SimConfig;
use npc_nav::NavigationService;

use crate::{Sim, SimError, SimResult};

/// Fluent builder for [`Sim`].
///
/// # Required inputs
///
/// - [`SimConfig`]: frame delta, total frames, seed, …
/// - a shared [`NavigationService`]
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, nav)
///     .agent(guard)
///     .agent(chicken)
///     .build()?;
/// sim.initialize();
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder {
    config: SimConfig,
    nav:    Arc<dyn NavigationService>,
    agents: Vec<Agent>,
}

impl SimBuilder {
    pub fn new(config: SimConfig, nav: Arc<dyn NavigationService>) -> Self {
        Self { config, nav, agents: Vec::new() }
    }

    /// Add one agent.  Agents must be built but not yet initialized.
    pub fn agent(mut self, agent: Agent) -> Self {
        self.agents.push(agent);
        self
    }

    pub fn agents(mut self, agents: impl IntoIterator<Item = Agent>) -> Self {
        self.agents.extend(agents);
        self
    }

    /// Validate inputs and return a [`Sim`] at frame 0, not yet initialized.
    pub fn build(mut self) -> SimResult<Sim> {
        self.config.validate()?;

        if let Some(agent) = self.agents.iter().find(|a| a.is_initialized()) {
            return Err(SimError::Config(format!(
                "agent {} was initialized before being added",
                agent.id()
            )));
        }

        // Sorted by id: deterministic update order and binary-search lookup.
        self.agents.sort_by_key(|a| a.id());
        if let Some(pair) = self.agents.windows(2).find(|w| w[0].id() == w[1].id()) {
            return Err(SimError::DuplicateAgent(pair[0].id()));
        }

        let clock = self.config.make_clock();
        Ok(Sim {
            config:      self.config,
            clock,
            agents:      self.agents,
            nav:         self.nav,
            initialized: false,
        })
    }
}
