//! `Agent`: owns one state machine and drives it frame by frame.

use npc_core::{AgentId, AgentRng, RandomSource, StateId, Vec3};
use npc_movement::MovementProvider;
use npc_nav::NavigationService;

use crate::{
    Animator, BehaviorError, BehaviorResult, BehaviorState, GuardInput, NullAnimator,
    StateContext, Transition,
};

/// A transition taken during [`Agent::update`] or [`Agent::transition_to`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StateChange {
    pub from: StateId,
    pub to:   StateId,
}

// ── Agent ─────────────────────────────────────────────────────────────────────

/// One character: its states, transition table and capabilities.
///
/// Built with [`AgentBuilder`].  Nothing runs until [`initialize`](Self::initialize)
/// enters the initial state; [`dispose`](Self::dispose) exits the active
/// state and makes the agent inert again.
///
/// # Frame order
///
/// [`update`](Self::update) does, in order:
///
/// 1. advance the movement provider and hand any completion to the active state,
/// 2. push the movement speed to the animator,
/// 3. evaluate the active state's transitions (first ready one wins),
/// 4. if no transition was taken, run the active state's own update.
pub struct Agent {
    id:            AgentId,
    priority:      i32,
    states:        Vec<BehaviorState>,
    /// `transitions[state.index()]`, in evaluation order.
    transitions:   Vec<Vec<Transition>>,
    active:        StateId,
    initialized:   bool,
    time_in_state: f32,
    animator:      Box<dyn Animator>,
    mover:         Option<Box<dyn MovementProvider>>,
    rng:           Box<dyn RandomSource>,
}

impl Agent {
    #[inline]
    pub fn id(&self) -> AgentId {
        self.id
    }

    /// Carried for callers that need to rank agents; the state machine
    /// ignores it.
    #[inline]
    pub fn priority(&self) -> i32 {
        self.priority
    }

    #[inline]
    pub fn active_state_id(&self) -> StateId {
        self.active
    }

    #[inline]
    pub fn active_state(&self) -> &BehaviorState {
        &self.states[self.active.index()]
    }

    pub fn state(&self, id: StateId) -> Option<&BehaviorState> {
        self.states.get(id.index())
    }

    pub fn state_mut(&mut self, id: StateId) -> Option<&mut BehaviorState> {
        self.states.get_mut(id.index())
    }

    #[inline]
    pub fn states(&self) -> &[BehaviorState] {
        &self.states
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    #[inline]
    pub fn time_in_state(&self) -> f32 {
        self.time_in_state
    }

    pub fn mover(&self) -> Option<&dyn MovementProvider> {
        self.mover.as_deref()
    }

    pub fn position(&self) -> Option<Vec3> {
        self.mover.as_ref().map(|m| m.position())
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────────

    /// Enter the initial state.  Calling it again while initialized does
    /// nothing.
    pub fn initialize(&mut self, nav: &dyn NavigationService) {
        if self.initialized {
            return;
        }
        self.initialized   = true;
        self.time_in_state = 0.0;
        let (state, mut ctx) = self.split(nav);
        state.enter(&mut ctx);
        tracing::debug!(agent = %self.id, state = %self.active, "agent initialized");
    }

    /// Exit the active state.  The agent can be initialized again later.
    pub fn dispose(&mut self, nav: &dyn NavigationService) {
        if !self.initialized {
            return;
        }
        let (state, mut ctx) = self.split(nav);
        state.exit(&mut ctx);
        self.initialized = false;
        tracing::debug!(agent = %self.id, "agent disposed");
    }

    /// Advance one frame of `dt` seconds.
    ///
    /// Returns the transition taken this frame, if any.  The only errors are
    /// calling before [`initialize`](Self::initialize) and
    /// [`BehaviorError::UnsupportedAnimation`] from a state.
    pub fn update(
        &mut self,
        dt:  f32,
        nav: &dyn NavigationService,
    ) -> BehaviorResult<Option<StateChange>> {
        if !self.initialized {
            return Err(BehaviorError::NotInitialized(self.id));
        }
        self.time_in_state += dt;

        // ── 1. Movement ───────────────────────────────────────────────────────
        if let Some(completion) = self.mover.as_deref_mut().and_then(|m| m.update(dt)) {
            let (state, mut ctx) = self.split(nav);
            state.on_move_complete(completion, &mut ctx);
        }

        // ── 2. Animator speed ─────────────────────────────────────────────────
        let speed = self.mover.as_deref().map_or(0.0, |m| m.speed());
        self.animator.set_speed(speed);

        // ── 3. Transitions ────────────────────────────────────────────────────
        if let Some(to) = self.ready_transition() {
            return self.transition_to(to, nav).map(Some);
        }

        // ── 4. State behavior ─────────────────────────────────────────────────
        let (state, mut ctx) = self.split(nav);
        state.update(dt, &mut ctx)?;
        Ok(None)
    }

    /// Exit the active state and enter `to`.
    pub fn transition_to(
        &mut self,
        to:  StateId,
        nav: &dyn NavigationService,
    ) -> BehaviorResult<StateChange> {
        if !self.initialized {
            return Err(BehaviorError::NotInitialized(self.id));
        }
        if to.index() >= self.states.len() {
            return Err(BehaviorError::UnknownState(to));
        }

        let from = self.active;
        {
            let (state, mut ctx) = self.split(nav);
            state.exit(&mut ctx);
        }
        self.active        = to;
        self.time_in_state = 0.0;
        {
            let (state, mut ctx) = self.split(nav);
            state.enter(&mut ctx);
        }

        tracing::debug!(
            agent = %self.id,
            %from,
            %to,
            state = self.states[to.index()].name(),
            "state transition"
        );
        Ok(StateChange { from, to })
    }

    // ── Helpers ───────────────────────────────────────────────────────────────

    /// First transition of the active state whose guard holds.
    fn ready_transition(&self) -> Option<StateId> {
        let active   = self.active_state();
        let position = self.position();
        self.transitions[self.active.index()]
            .iter()
            .find(|t| {
                let input = GuardInput {
                    active,
                    candidate:     &self.states[t.to.index()],
                    time_in_state: self.time_in_state,
                    position,
                };
                t.is_ready(&input)
            })
            .map(|t| t.to)
    }

    /// The active state plus a context borrowing the agent's capabilities.
    fn split<'a>(
        &'a mut self,
        nav: &'a dyn NavigationService,
    ) -> (&'a mut BehaviorState, StateContext<'a>) {
        let ctx = StateContext {
            agent:    self.id,
            nav,
            mover:    match &mut self.mover {
                Some(m) => Some(&mut **m as &mut dyn MovementProvider),
                None => None,
            },
            animator: &mut *self.animator,
            rng:      &mut *self.rng,
        };
        (&mut self.states[self.active.index()], ctx)
    }
}

// ── AgentBuilder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Agent`].
///
/// States get ids in the order they are added, starting at `StateId(0)`.
///
/// # Optional inputs (have defaults)
///
/// | Method          | Default                           |
/// |-----------------|-----------------------------------|
/// | `.initial(id)`  | `StateId(0)`                      |
/// | `.animator(a)`  | `NullAnimator`                    |
/// | `.mover(m)`     | none (movement states do nothing) |
/// | `.rng(r)`       | `AgentRng::new(0, id)`            |
/// | `.priority(p)`  | `0`                               |
///
/// # Example
///
/// ```rust,ignore
/// let agent = AgentBuilder::new(AgentId(0))
///     .state(PatrolState::new(waypoints))          // StateId(0)
///     .state(IdleState::new(idle_config)?)         // StateId(1)
///     .transition_if(StateId(0), StateId(1), |g| g.time_in_state > 30.0)
///     .transition_if(StateId(1), StateId(0), |g| g.time_in_state > 5.0)
///     .mover(Box::new(mover))
///     .build()?;
/// ```
pub struct AgentBuilder {
    id:          AgentId,
    priority:    i32,
    states:      Vec<BehaviorState>,
    transitions: Vec<(StateId, Transition)>,
    initial:     StateId,
    animator:    Option<Box<dyn Animator>>,
    mover:       Option<Box<dyn MovementProvider>>,
    rng:         Option<Box<dyn RandomSource>>,
}

impl AgentBuilder {
    pub fn new(id: AgentId) -> Self {
        Self {
            id,
            priority:    0,
            states:      Vec::new(),
            transitions: Vec::new(),
            initial:     StateId(0),
            animator:    None,
            mover:       None,
            rng:         None,
        }
    }

    /// Add a state.  Its id is the number of states added before it.
    pub fn state(mut self, state: impl Into<BehaviorState>) -> Self {
        self.states.push(state.into());
        self
    }

    /// Unconditional transition from `from` to `to`, taken as soon as the
    /// target is willing (always, for the built-in states).
    pub fn transition(self, from: StateId, to: StateId) -> Self {
        self.add_transition(from, Transition::to(to))
    }

    /// Transition from `from` to `to` taken when `guard` holds.
    pub fn transition_if(self, from: StateId, to: StateId, guard: crate::Guard) -> Self {
        self.add_transition(from, Transition::when(to, guard))
    }

    pub fn add_transition(mut self, from: StateId, transition: Transition) -> Self {
        self.transitions.push((from, transition));
        self
    }

    pub fn initial(mut self, id: StateId) -> Self {
        self.initial = id;
        self
    }

    pub fn animator(mut self, animator: Box<dyn Animator>) -> Self {
        self.animator = Some(animator);
        self
    }

    pub fn mover(mut self, mover: Box<dyn MovementProvider>) -> Self {
        self.mover = Some(mover);
        self
    }

    pub fn rng(mut self, rng: Box<dyn RandomSource>) -> Self {
        self.rng = Some(rng);
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Validate state ids and return an uninitialized [`Agent`].
    pub fn build(self) -> BehaviorResult<Agent> {
        let n = self.states.len();
        if n == 0 {
            return Err(BehaviorError::Config(format!("agent {} has no states", self.id)));
        }
        if self.initial.index() >= n {
            return Err(BehaviorError::UnknownState(self.initial));
        }
        for patrol in self.states.iter().filter_map(BehaviorState::as_patrol) {
            patrol.validate()?;
        }

        let mut transitions: Vec<Vec<Transition>> = vec![Vec::new(); n];
        for (from, t) in self.transitions {
            if from.index() >= n {
                return Err(BehaviorError::UnknownState(from));
            }
            if t.to.index() >= n {
                return Err(BehaviorError::UnknownState(t.to));
            }
            transitions[from.index()].push(t);
        }

        let id = self.id;
        Ok(Agent {
            id,
            priority:      self.priority,
            states:        self.states,
            transitions,
            active:        self.initial,
            initialized:   false,
            time_in_state: 0.0,
            animator:      self.animator.unwrap_or_else(|| Box::new(NullAnimator)),
            mover:         self.mover,
            rng:           self.rng.unwrap_or_else(|| Box::new(AgentRng::new(0, id))),
        })
    }
}
