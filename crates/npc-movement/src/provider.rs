//! The `MovementProvider` trait: what behavior states use to move an agent.

use npc_core::{MoveRequestId, Transform, Vec3};
use npc_nav::NavPath;

/// Outcome of one movement request, delivered exactly once.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MoveCompletion {
    /// The request this completion belongs to.
    pub request: MoveRequestId,
    /// `true` on arrival; `false` for no path or cancellation.
    pub arrived: bool,
}

impl MoveCompletion {
    #[inline]
    pub fn arrived(request: MoveRequestId) -> Self {
        Self { request, arrived: true }
    }

    #[inline]
    pub fn failed(request: MoveRequestId) -> Self {
        Self { request, arrived: false }
    }
}

/// Moves one agent's transform over the walkable surface.
///
/// See the crate docs for the request/completion model.  Implementations
/// are per agent and must be `Send` so agents can be ticked on worker
/// threads.
pub trait MovementProvider: Send {
    /// Current position and heading of the agent.
    fn transform(&self) -> Transform;

    /// Start moving toward `target`, superseding any in-flight request.
    fn move_to(&mut self, target: Vec3) -> MoveRequestId;

    /// Start moving along `path`, already queried from the current
    /// position, superseding any in-flight request.
    ///
    /// The default re-plans to the path's end with [`move_to`](Self::move_to).
    fn follow_path(&mut self, path: NavPath) -> MoveRequestId {
        let end = path.end().unwrap_or_else(|| self.position());
        self.move_to(end)
    }

    /// Face `target` immediately.  Not a movement request; no completion.
    fn rotate_to(&mut self, target: Vec3);

    /// Halt the in-flight request, returning its failure completion.
    ///
    /// Returns `None` when nothing was outstanding.
    fn stop(&mut self) -> Option<MoveCompletion>;

    /// Advance by `dt` seconds; yields a completion when a request finishes.
    fn update(&mut self, dt: f32) -> Option<MoveCompletion>;

    /// The request still awaiting completion, if any.
    fn current_request(&self) -> Option<MoveRequestId>;

    /// Current travel speed in m/s (0 when standing still).
    fn speed(&self) -> f32;

    #[inline]
    fn position(&self) -> Vec3 {
        self.transform().position
    }

    #[inline]
    fn is_moving(&self) -> bool {
        self.current_request().is_some()
    }
}
