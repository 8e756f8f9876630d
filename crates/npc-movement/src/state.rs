//! Per-agent movement state.

use npc_core::{MoveRequestId, Vec3};

/// What a [`NavMover`](crate::NavMover) is doing right now.
///
/// Every state except `Idle` carries the request it belongs to, so a
/// completion can always be attributed to exactly one request.
#[derive(Debug, Clone, PartialEq)]
pub enum MovementState {
    /// Standing still with nothing outstanding.
    Idle,

    /// Walking the corners of a complete path.
    Following {
        request:     MoveRequestId,
        /// Path corners; `corners[0]` is where the request started.
        corners:     Vec<Vec3>,
        /// Index of the corner currently being walked toward.
        next_corner: usize,
        /// Metres covered so far.
        travelled:   f32,
        /// Total path length in metres.
        total:       f32,
    },

    /// The path query failed; the failure is delivered on the next update.
    Unreachable { request: MoveRequestId },
}

impl MovementState {
    /// Start following `corners` for `request`.
    pub fn following(request: MoveRequestId, corners: Vec<Vec3>, total: f32) -> Self {
        MovementState::Following {
            request,
            corners,
            next_corner: 1,
            travelled: 0.0,
            total,
        }
    }

    /// The request awaiting completion, if any.
    pub fn request(&self) -> Option<MoveRequestId> {
        match self {
            MovementState::Idle => None,
            MovementState::Following { request, .. } | MovementState::Unreachable { request } => {
                Some(*request)
            }
        }
    }

    /// Final destination of the current path.
    pub fn destination(&self) -> Option<Vec3> {
        match self {
            MovementState::Following { corners, .. } => corners.last().copied(),
            _ => None,
        }
    }

    /// Fraction of the path covered, in `[0.0, 1.0]`.
    ///
    /// Returns `1.0` when not following a path or when the path has zero
    /// length.
    pub fn progress(&self) -> f32 {
        match self {
            MovementState::Following { travelled, total, .. } if *total > 0.0 => {
                (travelled / total).min(1.0)
            }
            _ => 1.0,
        }
    }
}
