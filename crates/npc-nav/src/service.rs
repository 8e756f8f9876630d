//! The navigation service contract consumed by movement and behavior code.

use npc_core::Vec3;

// ── PathStatus ────────────────────────────────────────────────────────────────

/// How much of a path query could be satisfied.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathStatus {
    /// The goal is fully reachable; the last corner is the goal.
    Complete,
    /// Best-effort path ending at the reachable point closest to the goal.
    Partial,
    /// No path at all (start not on the walkable surface, empty world, …).
    #[default]
    Invalid,
}

// ── NavPath ───────────────────────────────────────────────────────────────────

/// Result of a path query: ordered corner points from start to end.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct NavPath {
    pub corners: Vec<Vec3>,
    pub status: PathStatus,
}

impl NavPath {
    pub fn complete(corners: Vec<Vec3>) -> Self {
        Self { corners, status: PathStatus::Complete }
    }

    pub fn partial(corners: Vec<Vec3>) -> Self {
        Self { corners, status: PathStatus::Partial }
    }

    pub fn invalid() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.status == PathStatus::Complete
    }

    /// Walkable length: sum of Euclidean distances between consecutive corners.
    ///
    /// This is the length along the path, not the straight-line distance
    /// from start to end.
    pub fn length(&self) -> f32 {
        self.corners
            .windows(2)
            .map(|w| w[0].distance(w[1]))
            .sum()
    }

    /// Final corner, if any.
    pub fn end(&self) -> Option<Vec3> {
        self.corners.last().copied()
    }
}

// ── NavigationService ─────────────────────────────────────────────────────────

/// An opaque walkable-surface service.
///
/// Implementations must be `Send + Sync`: one service is shared read-only by
/// every agent, possibly across worker threads.
pub trait NavigationService: Send + Sync {
    /// Compute a path from `from` to `to`.
    ///
    /// Failure is expressed through [`NavPath::status`], never by panicking.
    fn find_path(&self, from: Vec3, to: Vec3) -> NavPath;

    /// Closest walkable point to `near`, if one lies within `radius`.
    fn sample_walkable(&self, near: Vec3, radius: f32) -> Option<Vec3>;
}

impl<N: NavigationService + ?Sized> NavigationService for std::sync::Arc<N> {
    #[inline]
    fn find_path(&self, from: Vec3, to: Vec3) -> NavPath {
        (**self).find_path(from, to)
    }

    #[inline]
    fn sample_walkable(&self, near: Vec3, radius: f32) -> Option<Vec3> {
        (**self).sample_walkable(near, radius)
    }
}
