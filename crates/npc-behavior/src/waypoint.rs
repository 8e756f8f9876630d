//! Authored patrol points.

use npc_core::{Transform, Vec3};

use crate::{BehaviorError, BehaviorResult};

/// A patrol stop: where to go, how long to stay, and which way to face.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Waypoint {
    pub position:          Vec3,
    /// Facing direction on the ground plane (used when `rotate_on_arrival`).
    pub forward:           Vec3,
    /// Seconds to wait after arriving.  Must be `>= 0`; see
    /// [`validate`](Waypoint::validate).
    pub wait_secs:         f32,
    pub rotate_on_arrival: bool,
}

impl Waypoint {
    /// A waypoint with no wait, facing +Z, that does not rotate.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            forward:           Vec3::FORWARD,
            wait_secs:         0.0,
            rotate_on_arrival: false,
        }
    }

    /// Wait `secs` after arriving.  Rejects negative or non-finite waits.
    pub fn with_wait(mut self, secs: f32) -> BehaviorResult<Self> {
        self.wait_secs = secs;
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> BehaviorResult<()> {
        if !(self.wait_secs.is_finite() && self.wait_secs >= 0.0) {
            return Err(BehaviorError::Config(format!(
                "wait_secs must be a non-negative number, got {}",
                self.wait_secs
            )));
        }
        Ok(())
    }

    /// Face `yaw` radians (from +Z toward +X) on arrival.
    pub fn facing(mut self, yaw: f32) -> Self {
        self.forward = Transform { position: Vec3::ZERO, yaw }.forward();
        self.rotate_on_arrival = true;
        self
    }

    /// The point an agent turns toward on arrival: `position + forward`.
    #[inline]
    pub fn facing_target(&self) -> Vec3 {
        self.position + self.forward
    }
}

/// A waypoint with two spline tangents.
///
/// The tangents are authoring data for curve previews.  Patrol ignores them
/// and walks the navigation path between positions.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SplineWaypoint {
    pub waypoint:    Waypoint,
    /// Offset of the incoming control point, relative to the position.
    pub in_tangent:  Vec3,
    /// Offset of the outgoing control point, relative to the position.
    pub out_tangent: Vec3,
}

impl SplineWaypoint {
    pub fn new(waypoint: Waypoint, in_tangent: Vec3, out_tangent: Vec3) -> Self {
        Self { waypoint, in_tangent, out_tangent }
    }

    /// Absolute (incoming, outgoing) control points.
    pub fn control_points(&self) -> (Vec3, Vec3) {
        let p = self.waypoint.position;
        (p + self.in_tangent, p + self.out_tangent)
    }
}

impl From<SplineWaypoint> for Waypoint {
    #[inline]
    fn from(s: SplineWaypoint) -> Self {
        s.waypoint
    }
}
