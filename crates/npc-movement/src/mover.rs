//! `NavMover`: a [`MovementProvider`] that follows paths from a
//! [`NavigationService`].

use std::f32::consts::{PI, TAU};
use std::sync::Arc;

use npc_core::{MoveRequestId, Transform, Vec3};
use npc_nav::{NavPath, NavigationService};

use crate::{MoveCompletion, MovementError, MovementProvider, MovementResult, MovementState};

// ── MoverConfig ───────────────────────────────────────────────────────────────

/// Locomotion parameters for one agent.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoverConfig {
    /// Travel speed in metres per second.
    pub speed: f32,
    /// The agent has arrived once it is this close to the final corner.
    pub stopping_distance: f32,
    /// How fast the heading eases toward the travel direction, degrees/s.
    pub angular_speed_deg: f32,
}

impl MoverConfig {
    pub fn validate(&self) -> MovementResult<()> {
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return Err(MovementError::Config(format!("speed must be positive, got {}", self.speed)));
        }
        if !(self.stopping_distance >= 0.0) {
            return Err(MovementError::Config(format!(
                "stopping_distance must be non-negative, got {}",
                self.stopping_distance
            )));
        }
        if !(self.angular_speed_deg > 0.0) {
            return Err(MovementError::Config(format!(
                "angular_speed_deg must be positive, got {}",
                self.angular_speed_deg
            )));
        }
        Ok(())
    }
}

impl Default for MoverConfig {
    fn default() -> Self {
        Self {
            speed:             3.5,
            stopping_distance: 0.1,
            angular_speed_deg: 360.0,
        }
    }
}

// ── NavMover ──────────────────────────────────────────────────────────────────

/// Path follower for a single agent.
///
/// Holds the agent's transform and a shared handle to the navigation
/// service.  Each `move_to` runs one path query and `follow_path` reuses a
/// path the caller already has; `update` walks the corners at
/// `MoverConfig::speed`.
pub struct NavMover {
    nav:          Arc<dyn NavigationService>,
    config:       MoverConfig,
    transform:    Transform,
    state:        MovementState,
    last_request: MoveRequestId,
}

impl NavMover {
    pub fn new(
        nav:    Arc<dyn NavigationService>,
        config: MoverConfig,
        start:  Transform,
    ) -> MovementResult<Self> {
        config.validate()?;
        Ok(Self {
            nav,
            config,
            transform:    start,
            state:        MovementState::Idle,
            last_request: MoveRequestId::INVALID,
        })
    }

    #[inline]
    pub fn state(&self) -> &MovementState {
        &self.state
    }

    #[inline]
    pub fn config(&self) -> &MoverConfig {
        &self.config
    }

    /// Issue a new request following `path` toward `target`.
    fn start(&mut self, target: Vec3, path: NavPath) -> MoveRequestId {
        let request = self.last_request.next();
        self.last_request = request;

        if let Some(previous) = self.state.request() {
            tracing::trace!(%previous, %request, "movement request superseded");
        }

        self.state = if path.is_complete() {
            let total = path.length();
            tracing::debug!(%request, %target, length = total, "movement request issued");
            MovementState::following(request, path.corners, total)
        } else {
            tracing::debug!(%request, %target, status = ?path.status, "no complete path");
            MovementState::Unreachable { request }
        };
        request
    }

    /// Walk along the current path.  Returns `true` on arrival.
    fn advance(&mut self, dt: f32) -> bool {
        let speed     = self.config.speed;
        let stop_dist = self.config.stopping_distance;
        let max_turn  = self.config.angular_speed_deg.to_radians() * dt;

        let MovementState::Following { corners, next_corner, travelled, .. } = &mut self.state else {
            return false;
        };
        let Some(&destination) = corners.last() else {
            return true;
        };

        let mut budget = speed * dt;
        while *next_corner < corners.len() {
            let corner = corners[*next_corner];
            let to     = corner - self.transform.position;
            let dist   = to.length();
            if dist <= budget {
                self.transform.position = corner;
                budget     -= dist;
                *travelled += dist;
                *next_corner += 1;
            } else {
                self.transform.position += to * (budget / dist);
                *travelled += budget;
                break;
            }
        }

        let heading_to = corners.get(*next_corner).copied().unwrap_or(destination);
        if let Some(desired) = self.transform.yaw_towards(heading_to) {
            self.transform.yaw = ease_yaw(self.transform.yaw, desired, max_turn);
        }

        *next_corner >= corners.len() || self.transform.position.distance(destination) <= stop_dist
    }
}

/// Step `current` toward `desired` by at most `max_step` radians, taking the
/// short way around.
fn ease_yaw(current: f32, desired: f32, max_step: f32) -> f32 {
    let mut delta = (desired - current) % TAU;
    if delta > PI {
        delta -= TAU;
    } else if delta < -PI {
        delta += TAU;
    }
    if delta.abs() <= max_step {
        desired
    } else {
        current + max_step.copysign(delta)
    }
}

impl MovementProvider for NavMover {
    fn transform(&self) -> Transform {
        self.transform
    }

    fn move_to(&mut self, target: Vec3) -> MoveRequestId {
        let path = self.nav.find_path(self.transform.position, target);
        self.start(target, path)
    }

    /// Reuses a complete `path` that starts where the agent stands; a
    /// complete path from elsewhere is re-planned to its end, and an
    /// incomplete one fails on the next update.
    fn follow_path(&mut self, path: NavPath) -> MoveRequestId {
        let here   = self.transform.position;
        let target = path.end().unwrap_or(here);
        let starts_here = path
            .corners
            .first()
            .is_some_and(|c| c.distance(here) <= self.config.stopping_distance);
        if path.is_complete() && !starts_here {
            return self.move_to(target);
        }
        self.start(target, path)
    }

    fn rotate_to(&mut self, target: Vec3) {
        if let Some(yaw) = self.transform.yaw_towards(target) {
            self.transform.yaw = yaw;
        }
    }

    fn stop(&mut self) -> Option<MoveCompletion> {
        let request = std::mem::replace(&mut self.state, MovementState::Idle).request()?;
        tracing::trace!(%request, "movement request cancelled");
        Some(MoveCompletion::failed(request))
    }

    fn update(&mut self, dt: f32) -> Option<MoveCompletion> {
        match self.state {
            MovementState::Idle => None,
            MovementState::Unreachable { request } => {
                self.state = MovementState::Idle;
                Some(MoveCompletion::failed(request))
            }
            MovementState::Following { request, .. } => {
                if self.advance(dt) {
                    self.state = MovementState::Idle;
                    Some(MoveCompletion::arrived(request))
                } else {
                    None
                }
            }
        }
    }

    fn current_request(&self) -> Option<MoveRequestId> {
        self.state.request()
    }

    fn speed(&self) -> f32 {
        match self.state {
            MovementState::Following { .. } => self.config.speed,
            _ => 0.0,
        }
    }
}
