//! Parameter records for the built-in states.
//!
//! Records are plain data, deserializable with serde, validated once when a
//! state is constructed and never mutated afterwards.

use serde::Deserialize;

use crate::{AnimationKind, BehaviorError, BehaviorResult};

// ── IdleConfig ────────────────────────────────────────────────────────────────

/// Periodic idle animation.
///
/// `frequency_secs <= 0` is accepted and makes the animation fire on every
/// update once the start delay has passed.  It is not clamped.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct IdleConfig {
    pub animation:        AnimationKind,
    /// Seconds before the first cycle starts counting.
    #[serde(default)]
    pub start_delay_secs: f32,
    /// Seconds between two triggers.
    pub frequency_secs:   f32,
}

impl IdleConfig {
    pub fn new(animation: AnimationKind, start_delay_secs: f32, frequency_secs: f32) -> Self {
        Self { animation, start_delay_secs, frequency_secs }
    }

    pub fn validate(&self) -> BehaviorResult<()> {
        if !(self.start_delay_secs.is_finite() && self.start_delay_secs >= 0.0) {
            return Err(BehaviorError::Config(format!(
                "idle start_delay_secs must be a non-negative number, got {}",
                self.start_delay_secs
            )));
        }
        if !self.frequency_secs.is_finite() {
            return Err(BehaviorError::Config(format!(
                "idle frequency_secs must be finite, got {}",
                self.frequency_secs
            )));
        }
        Ok(())
    }
}

// ── ForagingConfig ────────────────────────────────────────────────────────────

/// Roam-and-eat parameters.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ForagingConfig {
    /// Radius around home in which roam targets are drawn and sampled.
    pub roam_radius:  f32,
    pub eat_secs_min: f32,
    pub eat_secs_max: f32,
}

impl ForagingConfig {
    pub fn validate(&self) -> BehaviorResult<()> {
        if !(self.roam_radius.is_finite() && self.roam_radius > 0.0) {
            return Err(BehaviorError::Config(format!(
                "foraging roam_radius must be positive, got {}",
                self.roam_radius
            )));
        }
        if !(self.eat_secs_min >= 0.0 && self.eat_secs_max.is_finite()) {
            return Err(BehaviorError::Config(format!(
                "foraging eat range [{}, {}] must be non-negative and finite",
                self.eat_secs_min, self.eat_secs_max
            )));
        }
        if self.eat_secs_max < self.eat_secs_min {
            return Err(BehaviorError::Config(format!(
                "foraging eat_secs_max ({}) is below eat_secs_min ({})",
                self.eat_secs_max, self.eat_secs_min
            )));
        }
        Ok(())
    }
}

impl Default for ForagingConfig {
    fn default() -> Self {
        Self {
            roam_radius:  5.0,
            eat_secs_min: 2.0,
            eat_secs_max: 5.0,
        }
    }
}
