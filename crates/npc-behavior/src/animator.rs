//! The animator capability states drive, and the animation-kind dispatch.
//!
//! Playback lives outside this crate.  States only call the three
//! [`Animator`] methods; an engine binding forwards them to its animation
//! graph.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use serde::Deserialize;

use crate::{BehaviorError, BehaviorResult};

// ── AnimationKind ─────────────────────────────────────────────────────────────

/// The animation an idle state pulses.
///
/// `None` is a placeholder: an idle state configured with it never fires.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum AnimationKind {
    #[default]
    None,
    Idle,
    Sit,
    Flip,
}

impl AnimationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AnimationKind::None => "none",
            AnimationKind::Idle => "idle",
            AnimationKind::Sit  => "sit",
            AnimationKind::Flip => "flip",
        }
    }
}

impl fmt::Display for AnimationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnimationKind {
    type Err = BehaviorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(AnimationKind::None),
            "idle" => Ok(AnimationKind::Idle),
            "sit"  => Ok(AnimationKind::Sit),
            "flip" => Ok(AnimationKind::Flip),
            other  => Err(BehaviorError::UnsupportedAnimation(other.to_owned())),
        }
    }
}

impl TryFrom<String> for AnimationKind {
    type Error = BehaviorError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

// ── AnimatorTrigger ───────────────────────────────────────────────────────────

/// Discrete one-shot animator triggers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AnimatorTrigger {
    Idle,
    Sit,
    Flip,
}

impl TryFrom<AnimationKind> for AnimatorTrigger {
    type Error = BehaviorError;

    fn try_from(kind: AnimationKind) -> Result<Self, Self::Error> {
        match kind {
            AnimationKind::Idle => Ok(AnimatorTrigger::Idle),
            AnimationKind::Sit  => Ok(AnimatorTrigger::Sit),
            AnimationKind::Flip => Ok(AnimatorTrigger::Flip),
            AnimationKind::None => Err(BehaviorError::UnsupportedAnimation(kind.to_string())),
        }
    }
}

/// Fire the trigger for `kind`.
///
/// A kind with no trigger is a contract violation and returns
/// [`BehaviorError::UnsupportedAnimation`]; it is never silently skipped.
pub fn play(animator: &mut dyn Animator, kind: AnimationKind) -> BehaviorResult<()> {
    let trigger = AnimatorTrigger::try_from(kind)?;
    animator.set_trigger(trigger);
    Ok(())
}

// ── Animator ──────────────────────────────────────────────────────────────────

/// Animation parameters a behavior state can set.
pub trait Animator: Send {
    fn set_trigger(&mut self, trigger: AnimatorTrigger);

    /// Continuous "eating" flag used by foraging.
    fn set_eating(&mut self, eating: bool);

    /// Current movement speed in m/s, pushed every frame by the agent.
    fn set_speed(&mut self, speed: f32);
}

/// Discards everything.
pub struct NullAnimator;

impl Animator for NullAnimator {
    fn set_trigger(&mut self, _trigger: AnimatorTrigger) {}
    fn set_eating(&mut self, _eating: bool) {}
    fn set_speed(&mut self, _speed: f32) {}
}

// ── RecordingAnimator ─────────────────────────────────────────────────────────

/// Everything a [`RecordingAnimator`] has been told so far.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnimationLog {
    /// Triggers in the order they fired.
    pub triggers: Vec<AnimatorTrigger>,
    /// Last value passed to `set_eating`.
    pub eating:   bool,
    /// Times the eating flag switched on.
    pub meals:    usize,
    /// Last value passed to `set_speed`.
    pub speed:    f32,
}

impl AnimationLog {
    pub fn count(&self, trigger: AnimatorTrigger) -> usize {
        self.triggers.iter().filter(|&&t| t == trigger).count()
    }
}

/// Records animator calls into a shared [`AnimationLog`].
///
/// Clones share the same log, so a caller can keep one handle while the
/// agent owns another.
#[derive(Clone, Default)]
pub struct RecordingAnimator {
    log: Arc<Mutex<AnimationLog>>,
}

impl RecordingAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the log.
    pub fn log(&self) -> AnimationLog {
        self.with_log(|log| log.clone())
    }

    fn with_log<T>(&self, f: impl FnOnce(&mut AnimationLog) -> T) -> T {
        let mut guard = self.log.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }
}

impl Animator for RecordingAnimator {
    fn set_trigger(&mut self, trigger: AnimatorTrigger) {
        self.with_log(|log| log.triggers.push(trigger));
    }

    fn set_eating(&mut self, eating: bool) {
        self.with_log(|log| {
            if eating && !log.eating {
                log.meals += 1;
            }
            log.eating = eating;
        });
    }

    fn set_speed(&mut self, speed: f32) {
        self.with_log(|log| log.speed = speed);
    }
}
