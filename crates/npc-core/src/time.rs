//! Frame clock and countdown timers.
//!
//! # Design
//!
//! The simulation advances in frames.  Every frame carries a fixed delta in
//! seconds (`SimConfig::frame_delta_secs`); behavior timers are plain
//! float countdowns that subtract that delta.  A monotonically increasing
//! `Frame` counter is kept alongside for ordering and observer output.

use std::fmt;

use crate::{NpcError, NpcResult};

// ── Frame ─────────────────────────────────────────────────────────────────────

/// An absolute frame counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame(pub u64);

impl Frame {
    pub const ZERO: Frame = Frame(0);

    /// Return the frame `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Frame {
        Frame(self.0 + n)
    }

    /// Frames elapsed from `earlier` to `self`.
    ///
    /// # Panics
    /// Panics in debug mode if `earlier > self`.
    #[inline]
    pub fn since(self, earlier: Frame) -> u64 {
        self.0 - earlier.0
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F{}", self.0)
    }
}

// ── FrameClock ────────────────────────────────────────────────────────────────

/// Tracks the current frame and the simulated time it corresponds to.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameClock {
    /// Seconds that pass per frame.
    pub delta_secs: f32,
    /// The current frame, advanced by `FrameClock::advance()` each iteration.
    pub current_frame: Frame,
}

impl FrameClock {
    pub fn new(delta_secs: f32) -> Self {
        Self { delta_secs, current_frame: Frame::ZERO }
    }

    /// Advance the clock by one frame.
    #[inline]
    pub fn advance(&mut self) {
        self.current_frame = Frame(self.current_frame.0 + 1);
    }

    /// Simulated seconds since frame 0.
    ///
    /// Computed in `f64` from the frame count so long runs do not accumulate
    /// rounding drift.
    #[inline]
    pub fn elapsed_secs(&self) -> f64 {
        self.current_frame.0 as f64 * self.delta_secs as f64
    }

    /// How many frames cover `secs` seconds (rounds up).
    #[inline]
    pub fn frames_for_secs(&self, secs: f32) -> u64 {
        if self.delta_secs <= 0.0 {
            return 0;
        }
        (secs / self.delta_secs).ceil().max(0.0) as u64
    }
}

impl fmt::Display for FrameClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2}s)", self.current_frame, self.elapsed_secs())
    }
}

// ── Countdown ─────────────────────────────────────────────────────────────────

/// A float countdown timer.
///
/// `tick(dt)` subtracts `dt` and reports whether the timer has run out.
/// There is no carry-over: restarting with [`reset`](Self::reset) always
/// starts from the full duration, and a non-positive duration is already
/// elapsed on the very next tick.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct Countdown {
    remaining: f32,
}

impl Countdown {
    #[inline]
    pub fn new(secs: f32) -> Self {
        Self { remaining: secs }
    }

    #[inline]
    pub fn reset(&mut self, secs: f32) {
        self.remaining = secs;
    }

    /// Subtract `dt`; `true` once the remaining time is `<= 0`.
    #[inline]
    pub fn tick(&mut self, dt: f32) -> bool {
        self.remaining -= dt;
        self.remaining <= 0.0
    }

    #[inline]
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    #[inline]
    pub fn is_elapsed(&self) -> bool {
        self.remaining <= 0.0
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Seconds per frame.  Must be positive.
    pub frame_delta_secs: f32,

    /// Total frames simulated by `Sim::run` in npc-sim.
    pub total_frames: u64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Emit an observer snapshot every N frames.  0 disables snapshots.
    pub output_interval_frames: u64,
}

impl SimConfig {
    /// The frame at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_frame(&self) -> Frame {
        Frame(self.total_frames)
    }

    /// Construct a `FrameClock` pre-configured for this run.
    pub fn make_clock(&self) -> FrameClock {
        FrameClock::new(self.frame_delta_secs)
    }

    /// Reject configurations the frame loop cannot run with.
    pub fn validate(&self) -> NpcResult<()> {
        if !(self.frame_delta_secs.is_finite() && self.frame_delta_secs > 0.0) {
            return Err(NpcError::Config(format!(
                "frame_delta_secs must be a positive finite number, got {}",
                self.frame_delta_secs
            )));
        }
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            frame_delta_secs:       1.0 / 30.0,
            total_frames:           0,
            seed:                   0,
            output_interval_frames: 0,
        }
    }
}
