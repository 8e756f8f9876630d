//! Injectable random sources and deterministic per-agent RNG wrappers.
//!
//! # Injection
//!
//! Behavior code never touches ambient randomness.  Every draw goes through a
//! [`RandomSource`] lent to the state by its agent, so tests can substitute a
//! scripted sequence and production runs stay reproducible from one seed.
//!
//! # Determinism strategy
//!
//! Each agent gets its own independent `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (agent_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive agent IDs uniformly across the seed space, so
//! agents never share RNG state and adding agents does not disturb the seeds
//! of existing ones.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::{AgentId, Vec3};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Rejection-sampling attempts before `inside_unit_sphere` gives up.
const MAX_SPHERE_ATTEMPTS: usize = 64;

// ── RandomSource ──────────────────────────────────────────────────────────────

/// A source of uniform floats, plus the derived draws behavior states need.
///
/// Only [`next_unit`](Self::next_unit) is required.
pub trait RandomSource: Send {
    /// Uniform value in `[0, 1)`.
    fn next_unit(&mut self) -> f32;

    /// Uniform value in `[min, max)`; returns `min` when `max <= min`.
    fn range(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        min + (max - min) * self.next_unit()
    }

    /// Uniform point inside the unit sphere (rejection sampling).
    ///
    /// Falls back to the origin if no candidate lands inside the sphere
    /// within a bounded number of attempts (only possible with a scripted
    /// source).
    fn inside_unit_sphere(&mut self) -> Vec3 {
        for _ in 0..MAX_SPHERE_ATTEMPTS {
            let v = Vec3::new(
                self.next_unit() * 2.0 - 1.0,
                self.next_unit() * 2.0 - 1.0,
                self.next_unit() * 2.0 - 1.0,
            );
            if v.length_squared() <= 1.0 {
                return v;
            }
        }
        Vec3::ZERO
    }
}

// ── AgentRng ──────────────────────────────────────────────────────────────────

/// Per-agent deterministic RNG.
pub struct AgentRng(SmallRng);

impl AgentRng {
    /// Seed deterministically from the run's global seed and an agent ID.
    pub fn new(global_seed: u64, agent: AgentId) -> Self {
        let seed = global_seed ^ (agent.0 as u64).wrapping_mul(MIXING_CONSTANT);
        AgentRng(SmallRng::seed_from_u64(seed))
    }
}

impl RandomSource for AgentRng {
    #[inline]
    fn next_unit(&mut self) -> f32 {
        self.0.r#gen::<f32>()
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Simulation-level RNG for one-off global draws (spawn placement, etc.).
///
/// Used only from the single-threaded setup path.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a child `SimRng` with a different seed offset.
    pub fn child(&mut self, offset: u64) -> SimRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SimRng(SmallRng::seed_from_u64(child_seed))
    }
}

impl RandomSource for SimRng {
    #[inline]
    fn next_unit(&mut self) -> f32 {
        self.0.r#gen::<f32>()
    }
}
