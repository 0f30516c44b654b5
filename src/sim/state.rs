//! Simulation context
//!
//! Everything one particle layer mutates lives here and is passed explicitly
//! to the stepper, the input adapter and the renderer.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::input::PointerState;
use super::particle::Particle;
use super::policy::{LifecyclePolicy, SpawnRegion};
use super::store::ParticleStore;

/// Particle layer state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct SimContext {
    /// Seed the RNG was created from
    pub seed: u64,
    /// Surface size in CSS pixels
    pub bounds: Vec2,
    pub policy: LifecyclePolicy,
    pub store: ParticleStore,
    pub pointer: PointerState,
    /// Milliseconds accumulated toward the next ambient spawn
    pub ambient_clock: f32,
    /// Total simulated time (ms)
    pub elapsed: f64,
    pub(crate) rng: Pcg32,
}

impl SimContext {
    /// Create a context and scatter the policy's initial particles
    pub fn new(policy: LifecyclePolicy, bounds: Vec2, seed: u64) -> Self {
        let mut ctx = Self {
            seed,
            bounds,
            store: ParticleStore::with_capacity(policy.capacity),
            policy,
            pointer: PointerState::default(),
            ambient_clock: 0.0,
            elapsed: 0.0,
            rng: Pcg32::seed_from_u64(seed),
        };
        ctx.populate();
        ctx
    }

    /// Fill up to `initial_count` (never beyond capacity)
    pub fn populate(&mut self) {
        let target = self.policy.initial_count.min(self.policy.capacity);
        while self.store.len() < target {
            let particle = self.spawn_anywhere();
            self.store.push(particle);
        }
    }

    /// Fresh dormant particle at a random surface position
    pub fn spawn_anywhere(&mut self) -> Particle {
        self.policy
            .spawn_in(&mut self.rng, SpawnRegion::Anywhere, self.bounds)
    }

    /// Fresh dormant particle at `pos`
    pub fn spawn_at(&mut self, pos: Vec2) -> Particle {
        self.policy.spawn(&mut self.rng, pos)
    }

    /// Viewport changed; particles keep their positions and the expiry
    /// bounds follow the new size
    pub fn resize(&mut self, bounds: Vec2) {
        log::debug!(
            "particle bounds {:.0}x{:.0} -> {:.0}x{:.0}",
            self.bounds.x,
            self.bounds.y,
            bounds.x,
            bounds.y
        );
        self.bounds = bounds;
    }

    /// Replace the cap (e.g. narrow-viewport preset) and trim
    pub fn set_capacity(&mut self, capacity: usize) {
        self.policy.capacity = capacity;
        self.store.set_capacity(capacity);
    }

    /// Adopt a new cap and fill level after a breakpoint change: trims when
    /// shrinking, tops up with dormant particles when growing
    pub fn retarget(&mut self, capacity: usize, initial_count: usize) {
        self.set_capacity(capacity);
        self.policy.initial_count = initial_count.min(capacity);
        self.populate();
    }
}
