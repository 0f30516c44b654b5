//! Particle record and its lifecycle phase

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Lifecycle phase of a particle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting in place (fading in) until a delay elapses or the pointer touches it
    #[default]
    Dormant,
    /// Moving, shrinking and fading out
    Activated,
    /// Finished; replaced or removed before the next render
    Expired,
}

/// A single bubble/particle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    /// Displacement per (ms * VELOCITY_SCALE)
    pub vel: Vec2,
    pub radius: f32,
    /// Milliseconds spent in the current phase
    pub age: f32,
    /// Lifetime once activated (ms)
    pub ttl: f32,
    /// Fade-in window (ms)
    pub fade_in: f32,
    /// Dormant particles self-activate after this many ms (None = only on touch)
    pub activation_delay: Option<f32>,
    pub opacity: f32,
    pub phase: Phase,
    /// Children are spawned with this cleared so splitting stops after one generation
    pub can_replicate: bool,
    /// Set once the split check has run; never cleared
    pub has_replicated: bool,
}

impl Particle {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32, ttl: f32) -> Self {
        Self {
            pos,
            vel,
            radius: radius.max(0.0),
            age: 0.0,
            ttl: ttl.max(f32::EPSILON),
            fade_in: 0.0,
            activation_delay: None,
            opacity: 0.0,
            phase: Phase::Dormant,
            can_replicate: true,
            has_replicated: false,
        }
    }

    pub fn is_dormant(&self) -> bool {
        self.phase == Phase::Dormant
    }

    pub fn is_active(&self) -> bool {
        self.phase == Phase::Activated
    }

    /// Start moving. Age restarts so the fade-out runs over the full ttl.
    pub fn activate(&mut self) {
        if self.phase == Phase::Dormant {
            self.phase = Phase::Activated;
            self.age = 0.0;
        }
    }

    pub fn expire(&mut self) {
        self.phase = Phase::Expired;
    }

    /// age / ttl while activated, 0 otherwise
    pub fn life_ratio(&self) -> f32 {
        match self.phase {
            Phase::Activated => self.age / self.ttl,
            Phase::Dormant => 0.0,
            Phase::Expired => 1.0,
        }
    }

    /// Ramp from 0 to 1 over the fade-in window
    pub fn fade_in_level(&self) -> f32 {
        if self.fade_in <= 0.0 {
            1.0
        } else {
            (self.age / self.fade_in).clamp(0.0, 1.0)
        }
    }

    /// Squared-distance hit test with the reach scaled by `k`
    pub fn within_reach(&self, point: Vec2, k: f32) -> bool {
        let reach = self.radius * k;
        self.pos.distance_squared(point) < reach * reach
    }

    /// True when the particle should be drawn at all
    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0 && self.radius > 0.0 && self.phase != Phase::Expired
    }
}
