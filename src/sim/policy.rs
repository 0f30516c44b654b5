//! Lifecycle policy: the declarative parameter set behind every particle variant
//!
//! Bubbles, ambient dust, pointer sparkles and the rising stream all run the
//! same stepper; they differ only in the values held here.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::particle::Particle;
use crate::lerp;

/// Closed float range sampled uniformly. `min > max` is allowed (the range is
/// simply walked backwards), which keeps "-1.2 to -2.5" style literals readable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub const fn fixed(value: f32) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        lerp(self.min, self.max, rng.random::<f32>())
    }

    pub fn lower(&self) -> f32 {
        self.min.min(self.max)
    }

    pub fn upper(&self) -> f32 {
        self.min.max(self.max)
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.lower() && value <= self.upper()
    }
}

/// Inclusive integer range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRange {
    pub min: u32,
    pub max: u32,
}

impl CountRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        let (lo, hi) = (self.min.min(self.max), self.min.max(self.max));
        rng.random_range(lo..=hi)
    }
}

/// Per-particle attribute ranges used by the factory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnRanges {
    pub radius: Span,
    pub vx: Span,
    pub vy: Span,
    /// Lifetime once activated (ms)
    pub ttl: Span,
    /// Fade-in window (ms)
    pub fade_in: f32,
    /// None = dormant until the pointer touches it
    pub activation_delay: Option<Span>,
}

/// Where new particles appear when not spawned at the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnRegion {
    /// Uniformly over the whole surface
    #[default]
    Anywhere,
    /// Just below the bottom edge, rising into view
    BottomEdge,
}

impl SpawnRegion {
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, bounds: Vec2, radius: f32) -> Vec2 {
        match self {
            SpawnRegion::Anywhere => Vec2::new(
                rng.random::<f32>() * bounds.x,
                rng.random::<f32>() * bounds.y,
            ),
            SpawnRegion::BottomEdge => Vec2::new(rng.random::<f32>() * bounds.x, bounds.y + radius),
        }
    }
}

/// Opacity as a function of age
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpacityCurve {
    /// `max(0, 1 - age/ttl)`
    #[default]
    FadeOut,
    /// Ramp up over the fade-in window, then fade out with life ratio
    FadeInOut,
}

impl OpacityCurve {
    pub fn opacity(&self, particle: &Particle) -> f32 {
        let fade_out = (1.0 - particle.life_ratio()).max(0.0);
        let value = match self {
            OpacityCurve::FadeOut => fade_out,
            OpacityCurve::FadeInOut => particle.fade_in_level().min(fade_out),
        };
        value.clamp(0.0, 1.0)
    }
}

/// One-generation split into smaller children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Replication {
    /// Life ratio that must be exceeded before splitting
    pub threshold: f32,
    /// Chance the split happens once the threshold is crossed (decided once)
    pub probability: f64,
    pub count: CountRange,
    /// Max offset of a child from its parent on each axis (px)
    pub jitter: f32,
    /// Child radius as a fraction of the parent's
    pub scale: Span,
}

/// What the pointer does to the scene
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerMode {
    #[default]
    Off,
    /// Wake dormant particles within `radius * reach` of the pointer
    Activate { reach: f32 },
    /// Emit particles at the pointer
    Spawn {
        move_batch: CountRange,
        click_batch: CountRange,
        /// Minimum gap between pointer-move bursts (ms)
        cooldown_ms: f64,
    },
}

/// Timer-driven spawning independent of the pointer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmbientSpawn {
    pub interval_ms: f32,
    pub batch: u32,
    pub region: SpawnRegion,
}

/// Complete parameter set for one particle layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecyclePolicy {
    /// Hard cap on live particles after every update
    pub capacity: usize,
    /// Particles scattered over the surface at startup
    pub initial_count: usize,
    pub spawn: SpawnRanges,
    pub opacity: OpacityCurve,
    /// Radius multiplier applied once per activated frame
    pub radius_decay: f32,
    /// Below this radius a particle expires
    pub min_radius: f32,
    /// How far past the surface edge a particle may drift (px)
    pub exit_margin: f32,
    /// Expired particles respawn here; None removes them instead
    pub respawn: Option<SpawnRegion>,
    pub replication: Option<Replication>,
    pub pointer: PointerMode,
    pub ambient: Option<AmbientSpawn>,
}

impl Default for LifecyclePolicy {
    fn default() -> Self {
        Self::bubbles()
    }
}

impl LifecyclePolicy {
    /// Touch-to-float bubbles: dormant until the pointer reaches them, then
    /// rise, shrink, fade out and split once into 2-3 smaller bubbles.
    pub fn bubbles() -> Self {
        Self {
            capacity: 40,
            initial_count: 40,
            spawn: SpawnRanges {
                radius: Span::new(4.0, 12.0),
                vx: Span::new(-0.2, 0.2),
                vy: Span::new(-1.2, -2.5),
                ttl: Span::new(2000.0, 4000.0),
                fade_in: 800.0,
                activation_delay: None,
            },
            opacity: OpacityCurve::FadeOut,
            radius_decay: 0.998,
            min_radius: 0.5,
            exit_margin: 20.0,
            respawn: Some(SpawnRegion::Anywhere),
            replication: Some(Replication {
                threshold: 0.3,
                probability: 1.0,
                count: CountRange::new(2, 3),
                jitter: 6.0,
                scale: Span::new(0.4, 0.7),
            }),
            pointer: PointerMode::Activate { reach: 2.0 },
            ambient: None,
        }
    }

    /// Slow background dust that wakes by itself after a random delay
    pub fn ambient() -> Self {
        Self {
            capacity: 80,
            initial_count: 80,
            spawn: SpawnRanges {
                radius: Span::new(1.0, 3.0),
                vx: Span::new(-0.15, 0.15),
                vy: Span::new(-0.1, -0.6),
                ttl: Span::new(4000.0, 8000.0),
                fade_in: 1200.0,
                activation_delay: Some(Span::new(0.0, 3000.0)),
            },
            opacity: OpacityCurve::FadeInOut,
            radius_decay: 0.9995,
            min_radius: 0.3,
            exit_margin: 20.0,
            respawn: Some(SpawnRegion::Anywhere),
            replication: None,
            pointer: PointerMode::Activate { reach: 1.5 },
            ambient: None,
        }
    }

    /// Pointer trail and click bursts; particles are removed when they expire
    pub fn sparkle() -> Self {
        Self {
            capacity: 180,
            initial_count: 0,
            spawn: SpawnRanges {
                radius: Span::new(2.0, 6.0),
                vx: Span::new(-1.0, 1.0),
                vy: Span::new(-1.5, 0.5),
                ttl: Span::new(600.0, 1400.0),
                fade_in: 120.0,
                activation_delay: None,
            },
            opacity: OpacityCurve::FadeInOut,
            radius_decay: 0.995,
            min_radius: 0.5,
            exit_margin: 20.0,
            respawn: None,
            replication: Some(Replication {
                threshold: 0.5,
                probability: 0.25,
                count: CountRange::new(2, 3),
                jitter: 4.0,
                scale: Span::new(0.4, 0.7),
            }),
            pointer: PointerMode::Spawn {
                move_batch: CountRange::new(1, 4),
                click_batch: CountRange::new(6, 20),
                cooldown_ms: 40.0,
            },
            ambient: None,
        }
    }

    /// Steady stream rising from the bottom edge every 100ms
    pub fn stream() -> Self {
        Self {
            capacity: 600,
            initial_count: 0,
            spawn: SpawnRanges {
                radius: Span::new(2.0, 6.0),
                vx: Span::new(-0.1, 0.1),
                vy: Span::new(-0.6, -1.0),
                ttl: Span::new(4000.0, 7000.0),
                fade_in: 300.0,
                activation_delay: None,
            },
            opacity: OpacityCurve::FadeInOut,
            radius_decay: 1.0,
            min_radius: 0.5,
            exit_margin: 20.0,
            respawn: None,
            replication: None,
            pointer: PointerMode::Off,
            ambient: Some(AmbientSpawn {
                interval_ms: 100.0,
                batch: 1,
                region: SpawnRegion::BottomEdge,
            }),
        }
    }

    /// Build a fresh dormant particle at `pos` with randomized attributes
    pub fn spawn<R: Rng + ?Sized>(&self, rng: &mut R, pos: Vec2) -> Particle {
        let ranges = &self.spawn;
        let radius = ranges.radius.sample(rng);
        let vel = Vec2::new(ranges.vx.sample(rng), ranges.vy.sample(rng));
        let ttl = ranges.ttl.sample(rng);

        let mut particle = Particle::new(pos, vel, radius, ttl);
        particle.fade_in = ranges.fade_in;
        particle.activation_delay = ranges.activation_delay.map(|d| d.sample(rng));
        particle.can_replicate = self.replication.is_some();
        particle
    }

    /// Spawn somewhere in `region` of a surface of size `bounds`
    pub fn spawn_in<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        region: SpawnRegion,
        bounds: Vec2,
    ) -> Particle {
        let pos = region.sample(rng, bounds, self.spawn.radius.upper());
        self.spawn(rng, pos)
    }

    /// Build an activated child of `parent` that will never split
    pub fn spawn_child<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        parent: &Particle,
        replication: &Replication,
    ) -> Particle {
        let offset = Vec2::new(
            lerp(-replication.jitter, replication.jitter, rng.random::<f32>()),
            lerp(-replication.jitter, replication.jitter, rng.random::<f32>()),
        );
        let scale = replication.scale.sample(rng);
        let mut child = self.spawn(rng, parent.pos + offset);
        child.radius = (parent.radius * scale).max(0.0);
        child.can_replicate = false;
        child.activate();
        child
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::particle::Phase;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_span_sample_within_reversed_range() {
        let mut rng = Pcg32::seed_from_u64(7);
        let span = Span::new(-1.2, -2.5);
        for _ in 0..200 {
            let v = span.sample(&mut rng);
            assert!(span.contains(v), "{} outside {:?}", v, span);
        }
    }

    #[test]
    fn test_fixed_span_is_constant() {
        let mut rng = Pcg32::seed_from_u64(11);
        let span = Span::fixed(800.0);
        assert!((0..20).all(|_| span.sample(&mut rng) == 800.0));
    }

    #[test]
    fn test_count_range_inclusive() {
        let mut rng = Pcg32::seed_from_u64(3);
        let range = CountRange::new(2, 3);
        let mut seen = [false; 2];
        for _ in 0..100 {
            let n = range.sample(&mut rng);
            assert!((2..=3).contains(&n));
            seen[(n - 2) as usize] = true;
        }
        assert!(seen[0] && seen[1]);
    }

    #[test]
    fn test_spawn_respects_ranges() {
        let policy = LifecyclePolicy::bubbles();
        let mut rng = Pcg32::seed_from_u64(11);
        for _ in 0..50 {
            let p = policy.spawn(&mut rng, Vec2::new(5.0, 5.0));
            assert_eq!(p.phase, Phase::Dormant);
            assert!(policy.spawn.radius.contains(p.radius));
            assert!(policy.spawn.ttl.contains(p.ttl));
            assert!(p.vel.y < 0.0);
            assert!(p.can_replicate);
            assert!(!p.has_replicated);
        }
    }

    #[test]
    fn test_spawn_child_is_smaller_and_sterile() {
        let policy = LifecyclePolicy::bubbles();
        let replication = policy.replication.clone().unwrap();
        let mut rng = Pcg32::seed_from_u64(5);
        let parent = Particle::new(Vec2::new(50.0, 50.0), Vec2::ZERO, 10.0, 1000.0);
        for _ in 0..50 {
            let child = policy.spawn_child(&mut rng, &parent, &replication);
            assert!(child.radius >= 4.0 - 1e-4 && child.radius <= 7.0 + 1e-4);
            assert!(!child.can_replicate);
            assert!(child.is_active());
            assert!((child.pos - parent.pos).abs().max_element() <= replication.jitter + 1e-4);
        }
    }

    #[test]
    fn test_bottom_edge_region() {
        let mut rng = Pcg32::seed_from_u64(1);
        let bounds = Vec2::new(300.0, 200.0);
        let pos = SpawnRegion::BottomEdge.sample(&mut rng, bounds, 6.0);
        assert_eq!(pos.y, 206.0);
        assert!(pos.x >= 0.0 && pos.x <= 300.0);
    }

    #[test]
    fn test_fade_in_out_curve() {
        let mut p = Particle::new(Vec2::ZERO, Vec2::ZERO, 4.0, 1000.0);
        p.fade_in = 200.0;
        p.activate();
        p.age = 100.0;
        assert!((OpacityCurve::FadeInOut.opacity(&p) - 0.5).abs() < 1e-6);
        p.age = 900.0;
        assert!((OpacityCurve::FadeInOut.opacity(&p) - 0.1).abs() < 1e-5);
        p.age = 2000.0;
        assert_eq!(OpacityCurve::FadeOut.opacity(&p), 0.0);
    }

    #[test]
    fn test_policy_partial_json_uses_defaults() {
        let policy: LifecyclePolicy =
            serde_json::from_str(r#"{ "capacity": 12, "pointer": { "activate": { "reach": 1.2 } } }"#)
                .unwrap();
        assert_eq!(policy.capacity, 12);
        assert_eq!(policy.pointer, PointerMode::Activate { reach: 1.2 });
        assert_eq!(policy.radius_decay, LifecyclePolicy::bubbles().radius_decay);
    }
}
