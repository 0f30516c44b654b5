//! Pointer, touch, click and ambient-timer input
//!
//! Handlers run between frames and mutate the same `SimContext` the stepper
//! uses; every handler leaves the store within capacity.

use glam::Vec2;

use super::policy::PointerMode;
use super::state::SimContext;

/// Latest pointer sample
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointerState {
    /// None once the pointer has left the surface
    pub pos: Option<Vec2>,
    /// Event time of the last pointer-move spawn burst
    last_burst_ms: Option<f64>,
}

impl PointerState {
    /// True when a move burst at `now_ms` respects the cooldown
    fn burst_ready(&self, now_ms: f64, cooldown_ms: f64) -> bool {
        match self.last_burst_ms {
            Some(last) => now_ms - last >= cooldown_ms,
            None => true,
        }
    }
}

/// Pointer or touch moved to `pos` (surface coordinates) at event time `now_ms`.
///
/// Returns how many particles were woken or spawned.
pub fn pointer_moved(ctx: &mut SimContext, pos: Vec2, now_ms: f64) -> usize {
    ctx.pointer.pos = Some(pos);

    match ctx.policy.pointer {
        PointerMode::Off => 0,
        PointerMode::Activate { reach } => wake_near(ctx, pos, reach),
        PointerMode::Spawn {
            move_batch,
            cooldown_ms,
            ..
        } => {
            if !ctx.pointer.burst_ready(now_ms, cooldown_ms) {
                return 0;
            }
            ctx.pointer.last_burst_ms = Some(now_ms);
            let count = move_batch.sample(&mut ctx.rng);
            spawn_burst(ctx, pos, count)
        }
    }
}

/// Pointer left the surface
pub fn pointer_left(ctx: &mut SimContext) {
    ctx.pointer.pos = None;
}

/// Click or tap at `pos`. Bursts are larger than move spawns and ignore the
/// move cooldown; in activate mode a tap wakes whatever it lands on.
pub fn clicked(ctx: &mut SimContext, pos: Vec2) -> usize {
    match ctx.policy.pointer {
        PointerMode::Off => 0,
        PointerMode::Activate { reach } => wake_near(ctx, pos, reach),
        PointerMode::Spawn { click_batch, .. } => {
            let count = click_batch.sample(&mut ctx.rng);
            spawn_burst(ctx, pos, count)
        }
    }
}

/// Advance the ambient spawn timer by `dt` ms and emit any due batches
pub fn advance_ambient(ctx: &mut SimContext, dt: f32) -> usize {
    let Some(ambient) = ctx.policy.ambient.clone() else {
        return 0;
    };
    if ambient.interval_ms <= 0.0 {
        return 0;
    }

    ctx.ambient_clock += dt;
    let mut spawned = 0;
    while ctx.ambient_clock >= ambient.interval_ms {
        ctx.ambient_clock -= ambient.interval_ms;
        for _ in 0..ambient.batch {
            if ctx.store.remaining() == 0 {
                break;
            }
            let mut particle = ctx
                .policy
                .spawn_in(&mut ctx.rng, ambient.region, ctx.bounds);
            particle.activate();
            ctx.store.push(particle);
            spawned += 1;
        }
    }
    spawned
}

/// Force-activate dormant particles within `radius * reach` of `pos`
fn wake_near(ctx: &mut SimContext, pos: Vec2, reach: f32) -> usize {
    let mut woken = 0;
    for particle in ctx.store.iter_mut() {
        if particle.is_dormant() && particle.within_reach(pos, reach) {
            particle.activate();
            woken += 1;
        }
    }
    if woken > 0 {
        log::trace!("woke {} particles at ({:.0}, {:.0})", woken, pos.x, pos.y);
    }
    woken
}

/// Emit up to `count` activated particles at `pos`, bounded by free capacity
fn spawn_burst(ctx: &mut SimContext, pos: Vec2, count: u32) -> usize {
    let count = (count as usize).min(ctx.store.remaining());
    for _ in 0..count {
        let mut particle = ctx.spawn_at(pos);
        particle.activate();
        ctx.store.push(particle);
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::particle::{Particle, Phase};
    use crate::sim::policy::{AmbientSpawn, LifecyclePolicy, SpawnRegion};

    fn empty_ctx(mut policy: LifecyclePolicy) -> SimContext {
        policy.initial_count = 0;
        SimContext::new(policy, Vec2::new(800.0, 600.0), 1234)
    }

    #[test]
    fn test_pointer_wakes_dormant_particle() {
        let mut ctx = empty_ctx(LifecyclePolicy::bubbles());
        let mut particle = Particle::new(Vec2::new(100.0, 100.0), Vec2::ZERO, 10.0, 3000.0);
        particle.age = 250.0;
        ctx.store.push(particle);

        let woken = pointer_moved(&mut ctx, Vec2::new(105.0, 102.0), 0.0);
        assert_eq!(woken, 1);
        let p = ctx.store.get(0).unwrap();
        assert_eq!(p.phase, Phase::Activated);
        assert_eq!(p.age, 0.0);
        assert_eq!(ctx.pointer.pos, Some(Vec2::new(105.0, 102.0)));
    }

    #[test]
    fn test_pointer_far_away_does_nothing() {
        let mut ctx = empty_ctx(LifecyclePolicy::bubbles());
        ctx.store
            .push(Particle::new(Vec2::new(100.0, 100.0), Vec2::ZERO, 10.0, 3000.0));
        assert_eq!(pointer_moved(&mut ctx, Vec2::new(400.0, 400.0), 0.0), 0);
        assert!(ctx.store.get(0).unwrap().is_dormant());
    }

    #[test]
    fn test_pointer_leave_clears_position() {
        let mut ctx = empty_ctx(LifecyclePolicy::bubbles());
        pointer_moved(&mut ctx, Vec2::new(1.0, 1.0), 0.0);
        pointer_left(&mut ctx);
        assert_eq!(ctx.pointer.pos, None);
    }

    #[test]
    fn test_move_spawn_rate_limited() {
        let mut ctx = empty_ctx(LifecyclePolicy::sparkle());
        let first = pointer_moved(&mut ctx, Vec2::new(50.0, 50.0), 1000.0);
        assert!((1..=4).contains(&first));

        // Within the 40ms cooldown
        assert_eq!(pointer_moved(&mut ctx, Vec2::new(55.0, 50.0), 1020.0), 0);

        let later = pointer_moved(&mut ctx, Vec2::new(60.0, 50.0), 1041.0);
        assert!((1..=4).contains(&later));
        assert_eq!(ctx.store.len(), first + later);
        assert!(ctx.store.iter().all(|p| p.is_active()));
    }

    #[test]
    fn test_click_burst_is_larger() {
        let mut ctx = empty_ctx(LifecyclePolicy::sparkle());
        let n = clicked(&mut ctx, Vec2::new(200.0, 200.0));
        assert!((6..=20).contains(&n));
        for p in ctx.store.iter() {
            assert_eq!(p.pos, Vec2::new(200.0, 200.0));
        }
    }

    #[test]
    fn test_burst_respects_capacity() {
        let mut policy = LifecyclePolicy::sparkle();
        policy.capacity = 5;
        let mut ctx = empty_ctx(policy);
        for _ in 0..10 {
            clicked(&mut ctx, Vec2::new(10.0, 10.0));
        }
        assert_eq!(ctx.store.len(), 5);
    }

    #[test]
    fn test_ambient_timer() {
        let mut policy = LifecyclePolicy::stream();
        policy.ambient = Some(AmbientSpawn {
            interval_ms: 100.0,
            batch: 2,
            region: SpawnRegion::BottomEdge,
        });
        let mut ctx = empty_ctx(policy);

        assert_eq!(advance_ambient(&mut ctx, 60.0), 0);
        assert_eq!(advance_ambient(&mut ctx, 60.0), 2);
        assert!((ctx.ambient_clock - 20.0).abs() < 1e-4);
        assert!(ctx.store.iter().all(|p| p.pos.y > 600.0 && p.is_active()));
    }

    #[test]
    fn test_ambient_disabled_without_config() {
        let mut ctx = empty_ctx(LifecyclePolicy::bubbles());
        assert_eq!(advance_ambient(&mut ctx, 10_000.0), 0);
        assert_eq!(ctx.ambient_clock, 0.0);
    }
}
