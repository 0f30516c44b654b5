//! Per-frame particle step
//!
//! Advances every particle by the frame delta, applies the split rule and
//! replaces (or removes) whatever expired.

use super::input::advance_ambient;
use super::particle::{Particle, Phase};
use super::policy::LifecyclePolicy;
use super::state::SimContext;
use crate::consts::VELOCITY_SCALE;
use crate::{clamp_frame_dt, inside_bounds};

use glam::Vec2;
use rand::Rng;

/// Advance the layer by `dt` milliseconds
pub fn step(ctx: &mut SimContext, dt: f32) {
    let dt = clamp_frame_dt(dt);
    ctx.elapsed += dt as f64;

    advance_ambient(ctx, dt);

    let SimContext {
        store,
        policy,
        rng,
        bounds,
        ..
    } = ctx;
    let bounds = *bounds;

    // Reverse order so replace/remove at `i` never disturbs unvisited slots.
    // Children are appended past `len` and first move next frame.
    let len = store.len();
    let mut children = Vec::new();
    for i in (0..len).rev() {
        let Some(particle) = store.get_mut(i) else {
            continue;
        };

        advance(particle, policy, dt);

        if particle.is_active() {
            maybe_replicate(particle, policy, rng, &mut children);

            if is_spent(particle, policy, bounds) {
                particle.expire();
            }
        }

        if particle.phase == Phase::Expired {
            match policy.respawn {
                Some(region) if !store.is_over_capacity() => {
                    let fresh = policy.spawn_in(rng, region, bounds);
                    store.replace_at(i, fresh);
                }
                _ => {
                    store.remove_at(i);
                }
            }
        }

        for child in children.drain(..) {
            store.push(child);
        }
    }

    store.truncate_to_capacity();
}

/// Integrate one particle
fn advance(particle: &mut Particle, policy: &LifecyclePolicy, dt: f32) {
    match particle.phase {
        Phase::Dormant => {
            particle.age += dt;
            match particle.activation_delay {
                // Waiting to be touched: visible, fading in
                None => particle.opacity = particle.fade_in_level(),
                Some(delay) => {
                    if particle.age >= delay {
                        particle.activate();
                        particle.opacity = policy.opacity.opacity(particle);
                    }
                }
            }
        }
        Phase::Activated => {
            particle.age += dt;
            particle.pos += particle.vel * (dt * VELOCITY_SCALE);
            particle.radius = (particle.radius * policy.radius_decay).max(0.0);
            particle.opacity = policy.opacity.opacity(particle);
        }
        Phase::Expired => {}
    }
}

/// One-time split check once the life ratio passes the threshold
fn maybe_replicate<R: Rng + ?Sized>(
    particle: &mut Particle,
    policy: &LifecyclePolicy,
    rng: &mut R,
    children: &mut Vec<Particle>,
) {
    let Some(replication) = &policy.replication else {
        return;
    };
    if !particle.can_replicate
        || particle.has_replicated
        || particle.life_ratio() <= replication.threshold
    {
        return;
    }

    particle.has_replicated = true;
    if !rng.random_bool(replication.probability.clamp(0.0, 1.0)) {
        return;
    }

    let count = replication.count.sample(rng);
    for _ in 0..count {
        children.push(policy.spawn_child(rng, particle, replication));
    }
}

/// Left the surface, faded out, shrunk away or out of time.
/// Zero opacity before any life has elapsed is a fade-in that has not started.
fn is_spent(particle: &Particle, policy: &LifecyclePolicy, bounds: Vec2) -> bool {
    !inside_bounds(particle.pos, bounds, policy.exit_margin)
        || (particle.life_ratio() > 0.0 && particle.opacity <= 0.0)
        || particle.radius < policy.min_radius
        || particle.age >= particle.ttl
}
