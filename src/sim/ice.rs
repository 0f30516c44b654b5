//! Drifting ice blocks
//!
//! Blocks are scattered once, decluttered by a bounded relaxation pass, and
//! then float around their resting spots: a weak spring pulls them home, the
//! pointer pushes them away, friction settles them.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::policy::Span;
use crate::clamp_frame_dt;
use crate::consts::{MOBILE_MAX_WIDTH, NOMINAL_FRAME_MS, TABLET_MAX_WIDTH};

/// Ice layout and physics tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IceOptions {
    pub count: usize,
    /// Edge length in px (blocks are square)
    pub size: Span,
    /// Fraction of blocks placed partly off-screen
    pub offscreen_fraction: f32,
    /// How far past each edge an off-screen block may start
    pub offscreen_reach: Vec2,
    /// Extra gap kept between bounding circles during relaxation
    pub margin: f32,
    /// Relaxation iteration budget
    pub iterations: u32,
    /// Pointer influence radius
    pub influence: f32,
    pub push_strength: f32,
    pub spring: f32,
    /// Velocity kept per nominal frame
    pub friction: f32,
    pub max_displacement: f32,
}

impl Default for IceOptions {
    fn default() -> Self {
        Self {
            count: 10,
            size: Span::new(350.0, 580.0),
            offscreen_fraction: 0.3,
            offscreen_reach: Vec2::new(200.0, 150.0),
            margin: 20.0,
            iterations: 200,
            influence: 400.0,
            push_strength: 0.5,
            spring: 0.0005,
            friction: 0.9,
            max_displacement: 1000.0,
        }
    }
}

impl IceOptions {
    /// Default options with block sizes picked for the viewport width
    pub fn for_viewport(width: f32) -> Self {
        Self {
            size: Self::size_for_width(width),
            ..Self::default()
        }
    }

    pub fn size_for_width(width: f32) -> Span {
        if width <= MOBILE_MAX_WIDTH {
            Span::new(150.0, 250.0)
        } else if width <= TABLET_MAX_WIDTH {
            Span::new(250.0, 400.0)
        } else {
            Span::new(350.0, 580.0)
        }
    }
}

/// One square ice block. `pos` is the top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IceBlock {
    pub size: f32,
    pub pos: Vec2,
    /// Resting position after relaxation
    pub base: Vec2,
    pub vel: Vec2,
    /// Rotation in degrees
    pub angle: f32,
}

impl IceBlock {
    pub fn new(pos: Vec2, size: f32) -> Self {
        Self {
            size,
            pos,
            base: pos,
            vel: Vec2::ZERO,
            angle: 0.0,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size / 2.0)
    }

    /// Current displacement from rest
    pub fn offset(&self) -> Vec2 {
        self.pos - self.base
    }

    fn overlaps(&self, other: &IceBlock, tolerance: f32) -> bool {
        let min_dist = (self.size + other.size) / 2.0;
        self.center().distance(other.center()) < min_dist - tolerance
    }
}

/// Keep a block's top-left corner inside the surface
fn clamp_to_surface(pos: Vec2, size: f32, bounds: Vec2) -> Vec2 {
    let max = (bounds - Vec2::splat(size)).max(Vec2::ZERO);
    pos.clamp(Vec2::ZERO, max)
}

/// Scatter `options.count` blocks. Roughly `offscreen_fraction` of them hang
/// past a random edge so they drift in from outside.
pub fn scatter<R: Rng + ?Sized>(options: &IceOptions, bounds: Vec2, rng: &mut R) -> Vec<IceBlock> {
    let reach = options.offscreen_reach;
    (0..options.count)
        .map(|_| {
            let size = options.size.sample(rng).floor();
            let half = size * 0.5;

            let pos = if rng.random::<f32>() < options.offscreen_fraction {
                match rng.random_range(0..4u8) {
                    0 => Vec2::new(-rng.random::<f32>() * reach.x - half, rng.random::<f32>() * bounds.y),
                    1 => Vec2::new(
                        bounds.x + rng.random::<f32>() * reach.x - half,
                        rng.random::<f32>() * bounds.y,
                    ),
                    2 => Vec2::new(rng.random::<f32>() * bounds.x, -rng.random::<f32>() * reach.y - half),
                    _ => Vec2::new(
                        rng.random::<f32>() * bounds.x,
                        bounds.y + rng.random::<f32>() * reach.y - half,
                    ),
                }
            } else {
                Vec2::new(
                    rng.random::<f32>() * (bounds.x - size).max(0.0),
                    rng.random::<f32>() * (bounds.y - size).max(0.0),
                )
            };

            let mut block = IceBlock::new(pos, size);
            block.angle = (rng.random::<f32>() - 0.5) * 4.0;
            block
        })
        .collect()
}

/// Outcome of a relaxation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelaxReport {
    /// Iterations actually run (stops early once nothing moves)
    pub iterations: u32,
    /// Pairs still overlapping when the budget ran out
    pub overlapping_pairs: usize,
}

/// Push overlapping pairs apart along their center line until every pair is
/// at least `(size_a + size_b) / 2 + margin` apart, or the budget runs out.
/// Moved blocks are clamped back inside the surface.
pub fn relax(blocks: &mut [IceBlock], bounds: Vec2, margin: f32, iterations: u32) -> RelaxReport {
    let mut ran = 0;
    for _ in 0..iterations {
        ran += 1;
        let mut moved = false;

        for j in 1..blocks.len() {
            let (left, right) = blocks.split_at_mut(j);
            let b = &mut right[0];
            for a in left.iter_mut() {
                let delta = b.center() - a.center();
                let dist = delta.length();
                let min_dist = (a.size + b.size) / 2.0 + margin;
                if dist >= min_dist {
                    continue;
                }

                // Coincident centers have no separating line; split along x
                let dir = if dist > 0.1 { delta / dist } else { Vec2::X };
                let push = dir * ((min_dist - dist) / 2.0);

                a.pos = clamp_to_surface(a.pos - push, a.size, bounds);
                b.pos = clamp_to_surface(b.pos + push, b.size, bounds);
                moved = true;
            }
        }

        if !moved {
            break;
        }
    }

    RelaxReport {
        iterations: ran,
        overlapping_pairs: count_overlaps(blocks, 1e-3),
    }
}

/// Pairs whose bounding circles intersect by more than `tolerance`
pub fn count_overlaps(blocks: &[IceBlock], tolerance: f32) -> usize {
    let mut count = 0;
    for (i, a) in blocks.iter().enumerate() {
        for b in &blocks[i + 1..] {
            if a.overlaps(b, tolerance) {
                count += 1;
            }
        }
    }
    count
}

/// All ice blocks of a page plus the pointer they react to
#[derive(Debug, Clone)]
pub struct IceField {
    pub blocks: Vec<IceBlock>,
    pub options: IceOptions,
    pub bounds: Vec2,
    pub pointer: Option<Vec2>,
}

impl IceField {
    /// Scatter, relax, and pin each block's resting position
    pub fn new<R: Rng + ?Sized>(options: IceOptions, bounds: Vec2, rng: &mut R) -> Self {
        let mut blocks = scatter(&options, bounds, rng);
        let report = relax(&mut blocks, bounds, options.margin, options.iterations);
        log::info!(
            "ice: {} blocks relaxed in {} iterations ({} overlapping pairs left)",
            blocks.len(),
            report.iterations,
            report.overlapping_pairs
        );

        for block in &mut blocks {
            block.base = block.pos;
        }

        Self {
            blocks,
            options,
            bounds,
            pointer: None,
        }
    }

    pub fn set_pointer(&mut self, pointer: Option<Vec2>) {
        self.pointer = pointer;
    }

    /// Advance by `dt` ms (clamped to two nominal frames)
    pub fn step(&mut self, dt: f32) {
        let dt = clamp_frame_dt(dt);
        let k = dt / NOMINAL_FRAME_MS;
        let opts = &self.options;
        let friction = opts.friction.powf(k);

        for block in &mut self.blocks {
            if let Some(pointer) = self.pointer {
                let away = block.center() - pointer;
                let dist = away.length();
                if dist < opts.influence && dist > 0.001 {
                    let t = 1.0 - dist / opts.influence;
                    let force = opts.push_strength * t * t;
                    block.vel += away / dist * force * k;
                }
            }

            block.vel += (block.base - block.pos) * opts.spring * k;
            block.vel *= friction;

            block.pos += block.vel;
            block.angle += block.vel.x * 0.05 + block.vel.y * 0.03;

            let offset = block.offset();
            let displacement = offset.length();
            if displacement > opts.max_displacement {
                block.pos = block.base + offset * (opts.max_displacement / displacement);
                block.vel *= 0.5;
            }
        }
    }

    /// Viewport changed: clamp resting spots into the new surface and snap
    /// blocks back to rest
    pub fn resize(&mut self, bounds: Vec2) {
        self.bounds = bounds;
        for block in &mut self.blocks {
            block.base = clamp_to_surface(block.base, block.size, bounds);
            block.pos = block.base;
        }
    }
}
