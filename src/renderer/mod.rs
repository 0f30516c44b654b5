//! Rendering
//!
//! The simulation only talks to these traits. On the web, `canvas` paints
//! particles into a 2D context and `dom` moves ice-block elements.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
#[cfg(target_arch = "wasm32")]
pub mod dom;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
#[cfg(target_arch = "wasm32")]
pub use dom::DomIceView;

use glam::Vec2;

use crate::sim::{IceBlock, Particle, SimContext};

/// Immediate-mode drawing surface
pub trait Surface {
    /// Erase the previous frame
    fn clear(&mut self, width: f32, height: f32);
    /// Fill a circle with a radial gradient
    fn fill_glossy_circle(&mut self, circle: &GlossyCircle);
}

/// One radial-gradient color stop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    pub rgb: [u8; 3],
    pub alpha: f32,
}

impl ColorStop {
    pub fn css(&self) -> String {
        let [r, g, b] = self.rgb;
        format!("rgba({},{},{},{:.3})", r, g, b, self.alpha.clamp(0.0, 1.0))
    }
}

/// Bright core offset toward the top-left, translucent rim
#[derive(Debug, Clone, PartialEq)]
pub struct GlossyCircle {
    pub center: Vec2,
    pub radius: f32,
    /// Inner gradient circle (the highlight)
    pub highlight: Vec2,
    pub highlight_radius: f32,
    pub stops: [ColorStop; 3],
}

impl GlossyCircle {
    pub fn for_particle(particle: &Particle) -> Self {
        let r = particle.radius;
        let alpha = particle.opacity.clamp(0.0, 1.0);
        Self {
            center: particle.pos,
            radius: r,
            highlight: particle.pos - Vec2::splat(r * 0.3),
            highlight_radius: r * 0.1,
            stops: [
                ColorStop {
                    offset: 0.0,
                    rgb: [255, 255, 255],
                    alpha: 0.9 * alpha,
                },
                ColorStop {
                    offset: 0.6,
                    rgb: [235, 245, 250],
                    alpha: 0.4 * alpha,
                },
                ColorStop {
                    offset: 1.0,
                    rgb: [200, 220, 230],
                    alpha: 0.08 * alpha,
                },
            ],
        }
    }
}

/// Clear and repaint every visible particle. Returns the number drawn.
pub fn draw_particles<S: Surface + ?Sized>(surface: &mut S, sim: &SimContext) -> usize {
    surface.clear(sim.bounds.x, sim.bounds.y);

    let mut drawn = 0;
    for particle in sim.store.iter().filter(|p| p.is_visible()) {
        surface.fill_glossy_circle(&GlossyCircle::for_particle(particle));
        drawn += 1;
    }
    drawn
}

/// Retained-mode view of ice blocks (one element per block)
pub trait IceView {
    /// Move a block's resting spot (layout and resize)
    fn rest(&mut self, index: usize, block: &IceBlock);
    /// Apply the per-frame displacement and rotation
    fn place(&mut self, index: usize, block: &IceBlock);
}

/// CSS transform for a block's displacement from rest
pub fn ice_transform(block: &IceBlock) -> String {
    let offset = block.offset();
    format!(
        "translate({}px, {}px) rotate({:.2}deg)",
        offset.x.round() as i32,
        offset.y.round() as i32,
        block.angle
    )
}

pub fn draw_ice<V: IceView + ?Sized>(view: &mut V, blocks: &[IceBlock]) {
    for (index, block) in blocks.iter().enumerate() {
        view.place(index, block);
    }
}
