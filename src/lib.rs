//! Bubblefield - decorative page effects
//!
//! Core modules:
//! - `sim`: Deterministic particle and ice-block simulation (seeded RNG, no platform deps)
//! - `driver`: Frame driver state machine and animated scenes
//! - `renderer`: Drawing surface abstraction (Canvas 2D and DOM styling on web)
//! - `settings`: Per-page presets and JSON overrides
//! - `page`: Scroll fades, slider and accessibility helpers

pub mod driver;
pub mod page;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use driver::{Animated, BubbleScene, DriverState, FrameDriver, IceScene};
pub use settings::{Density, EffectPreset, Settings};

use glam::Vec2;

/// Shared tuning constants
pub mod consts {
    /// Nominal frame duration in milliseconds (used for the very first tick)
    pub const NOMINAL_FRAME_MS: f32 = 16.0;
    /// Largest frame delta fed to the simulation (tab-resume guard)
    pub const MAX_FRAME_MS: f32 = 32.0;
    /// Velocity units are pixels per (ms * VELOCITY_SCALE)
    pub const VELOCITY_SCALE: f32 = 0.08;

    /// Viewport breakpoints (CSS pixels)
    pub const MOBILE_MAX_WIDTH: f32 = 768.0;
    pub const TABLET_MAX_WIDTH: f32 = 1200.0;
}

/// Clamp a raw frame delta (ms) into the range the simulation accepts
#[inline]
pub fn clamp_frame_dt(dt_ms: f32) -> f32 {
    if dt_ms.is_nan() {
        return 0.0;
    }
    dt_ms.clamp(0.0, consts::MAX_FRAME_MS)
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// True when `point` lies inside `[-margin, size + margin]` on both axes
#[inline]
pub fn inside_bounds(point: Vec2, size: Vec2, margin: f32) -> bool {
    point.x >= -margin
        && point.y >= -margin
        && point.x <= size.x + margin
        && point.y <= size.y + margin
}
