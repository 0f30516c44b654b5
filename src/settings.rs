//! Page settings and presets
//!
//! Read from the `data-fx` attribute on `<body>` as JSON. Every field is
//! optional; a missing or malformed attribute means defaults.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::MOBILE_MAX_WIDTH;
use crate::sim::{IceOptions, LifecyclePolicy, SimContext};

/// How many particles a layer keeps alive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Density {
    #[default]
    Sparse,
    Normal,
    Dense,
    Foam,
}

impl Density {
    pub fn as_str(&self) -> &'static str {
        match self {
            Density::Sparse => "Sparse",
            Density::Normal => "Normal",
            Density::Dense => "Dense",
            Density::Foam => "Foam",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sparse" | "low" => Some(Density::Sparse),
            "normal" | "medium" => Some(Density::Normal),
            "dense" | "high" => Some(Density::Dense),
            "foam" => Some(Density::Foam),
            _ => None,
        }
    }

    /// Particle cap for this density
    pub fn particle_count(&self) -> usize {
        match self {
            Density::Sparse => 40,
            Density::Normal => 80,
            Density::Dense => 180,
            Density::Foam => 600,
        }
    }
}

/// Which particle behavior the canvas layer runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EffectPreset {
    /// Touch-to-float bubbles that split once
    #[default]
    Bubbles,
    /// Self-waking background dust
    Ambient,
    /// Pointer trail and click bursts
    Sparkle,
    /// Bubbles rising from the bottom edge on a timer
    Stream,
}

impl EffectPreset {
    pub fn policy(&self) -> LifecyclePolicy {
        match self {
            EffectPreset::Bubbles => LifecyclePolicy::bubbles(),
            EffectPreset::Ambient => LifecyclePolicy::ambient(),
            EffectPreset::Sparkle => LifecyclePolicy::sparkle(),
            EffectPreset::Stream => LifecyclePolicy::stream(),
        }
    }
}

/// Per-page configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Canvas element id for the particle layer
    pub canvas_id: String,
    pub preset: EffectPreset,
    /// Overrides the preset's particle cap
    pub density: Option<Density>,
    /// Full policy override (wins over preset and density)
    pub policy: Option<LifecyclePolicy>,

    // === Ice ===
    pub ice: bool,
    /// Overrides the viewport-derived ice options
    pub ice_options: Option<IceOptions>,

    // === Page helpers ===
    /// Scroll-triggered `.visible` class on `.fade-scroll, .fade-left`
    pub fade_in: bool,
    /// Hero image fades out while scrolling
    pub hero_fade: bool,
    pub slider: bool,
    /// Focus outlines after the first Tab key
    pub focus_outlines: bool,

    /// Fixed seed for reproducible layouts (clock-seeded when None)
    pub seed: Option<u64>,
    /// Skip animated layers when the user prefers reduced motion
    pub respect_reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            canvas_id: "bubbles".to_string(),
            preset: EffectPreset::Bubbles,
            density: None,
            policy: None,

            ice: true,
            ice_options: None,

            fade_in: true,
            hero_fade: true,
            slider: true,
            focus_outlines: true,

            seed: None,
            respect_reduced_motion: true,
        }
    }
}

impl Settings {
    /// Body attribute holding the JSON overrides
    pub const DATA_ATTRIBUTE: &'static str = "data-fx";

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parse overrides, falling back to defaults on a missing or bad value
    pub fn parse_or_default(json: Option<&str>) -> Self {
        let Some(json) = json.map(str::trim).filter(|s| !s.is_empty()) else {
            return Self::default();
        };
        match Self::from_json(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("ignoring malformed {}: {}", Self::DATA_ATTRIBUTE, e);
                Self::default()
            }
        }
    }

    /// Particle policy for a viewport `width` CSS pixels wide.
    /// Narrow viewports keep half the particles.
    pub fn lifecycle_policy(&self, width: f32) -> LifecyclePolicy {
        if let Some(policy) = &self.policy {
            return policy.clone();
        }

        let mut policy = self.preset.policy();
        if let Some(density) = self.density {
            let count = density.particle_count();
            policy.capacity = count;
            if policy.initial_count > 0 {
                policy.initial_count = count;
            }
        }
        if width <= MOBILE_MAX_WIDTH {
            policy.capacity = (policy.capacity / 2).max(1);
            policy.initial_count = policy.initial_count.min(policy.capacity);
        }
        policy
    }

    /// Follow a viewport resize: new bounds, and the particle cap re-derived
    /// for the new width (crossing the narrow breakpoint halves or restores it)
    pub fn refit(&self, sim: &mut SimContext, bounds: Vec2) {
        let policy = self.lifecycle_policy(bounds.x);
        sim.resize(bounds);
        if policy.capacity != sim.policy.capacity {
            log::debug!(
                "particle cap {} -> {}",
                sim.policy.capacity,
                policy.capacity
            );
            sim.retarget(policy.capacity, policy.initial_count);
        }
    }

    pub fn ice_options(&self, width: f32) -> IceOptions {
        self.ice_options
            .clone()
            .unwrap_or_else(|| IceOptions::for_viewport(width))
    }

    /// Load from the document body (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let attribute = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.body())
            .and_then(|body| body.get_attribute(Self::DATA_ATTRIBUTE));

        match attribute {
            Some(json) => {
                log::info!("Loaded settings from {}", Self::DATA_ATTRIBUTE);
                Self::parse_or_default(Some(&json))
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{PointerMode, Span};

    #[test]
    fn test_density_counts() {
        assert_eq!(Density::Sparse.particle_count(), 40);
        assert_eq!(Density::Normal.particle_count(), 80);
        assert_eq!(Density::Dense.particle_count(), 180);
        assert_eq!(Density::Foam.particle_count(), 600);
        assert_eq!(Density::from_name("FOAM"), Some(Density::Foam));
        assert_eq!(Density::from_name("medium"), Some(Density::Normal));
        assert_eq!(Density::from_name("fizzy"), None);
        assert_eq!(Density::Dense.as_str(), "Dense");
    }

    #[test]
    fn test_defaults_from_missing_attribute() {
        assert_eq!(Settings::parse_or_default(None), Settings::default());
        assert_eq!(Settings::parse_or_default(Some("   ")), Settings::default());
    }

    #[test]
    fn test_malformed_json_falls_back() {
        assert_eq!(
            Settings::parse_or_default(Some("{ not json")),
            Settings::default()
        );
    }

    #[test]
    fn test_partial_json() {
        let settings =
            Settings::from_json(r#"{ "preset": "sparkle", "density": "dense", "ice": false, "seed": 7 }"#)
                .unwrap();
        assert_eq!(settings.preset, EffectPreset::Sparkle);
        assert_eq!(settings.density, Some(Density::Dense));
        assert!(!settings.ice);
        assert_eq!(settings.seed, Some(7));
        assert!(settings.fade_in);
        assert_eq!(settings.canvas_id, "bubbles");
    }

    #[test]
    fn test_density_applies_to_policy() {
        let settings = Settings {
            density: Some(Density::Foam),
            ..Settings::default()
        };
        let policy = settings.lifecycle_policy(1920.0);
        assert_eq!(policy.capacity, 600);
        assert_eq!(policy.initial_count, 600);

        // Pointer-spawned presets start empty regardless of density
        let settings = Settings {
            preset: EffectPreset::Sparkle,
            density: Some(Density::Normal),
            ..Settings::default()
        };
        let policy = settings.lifecycle_policy(1920.0);
        assert_eq!(policy.capacity, 80);
        assert_eq!(policy.initial_count, 0);
        assert!(matches!(policy.pointer, PointerMode::Spawn { .. }));
    }

    #[test]
    fn test_narrow_viewport_halves_particles() {
        let settings = Settings::default();
        let wide = settings.lifecycle_policy(1280.0);
        let narrow = settings.lifecycle_policy(375.0);
        assert_eq!(wide.capacity, 40);
        assert_eq!(narrow.capacity, 20);
        assert_eq!(narrow.initial_count, 20);
    }

    #[test]
    fn test_resize_rederives_capacity() {
        let settings = Settings::default();
        let wide = Vec2::new(1920.0, 1080.0);
        let mut sim = SimContext::new(settings.lifecycle_policy(wide.x), wide, 12);
        assert_eq!(sim.store.len(), 40);

        settings.refit(&mut sim, Vec2::new(375.0, 667.0));
        assert_eq!(sim.bounds, Vec2::new(375.0, 667.0));
        assert_eq!(sim.policy.capacity, 20);
        assert_eq!(sim.store.len(), 20);

        settings.refit(&mut sim, wide);
        assert_eq!(sim.policy.capacity, 40);
        assert_eq!(sim.store.len(), 40);
    }

    #[test]
    fn test_policy_override_wins() {
        let mut custom = LifecyclePolicy::stream();
        custom.capacity = 3;
        let settings = Settings {
            policy: Some(custom.clone()),
            density: Some(Density::Foam),
            ..Settings::default()
        };
        assert_eq!(settings.lifecycle_policy(375.0), custom);
    }

    #[test]
    fn test_ice_options_follow_viewport() {
        let settings = Settings::default();
        assert_eq!(settings.ice_options(600.0).size, Span::new(150.0, 250.0));
        assert_eq!(settings.ice_options(1600.0).size, Span::new(350.0, 580.0));
    }
}
