//! Frame driver
//!
//! Turns display-refresh timestamps into clamped frame deltas and runs every
//! scene's update before any scene renders.

use glam::Vec2;

use crate::clamp_frame_dt;
use crate::consts::NOMINAL_FRAME_MS;
use crate::renderer::{IceView, Surface, draw_ice, draw_particles};
use crate::sim::{IceField, SimContext, step};

/// Something advanced and painted once per display refresh
pub trait Animated {
    fn update(&mut self, dt_ms: f32);
    fn render(&mut self);
    /// Viewport changed (CSS pixels)
    fn resize(&mut self, _bounds: Vec2) {}
}

/// Driver lifecycle. There is no stop state: the loop ends with the page.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DriverState {
    #[default]
    Idle,
    Running {
        /// Timestamp of the previous frame (None until the first frame)
        last_timestamp: Option<f64>,
    },
}

#[derive(Debug, Clone, Default)]
pub struct FrameDriver {
    state: DriverState,
    frames: u64,
}

impl FrameDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, DriverState::Running { .. })
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Idle -> Running. Called when the first frame is scheduled.
    pub fn start(&mut self) {
        if self.state == DriverState::Idle {
            self.state = DriverState::Running {
                last_timestamp: None,
            };
        }
    }

    /// Frame delta (ms) for a refresh at `timestamp_ms`
    pub fn tick(&mut self, timestamp_ms: f64) -> f32 {
        self.start();
        let last = match self.state {
            DriverState::Running { last_timestamp } => last_timestamp,
            DriverState::Idle => None,
        };
        self.state = DriverState::Running {
            last_timestamp: Some(timestamp_ms),
        };
        self.frames += 1;

        match last {
            Some(last) => clamp_frame_dt((timestamp_ms - last) as f32),
            None => NOMINAL_FRAME_MS,
        }
    }

    /// Run one frame: all updates, then all renders. Returns the delta used.
    pub fn frame(&mut self, timestamp_ms: f64, scenes: &mut [&mut dyn Animated]) -> f32 {
        let dt = self.tick(timestamp_ms);
        for scene in scenes.iter_mut() {
            scene.update(dt);
        }
        for scene in scenes.iter_mut() {
            scene.render();
        }
        log::trace!("frame {} dt={:.2}ms", self.frames, dt);
        dt
    }
}

/// Particle layer painted onto a surface
pub struct BubbleScene<S: Surface> {
    pub sim: SimContext,
    pub surface: S,
}

impl<S: Surface> BubbleScene<S> {
    pub fn new(sim: SimContext, surface: S) -> Self {
        Self { sim, surface }
    }
}

impl<S: Surface> Animated for BubbleScene<S> {
    fn update(&mut self, dt_ms: f32) {
        step(&mut self.sim, dt_ms);
    }

    fn render(&mut self) {
        draw_particles(&mut self.surface, &self.sim);
    }

    fn resize(&mut self, bounds: Vec2) {
        self.sim.resize(bounds);
    }
}

/// Ice blocks mirrored into a retained view
pub struct IceScene<V: IceView> {
    pub field: IceField,
    pub view: V,
}

impl<V: IceView> IceScene<V> {
    /// Pin every block's resting spot in the view
    pub fn new(field: IceField, mut view: V) -> Self {
        for (index, block) in field.blocks.iter().enumerate() {
            view.rest(index, block);
        }
        Self { field, view }
    }
}

impl<V: IceView> Animated for IceScene<V> {
    fn update(&mut self, dt_ms: f32) {
        self.field.step(dt_ms);
    }

    fn render(&mut self) {
        draw_ice(&mut self.view, &self.field.blocks);
    }

    fn resize(&mut self, bounds: Vec2) {
        self.field.resize(bounds);
        for (index, block) in self.field.blocks.iter().enumerate() {
            self.view.rest(index, block);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::MAX_FRAME_MS;
    use crate::renderer::GlossyCircle;
    use crate::sim::{IceBlock, IceOptions, LifecyclePolicy};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Scene that records the order of calls into a shared log
    struct Probe {
        name: &'static str,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl Animated for Probe {
        fn update(&mut self, dt_ms: f32) {
            self.log
                .borrow_mut()
                .push(format!("{}:update:{}", self.name, dt_ms));
        }

        fn render(&mut self) {
            self.log.borrow_mut().push(format!("{}:render", self.name));
        }
    }

    #[test]
    fn test_idle_to_running() {
        let mut driver = FrameDriver::new();
        assert_eq!(driver.state(), DriverState::Idle);
        driver.start();
        assert_eq!(
            driver.state(),
            DriverState::Running {
                last_timestamp: None
            }
        );
        assert!(driver.is_running());
    }

    #[test]
    fn test_dt_from_timestamps() {
        let mut driver = FrameDriver::new();
        assert_eq!(driver.tick(1000.0), NOMINAL_FRAME_MS);
        assert!((driver.tick(1016.6) - 16.6).abs() < 1e-3);
        // Tab resumed after a long pause
        assert_eq!(driver.tick(9000.0), MAX_FRAME_MS);
        assert_eq!(driver.frames(), 3);
    }

    #[test]
    fn test_updates_run_before_renders() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut a = Probe {
            name: "a",
            log: log.clone(),
        };
        let mut b = Probe {
            name: "b",
            log: log.clone(),
        };

        let mut driver = FrameDriver::new();
        driver.frame(0.0, &mut [&mut a, &mut b]);
        driver.frame(10.0, &mut [&mut a, &mut b]);

        assert_eq!(
            *log.borrow(),
            vec![
                "a:update:16", "b:update:16", "a:render", "b:render", "a:update:10",
                "b:update:10", "a:render", "b:render",
            ]
        );
    }

    #[derive(Default)]
    struct CountingSurface {
        clears: usize,
        circles: usize,
    }

    impl Surface for CountingSurface {
        fn clear(&mut self, _width: f32, _height: f32) {
            self.clears += 1;
        }

        fn fill_glossy_circle(&mut self, _circle: &GlossyCircle) {
            self.circles += 1;
        }
    }

    #[test]
    fn test_bubble_scene_steps_and_draws() {
        let sim = SimContext::new(LifecyclePolicy::bubbles(), Vec2::new(400.0, 300.0), 8);
        let mut scene = BubbleScene::new(sim, CountingSurface::default());
        let mut driver = FrameDriver::new();

        for i in 0..5 {
            driver.frame(i as f64 * 16.0, &mut [&mut scene]);
        }
        assert_eq!(scene.surface.clears, 5);
        // Dormant bubbles fade in from the first frame
        assert!(scene.surface.circles > 0);

        scene.resize(Vec2::new(200.0, 100.0));
        assert_eq!(scene.sim.bounds, Vec2::new(200.0, 100.0));
    }

    #[derive(Default)]
    struct RecordingView {
        rested: Vec<Vec2>,
        placed: usize,
    }

    impl IceView for RecordingView {
        fn rest(&mut self, _index: usize, block: &IceBlock) {
            self.rested.push(block.base);
        }

        fn place(&mut self, _index: usize, _block: &IceBlock) {
            self.placed += 1;
        }
    }

    #[test]
    fn test_ice_scene_rests_and_places() {
        use rand::SeedableRng;
        let mut rng = rand_pcg::Pcg32::seed_from_u64(6);
        let field = IceField::new(
            IceOptions::for_viewport(1920.0),
            Vec2::new(1920.0, 1080.0),
            &mut rng,
        );
        let count = field.blocks.len();
        let mut scene = IceScene::new(field, RecordingView::default());
        assert_eq!(scene.view.rested.len(), count);

        let mut driver = FrameDriver::new();
        driver.frame(0.0, &mut [&mut scene]);
        assert_eq!(scene.view.placed, count);

        scene.resize(Vec2::new(375.0, 667.0));
        assert_eq!(scene.view.rested.len(), count * 2);
        assert!(scene.view.rested[count..].iter().all(|p| p.x >= 0.0 && p.y >= 0.0));
    }
}
