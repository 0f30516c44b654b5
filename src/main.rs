//! Bubblefield entry point
//!
//! In the browser this wires the page effects and runs the frame loop.
//! Natively it runs a short headless simulation and logs what happened.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_page {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, MouseEvent, TouchEvent, Window};

    use bubblefield::page::web as page_web;
    use bubblefield::renderer::{CanvasSurface, DomIceView};
    use bubblefield::sim::{IceField, SimContext, clicked, pointer_left, pointer_moved};
    use bubblefield::{Animated, BubbleScene, FrameDriver, IceScene, Settings};

    const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";
    /// Mixed into the seed so ice layout and particles draw different streams
    const ICE_SEED_SALT: u64 = 0x1CE_B10C;

    /// Every animated layer on the page
    struct Page {
        driver: FrameDriver,
        settings: Settings,
        canvas: Option<HtmlCanvasElement>,
        bubbles: Option<BubbleScene<CanvasSurface>>,
        ice: Option<IceScene<DomIceView>>,
    }

    impl Page {
        fn has_layers(&self) -> bool {
            self.bubbles.is_some() || self.ice.is_some()
        }

        /// Viewport coordinates to canvas coordinates
        fn to_canvas(&self, client: Vec2) -> Vec2 {
            match &self.canvas {
                Some(canvas) => {
                    let rect = canvas.get_bounding_client_rect();
                    client - Vec2::new(rect.left() as f32, rect.top() as f32)
                }
                None => client,
            }
        }

        fn pointer_moved(&mut self, client: Vec2, time: f64) {
            let local = self.to_canvas(client);
            if let Some(scene) = self.bubbles.as_mut() {
                pointer_moved(&mut scene.sim, local, time);
            }
            // Ice blocks are position: fixed, so they use viewport coordinates
            if let Some(scene) = self.ice.as_mut() {
                scene.field.set_pointer(Some(client));
            }
        }

        fn pointer_left(&mut self) {
            if let Some(scene) = self.bubbles.as_mut() {
                pointer_left(&mut scene.sim);
            }
            if let Some(scene) = self.ice.as_mut() {
                scene.field.set_pointer(None);
            }
        }

        fn clicked(&mut self, client: Vec2) {
            let local = self.to_canvas(client);
            if let Some(scene) = self.bubbles.as_mut() {
                let woken = clicked(&mut scene.sim, local);
                log::trace!("click at {:?} touched {} particles", local, woken);
            }
        }

        fn resize(&mut self, bounds: Vec2) {
            if let Some(canvas) = &self.canvas {
                size_canvas(canvas, bounds);
            }
            if let Some(scene) = self.bubbles.as_mut() {
                self.settings.refit(&mut scene.sim, bounds);
            }
            if let Some(scene) = self.ice.as_mut() {
                scene.resize(bounds);
            }
        }

        fn frame(&mut self, time: f64) {
            let mut layers: Vec<&mut dyn Animated> = Vec::with_capacity(2);
            if let Some(scene) = self.bubbles.as_mut() {
                layers.push(scene);
            }
            if let Some(scene) = self.ice.as_mut() {
                layers.push(scene);
            }
            self.driver.frame(time, &mut layers);
        }
    }

    fn viewport(window: &Window) -> Option<Vec2> {
        let w = window.inner_width().ok()?.as_f64()?;
        let h = window.inner_height().ok()?.as_f64()?;
        Some(Vec2::new(w as f32, h as f32))
    }

    fn size_canvas(canvas: &HtmlCanvasElement, bounds: Vec2) {
        canvas.set_width(bounds.x.max(0.0) as u32);
        canvas.set_height(bounds.y.max(0.0) as u32);
    }

    fn prefers_reduced_motion(window: &Window) -> bool {
        window
            .match_media(REDUCED_MOTION_QUERY)
            .ok()
            .flatten()
            .map(|query| query.matches())
            .unwrap_or(false)
    }

    fn wire_page_helpers(settings: &Settings, window: &Window, document: &Document) {
        if settings.fade_in {
            page_web::wire_fade_in(document);
        }
        if settings.hero_fade {
            page_web::wire_hero_fade(window, document);
        }
        if settings.slider {
            page_web::wire_slider(document);
        }
        if settings.focus_outlines {
            page_web::wire_focus_outlines(window, document);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Bubblefield starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        let settings = Settings::load();
        wire_page_helpers(&settings, &window, &document);

        if settings.respect_reduced_motion && prefers_reduced_motion(&window) {
            log::info!("Reduced motion requested, animated layers disabled");
            return;
        }

        let Some(bounds) = viewport(&window) else {
            log::warn!("Viewport size unavailable, animated layers disabled");
            return;
        };
        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);

        let canvas = document
            .get_element_by_id(&settings.canvas_id)
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok());
        let bubbles = canvas.as_ref().and_then(|canvas| {
            size_canvas(canvas, bounds);
            let surface = CanvasSurface::from_canvas(canvas)?;
            let sim = SimContext::new(settings.lifecycle_policy(bounds.x), bounds, seed);
            log::info!(
                "{:?} layer: {} particles (cap {})",
                settings.preset,
                sim.store.len(),
                sim.policy.capacity
            );
            Some(BubbleScene::new(sim, surface))
        });
        if bubbles.is_none() {
            log::info!("No #{} canvas, particle layer skipped", settings.canvas_id);
        }

        let ice = if settings.ice {
            let mut rng = Pcg32::seed_from_u64(seed ^ ICE_SEED_SALT);
            let field = IceField::new(settings.ice_options(bounds.x), bounds, &mut rng);
            DomIceView::build(&document, field.blocks.len()).map(|view| IceScene::new(field, view))
        } else {
            None
        };

        let page = Rc::new(RefCell::new(Page {
            driver: FrameDriver::new(),
            settings,
            canvas,
            bubbles,
            ice,
        }));
        if !page.borrow().has_layers() {
            log::info!("Nothing to animate");
            return;
        }

        setup_input_handlers(&window, &document, page.clone());
        setup_resize_handler(&window, page.clone());

        page.borrow_mut().driver.start();
        request_animation_frame(page);

        log::info!("Bubblefield running with seed: {}", seed);
    }

    fn setup_input_handlers(window: &Window, document: &Document, page: Rc<RefCell<Page>>) {
        // Mouse move
        {
            let page = page.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let client = Vec2::new(event.client_x() as f32, event.client_y() as f32);
                page.borrow_mut().pointer_moved(client, js_sys::Date::now());
            });
            let _ = window
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move - first touch only
        {
            let page = page.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if let Some(touch) = event.touches().get(0) {
                    let client = Vec2::new(touch.client_x() as f32, touch.client_y() as f32);
                    page.borrow_mut().pointer_moved(client, js_sys::Date::now());
                }
            });
            let _ = window
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Click
        {
            let page = page.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let client = Vec2::new(event.client_x() as f32, event.client_y() as f32);
                page.borrow_mut().clicked(client);
            });
            let _ =
                window.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer left the page
        if let Some(root) = document.document_element() {
            let page = page.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                page.borrow_mut().pointer_left();
            });
            let _ = root
                .add_event_listener_with_callback("mouseleave", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch lifted
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                page.borrow_mut().pointer_left();
            });
            let _ = window
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize_handler(window: &Window, page: Rc<RefCell<Page>>) {
        let win = window.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if let Some(bounds) = viewport(&win) {
                page.borrow_mut().resize(bounds);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(page: Rc<RefCell<Page>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            page_loop(page, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn page_loop(page: Rc<RefCell<Page>>, time: f64) {
        page.borrow_mut().frame(time);
        request_animation_frame(page);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_page::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use bubblefield::consts::NOMINAL_FRAME_MS;
    use bubblefield::sim::{IceField, SimContext, pointer_left, pointer_moved, step};
    use bubblefield::{Settings, clamp_frame_dt};
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("Bubblefield - headless run");
    println!("Run the web version with: trunk serve");

    let settings = Settings::load();
    let bounds = Vec2::new(1280.0, 720.0);
    let seed = settings.seed.unwrap_or(42);
    let mut sim = SimContext::new(settings.lifecycle_policy(bounds.x), bounds, seed);
    let mut ice = IceField::new(
        settings.ice_options(bounds.x),
        bounds,
        &mut Pcg32::seed_from_u64(seed),
    );

    // Sweep the pointer across the middle for two seconds, then let go
    let frames = 600;
    let dt = clamp_frame_dt(NOMINAL_FRAME_MS);
    for frame in 0..frames {
        let now = frame as f64 * dt as f64;
        if frame < 120 {
            let pointer = Vec2::new(bounds.x * frame as f32 / 120.0, bounds.y * 0.5);
            pointer_moved(&mut sim, pointer, now);
            ice.set_pointer(Some(pointer));
        } else if frame == 120 {
            pointer_left(&mut sim);
            ice.set_pointer(None);
        }

        step(&mut sim, dt);
        ice.step(dt);

        if frame % 120 == 0 {
            let active = sim.store.iter().filter(|p| p.is_active()).count();
            log::info!(
                "t={:>5.0}ms particles={} active={} dormant={}",
                sim.elapsed,
                sim.store.len(),
                active,
                sim.store.iter().filter(|p| p.is_dormant()).count()
            );
        }
    }

    let max_offset = ice
        .blocks
        .iter()
        .map(|b| b.offset().length())
        .fold(0.0_f32, f32::max);
    println!(
        "Simulated {:.1}s: {} particles alive, largest ice displacement {:.1}px",
        sim.elapsed / 1000.0,
        sim.store.len(),
        max_offset
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Entry point is wasm_main
}
