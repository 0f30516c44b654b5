//! DOM wiring for the page helpers

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, KeyboardEvent, Window,
};

use super::{
    FADE_SELECTORS, FADE_THRESHOLD, FOCUS_CLASS, Slider, VISIBLE_CLASS, hero_opacity,
    is_focus_key,
};

const HERO_SELECTOR: &str = ".hero-name-image";
const SLIDER_TRACK: &str = ".slider-track";
const SLIDER_DOTS: &str = ".slider-dots .dot";
const SLIDER_NEXT: &str = ".slider-btn.next";
const SLIDER_PREV: &str = ".slider-btn.prev";
const ACTIVE_CLASS: &str = "active";

fn query_all(document: &Document, selectors: &str) -> Vec<Element> {
    let Ok(nodes) = document.query_selector_all(selectors) else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn query_html(document: &Document, selectors: &str) -> Option<HtmlElement> {
    document
        .query_selector(selectors)
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
}

/// Add `visible` to marked sections the first time they scroll into view.
/// Each element is unobserved once revealed.
pub fn wire_fade_in(document: &Document) {
    let targets = query_all(document, FADE_SELECTORS);
    if targets.is_empty() {
        return;
    }

    let closure = Closure::<dyn FnMut(_, _)>::new(
        move |entries: js_sys::Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                if entry.is_intersecting() {
                    let target = entry.target();
                    let _ = target.class_list().add_1(VISIBLE_CLASS);
                    observer.unobserve(&target);
                }
            }
        },
    );

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(FADE_THRESHOLD));
    let observer =
        match IntersectionObserver::new_with_options(closure.as_ref().unchecked_ref(), &options) {
            Ok(observer) => observer,
            Err(e) => {
                log::warn!("IntersectionObserver unavailable: {:?}", e);
                return;
            }
        };
    closure.forget();

    for target in &targets {
        observer.observe(target);
    }
    log::debug!("Watching {} fade-in sections", targets.len());
}

/// Show focus outlines once the keyboard is used for navigation
pub fn wire_focus_outlines(window: &Window, document: &Document) {
    let Some(root) = document.document_element() else {
        return;
    };

    let armed = Cell::new(true);
    let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
        if armed.get() && is_focus_key(&event.key()) {
            armed.set(false);
            let _ = root.class_list().add_1(FOCUS_CLASS);
        }
    });
    let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Fade the hero image out as the page scrolls
pub fn wire_hero_fade(window: &Window, document: &Document) {
    let Some(hero) = query_html(document, HERO_SELECTOR) else {
        return;
    };

    let win = window.clone();
    let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
        let scroll_y = win.scroll_y().unwrap_or(0.0);
        let height = win
            .inner_height()
            .ok()
            .and_then(|h| h.as_f64())
            .unwrap_or(0.0);
        let opacity = hero_opacity(scroll_y, height);
        let _ = hero.style().set_property("opacity", &opacity.to_string());
    });
    let _ = window.add_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Track and dots of the carousel
struct SliderView {
    track: HtmlElement,
    dots: Vec<Element>,
}

impl SliderView {
    fn show(&self, slider: &Slider) {
        let _ = self
            .track
            .style()
            .set_property("transform", &slider.track_transform());
        for (i, dot) in self.dots.iter().enumerate() {
            let _ = dot
                .class_list()
                .toggle_with_force(ACTIVE_CLASS, i == slider.index());
        }
    }
}

fn on_click<F>(target: &Element, mut handler: F)
where
    F: FnMut() + 'static,
{
    let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| handler());
    let _ = target.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Next/prev buttons and dots for the slider
pub fn wire_slider(document: &Document) {
    let Some(track) = query_html(document, SLIDER_TRACK) else {
        return;
    };
    let slider = Slider::new(track.child_element_count() as usize);
    if slider.is_empty() {
        return;
    }

    let view = Rc::new(SliderView {
        track,
        dots: query_all(document, SLIDER_DOTS),
    });
    let slider = Rc::new(RefCell::new(slider));
    view.show(&slider.borrow());

    if let Ok(Some(next)) = document.query_selector(SLIDER_NEXT) {
        let (view, slider) = (view.clone(), slider.clone());
        on_click(&next, move || {
            let mut s = slider.borrow_mut();
            s.next();
            view.show(&s);
        });
    }

    if let Ok(Some(prev)) = document.query_selector(SLIDER_PREV) {
        let (view, slider) = (view.clone(), slider.clone());
        on_click(&prev, move || {
            let mut s = slider.borrow_mut();
            s.prev();
            view.show(&s);
        });
    }

    for (i, dot) in view.dots.iter().enumerate() {
        let (view, slider) = (view.clone(), slider.clone());
        on_click(dot, move || {
            let mut s = slider.borrow_mut();
            s.go_to(i);
            view.show(&s);
        });
    }

    log::debug!("Slider wired with {} slides", slider.borrow().len());
}
