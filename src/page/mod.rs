//! Page helpers that are not part of the particle or ice simulations
//!
//! - scroll-triggered fade-in of marked sections
//! - hero image fading out while scrolling
//! - slider carousel
//! - focus outlines once the keyboard is in use

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Elements revealed on first intersection
pub const FADE_SELECTORS: &str = ".fade-scroll, .fade-left";
/// Visible fraction that counts as "in view"
pub const FADE_THRESHOLD: f64 = 0.12;
/// Class added once an element has been seen
pub const VISIBLE_CLASS: &str = "visible";
/// Class added to the root element after the first Tab
pub const FOCUS_CLASS: &str = "show-focus";
/// Hero image is gone after scrolling this fraction of the viewport height
pub const HERO_FADE_FRACTION: f64 = 0.6;

/// Hero opacity for a scroll offset: 1 at the top, 0 after
/// `HERO_FADE_FRACTION` of the viewport height
pub fn hero_opacity(scroll_y: f64, viewport_height: f64) -> f64 {
    let fade_end = viewport_height * HERO_FADE_FRACTION;
    if fade_end <= 0.0 {
        return if scroll_y > 0.0 { 0.0 } else { 1.0 };
    }
    (1.0 - scroll_y / fade_end).clamp(0.0, 1.0)
}

/// Whether a keydown should switch the page into keyboard-focus mode
pub fn is_focus_key(key: &str) -> bool {
    key == "Tab"
}

/// Carousel position over `len` slides
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slider {
    index: usize,
    len: usize,
}

impl Slider {
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Advance, wrapping to the first slide
    pub fn next(&mut self) -> usize {
        if self.len > 0 {
            self.index = (self.index + 1) % self.len;
        }
        self.index
    }

    /// Go back, wrapping to the last slide
    pub fn prev(&mut self) -> usize {
        if self.len > 0 {
            self.index = (self.index + self.len - 1) % self.len;
        }
        self.index
    }

    /// Jump to a dot; out-of-range targets are ignored
    pub fn go_to(&mut self, index: usize) -> usize {
        if index < self.len {
            self.index = index;
        }
        self.index
    }

    /// CSS transform for the slider track
    pub fn track_transform(&self) -> String {
        format!("translateX(-{}%)", self.index * 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hero_opacity() {
        assert_eq!(hero_opacity(0.0, 1000.0), 1.0);
        assert!((hero_opacity(300.0, 1000.0) - 0.5).abs() < 1e-9);
        assert_eq!(hero_opacity(600.0, 1000.0), 0.0);
        assert_eq!(hero_opacity(5000.0, 1000.0), 0.0);
        // Overscroll bounce on mobile
        assert_eq!(hero_opacity(-40.0, 1000.0), 1.0);
        assert_eq!(hero_opacity(10.0, 0.0), 0.0);
    }

    #[test]
    fn test_focus_key() {
        assert!(is_focus_key("Tab"));
        assert!(!is_focus_key("Enter"));
        assert!(!is_focus_key("tab"));
    }

    #[test]
    fn test_slider_wraps() {
        let mut slider = Slider::new(3);
        assert_eq!(slider.track_transform(), "translateX(-0%)");
        assert_eq!(slider.next(), 1);
        assert_eq!(slider.next(), 2);
        assert_eq!(slider.next(), 0);
        assert_eq!(slider.prev(), 2);
        assert_eq!(slider.track_transform(), "translateX(-200%)");
    }

    #[test]
    fn test_slider_go_to() {
        let mut slider = Slider::new(4);
        assert_eq!(slider.go_to(3), 3);
        assert_eq!(slider.go_to(9), 3);
    }

    #[test]
    fn test_empty_slider_is_inert() {
        let mut slider = Slider::new(0);
        assert!(slider.is_empty());
        assert_eq!(slider.next(), 0);
        assert_eq!(slider.prev(), 0);
        assert_eq!(slider.go_to(0), 0);
    }
}
