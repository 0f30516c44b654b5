//! Ice blocks as fixed-position `div.ice` elements

use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

use super::{IceView, ice_transform};
use crate::sim::IceBlock;

const ICE_CLASS: &str = "ice";

pub struct DomIceView {
    elements: Vec<HtmlElement>,
}

impl DomIceView {
    /// Append `count` blocks to `<body>`. None without a body.
    pub fn build(document: &Document, count: usize) -> Option<Self> {
        let body = document.body()?;
        let mut elements = Vec::with_capacity(count);
        for _ in 0..count {
            let el = document
                .create_element("div")
                .ok()?
                .dyn_into::<HtmlElement>()
                .ok()?;
            let _ = el.class_list().add_1(ICE_CLASS);
            let style = el.style();
            let _ = style.set_property("position", "fixed");
            let _ = style.set_property("will-change", "transform");
            let _ = style.set_property("transform-origin", "center center");
            let _ = body.append_child(&el);
            elements.push(el);
        }
        Some(Self { elements })
    }
}

impl IceView for DomIceView {
    fn rest(&mut self, index: usize, block: &IceBlock) {
        let Some(el) = self.elements.get(index) else {
            return;
        };
        let style = el.style();
        let size = format!("{}px", block.size.round());
        let _ = style.set_property("width", &size);
        let _ = style.set_property("height", &size);
        let _ = style.set_property("left", &format!("{}px", block.base.x.round()));
        let _ = style.set_property("top", &format!("{}px", block.base.y.round()));
    }

    fn place(&mut self, index: usize, block: &IceBlock) {
        if let Some(el) = self.elements.get(index) {
            let _ = el.style().set_property("transform", &ice_transform(block));
        }
    }
}
