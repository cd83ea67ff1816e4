//! SVG assembly: document builder, number formatting, paint serialization.

use std::fmt::Write as _;

use decal_core::style::{Color, LinearGradient};
use decal_core::Extent;

/// Format a coordinate/scale value: up to four decimals, trailing zeros
/// trimmed. Keeps output compact and deterministic.
pub(crate) fn fmt(value: f32) -> String {
    let s = format!("{value:.4}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() || s == "-0" || s == "-" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// `fill="..."` plus `fill-opacity` when the color is translucent.
pub(crate) fn fill_attrs(color: &Color) -> String {
    match color.opacity() {
        Some(a) => format!(" fill=\"{}\" fill-opacity=\"{}\"", color.css_rgb(), fmt(a)),
        None => format!(" fill=\"{}\"", color.css_rgb()),
    }
}

/// `stroke="..."` attributes for a border of the given width.
pub(crate) fn stroke_attrs(color: &Color, width: f32) -> String {
    let mut attrs = format!(
        " stroke=\"{}\" stroke-width=\"{}\"",
        color.css_rgb(),
        fmt(width),
    );
    if let Some(a) = color.opacity() {
        let _ = write!(attrs, " stroke-opacity=\"{}\"", fmt(a));
    }
    attrs
}

/// Accumulates defs and body elements, hands out deterministic def ids,
/// and assembles the final document.
pub(crate) struct SvgBuilder {
    extent: Extent,
    defs: String,
    body: String,
    next_id: u32,
}

impl SvgBuilder {
    pub fn new(extent: Extent) -> Self {
        Self {
            extent,
            defs: String::new(),
            body: String::new(),
            next_id: 0,
        }
    }

    /// Next def id for the given prefix ("g0", "m1", ...). Counter-based so
    /// repeated renders of the same document emit identical ids.
    pub fn alloc_id(&mut self, prefix: &str) -> String {
        let id = format!("{prefix}{}", self.next_id);
        self.next_id += 1;
        id
    }

    pub fn push_def(&mut self, def: &str) {
        self.defs.push_str(def);
    }

    pub fn push(&mut self, element: &str) {
        self.body.push_str(element);
    }

    /// Register a linear gradient def and return its id.
    pub fn linear_gradient(&mut self, gradient: &LinearGradient) -> String {
        let id = self.alloc_id("g");

        // CSS angles: 0° points up, 90° points right. Endpoints are placed
        // symmetrically around the box center in objectBoundingBox units.
        let radians = gradient.angle_deg.to_radians();
        let dx = radians.sin();
        let dy = -radians.cos();
        let (x1, y1) = (0.5 - dx / 2.0, 0.5 - dy / 2.0);
        let (x2, y2) = (0.5 + dx / 2.0, 0.5 + dy / 2.0);

        let mut def = format!(
            "<linearGradient id=\"{id}\" x1=\"{:.4}\" y1=\"{:.4}\" x2=\"{:.4}\" y2=\"{:.4}\">",
            x1, y1, x2, y2,
        );
        for stop in &gradient.stops {
            let _ = write!(
                def,
                "<stop offset=\"{}\" stop-color=\"{}\"",
                fmt(stop.offset),
                stop.color.css_rgb(),
            );
            if let Some(a) = stop.color.opacity() {
                let _ = write!(def, " stop-opacity=\"{}\"", fmt(a));
            }
            def.push_str("/>");
        }
        def.push_str("</linearGradient>");

        self.push_def(&def);
        id
    }

    pub fn finish(self) -> String {
        let Extent { width, height } = self.extent;
        let defs = if self.defs.is_empty() {
            String::new()
        } else {
            format!("<defs>{}</defs>", self.defs)
        };
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" \
             viewBox=\"0 0 {width} {height}\">{defs}{}</svg>",
            self.body,
        )
    }
}

// ===================================================================
// Tests
// ===================================================================
