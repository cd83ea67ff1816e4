//! # decal-core — document model for Decal
//!
//! Decal renders declarative UI document trees into SVG textures that a
//! live 3D scene binds onto mesh surfaces. This crate holds the shared
//! vocabulary: geometry primitives, the styled node tree, and the closed
//! registry of built-in sample documents.
//!
//! ## Crate modules
//!
//! - [`style`] — colors, paints (solid / linear gradient), flex properties,
//!   lengths and edge insets
//! - [`node`] — the document tree: box containers, text leaves, shape leaves
//! - [`registry`] — the fixed set of named sample documents

use serde::{Deserialize, Serialize};

pub mod node;
pub mod registry;
pub mod style;

// Re-exports for convenience
pub use node::{BoxNode, DocumentTree, Node, ShapeNode, TextNode, ViewBox};
pub use registry::DocumentRegistry;
pub use style::{
    AlignItems, Border, BoxStyle, Color, Edges, FlexDirection, FlexWrap, GradientStop,
    JustifyContent, Length, LinearGradient, Paint, TextStyle,
};

/// 2D point in canvas pixels.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Axis-aligned rectangle in canvas pixels.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Center point of the rectangle.
    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

/// Fixed output canvas size in pixels.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub struct Extent {
    pub width: u32,
    pub height: u32,
}

impl Extent {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Square canvas, e.g. `Extent::square(1024)`.
    pub fn square(side: u32) -> Self {
        Self { width: side, height: side }
    }
}

impl Default for Extent {
    fn default() -> Self {
        Self::square(1024)
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_center() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        let c = r.center();
        assert!((c.x - 60.0).abs() < f32::EPSILON);
        assert!((c.y - 45.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_rect_contains() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(5.0, 5.0));
        assert!(r.contains(0.0, 0.0));
        assert!(r.contains(10.0, 10.0));
        assert!(!r.contains(10.1, 5.0));
        assert!(!r.contains(-0.1, 5.0));
    }

    #[test]
    fn test_extent_square() {
        let e = Extent::square(1024);
        assert_eq!(e.width, 1024);
        assert_eq!(e.height, 1024);
    }

    #[test]
    fn test_extent_default() {
        assert_eq!(Extent::default(), Extent::square(1024));
    }
}
