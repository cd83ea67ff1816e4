//! Style vocabulary for document nodes.
//!
//! Mirrors the small CSS subset the renderer understands: solid and
//! linear-gradient paints, flex container properties, fixed/auto/percent
//! sizing, edge insets, and borders. Everything is plain data — the layout
//! and paint interpretation live in `decal-layout` and `decal-render`.

use serde::{Deserialize, Serialize};

// ── Color ───────────────────────────────────────────────────────────

/// RGBA color. Channels are 8-bit; alpha is a [0.0, 1.0] coverage factor.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 1.0 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 1.0 };
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0.0 };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// CSS `rgb(...)` form, alpha excluded (carried separately as opacity).
    pub fn css_rgb(&self) -> String {
        format!("rgb({},{},{})", self.r, self.g, self.b)
    }

    /// Opacity attribute value, or `None` when fully opaque.
    pub fn opacity(&self) -> Option<f32> {
        if self.a < 1.0 {
            Some(self.a)
        } else {
            None
        }
    }
}

// ── Paint ───────────────────────────────────────────────────────────

/// One stop of a linear gradient. `offset` is normalized to [0, 1].
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Color,
}

/// CSS-style linear gradient: 0° points up, 90° points right.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct LinearGradient {
    pub angle_deg: f32,
    pub stops: Vec<GradientStop>,
}

impl LinearGradient {
    /// Left-to-right two-stop gradient (the common case in the samples).
    pub fn horizontal(from: Color, to: Color) -> Self {
        Self {
            angle_deg: 90.0,
            stops: vec![
                GradientStop { offset: 0.0, color: from },
                GradientStop { offset: 1.0, color: to },
            ],
        }
    }
}

/// Fill paint for backgrounds and text.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub enum Paint {
    Solid(Color),
    Linear(LinearGradient),
}

impl Paint {
    pub fn is_gradient(&self) -> bool {
        matches!(self, Paint::Linear(_))
    }
}

// ── Sizing ──────────────────────────────────────────────────────────

/// One sizing dimension. `Percent` is a fraction: `1.0` = 100%.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub enum Length {
    Auto,
    Px(f32),
    Percent(f32),
}

impl Default for Length {
    fn default() -> Self {
        Self::Auto
    }
}

/// Per-edge pixel insets (padding, margin, border widths).
#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct Edges {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Edges {
    pub const ZERO: Edges = Edges { top: 0.0, right: 0.0, bottom: 0.0, left: 0.0 };

    pub const fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self { top, right, bottom, left }
    }

    pub const fn all(value: f32) -> Self {
        Self { top: value, right: value, bottom: value, left: value }
    }

    /// CSS two-value shorthand: vertical then horizontal.
    pub const fn symmetric(vertical: f32, horizontal: f32) -> Self {
        Self { top: vertical, right: horizontal, bottom: vertical, left: horizontal }
    }
}

// ── Flex container properties ───────────────────────────────────────

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum FlexDirection {
    Row,
    Column,
    RowReverse,
    ColumnReverse,
}

impl Default for FlexDirection {
    fn default() -> Self {
        Self::Row
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum AlignItems {
    Stretch,
    FlexStart,
    Center,
    FlexEnd,
}

impl Default for AlignItems {
    fn default() -> Self {
        Self::Stretch
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum JustifyContent {
    FlexStart,
    Center,
    FlexEnd,
    SpaceBetween,
    SpaceAround,
}

impl Default for JustifyContent {
    fn default() -> Self {
        Self::FlexStart
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum FlexWrap {
    NoWrap,
    Wrap,
}

impl Default for FlexWrap {
    fn default() -> Self {
        Self::NoWrap
    }
}

// ── Border ──────────────────────────────────────────────────────────

/// Uniform border: single width and color on all four edges.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct Border {
    pub width: f32,
    pub color: Color,
}

// ── Composite styles ────────────────────────────────────────────────

/// Style of a box (flex container) node.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct BoxStyle {
    pub width: Length,
    pub height: Length,
    pub direction: FlexDirection,
    pub align_items: AlignItems,
    pub justify_content: JustifyContent,
    pub wrap: FlexWrap,
    pub padding: Edges,
    pub margin: Edges,
    pub background: Option<Paint>,
    pub border: Option<Border>,
}

impl Default for BoxStyle {
    fn default() -> Self {
        Self {
            width: Length::Auto,
            height: Length::Auto,
            direction: FlexDirection::Row,
            align_items: AlignItems::Stretch,
            justify_content: JustifyContent::FlexStart,
            wrap: FlexWrap::NoWrap,
            padding: Edges::ZERO,
            margin: Edges::ZERO,
            background: None,
            border: None,
        }
    }
}

/// Style of a text leaf. The paint may be a gradient, in which case the
/// renderer masks the gradient by the glyph outlines.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct TextStyle {
    pub color: Paint,
    /// Font size in pixels.
    pub font_size: f32,
    /// Font weight (100–900). 400 = normal, 700 = bold.
    pub font_weight: u16,
    pub italic: bool,
    /// Extra letter spacing in pixels (can be negative).
    pub letter_spacing: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            color: Paint::Solid(Color::BLACK),
            font_size: 16.0,
            font_weight: 400,
            italic: false,
            letter_spacing: 0.0,
        }
    }
}

// ===================================================================
// Tests
// ===================================================================
