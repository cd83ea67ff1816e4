//! Text engine — horizontal shaping and glyph outline extraction.
//!
//! Shaping is deliberately simple: single-line, left-to-right, advance
//! widths plus legacy `kern` pair adjustments and optional letter spacing.
//! Outlines are extracted once per glyph in font units (y-up) and cached;
//! consumers place them with a per-glyph translate + flip-scale transform.

use std::fmt::Write as _;
use std::sync::Arc;

use ttf_parser::{Face, GlyphId};

use crate::cache::{CachedPath, PathCache};
use crate::fonts::{FontError, FontResource};

/// Vertical metrics of a text line at a given font size, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineMetrics {
    /// Baseline distance from the top of the line box.
    pub ascent: f32,
    /// Depth below the baseline (positive).
    pub descent: f32,
    /// Full line height (ascent + descent + line gap).
    pub line_height: f32,
}

/// One positioned glyph: id plus pen offset from the line origin, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapedGlyph {
    pub id: u16,
    pub x: f32,
}

/// A shaped single-line run.
#[derive(Clone, Debug)]
pub struct ShapedLine {
    pub glyphs: Vec<ShapedGlyph>,
    /// Total advance width including letter spacing.
    pub width: f32,
    pub metrics: LineMetrics,
}

/// Shaping and outline engine over the single loaded font.
pub struct TextEngine {
    cache: PathCache,
}

impl TextEngine {
    pub fn new() -> Self {
        Self { cache: PathCache::default() }
    }

    pub fn with_cache_capacity(capacity: usize) -> Self {
        Self { cache: PathCache::new(capacity) }
    }

    /// Vertical line metrics for the resource at `font_size`.
    pub fn line_metrics(
        &self,
        resource: &FontResource,
        font_size: f32,
    ) -> Result<LineMetrics, FontError> {
        let face = resource.face()?;
        Ok(line_metrics(&face, font_size))
    }

    /// Shape a single-line run: map chars to glyphs, advance the pen by
    /// horizontal advances, kern pairs, and letter spacing.
    ///
    /// Characters without a glyph in the face are skipped (logged at debug
    /// level); whitespace glyphs keep their advance but carry no outline.
    pub fn shape_line(
        &self,
        resource: &FontResource,
        text: &str,
        font_size: f32,
        letter_spacing: f32,
    ) -> Result<ShapedLine, FontError> {
        let face = resource.face()?;
        let scale = font_size / face.units_per_em() as f32;

        let mut glyphs = Vec::with_capacity(text.len());
        let mut pen = 0.0f32;
        let mut prev: Option<GlyphId> = None;

        for ch in text.chars() {
            let Some(glyph) = face.glyph_index(ch) else {
                log::debug!("No glyph for {ch:?} in '{}'", resource.family());
                continue;
            };

            if let Some(prev) = prev {
                pen += kerning(&face, prev, glyph) * scale;
            }

            glyphs.push(ShapedGlyph { id: glyph.0, x: pen });

            let advance = face.glyph_hor_advance(glyph).unwrap_or(0) as f32 * scale;
            pen += advance + letter_spacing;
            prev = Some(glyph);
        }

        Ok(ShapedLine {
            glyphs,
            width: pen.max(0.0),
            metrics: line_metrics(&face, font_size),
        })
    }

    /// Extract (or fetch from cache) the outline of a glyph as SVG path
    /// data in font units, y-up. `None` for glyphs without an outline.
    pub fn glyph_path(
        &mut self,
        resource: &FontResource,
        glyph: u16,
    ) -> Result<CachedPath, FontError> {
        if let Some(cached) = self.cache.get(glyph) {
            return Ok(cached);
        }

        let face = resource.face()?;
        let mut builder = SvgPathBuilder::default();
        let bounds = face.outline_glyph(GlyphId(glyph), &mut builder);

        let path: CachedPath = if bounds.is_some() && !builder.d.is_empty() {
            Some(Arc::from(builder.d.as_str()))
        } else {
            None
        };

        self.cache.insert(glyph, path.clone());
        Ok(path)
    }

    /// Cache statistics, mainly for tests and diagnostics.
    pub fn cache(&self) -> &PathCache {
        &self.cache
    }
}

impl Default for TextEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn line_metrics(face: &Face, font_size: f32) -> LineMetrics {
    let scale = font_size / face.units_per_em() as f32;
    let ascent = face.ascender() as f32 * scale;
    let descent = -(face.descender() as f32) * scale;
    let line_gap = face.line_gap() as f32 * scale;
    LineMetrics {
        ascent,
        descent,
        line_height: ascent + descent + line_gap,
    }
}

/// Horizontal kerning between two glyphs in font units, from the legacy
/// `kern` table. Zero when absent.
fn kerning(face: &Face, left: GlyphId, right: GlyphId) -> f32 {
    if let Some(kern) = face.tables().kern {
        for subtable in kern.subtables {
            if !subtable.horizontal || subtable.variable {
                continue;
            }
            if let Some(value) = subtable.glyphs_kerning(left, right) {
                return value as f32;
            }
        }
    }
    0.0
}

/// Accumulates `ttf-parser` outline callbacks into SVG path data.
#[derive(Default)]
struct SvgPathBuilder {
    d: String,
}

impl ttf_parser::OutlineBuilder for SvgPathBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        let _ = write!(self.d, "M{x} {y}");
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let _ = write!(self.d, "L{x} {y}");
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let _ = write!(self.d, "Q{x1} {y1} {x} {y}");
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let _ = write!(self.d, "C{x1} {y1} {x2} {y2} {x} {y}");
    }

    fn close(&mut self) {
        self.d.push('Z');
    }
}

// ===================================================================
// Tests
// ===================================================================
