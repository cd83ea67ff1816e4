//! Document renderer: layout solve + SVG paint pass.

use std::fmt::Write as _;
use std::sync::Mutex;

use decal_core::node::{BoxNode, DocumentTree, Node, ShapeNode, TextNode};
use decal_core::style::{Paint, TextStyle};
use decal_core::{Extent, Rect};
use decal_layout::{AbsoluteLayout, LayoutError, LayoutTree, MeasuredText, TextMeasurer};
use decal_text::{match_query, FontError, FontQuery, FontResource, FontStyle, TextEngine};
use thiserror::Error;

use crate::artifact::RasterArtifact;
use crate::svg::{fill_attrs, fmt, stroke_attrs, SvgBuilder};

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Layout failed: {0}")]
    Layout(#[from] LayoutError),
    #[error("Font error: {0}")]
    Font(#[from] FontError),
    #[error("Malformed shape: {0}")]
    MalformedShape(String),
}

/// Renders document trees to SVG artifacts.
///
/// A pure function of (tree, font, extent): identical inputs yield
/// byte-identical output. The only internal state is the glyph path cache,
/// which affects cost, never content.
pub struct SvgRenderer {
    engine: Mutex<TextEngine>,
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self {
            engine: Mutex::new(TextEngine::new()),
        }
    }

    /// Compile `doc` with `font` into an SVG artifact at `extent`.
    ///
    /// Never produces a partial artifact: any layout, font, or tree error
    /// aborts the whole render.
    pub fn render(
        &self,
        doc: &DocumentTree,
        font: &FontResource,
        extent: Extent,
    ) -> Result<RasterArtifact, RenderError> {
        validate_shapes(&doc.root)?;

        let mut engine = match self.engine.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let layout = {
            let measurer = FontMeasurer { engine: &*engine, font };
            LayoutTree::solve(doc, &measurer, extent)?
        };

        let mut svg = SvgBuilder::new(extent);
        emit_node(&doc.root, &layout, font, &mut *engine, &mut svg)?;

        let artifact = RasterArtifact::new(svg.finish(), extent);
        log::debug!(
            "Rendered {} nodes into {} bytes of SVG",
            doc.node_count(),
            artifact.byte_len(),
        );
        Ok(artifact)
    }
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Bridges the shaping engine into the layout crate's measurement seam.
struct FontMeasurer<'a> {
    engine: &'a TextEngine,
    font: &'a FontResource,
}

impl TextMeasurer for FontMeasurer<'_> {
    fn measure(&self, content: &str, style: &TextStyle) -> MeasuredText {
        match self
            .engine
            .shape_line(self.font, content, style.font_size, style.letter_spacing)
        {
            Ok(line) => MeasuredText {
                width: line.width,
                height: line.metrics.line_height,
            },
            Err(e) => {
                // Font bytes are validated at load; reaching this means the
                // resource degraded mid-process. Collapse to zero extent.
                log::error!("Text measurement failed: {e}");
                MeasuredText { width: 0.0, height: 0.0 }
            }
        }
    }
}

/// Reject malformed shape leaves before any work happens.
fn validate_shapes(node: &Node) -> Result<(), RenderError> {
    if let Node::Shape(shape) = node {
        if shape.view_box.width <= 0.0 || shape.view_box.height <= 0.0 {
            return Err(RenderError::MalformedShape(format!(
                "view box {}x{} is not positive",
                shape.view_box.width, shape.view_box.height,
            )));
        }
        if shape.path.trim().is_empty() {
            return Err(RenderError::MalformedShape("empty path data".into()));
        }
    }
    for child in node.children() {
        validate_shapes(child)?;
    }
    Ok(())
}

// ── Paint pass ──────────────────────────────────────────────────────

fn emit_node(
    node: &Node,
    layout: &AbsoluteLayout,
    font: &FontResource,
    engine: &mut TextEngine,
    svg: &mut SvgBuilder,
) -> Result<(), RenderError> {
    let rect = layout
        .get(node.id())
        .ok_or(LayoutError::NodeNotFound(node.id()))?;

    match node {
        Node::Box(b) => {
            emit_box(b, rect, svg);
            for child in &b.children {
                emit_node(child, layout, font, engine, svg)?;
            }
            Ok(())
        }
        Node::Shape(s) => {
            emit_shape(s, rect, svg);
            Ok(())
        }
        Node::Text(t) => emit_text(t, rect, font, engine, svg),
    }
}

fn emit_box(node: &BoxNode, rect: Rect, svg: &mut SvgBuilder) {
    if rect.width <= 0.0 || rect.height <= 0.0 {
        return;
    }

    if let Some(background) = &node.style.background {
        let fill = match background {
            Paint::Solid(color) => fill_attrs(color),
            Paint::Linear(gradient) => {
                let id = svg.linear_gradient(gradient);
                format!(" fill=\"url(#{id})\"")
            }
        };
        svg.push(&format!(
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"{fill}/>",
            fmt(rect.x),
            fmt(rect.y),
            fmt(rect.width),
            fmt(rect.height),
        ));
    }

    if let Some(border) = &node.style.border {
        if border.width > 0.0 {
            // Stroke centered on the inset rect keeps the border inside the
            // box, matching the layout inset.
            let half = border.width / 2.0;
            svg.push(&format!(
                "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"none\"{}/>",
                fmt(rect.x + half),
                fmt(rect.y + half),
                fmt(rect.width - border.width),
                fmt(rect.height - border.width),
                stroke_attrs(&border.color, border.width),
            ));
        }
    }
}

fn emit_shape(node: &ShapeNode, rect: Rect, svg: &mut SvgBuilder) {
    let sx = rect.width / node.view_box.width;
    let sy = rect.height / node.view_box.height;
    svg.push(&format!(
        "<g transform=\"translate({} {}) scale({} {})\"><path d=\"{}\"{}/></g>",
        fmt(rect.x),
        fmt(rect.y),
        fmt(sx),
        fmt(sy),
        node.path,
        fill_attrs(&node.fill),
    ));
}

fn emit_text(
    node: &TextNode,
    rect: Rect,
    font: &FontResource,
    engine: &mut TextEngine,
    svg: &mut SvgBuilder,
) -> Result<(), RenderError> {
    let style = &node.style;
    let query = FontQuery {
        weight: style.font_weight,
        style: if style.italic { FontStyle::Italic } else { FontStyle::Normal },
    };
    // Single-font system: an absent weight/style substitutes the loaded
    // face. match_query records and logs the substitution.
    let _ = match_query(font, &query);

    let line = engine.shape_line(font, &node.content, style.font_size, style.letter_spacing)?;
    if line.glyphs.is_empty() {
        return Ok(());
    }

    let face = font.face()?;
    let scale = style.font_size / face.units_per_em() as f32;
    let baseline = rect.y + line.metrics.ascent;

    // Per-glyph elements: outline in font units (y-up), placed by a
    // translate + flip-scale transform.
    let mut glyph_elems = String::new();
    for glyph in &line.glyphs {
        if let Some(path) = engine.glyph_path(font, glyph.id)? {
            let _ = write!(
                glyph_elems,
                "<path transform=\"translate({} {}) scale({} {})\" d=\"{}\"/>",
                fmt(rect.x + glyph.x),
                fmt(baseline),
                fmt(scale),
                fmt(-scale),
                path,
            );
        }
    }
    if glyph_elems.is_empty() {
        return Ok(());
    }

    match &style.color {
        Paint::Solid(color) => {
            svg.push(&format!("<g{}>{glyph_elems}</g>", fill_attrs(color)));
        }
        Paint::Linear(gradient) => {
            // Gradient text: paint the gradient over the text box, clipped
            // by the glyph outlines rendered white into a mask.
            let gradient_id = svg.linear_gradient(gradient);
            let mask_id = svg.alloc_id("m");
            svg.push_def(&format!(
                "<mask id=\"{mask_id}\"><g fill=\"#fff\">{glyph_elems}</g></mask>",
            ));
            svg.push(&format!(
                "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" \
                 fill=\"url(#{gradient_id})\" mask=\"url(#{mask_id})\"/>",
                fmt(rect.x),
                fmt(rect.y),
                fmt(rect.width),
                fmt(rect.height),
            ));
        }
    }
    Ok(())
}

// ===================================================================
// Tests
// ===================================================================
