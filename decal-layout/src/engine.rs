use decal_core::node::{DocumentTree, Node, ShapeNode, TextNode};
use decal_core::style::{self as doc, BoxStyle, Edges, Length};
use decal_core::{Extent, Rect as CoreRect};
use rustc_hash::FxHashMap;
use taffy::prelude::*;
use taffy::{AvailableSpace, NodeId, Style, TaffyError, TaffyTree};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Taffy error: {0}")]
    Taffy(#[from] TaffyError),
    #[error("Node not found: {0}")]
    NodeNotFound(Uuid),
}

/// Measured extent of a single-line text run, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeasuredText {
    pub width: f32,
    pub height: f32,
}

/// Seam for text measurement during tree building.
///
/// Text leaves become fixed-size flex items; the font backend supplies the
/// size. Keeps this crate independent of any glyph machinery.
pub trait TextMeasurer {
    fn measure(&self, content: &str, style: &doc::TextStyle) -> MeasuredText;
}

/// Layout solver for one document tree.
///
/// Maps document node UUIDs to Taffy `NodeId`s, computes the flex solve at
/// a fixed canvas extent, and resolves parent-relative locations into
/// absolute pixel boxes.
pub struct LayoutTree {
    /// Taffy 0.9 tree
    taffy: TaffyTree,
    node_map: FxHashMap<Uuid, NodeId>,
    root: NodeId,
}

impl LayoutTree {
    /// Build the Taffy tree for a document, measuring text leaves through
    /// `measurer`.
    pub fn build(doc: &DocumentTree, measurer: &dyn TextMeasurer) -> Result<Self, LayoutError> {
        let mut taffy = TaffyTree::new();
        // Keep fractional positions; glyph placement needs subpixel boxes.
        taffy.disable_rounding();
        let mut node_map = FxHashMap::default();
        let root = build_node(&mut taffy, &mut node_map, &doc.root, measurer)?;
        Ok(Self { taffy, node_map, root })
    }

    /// Run the flex solve with the canvas as definite available space.
    pub fn compute(&mut self, extent: Extent) -> Result<(), LayoutError> {
        self.taffy.compute_layout(
            self.root,
            Size {
                width: AvailableSpace::Definite(extent.width as f32),
                height: AvailableSpace::Definite(extent.height as f32),
            },
        )?;
        Ok(())
    }

    /// Resolve parent-relative Taffy locations into absolute pixel boxes.
    pub fn resolve(&self, doc: &DocumentTree) -> Result<AbsoluteLayout, LayoutError> {
        let mut rects = FxHashMap::default();
        self.resolve_node(&doc.root, 0.0, 0.0, &mut rects)?;
        Ok(AbsoluteLayout { rects })
    }

    fn resolve_node(
        &self,
        node: &Node,
        offset_x: f32,
        offset_y: f32,
        out: &mut FxHashMap<Uuid, CoreRect>,
    ) -> Result<(), LayoutError> {
        let taffy_id = *self
            .node_map
            .get(&node.id())
            .ok_or(LayoutError::NodeNotFound(node.id()))?;
        let layout = self.taffy.layout(taffy_id)?;

        let x = offset_x + layout.location.x;
        let y = offset_y + layout.location.y;
        out.insert(
            node.id(),
            CoreRect::new(x, y, layout.size.width, layout.size.height),
        );

        for child in node.children() {
            self.resolve_node(child, x, y, out)?;
        }
        Ok(())
    }

    /// Build, compute, and resolve in one call.
    pub fn solve(
        doc: &DocumentTree,
        measurer: &dyn TextMeasurer,
        extent: Extent,
    ) -> Result<AbsoluteLayout, LayoutError> {
        let mut tree = Self::build(doc, measurer)?;
        tree.compute(extent)?;
        let layout = tree.resolve(doc)?;
        log::debug!(
            "Layout solved: {} nodes at {}x{}",
            layout.len(),
            extent.width,
            extent.height,
        );
        Ok(layout)
    }

    /// Number of nodes tracked by the solver.
    pub fn node_count(&self) -> usize {
        self.node_map.len()
    }
}

/// Absolute pixel boxes for every node of a solved document.
#[derive(Clone, Debug)]
pub struct AbsoluteLayout {
    rects: FxHashMap<Uuid, CoreRect>,
}

impl AbsoluteLayout {
    pub fn get(&self, id: Uuid) -> Option<CoreRect> {
        self.rects.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

// ---------------------------------------------------------------
// Document style → Taffy style  (Taffy 0.9.2 – lowercase constructors)
// ---------------------------------------------------------------

fn build_node(
    taffy: &mut TaffyTree,
    node_map: &mut FxHashMap<Uuid, NodeId>,
    node: &Node,
    measurer: &dyn TextMeasurer,
) -> Result<NodeId, LayoutError> {
    let taffy_id = match node {
        Node::Box(b) => {
            let mut children = Vec::with_capacity(b.children.len());
            for child in &b.children {
                children.push(build_node(taffy, node_map, child, measurer)?);
            }
            taffy.new_with_children(box_style(&b.style), &children)?
        }
        Node::Text(t) => taffy.new_leaf(text_style(t, measurer))?,
        Node::Shape(s) => taffy.new_leaf(shape_style(s))?,
    };
    node_map.insert(node.id(), taffy_id);
    Ok(taffy_id)
}

fn length_to_dimension(length: Length) -> Dimension {
    match length {
        Length::Auto => Dimension::auto(),
        Length::Px(v) => Dimension::length(v),
        Length::Percent(f) => Dimension::percent(f),
    }
}

fn edges_to_padding(edges: &Edges) -> taffy::Rect<LengthPercentage> {
    taffy::Rect {
        left: LengthPercentage::length(edges.left),
        right: LengthPercentage::length(edges.right),
        top: LengthPercentage::length(edges.top),
        bottom: LengthPercentage::length(edges.bottom),
    }
}

fn edges_to_margin(edges: &Edges) -> taffy::Rect<LengthPercentageAuto> {
    taffy::Rect {
        left: LengthPercentageAuto::length(edges.left),
        right: LengthPercentageAuto::length(edges.right),
        top: LengthPercentageAuto::length(edges.top),
        bottom: LengthPercentageAuto::length(edges.bottom),
    }
}

fn box_style(style: &BoxStyle) -> Style {
    let border_width = style.border.map(|b| b.width).unwrap_or(0.0);

    Style {
        display: Display::Flex,
        flex_direction: match style.direction {
            doc::FlexDirection::Row => FlexDirection::Row,
            doc::FlexDirection::Column => FlexDirection::Column,
            doc::FlexDirection::RowReverse => FlexDirection::RowReverse,
            doc::FlexDirection::ColumnReverse => FlexDirection::ColumnReverse,
        },
        flex_wrap: match style.wrap {
            doc::FlexWrap::NoWrap => FlexWrap::NoWrap,
            doc::FlexWrap::Wrap => FlexWrap::Wrap,
        },
        align_items: Some(match style.align_items {
            doc::AlignItems::Stretch => AlignItems::Stretch,
            doc::AlignItems::FlexStart => AlignItems::FlexStart,
            doc::AlignItems::Center => AlignItems::Center,
            doc::AlignItems::FlexEnd => AlignItems::FlexEnd,
        }),
        justify_content: Some(match style.justify_content {
            doc::JustifyContent::FlexStart => JustifyContent::FlexStart,
            doc::JustifyContent::Center => JustifyContent::Center,
            doc::JustifyContent::FlexEnd => JustifyContent::FlexEnd,
            doc::JustifyContent::SpaceBetween => JustifyContent::SpaceBetween,
            doc::JustifyContent::SpaceAround => JustifyContent::SpaceAround,
        }),
        size: Size {
            width: length_to_dimension(style.width),
            height: length_to_dimension(style.height),
        },
        padding: edges_to_padding(&style.padding),
        margin: edges_to_margin(&style.margin),
        border: edges_to_padding(&Edges::all(border_width)),
        ..Style::default()
    }
}

/// Text leaves are fixed-size items: measured once, single-line.
fn text_style(text: &TextNode, measurer: &dyn TextMeasurer) -> Style {
    let measured = measurer.measure(&text.content, &text.style);
    Style {
        size: Size {
            width: Dimension::length(measured.width),
            height: Dimension::length(measured.height),
        },
        margin: edges_to_margin(&text.margin),
        ..Style::default()
    }
}

/// Shape leaves size from their declared width; an auto height follows the
/// view-box aspect ratio. Percent widths leave the height to the container.
fn shape_style(shape: &ShapeNode) -> Style {
    let size = match shape.width {
        Length::Px(w) => Size {
            width: Dimension::length(w),
            height: Dimension::length(w * shape.view_box.aspect()),
        },
        Length::Auto => Size {
            width: Dimension::length(shape.view_box.width),
            height: Dimension::length(shape.view_box.height),
        },
        Length::Percent(f) => Size {
            width: Dimension::percent(f),
            height: Dimension::auto(),
        },
    };
    Style {
        size,
        margin: edges_to_margin(&shape.margin),
        ..Style::default()
    }
}

// ===================================================================
// Tests
// ===================================================================
