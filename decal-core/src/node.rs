//! The document tree: immutable, declaratively styled layout nodes.
//!
//! A document is a tree of three node kinds: box containers (flex layout),
//! text leaves, and vector-shape leaves. Trees are built once (by the
//! registry or by callers) and shared read-only into the renderer.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::style::{BoxStyle, Color, Edges, Length, TextStyle};

/// Intrinsic coordinate space of a shape leaf (`0 0 width height`).
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct ViewBox {
    pub width: f32,
    pub height: f32,
}

impl ViewBox {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Height-over-width ratio, used to derive an auto height from a
    /// fixed width.
    pub fn aspect(&self) -> f32 {
        self.height / self.width
    }
}

/// Flex container holding child nodes.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct BoxNode {
    pub id: Uuid,
    pub style: BoxStyle,
    pub children: Vec<Node>,
}

/// Single-line text leaf.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct TextNode {
    pub id: Uuid,
    pub content: String,
    pub style: TextStyle,
    pub margin: Edges,
}

/// Vector-shape leaf: an SVG path in its own view box, filled directly.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ShapeNode {
    pub id: Uuid,
    pub view_box: ViewBox,
    /// SVG path data in view-box coordinates.
    pub path: String,
    pub fill: Color,
    /// Layout width; height follows the view-box aspect when `Auto`.
    pub width: Length,
    pub margin: Edges,
}

/// A node in the document tree.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub enum Node {
    Box(BoxNode),
    Text(TextNode),
    Shape(ShapeNode),
}

impl Node {
    /// Build a flex container.
    pub fn container(style: BoxStyle, children: Vec<Node>) -> Self {
        Node::Box(BoxNode { id: Uuid::new_v4(), style, children })
    }

    /// Build a text leaf with zero margin.
    pub fn text(content: impl Into<String>, style: TextStyle) -> Self {
        Self::text_with_margin(content, style, Edges::ZERO)
    }

    /// Build a text leaf with explicit margin.
    pub fn text_with_margin(content: impl Into<String>, style: TextStyle, margin: Edges) -> Self {
        Node::Text(TextNode {
            id: Uuid::new_v4(),
            content: content.into(),
            style,
            margin,
        })
    }

    /// Build a shape leaf.
    pub fn shape(
        view_box: ViewBox,
        path: impl Into<String>,
        fill: Color,
        width: Length,
        margin: Edges,
    ) -> Self {
        Node::Shape(ShapeNode {
            id: Uuid::new_v4(),
            view_box,
            path: path.into(),
            fill,
            width,
            margin,
        })
    }

    pub fn id(&self) -> Uuid {
        match self {
            Node::Box(b) => b.id,
            Node::Text(t) => t.id,
            Node::Shape(s) => s.id,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Box(b) => &b.children,
            _ => &[],
        }
    }
}

/// An immutable document: a single root node.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct DocumentTree {
    pub root: Node,
}

impl DocumentTree {
    pub fn new(root: Node) -> Self {
        Self { root }
    }

    /// Total number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        fn walk(node: &Node) -> usize {
            1 + node.children().iter().map(walk).sum::<usize>()
        }
        walk(&self.root)
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Paint;

    #[test]
    fn test_view_box_aspect() {
        let vb = ViewBox::new(75.0, 65.0);
        assert!((vb.aspect() - 65.0 / 75.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_container_builder() {
        let node = Node::container(
            BoxStyle::default(),
            vec![Node::text("hi", TextStyle::default())],
        );
        assert_eq!(node.children().len(), 1);
        match &node.children()[0] {
            Node::Text(t) => assert_eq!(t.content, "hi"),
            other => panic!("Expected text child, got {other:?}"),
        }
    }

    #[test]
    fn test_leaf_children_empty() {
        let text = Node::text("leaf", TextStyle::default());
        assert!(text.children().is_empty());
    }

    #[test]
    fn test_node_ids_unique() {
        let a = Node::text("a", TextStyle::default());
        let b = Node::text("b", TextStyle::default());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_node_count() {
        let tree = DocumentTree::new(Node::container(
            BoxStyle::default(),
            vec![
                Node::text("a", TextStyle::default()),
                Node::container(
                    BoxStyle::default(),
                    vec![Node::text("b", TextStyle::default())],
                ),
            ],
        ));
        assert_eq!(tree.node_count(), 4);
    }

    #[test]
    fn test_json_round_trip() {
        let tree = DocumentTree::new(Node::container(
            BoxStyle {
                background: Some(Paint::Solid(Color::WHITE)),
                ..Default::default()
            },
            vec![Node::shape(
                ViewBox::new(75.0, 65.0),
                "M37.59.25l36.95 64H.64l36.95-64z",
                Color::BLACK,
                Length::Px(75.0),
                Edges::symmetric(0.0, 75.0),
            )],
        ));

        let json = serde_json::to_string(&tree).unwrap();
        let back: DocumentTree = serde_json::from_str(&json).unwrap();
        assert_eq!(tree, back);
    }
}
