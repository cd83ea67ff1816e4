//! Closed registry of built-in sample documents.
//!
//! The set of renderable documents is fixed configuration: each entry is an
//! immutable tree built once and shared by `Arc`. Keys outside this registry
//! are a caller contract violation, not a runtime condition.

use std::collections::HashMap;
use std::sync::Arc;

use crate::node::{DocumentTree, Node, ViewBox};
use crate::style::{
    AlignItems, Border, BoxStyle, Color, Edges, FlexDirection, JustifyContent, Length,
    LinearGradient, Paint, TextStyle,
};

/// Fixed mapping of document key → immutable sample tree.
pub struct DocumentRegistry {
    docs: HashMap<String, Arc<DocumentTree>>,
}

impl DocumentRegistry {
    /// Build the registry of built-in sample documents.
    pub fn builtin() -> Self {
        let mut docs: HashMap<String, Arc<DocumentTree>> = HashMap::new();
        docs.insert("helloworld".into(), Arc::new(hello_world()));
        docs.insert("helloworldtriangle".into(), Arc::new(hello_world_triangle()));
        docs.insert("gradient-banner".into(), Arc::new(gradient_banner()));
        docs.insert("cta-card".into(), Arc::new(cta_card()));

        log::debug!("DocumentRegistry: {} built-in documents", docs.len());
        Self { docs }
    }

    pub fn get(&self, key: &str) -> Option<Arc<DocumentTree>> {
        self.docs.get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.docs.contains_key(key)
    }

    /// All registered keys (sorted).
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.docs.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

// ── Sample documents ────────────────────────────────────────────────

/// "hello, world" in solid black, size 36, centered on the canvas.
fn hello_world() -> DocumentTree {
    DocumentTree::new(Node::container(
        BoxStyle {
            width: Length::Percent(1.0),
            height: Length::Percent(1.0),
            direction: FlexDirection::Column,
            align_items: AlignItems::Center,
            justify_content: JustifyContent::Center,
            ..Default::default()
        },
        vec![Node::text(
            "hello, world",
            TextStyle {
                color: Paint::Solid(Color::BLACK),
                font_size: 36.0,
                ..Default::default()
            },
        )],
    ))
}

/// A filled triangle above a "Hello, World" caption, centered on white.
fn hello_world_triangle() -> DocumentTree {
    DocumentTree::new(Node::container(
        BoxStyle {
            width: Length::Percent(1.0),
            height: Length::Percent(1.0),
            direction: FlexDirection::Column,
            align_items: AlignItems::Center,
            justify_content: JustifyContent::Center,
            background: Some(Paint::Solid(Color::WHITE)),
            ..Default::default()
        },
        vec![
            Node::shape(
                ViewBox::new(75.0, 65.0),
                "M37.59.25l36.95 64H.64l36.95-64z",
                Color::BLACK,
                Length::Px(75.0),
                Edges::symmetric(0.0, 75.0),
            ),
            Node::text_with_margin(
                "Hello, World",
                TextStyle {
                    color: Paint::Solid(Color::BLACK),
                    font_size: 32.0,
                    font_weight: 600,
                    ..Default::default()
                },
                Edges::new(40.0, 0.0, 0.0, 0.0),
            ),
        ],
    ))
}

/// Three stacked words, each filled by its own left-to-right gradient
/// clipped to the glyph outlines.
fn gradient_banner() -> DocumentTree {
    let word = |content: &str, from: Color, to: Color| {
        Node::container(
            BoxStyle {
                padding: Edges::symmetric(5.0, 40.0),
                ..Default::default()
            },
            vec![Node::text(
                content,
                TextStyle {
                    color: Paint::Linear(LinearGradient::horizontal(from, to)),
                    font_size: 60.0,
                    font_weight: 700,
                    letter_spacing: -2.0,
                    ..Default::default()
                },
            )],
        )
    };

    DocumentTree::new(Node::container(
        BoxStyle {
            width: Length::Percent(1.0),
            height: Length::Percent(1.0),
            direction: FlexDirection::Column,
            align_items: AlignItems::Center,
            justify_content: JustifyContent::Center,
            background: Some(Paint::Solid(Color::WHITE)),
            ..Default::default()
        },
        vec![
            word("Design", Color::rgb(0, 124, 240), Color::rgb(0, 223, 216)),
            word("Render", Color::rgb(121, 40, 202), Color::rgb(255, 0, 128)),
            word("Display", Color::rgb(255, 77, 77), Color::rgb(249, 203, 40)),
        ],
    ))
}

/// Call-to-action card: headline on the left, two buttons on the right.
fn cta_card() -> DocumentTree {
    let headline = Node::container(
        BoxStyle {
            direction: FlexDirection::Column,
            ..Default::default()
        },
        vec![
            Node::text(
                "Ready to dive in?",
                TextStyle {
                    color: Paint::Solid(Color::rgb(17, 24, 39)),
                    font_size: 36.0,
                    font_weight: 700,
                    ..Default::default()
                },
            ),
            Node::text(
                "Start your free trial today.",
                TextStyle {
                    color: Paint::Solid(Color::rgb(79, 70, 229)),
                    font_size: 36.0,
                    font_weight: 700,
                    ..Default::default()
                },
            ),
        ],
    );

    let button = |label: &str, fg: Color, bg: Color, border: Option<Border>, left: f32| {
        Node::container(
            BoxStyle {
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                padding: Edges::symmetric(12.0, 20.0),
                margin: Edges::new(0.0, 0.0, 0.0, left),
                background: Some(Paint::Solid(bg)),
                border,
                ..Default::default()
            },
            vec![Node::text(
                label,
                TextStyle {
                    color: Paint::Solid(fg),
                    font_size: 16.0,
                    font_weight: 500,
                    ..Default::default()
                },
            )],
        )
    };

    let indigo = Color::rgb(79, 70, 229);
    let buttons = Node::container(
        BoxStyle {
            align_items: AlignItems::Center,
            margin: Edges::new(0.0, 0.0, 0.0, 32.0),
            ..Default::default()
        },
        vec![
            button("Get started", Color::WHITE, indigo, None, 0.0),
            button(
                "Learn more",
                indigo,
                Color::WHITE,
                Some(Border { width: 1.0, color: Color::rgb(209, 213, 219) }),
                12.0,
            ),
        ],
    );

    let card = Node::container(
        BoxStyle {
            align_items: AlignItems::Center,
            justify_content: JustifyContent::SpaceBetween,
            padding: Edges::all(32.0),
            background: Some(Paint::Solid(Color::rgb(249, 250, 251))),
            ..Default::default()
        },
        vec![headline, buttons],
    );

    DocumentTree::new(Node::container(
        BoxStyle {
            width: Length::Percent(1.0),
            height: Length::Percent(1.0),
            direction: FlexDirection::Column,
            align_items: AlignItems::Center,
            justify_content: JustifyContent::Center,
            background: Some(Paint::Solid(Color::WHITE)),
            ..Default::default()
        },
        vec![card],
    ))
}

// ===================================================================
// Tests
// ===================================================================
