//! # decal-text
//!
//! Font handling for Decal on top of `ttf-parser`: the immutable
//! [`FontResource`], weight/style matching with scored fallback, horizontal
//! shaping (advances + kerning), and glyph outline extraction to SVG path
//! data with an LRU cache.
//!
//! The system holds at most one active font at a time, loaded once from raw
//! bytes; there is no system font discovery here.

pub mod cache;
pub mod engine;
pub mod fonts;

// Re-exports for convenience
pub use cache::PathCache;
pub use engine::{LineMetrics, ShapedGlyph, ShapedLine, TextEngine};
pub use fonts::{match_query, FontError, FontMatch, FontQuery, FontResource, FontStyle, MatchType};
