//! # decal-layout
//!
//! Flexbox layout for Decal document trees, backed by Taffy.
//!
//! ## Architecture
//!
//! ```text
//!  DocumentTree (decal-core)
//!       │
//!       ▼
//!  LayoutTree::build()        ◀─── converts node styles → taffy styles,
//!       │                          pre-measures text via TextMeasurer
//!       ▼
//!  LayoutTree::compute()      ◀─── taffy flex solve at the fixed canvas
//!       │
//!       ▼
//!  LayoutTree::resolve()      ◀─── parent-relative → absolute pixel boxes
//! ```
//!
//! Text leaves are measured single-line through the [`TextMeasurer`] seam so
//! this crate stays independent of any particular font backend.

pub mod engine;

// Re-exports for convenience
pub use engine::{AbsoluteLayout, LayoutError, LayoutTree, MeasuredText, TextMeasurer};
