//! # decal-render
//!
//! Compiles a document tree plus the loaded font into a self-contained SVG
//! raster artifact at a fixed canvas size.
//!
//! ## Architecture
//!
//! ```text
//!  DocumentTree + FontResource
//!       │
//!       ▼
//!  LayoutTree::solve()          ◀─── absolute pixel boxes (decal-layout),
//!       │                           text measured via the shaping engine
//!       ▼
//!  SvgRenderer::render()        ◀─── walks the tree in document order:
//!       │                           background rects, borders, shape
//!       │                           paths, glyph paths, gradient masks
//!       ▼
//!  RasterArtifact               ◀─── SVG string + extent, exposable as a
//!                                    base64 data URL
//! ```
//!
//! Rendering is a pure function of its inputs: def ids come from a per-render
//! counter and glyph outlines are cached in font units, so identical inputs
//! produce byte-identical SVG.

pub mod artifact;
pub mod renderer;
mod svg;

// Re-exports for convenience
pub use artifact::RasterArtifact;
pub use renderer::{RenderError, SvgRenderer};
