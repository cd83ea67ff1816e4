//! The render output: an immutable SVG document plus its canvas extent.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use decal_core::Extent;

/// Immutable result of one render: a self-contained SVG document sized to
/// the fixed canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterArtifact {
    svg: String,
    extent: Extent,
}

impl RasterArtifact {
    pub fn new(svg: String, extent: Extent) -> Self {
        Self { svg, extent }
    }

    pub fn svg(&self) -> &str {
        &self.svg
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn byte_len(&self) -> usize {
        self.svg.len()
    }

    /// Wrap the SVG as a URL-loadable resource for the texture sink.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:image/svg+xml;base64,{}",
            STANDARD.encode(self.svg.as_bytes()),
        )
    }
}

// ===================================================================
// Tests
// ===================================================================
