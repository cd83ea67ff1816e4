//! Font resource and weight/style matching.
//!
//! A [`FontResource`] is the single font asset of the system: raw bytes
//! fetched once, validated at construction, immutable afterwards. Matching
//! follows the CSS priority (style → weight) but against exactly one face,
//! so it degrades to a scored substitution: the loaded face always wins,
//! and a nonzero score marks the request as a fallback.

use std::sync::Arc;

use thiserror::Error;
use ttf_parser::Face;

#[derive(Error, Debug)]
pub enum FontError {
    #[error("Font parse failed: {0}")]
    Parse(#[from] ttf_parser::FaceParsingError),
    #[error("Font payload is empty")]
    Empty,
}

// ── Font style enum ─────────────────────────────────────────────────

/// Font style (normal, italic, or oblique).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontStyle {
    Normal,
    Italic,
    Oblique,
}

impl Default for FontStyle {
    fn default() -> Self {
        Self::Normal
    }
}

// ── Font resource ───────────────────────────────────────────────────

/// The single font asset: family identity, raw bytes, declared weight and
/// style. Immutable once constructed; lives for the process lifetime.
#[derive(Clone)]
pub struct FontResource {
    family: String,
    data: Arc<[u8]>,
    weight: u16,
    style: FontStyle,
}

impl std::fmt::Debug for FontResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontResource")
            .field("family", &self.family)
            .field("weight", &self.weight)
            .field("style", &self.style)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl FontResource {
    /// Validate and wrap raw font bytes.
    ///
    /// The payload is atomic: either it parses as an OpenType face or the
    /// resource does not exist.
    pub fn from_bytes(
        family: impl Into<String>,
        weight: u16,
        style: FontStyle,
        data: Vec<u8>,
    ) -> Result<Self, FontError> {
        if data.is_empty() {
            return Err(FontError::Empty);
        }
        // Parse once up front so later face() calls cannot fail on content.
        Face::parse(&data, 0)?;

        let family = family.into();
        log::info!(
            "FontResource: loaded '{}' weight {} ({} bytes)",
            family,
            weight,
            data.len(),
        );

        Ok(Self {
            family,
            data: data.into(),
            weight,
            style,
        })
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn weight(&self) -> u16 {
        self.weight
    }

    pub fn style(&self) -> FontStyle {
        self.style
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Borrow a parsed face over the resource bytes.
    pub fn face(&self) -> Result<Face<'_>, FontError> {
        Ok(Face::parse(&self.data, 0)?)
    }
}

// ── Matching ────────────────────────────────────────────────────────

/// A requested weight/style pair, taken from a text node's style.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FontQuery {
    /// Weight (100–900). 400 = normal, 700 = bold.
    pub weight: u16,
    pub style: FontStyle,
}

impl Default for FontQuery {
    fn default() -> Self {
        Self { weight: 400, style: FontStyle::Normal }
    }
}

/// How a query was resolved against the loaded face.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchType {
    /// The loaded face carries the requested weight and style.
    Exact,
    /// Substituted by the loaded face; `score` quantifies the distance.
    Fallback,
}

/// Result of resolving a [`FontQuery`]: the face parameters actually used.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FontMatch {
    pub weight: u16,
    pub style: FontStyle,
    pub match_type: MatchType,
    pub score: u32,
}

/// Resolve a query against the single loaded resource.
///
/// Substitution never fails: an absent weight/style falls back to the
/// loaded face, recorded as a `Fallback` match and logged at debug level.
pub fn match_query(resource: &FontResource, query: &FontQuery) -> FontMatch {
    let score = match_score(resource, query);
    if score == 0 {
        FontMatch {
            weight: resource.weight(),
            style: resource.style(),
            match_type: MatchType::Exact,
            score,
        }
    } else {
        log::debug!(
            "Font fallback: requested weight {} {:?}, using '{}' weight {} {:?} (score {})",
            query.weight,
            query.style,
            resource.family(),
            resource.weight(),
            resource.style(),
            score,
        );
        FontMatch {
            weight: resource.weight(),
            style: resource.style(),
            match_type: MatchType::Fallback,
            score,
        }
    }
}

/// Compute a match score (lower = better, 0 = exact).
///
/// Style: 0-2 range (×100). Weight: 0-800 range (×1).
fn match_score(resource: &FontResource, query: &FontQuery) -> u32 {
    let style_diff = style_distance(resource.style(), query.style) as u32;
    let weight_diff = (resource.weight() as i32 - query.weight as i32).unsigned_abs();
    style_diff * 100 + weight_diff
}

fn style_distance(a: FontStyle, b: FontStyle) -> u8 {
    if a == b {
        return 0;
    }
    // Italic and oblique are "close", normal is "far".
    match (a, b) {
        (FontStyle::Italic, FontStyle::Oblique) | (FontStyle::Oblique, FontStyle::Italic) => 1,
        _ => 2,
    }
}

// ===================================================================
// Tests
// ===================================================================
