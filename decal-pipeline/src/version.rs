//! Texture version bookkeeping.
//!
//! Versions are allocated when a render is *submitted*, so a higher number
//! always means "more recently requested" — the property that lets renders
//! complete in any order while the newest one wins. Version 0 is the
//! placeholder meaning "nothing applied yet".

use std::sync::Arc;

use decal_render::RasterArtifact;

/// Versions below this are never handed to the scene sink: the very first
/// publish is skipped, so the surface only ever shows a settled texture.
pub const FIRST_BOUND_VERSION: u64 = 2;

/// A raster artifact tagged with its submission version.
#[derive(Clone, Debug)]
pub struct TextureVersion {
    pub number: u64,
    pub artifact: Arc<RasterArtifact>,
}

impl TextureVersion {
    pub fn new(number: u64, artifact: Arc<RasterArtifact>) -> Self {
        Self { number, artifact }
    }
}

/// Allocates strictly increasing versions and decides which completed
/// renders may touch the scene.
#[derive(Debug)]
pub struct TextureVersionManager {
    next: u64,
    last_applied: u64,
}

impl TextureVersionManager {
    pub fn new() -> Self {
        Self { next: 1, last_applied: 0 }
    }

    /// Reserve the version for a render being submitted now.
    pub fn allocate(&mut self) -> u64 {
        let version = self.next;
        self.next += 1;
        version
    }

    /// True iff `candidate` is newer than the last applied version.
    pub fn supersedes(&self, candidate: u64) -> bool {
        candidate > self.last_applied
    }

    /// True iff `candidate` should be bound to the scene: newer than the
    /// last applied version and past the first-publish suppression.
    pub fn should_bind(&self, candidate: u64) -> bool {
        self.supersedes(candidate) && candidate >= FIRST_BOUND_VERSION
    }

    /// Record a successful bind.
    pub fn mark_applied(&mut self, version: u64) {
        debug_assert!(version > self.last_applied);
        self.last_applied = version;
    }

    /// Last version handed to the sink; 0 when none has been.
    pub fn last_applied(&self) -> u64 {
        self.last_applied
    }

    /// Highest version allocated so far.
    pub fn allocated(&self) -> u64 {
        self.next - 1
    }
}

impl Default for TextureVersionManager {
    fn default() -> Self {
        Self::new()
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use decal_core::Extent;

    #[test]
    fn test_allocation_is_strictly_increasing() {
        let mut manager = TextureVersionManager::new();
        assert_eq!(manager.allocate(), 1);
        assert_eq!(manager.allocate(), 2);
        assert_eq!(manager.allocate(), 3);
        assert_eq!(manager.allocated(), 3);
    }

    #[test]
    fn test_first_publish_suppressed() {
        let manager = TextureVersionManager::new();
        assert!(manager.supersedes(1));
        assert!(!manager.should_bind(1), "version 1 must never be bound");
        assert!(manager.should_bind(2));
    }

    #[test]
    fn test_stale_versions_rejected() {
        let mut manager = TextureVersionManager::new();
        for _ in 0..7 {
            manager.allocate();
        }
        manager.mark_applied(7);

        assert!(!manager.should_bind(5));
        assert!(!manager.should_bind(7));
        assert!(manager.should_bind(8));
        assert_eq!(manager.last_applied(), 7);
    }

    #[test]
    fn test_out_of_order_completion() {
        let mut manager = TextureVersionManager::new();
        let v1 = manager.allocate();
        let v2 = manager.allocate();
        let v3 = manager.allocate();

        // v3 (newest) completes first and binds.
        assert!(manager.should_bind(v3));
        manager.mark_applied(v3);

        // The slower, older renders land afterwards and are discarded.
        assert!(!manager.should_bind(v2));
        assert!(!manager.should_bind(v1));
        assert_eq!(manager.last_applied(), v3);
    }

    #[test]
    fn test_texture_version_pairs_artifact() {
        let artifact = Arc::new(RasterArtifact::new("<svg/>".into(), Extent::square(16)));
        let version = TextureVersion::new(4, artifact.clone());
        assert_eq!(version.number, 4);
        assert_eq!(version.artifact.svg(), "<svg/>");
    }
}
