//! Scene texture sink — the adapter boundary to the host 3D engine.
//!
//! The host owns the render loop, camera, lights, and materials; this crate
//! only hands it texture bindings. A sink implementation must fully replace
//! the texture on its target slot, release the prior texture's resource on
//! every swap, and reject bindings older than the one currently bound.

use std::sync::{Arc, Mutex};

use thiserror::Error;

use crate::version::TextureVersion;

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Stale texture version {candidate} (active {active})")]
    StaleVersion { candidate: u64, active: u64 },
    #[error("Scene backend error: {0}")]
    Backend(String),
}

/// Pixel format hint passed through to the host engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureFormat {
    Rgba,
    Rgb,
}

/// Sampling mode hint passed through to the host engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SamplingMode {
    Nearest,
    Bilinear,
    Trilinear,
}

/// The material texture slot a sink binds into, fixed at construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SurfaceTarget {
    pub material: String,
    pub slot: String,
}

impl SurfaceTarget {
    pub fn new(material: impl Into<String>, slot: impl Into<String>) -> Self {
        Self { material: material.into(), slot: slot.into() }
    }
}

impl Default for SurfaceTarget {
    fn default() -> Self {
        Self::new("plane-mat", "diffuse")
    }
}

/// One versioned texture plus the host hints for binding it.
#[derive(Clone, Debug)]
pub struct TextureBinding {
    pub texture: TextureVersion,
    pub format: TextureFormat,
    pub sampling: SamplingMode,
    pub has_alpha: bool,
    pub invert_y: bool,
}

/// Adapter over the host scene engine's texture slot.
///
/// Contract: `apply` replaces the active texture entirely (no blending),
/// releases the previously bound texture's underlying resource, and fails
/// with [`SinkError::StaleVersion`] — keeping the newer texture — when the
/// binding's version is not greater than the active one.
pub trait SceneTextureSink: Send + Sync {
    fn apply(&mut self, binding: &TextureBinding) -> Result<(), SinkError>;
}

// ── Recording sink ──────────────────────────────────────────────────

/// A texture the recording sink currently holds.
#[derive(Clone, Debug)]
pub struct AppliedTexture {
    pub version: u64,
    pub data_url: String,
}

/// Observable state of a [`RecordingSink`].
#[derive(Debug, Default)]
pub struct SinkState {
    pub active: Option<AppliedTexture>,
    /// Versions whose textures have been released (in release order).
    pub released: Vec<u64>,
    /// Versions rejected as stale.
    pub rejected: Vec<u64>,
    pub applies: u64,
}

/// Reference sink for tests and headless runs: tracks the active binding,
/// every release, and every stale rejection behind a shared handle.
pub struct RecordingSink {
    target: SurfaceTarget,
    state: Arc<Mutex<SinkState>>,
}

impl RecordingSink {
    pub fn new(target: SurfaceTarget) -> Self {
        Self {
            target,
            state: Arc::new(Mutex::new(SinkState::default())),
        }
    }

    /// Shared handle onto the sink state, for inspection after the sink has
    /// been moved into the pipeline.
    pub fn state(&self) -> Arc<Mutex<SinkState>> {
        self.state.clone()
    }

    pub fn target(&self) -> &SurfaceTarget {
        &self.target
    }
}

impl SceneTextureSink for RecordingSink {
    fn apply(&mut self, binding: &TextureBinding) -> Result<(), SinkError> {
        let mut state = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let candidate = binding.texture.number;
        if let Some(active_version) = state.active.as_ref().map(|active| active.version) {
            if candidate <= active_version {
                state.rejected.push(candidate);
                return Err(SinkError::StaleVersion { candidate, active: active_version });
            }
        }

        // Full replacement: the prior texture's resource is released, never
        // leaked across swaps.
        if let Some(previous) = state.active.take() {
            state.released.push(previous.version);
        }
        state.active = Some(AppliedTexture {
            version: candidate,
            data_url: binding.texture.artifact.to_data_url(),
        });
        state.applies += 1;

        log::info!(
            "Texture v{candidate} bound to {}/{} ({} bytes)",
            self.target.material,
            self.target.slot,
            binding.texture.artifact.byte_len(),
        );
        Ok(())
    }
}

// ===================================================================
// Tests
// ===================================================================
