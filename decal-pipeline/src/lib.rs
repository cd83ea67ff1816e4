//! # decal-pipeline — asynchronous render coordination
//!
//! Coordinates three resources with different lifetimes: the font asset
//! (fetched once), the selected document (changes repeatedly), and the
//! derived raster texture (recomputed whenever either changes) bound into a
//! live 3D scene.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  FontLoaded   ┌───────────────────┐
//! │ FontLoader   │ ─────────────► │                   │
//! │ (one fetch)  │                │  RenderPipeline   │   spawn_blocking
//! └──────────────┘                │  (event loop,     │ ─────────────────┐
//! ┌──────────────┐  Select(key)   │  PipelineContext) │                  ▼
//! │ Document     │ ─────────────► │                   │ ◄──── RenderDone{v}
//! │ Selector     │                └─────────┬─────────┘
//! └──────────────┘                          │ should_bind(v)
//!                                           ▼
//!                               ┌───────────────────────┐
//!                               │ SceneTextureSink      │
//!                               │ (host 3D engine slot) │
//!                               └───────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`loader`] — one-shot font fetch behind the `FontFetcher` trait
//! - [`selector`] — current document key, non-idempotent selection events
//! - [`version`] — submission-ordered texture versions
//! - [`sink`] — the host engine adapter and the recording reference sink
//! - [`pipeline`] — the event loop, state machine, and context object

pub mod loader;
pub mod pipeline;
pub mod selector;
pub mod sink;
pub mod version;

// Re-exports for convenience
pub use loader::{
    FetchError, FileFetcher, FontFetcher, FontLoader, FontSpec, HttpFetcher, InMemoryFetcher,
    LoadError,
};
pub use pipeline::{
    PipelineConfig, PipelineContext, PipelineEvent, PipelineHandle, PipelineState, RenderBackend,
    RenderPipeline,
};
pub use selector::DocumentSelector;
pub use sink::{
    AppliedTexture, RecordingSink, SamplingMode, SceneTextureSink, SinkError, SinkState,
    SurfaceTarget, TextureBinding, TextureFormat,
};
pub use version::{TextureVersion, TextureVersionManager, FIRST_BOUND_VERSION};
