//! The asynchronous render pipeline.
//!
//! One event-loop task owns all mutable coordination state
//! ([`PipelineContext`]); the font fetch and every render run as spawned
//! tasks reporting back over the loop's channel. The single active texture
//! binding is therefore mutated from exactly one place, with no locks.
//!
//! Ordering guarantees:
//! - no render is submitted before the font resource is available;
//! - texture application follows version (submission) order, never
//!   completion order — a slow-but-newer render is never overwritten by a
//!   fast-but-older one;
//! - selection changes never cancel an in-flight render; a superseded
//!   result completes and is discarded by the version check.

use std::sync::Arc;

use decal_core::{DocumentRegistry, DocumentTree, Extent};
use decal_render::{RasterArtifact, RenderError, SvgRenderer};
use decal_text::FontResource;
use tokio::sync::mpsc;

use crate::loader::{FontFetcher, FontLoader, FontSpec, LoadError};
use crate::selector::DocumentSelector;
use crate::sink::{SamplingMode, SceneTextureSink, SinkError, SurfaceTarget, TextureBinding, TextureFormat};
use crate::version::{TextureVersion, TextureVersionManager};

/// Seam between the pipeline and the document renderer, so tests can inject
/// delay-controlled backends.
pub trait RenderBackend: Send + Sync + 'static {
    fn render(
        &self,
        doc: &DocumentTree,
        font: &FontResource,
        extent: Extent,
    ) -> Result<RasterArtifact, RenderError>;
}

impl RenderBackend for SvgRenderer {
    fn render(
        &self,
        doc: &DocumentTree,
        font: &FontResource,
        extent: Extent,
    ) -> Result<RasterArtifact, RenderError> {
        SvgRenderer::render(self, doc, font, extent)
    }
}

/// Pipeline configuration: the font asset, the initial document, the canvas,
/// and the host binding hints.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub font_url: String,
    pub font: FontSpec,
    pub initial_document: String,
    pub extent: Extent,
    pub target: SurfaceTarget,
    pub format: TextureFormat,
    pub sampling: SamplingMode,
    pub has_alpha: bool,
    pub invert_y: bool,
}

impl PipelineConfig {
    pub fn new(font_url: impl Into<String>) -> Self {
        Self {
            font_url: font_url.into(),
            font: FontSpec::default(),
            initial_document: "helloworldtriangle".into(),
            extent: Extent::square(1024),
            target: SurfaceTarget::default(),
            format: TextureFormat::Rgba,
            sampling: SamplingMode::Trilinear,
            has_alpha: true,
            invert_y: true,
        }
    }
}

/// Pipeline lifecycle states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineState {
    /// Font fetch still outstanding; rendering is not engaged.
    AwaitingFont,
    /// Font fetch failed; persistent error state, rendering never engages.
    LoadFailed,
    /// Font present, no render in flight, nothing bound yet.
    Ready,
    /// At least one render in flight.
    Rendering,
    /// A texture has been bound to the scene.
    Applied,
}

/// All mutable coordination state, owned by the loop task.
#[derive(Debug)]
pub struct PipelineContext {
    pub selection: String,
    pub font: Option<Arc<FontResource>>,
    pub versions: TextureVersionManager,
    pub state: PipelineState,
    in_flight: usize,
}

/// Internal loop messages.
#[derive(Debug)]
pub(crate) enum Msg {
    Select(String),
    FontLoaded(Result<FontResource, LoadError>),
    RenderDone {
        version: u64,
        result: Result<RasterArtifact, String>,
    },
    Shutdown,
}

/// Notifications for observers (UI, tests, logs).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PipelineEvent {
    FontReady { family: String },
    FontFailed { error: String },
    RenderStarted { version: u64 },
    TextureBound { version: u64 },
    TextureSkipped { version: u64 },
    RenderFailed { version: u64, error: String },
}

/// Handle held by the embedding application: selection, events, shutdown.
pub struct PipelineHandle {
    selector: DocumentSelector,
    events: Option<mpsc::Receiver<PipelineEvent>>,
    tx: mpsc::Sender<Msg>,
}

impl PipelineHandle {
    pub fn selector(&mut self) -> &mut DocumentSelector {
        &mut self.selector
    }

    /// Select a document (see [`DocumentSelector::select`]).
    pub async fn select(&mut self, key: &str) {
        self.selector.select(key).await;
    }

    /// Take the event receiver (can only be called once). Keep draining it
    /// while the pipeline runs.
    pub fn take_event_rx(&mut self) -> Option<mpsc::Receiver<PipelineEvent>> {
        self.events.take()
    }

    pub async fn shutdown(&self) {
        let _ = self.tx.send(Msg::Shutdown).await;
    }
}

/// The pipeline event loop.
pub struct RenderPipeline {
    ctx: PipelineContext,
    registry: Arc<DocumentRegistry>,
    backend: Arc<dyn RenderBackend>,
    sink: Box<dyn SceneTextureSink>,
    config: PipelineConfig,
    rx: mpsc::Receiver<Msg>,
    tx: mpsc::Sender<Msg>,
    events_tx: mpsc::Sender<PipelineEvent>,
}

impl RenderPipeline {
    /// Build the pipeline and its handle.
    ///
    /// # Panics
    ///
    /// Panics when `config.initial_document` is not in the registry — the
    /// same contract as [`DocumentSelector::select`].
    pub fn new(
        config: PipelineConfig,
        registry: Arc<DocumentRegistry>,
        backend: Arc<dyn RenderBackend>,
        sink: Box<dyn SceneTextureSink>,
    ) -> (Self, PipelineHandle) {
        let (tx, rx) = mpsc::channel(256);
        let (events_tx, events_rx) = mpsc::channel(256);

        let selector =
            DocumentSelector::new(registry.clone(), config.initial_document.clone(), tx.clone());

        let pipeline = Self {
            ctx: PipelineContext {
                selection: config.initial_document.clone(),
                font: None,
                versions: TextureVersionManager::new(),
                state: PipelineState::AwaitingFont,
                in_flight: 0,
            },
            registry,
            backend,
            sink,
            config,
            rx,
            tx: tx.clone(),
            events_tx,
        };

        let handle = PipelineHandle { selector, events: Some(events_rx), tx };
        (pipeline, handle)
    }

    /// Current coordination state (before the pipeline is moved into `run`).
    pub fn context(&self) -> &PipelineContext {
        &self.ctx
    }

    /// Run the loop: spawn the one-shot font load, then reduce messages
    /// into the context until shutdown.
    pub async fn run(mut self, fetcher: Arc<dyn FontFetcher>) {
        let loader = FontLoader::new(self.config.font.clone(), fetcher);
        let url = self.config.font_url.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = loader.load(&url).await;
            let _ = tx.send(Msg::FontLoaded(result)).await;
        });

        while let Some(msg) = self.rx.recv().await {
            if !self.handle(msg).await {
                break;
            }
        }
        log::info!(
            "Pipeline stopped (last applied version {})",
            self.ctx.versions.last_applied(),
        );
    }

    async fn handle(&mut self, msg: Msg) -> bool {
        match msg {
            Msg::FontLoaded(Ok(resource)) => {
                let family = resource.family().to_string();
                self.ctx.font = Some(Arc::new(resource));
                self.ctx.state = PipelineState::Ready;
                self.emit(PipelineEvent::FontReady { family }).await;
                // Render the current selection now that the font exists.
                self.start_render().await;
            }
            Msg::FontLoaded(Err(e)) => {
                log::error!("Font load failed: {e}");
                self.ctx.state = PipelineState::LoadFailed;
                self.emit(PipelineEvent::FontFailed { error: e.to_string() }).await;
            }
            Msg::Select(key) => {
                self.ctx.selection = key;
                match self.ctx.state {
                    PipelineState::AwaitingFont | PipelineState::LoadFailed => {
                        log::debug!(
                            "Selection '{}' noted; no font, not rendering",
                            self.ctx.selection,
                        );
                    }
                    _ => self.start_render().await,
                }
            }
            Msg::RenderDone { version, result } => {
                self.finish_render(version, result).await;
            }
            Msg::Shutdown => return false,
        }
        true
    }

    /// Submit a render of the current selection. Allocates the version now
    /// so "newer" means "more recently requested". Never called without a
    /// font. Multiple submissions may overlap; the version check resolves
    /// the race at completion time.
    async fn start_render(&mut self) {
        let Some(font) = self.ctx.font.clone() else {
            debug_assert!(false, "start_render without font");
            return;
        };
        let Some(doc) = self.registry.get(&self.ctx.selection) else {
            // Selector and config both validate keys; stale state here is a bug.
            log::error!("Selection '{}' missing from registry", self.ctx.selection);
            return;
        };

        let version = self.ctx.versions.allocate();
        self.ctx.in_flight += 1;
        self.ctx.state = PipelineState::Rendering;
        log::info!("Render v{version} of '{}' started", self.ctx.selection);
        self.emit(PipelineEvent::RenderStarted { version }).await;

        let backend = self.backend.clone();
        let extent = self.config.extent;
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result =
                tokio::task::spawn_blocking(move || backend.render(&doc, &font, extent)).await;
            let result = match result {
                Ok(render_result) => render_result.map_err(|e| e.to_string()),
                Err(join_error) => Err(format!("render task failed: {join_error}")),
            };
            let _ = tx.send(Msg::RenderDone { version, result }).await;
        });
    }

    async fn finish_render(&mut self, version: u64, result: Result<RasterArtifact, String>) {
        self.ctx.in_flight = self.ctx.in_flight.saturating_sub(1);

        match result {
            Ok(artifact) => {
                if self.ctx.versions.should_bind(version) {
                    self.bind(version, artifact).await;
                } else {
                    log::debug!(
                        "Discarding render v{version} (last applied {})",
                        self.ctx.versions.last_applied(),
                    );
                    self.emit(PipelineEvent::TextureSkipped { version }).await;
                    self.settle_state();
                }
            }
            Err(error) => {
                // The last successfully applied texture stays in place.
                log::error!("Render v{version} failed: {error}");
                self.emit(PipelineEvent::RenderFailed { version, error }).await;
                self.settle_state();
            }
        }
    }

    async fn bind(&mut self, version: u64, artifact: RasterArtifact) {
        let binding = TextureBinding {
            texture: TextureVersion::new(version, Arc::new(artifact)),
            format: self.config.format,
            sampling: self.config.sampling,
            has_alpha: self.config.has_alpha,
            invert_y: self.config.invert_y,
        };

        match self.sink.apply(&binding) {
            Ok(()) => {
                self.ctx.versions.mark_applied(version);
                self.ctx.state = PipelineState::Applied;
                self.emit(PipelineEvent::TextureBound { version }).await;
            }
            Err(SinkError::StaleVersion { candidate, active }) => {
                // The manager already filtered stale versions; the sink
                // disagreeing means the two trackers diverged.
                log::warn!("Sink rejected v{candidate} as stale (active {active})");
                self.emit(PipelineEvent::TextureSkipped { version }).await;
                self.settle_state();
            }
            Err(e) => {
                log::error!("Texture apply failed: {e}");
                self.emit(PipelineEvent::RenderFailed { version, error: e.to_string() })
                    .await;
                self.settle_state();
            }
        }
    }

    /// Recompute the coarse state after a render completed without binding.
    fn settle_state(&mut self) {
        if self.ctx.in_flight == 0 && self.ctx.state == PipelineState::Rendering {
            self.ctx.state = if self.ctx.versions.last_applied() > 0 {
                PipelineState::Applied
            } else {
                PipelineState::Ready
            };
        }
    }

    async fn emit(&self, event: PipelineEvent) {
        let _ = self.events_tx.send(event).await;
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::InMemoryFetcher;
    use crate::sink::RecordingSink;

    fn fixture_bytes() -> Vec<u8> {
        std::fs::read(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../assets/fonts/DejaVuSans.ttf"
        ))
        .expect("fixture font should exist")
    }

    fn test_config() -> PipelineConfig {
        PipelineConfig {
            font: FontSpec { family: "DejaVu Sans".into(), ..Default::default() },
            initial_document: "helloworld".into(),
            extent: Extent::square(128),
            ..PipelineConfig::new("mem://font")
        }
    }

    #[test]
    #[should_panic(expected = "unknown document key")]
    fn test_unknown_initial_document_panics() {
        let config = PipelineConfig {
            initial_document: "not-a-document".into(),
            ..PipelineConfig::new("mem://font")
        };
        let sink = RecordingSink::new(SurfaceTarget::default());
        let _ = RenderPipeline::new(
            config,
            Arc::new(DocumentRegistry::builtin()),
            Arc::new(SvgRenderer::new()),
            Box::new(sink),
        );
    }

    #[tokio::test]
    async fn test_smoke_font_load_and_first_bind() {
        let config = test_config();
        let sink = RecordingSink::new(SurfaceTarget::default());
        let sink_state = sink.state();

        let (pipeline, mut handle) = RenderPipeline::new(
            config,
            Arc::new(DocumentRegistry::builtin()),
            Arc::new(SvgRenderer::new()),
            Box::new(sink),
        );
        let mut events = handle.take_event_rx().unwrap();
        tokio::spawn(pipeline.run(Arc::new(InMemoryFetcher::new(fixture_bytes()))));

        // Font ready, then the automatic first render (v1, suppressed).
        assert_eq!(
            events.recv().await,
            Some(PipelineEvent::FontReady { family: "DejaVu Sans".into() }),
        );
        assert_eq!(events.recv().await, Some(PipelineEvent::RenderStarted { version: 1 }));
        assert_eq!(events.recv().await, Some(PipelineEvent::TextureSkipped { version: 1 }));

        // A selection change produces the first visible texture.
        handle.select("helloworld").await;
        assert_eq!(events.recv().await, Some(PipelineEvent::RenderStarted { version: 2 }));
        assert_eq!(events.recv().await, Some(PipelineEvent::TextureBound { version: 2 }));

        let state = sink_state.lock().unwrap();
        let active = state.active.as_ref().unwrap();
        assert_eq!(active.version, 2);
        assert!(active.data_url.starts_with("data:image/svg+xml;base64,"));

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_font_failure_is_persistent() {
        let config = test_config();
        let sink = RecordingSink::new(SurfaceTarget::default());
        let sink_state = sink.state();

        let (pipeline, mut handle) = RenderPipeline::new(
            config,
            Arc::new(DocumentRegistry::builtin()),
            Arc::new(SvgRenderer::new()),
            Box::new(sink),
        );
        let mut events = handle.take_event_rx().unwrap();
        tokio::spawn(pipeline.run(Arc::new(InMemoryFetcher::failing("offline"))));

        match events.recv().await {
            Some(PipelineEvent::FontFailed { error }) => assert!(error.contains("offline")),
            other => panic!("Expected FontFailed, got {other:?}"),
        }

        // Selections after the failure never engage rendering.
        handle.select("cta-card").await;
        handle.select("gradient-banner").await;
        let extra = tokio::time::timeout(
            std::time::Duration::from_millis(100),
            events.recv(),
        )
        .await;
        assert!(extra.is_err(), "no events expected after terminal failure, got {extra:?}");
        assert!(sink_state.lock().unwrap().active.is_none());

        handle.shutdown().await;
    }
}
