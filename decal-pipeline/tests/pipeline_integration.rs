//! End-to-end pipeline tests: font gating, non-idempotent selection, and
//! version ordering under out-of-order render completion.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use decal_core::{DocumentRegistry, DocumentTree, Extent};
use decal_pipeline::{
    FetchError, FontFetcher, FontSpec, InMemoryFetcher, PipelineConfig, PipelineEvent,
    RecordingSink, RenderBackend, RenderPipeline, SurfaceTarget,
};
use decal_render::{RasterArtifact, RenderError};
use decal_text::FontResource;
use tokio::sync::mpsc;
use tokio::time::timeout;
use uuid::Uuid;

fn fixture_bytes() -> Vec<u8> {
    std::fs::read(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../assets/fonts/DejaVuSans.ttf"
    ))
    .expect("fixture font should exist")
}

/// Render backend that sleeps a per-document delay, forcing completions out
/// of submission order.
struct DelayBackend {
    delays: HashMap<Uuid, u64>,
    calls: AtomicUsize,
}

impl DelayBackend {
    fn new(registry: &DocumentRegistry, delays_ms: &[(&str, u64)]) -> Self {
        let delays = delays_ms
            .iter()
            .map(|(key, ms)| {
                let doc = registry.get(key).expect("known key");
                (doc.root.id(), *ms)
            })
            .collect();
        Self { delays, calls: AtomicUsize::new(0) }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RenderBackend for DelayBackend {
    fn render(
        &self,
        doc: &DocumentTree,
        _font: &FontResource,
        extent: Extent,
    ) -> Result<RasterArtifact, RenderError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.delays.get(&doc.root.id()).copied().unwrap_or(0);
        std::thread::sleep(Duration::from_millis(delay));
        Ok(RasterArtifact::new(format!("<svg data-call=\"{call}\"/>"), extent))
    }
}

/// Fetcher that never resolves within any test's lifetime.
struct StalledFetcher;

#[async_trait]
impl FontFetcher for StalledFetcher {
    async fn fetch(&self, _url: &str) -> Result<Vec<u8>, FetchError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Err(FetchError::Unavailable("stalled".into()))
    }
}

fn test_config() -> PipelineConfig {
    PipelineConfig {
        font: FontSpec { family: "DejaVu Sans".into(), ..Default::default() },
        initial_document: "helloworld".into(),
        extent: Extent::square(64),
        ..PipelineConfig::new("mem://font")
    }
}

async fn recv(events: &mut mpsc::Receiver<PipelineEvent>) -> PipelineEvent {
    timeout(Duration::from_secs(10), events.recv())
        .await
        .expect("event within timeout")
        .expect("event channel open")
}

/// Terminal event (bound / skipped / failed) version, if any.
fn terminal_version(event: &PipelineEvent) -> Option<u64> {
    match event {
        PipelineEvent::TextureBound { version }
        | PipelineEvent::TextureSkipped { version }
        | PipelineEvent::RenderFailed { version, .. } => Some(*version),
        _ => None,
    }
}

/// Drain events until every version in `versions` has a terminal event.
async fn drain_until_settled(
    events: &mut mpsc::Receiver<PipelineEvent>,
    versions: &[u64],
) -> Vec<PipelineEvent> {
    let mut seen: Vec<u64> = Vec::new();
    let mut log = Vec::new();
    while !versions.iter().all(|v| seen.contains(v)) {
        let event = recv(events).await;
        if let Some(v) = terminal_version(&event) {
            seen.push(v);
        }
        log.push(event);
    }
    log
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn slow_older_render_never_overwrites_fast_newer_one() {
    let registry = Arc::new(DocumentRegistry::builtin());
    let backend = Arc::new(DelayBackend::new(
        &registry,
        &[("helloworld", 1), ("cta-card", 300), ("gradient-banner", 10)],
    ));
    let sink = RecordingSink::new(SurfaceTarget::default());
    let sink_state = sink.state();

    let (pipeline, mut handle) =
        RenderPipeline::new(test_config(), registry, backend, Box::new(sink));
    let mut events = handle.take_event_rx().unwrap();
    tokio::spawn(pipeline.run(Arc::new(InMemoryFetcher::new(fixture_bytes()))));

    // Font ready → automatic v1 render, suppressed as the first publish.
    assert!(matches!(recv(&mut events).await, PipelineEvent::FontReady { .. }));
    drain_until_settled(&mut events, &[1]).await;

    // v2 is slow (300ms), v3 is fast (10ms): v3 completes first.
    handle.select("cta-card").await;
    handle.select("gradient-banner").await;
    let log = drain_until_settled(&mut events, &[2, 3]).await;

    // The newer render bound; the older one was computed and discarded.
    assert!(log.contains(&PipelineEvent::TextureBound { version: 3 }), "{log:?}");
    assert!(log.contains(&PipelineEvent::TextureSkipped { version: 2 }), "{log:?}");

    let state = sink_state.lock().unwrap();
    assert_eq!(state.active.as_ref().unwrap().version, 3);
    assert!(state.rejected.is_empty(), "manager must filter stale versions before the sink");

    handle.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn final_texture_is_highest_completed_version() {
    let registry = Arc::new(DocumentRegistry::builtin());
    let backend = Arc::new(DelayBackend::new(
        &registry,
        &[("helloworld", 5), ("cta-card", 120), ("gradient-banner", 40)],
    ));
    let sink = RecordingSink::new(SurfaceTarget::default());
    let sink_state = sink.state();

    let (pipeline, mut handle) =
        RenderPipeline::new(test_config(), registry, backend.clone(), Box::new(sink));
    let mut events = handle.take_event_rx().unwrap();
    tokio::spawn(pipeline.run(Arc::new(InMemoryFetcher::new(fixture_bytes()))));

    assert!(matches!(recv(&mut events).await, PipelineEvent::FontReady { .. }));

    // Mixed fast/slow selections → versions 2..=9 complete in scrambled order.
    let selections = [
        "cta-card",
        "gradient-banner",
        "helloworld",
        "cta-card",
        "gradient-banner",
        "helloworld",
        "cta-card",
        "helloworld",
    ];
    for key in selections {
        handle.select(key).await;
    }

    let all_versions: Vec<u64> = (1..=9).collect();
    let log = drain_until_settled(&mut events, &all_versions).await;

    // Every submitted render completed; none failed.
    assert_eq!(backend.calls(), 9);
    assert!(
        !log.iter().any(|e| matches!(e, PipelineEvent::RenderFailed { .. })),
        "{log:?}",
    );

    let state = sink_state.lock().unwrap();
    // The finally-applied texture is the highest completed version.
    assert_eq!(state.active.as_ref().unwrap().version, 9);
    // Application order was strictly increasing...
    for pair in state.released.windows(2) {
        assert!(pair[0] < pair[1], "released out of order: {:?}", state.released);
    }
    // ...and every swap released exactly one prior texture (no leaks).
    assert_eq!(state.released.len() as u64, state.applies - 1);
    assert!(state.rejected.is_empty());

    handle.shutdown().await;
}

#[tokio::test]
async fn no_render_before_font_is_available() {
    let registry = Arc::new(DocumentRegistry::builtin());
    let backend = Arc::new(DelayBackend::new(&registry, &[]));
    let sink = RecordingSink::new(SurfaceTarget::default());
    let sink_state = sink.state();

    let (pipeline, mut handle) =
        RenderPipeline::new(test_config(), registry, backend.clone(), Box::new(sink));
    let mut events = handle.take_event_rx().unwrap();
    tokio::spawn(pipeline.run(Arc::new(StalledFetcher)));

    handle.select("cta-card").await;
    handle.select("gradient-banner").await;
    handle.select("helloworld").await;

    // No artifact is produced while the font is absent.
    let early = timeout(Duration::from_millis(150), events.recv()).await;
    assert!(early.is_err(), "no events expected before font load, got {early:?}");
    assert_eq!(backend.calls(), 0);
    assert!(sink_state.lock().unwrap().active.is_none());

    handle.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn reselecting_the_same_document_renders_again() {
    let registry = Arc::new(DocumentRegistry::builtin());
    let backend = Arc::new(DelayBackend::new(&registry, &[("helloworld", 2)]));
    let sink = RecordingSink::new(SurfaceTarget::default());
    let sink_state = sink.state();

    let (pipeline, mut handle) =
        RenderPipeline::new(test_config(), registry, backend.clone(), Box::new(sink));
    let mut events = handle.take_event_rx().unwrap();
    tokio::spawn(pipeline.run(Arc::new(InMemoryFetcher::new(fixture_bytes()))));

    assert!(matches!(recv(&mut events).await, PipelineEvent::FontReady { .. }));
    drain_until_settled(&mut events, &[1]).await;

    // Same key twice: selection is not idempotent.
    handle.select("helloworld").await;
    handle.select("helloworld").await;
    let log = drain_until_settled(&mut events, &[2, 3]).await;

    let started: Vec<u64> = log
        .iter()
        .filter_map(|e| match e {
            PipelineEvent::RenderStarted { version } => Some(*version),
            _ => None,
        })
        .collect();
    assert_eq!(started, vec![2, 3], "two independent renders expected");
    assert_eq!(backend.calls(), 3);
    assert_eq!(sink_state.lock().unwrap().active.as_ref().unwrap().version, 3);

    handle.shutdown().await;
}
