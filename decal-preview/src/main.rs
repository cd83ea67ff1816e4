//! Decal preview — drives the render pipeline headlessly.
//!
//! Stands in for the host 3D engine during bring-up: the scene sink writes
//! each bound texture's SVG to disk instead of a material slot. Usage:
//!
//! ```text
//! decal-preview [font-path-or-url] [document-key] [output-dir]
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::info;

use decal_core::DocumentRegistry;
use decal_pipeline::{
    FileFetcher, FontFetcher, FontSpec, HttpFetcher, PipelineConfig, PipelineEvent,
    RenderPipeline, SceneTextureSink, SinkError, TextureBinding,
};
use decal_render::SvgRenderer;

/// Sink that materializes each bound texture as an SVG file, deleting the
/// replaced file on every swap.
struct SvgFileSink {
    dir: PathBuf,
    active: Option<(u64, PathBuf)>,
}

impl SvgFileSink {
    fn new(dir: PathBuf) -> Self {
        Self { dir, active: None }
    }
}

impl SceneTextureSink for SvgFileSink {
    fn apply(&mut self, binding: &TextureBinding) -> Result<(), SinkError> {
        let version = binding.texture.number;
        if let Some((active, _)) = &self.active {
            if version <= *active {
                return Err(SinkError::StaleVersion { candidate: version, active: *active });
            }
        }

        let path = self.dir.join(format!("decal-v{version}.svg"));
        std::fs::write(&path, binding.texture.artifact.svg())
            .map_err(|e| SinkError::Backend(e.to_string()))?;

        // Release the replaced texture.
        if let Some((_, previous)) = self.active.take() {
            let _ = std::fs::remove_file(previous);
        }
        self.active = Some((version, path.clone()));

        info!("Texture v{version} written to {}", path.display());
        Ok(())
    }
}

fn family_from_path(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "font".into())
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let font_source = args
        .next()
        .unwrap_or_else(|| "assets/fonts/DejaVuSans.ttf".into());
    let document = args.next().unwrap_or_else(|| "helloworldtriangle".into());
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| "preview-out".into()));

    std::fs::create_dir_all(&out_dir).expect("Failed to create output directory");

    let fetcher: Arc<dyn FontFetcher> =
        if font_source.starts_with("http://") || font_source.starts_with("https://") {
            Arc::new(HttpFetcher::new())
        } else {
            Arc::new(FileFetcher)
        };

    let config = PipelineConfig {
        font: FontSpec {
            family: family_from_path(&font_source),
            ..Default::default()
        },
        initial_document: document.clone(),
        ..PipelineConfig::new(font_source)
    };

    let registry = Arc::new(DocumentRegistry::builtin());
    info!("Decal preview: document '{document}' (available: {:?})", registry.keys());

    let sink = SvgFileSink::new(out_dir);
    let (pipeline, mut handle) = RenderPipeline::new(
        config,
        registry,
        Arc::new(SvgRenderer::new()),
        Box::new(sink),
    );
    let mut events = handle.take_event_rx().expect("event receiver");
    let run = tokio::spawn(pipeline.run(fetcher));

    while let Some(event) = events.recv().await {
        match event {
            PipelineEvent::FontReady { family } => {
                info!("Font '{family}' loaded");
                // The very first publish is never shown; select once more to
                // produce the first visible texture.
                handle.select(&document).await;
            }
            PipelineEvent::FontFailed { error } => {
                log::error!("Loading font failed: {error}");
                break;
            }
            PipelineEvent::RenderStarted { version } => {
                info!("Render v{version} started");
            }
            PipelineEvent::TextureSkipped { version } => {
                info!("Render v{version} discarded");
            }
            PipelineEvent::TextureBound { version } => {
                info!("Image version: {version}");
                break;
            }
            PipelineEvent::RenderFailed { version, error } => {
                log::error!("Render v{version} failed: {error}");
                break;
            }
        }
    }

    handle.shutdown().await;
    let _ = run.await;
}
