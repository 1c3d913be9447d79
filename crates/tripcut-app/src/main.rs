//! Tripcut - travel vlog timelines from raw footage
//!
//! Samples each video, asks the model for a timeline and writes the result
//! next to the other outputs in `--out-dir`.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use tripcut_ai::GeminiClient;
use tripcut_app::{export, maps, AppConfig, Pipeline, ProjectStatus, ProjectStore, RunOutcome};
use tripcut_media::{FfmpegOpener, VideoInput};

const DEFAULT_FILTER: &str = "tripcut=info,tripcut_app=info,tripcut_media=info,tripcut_ai=info";

#[derive(Debug, Parser)]
#[command(name = "tripcut", version, about = "Turn travel videos into annotated vlog timelines")]
struct Cli {
    /// Videos to process
    #[arg(required = true)]
    videos: Vec<PathBuf>,

    /// Directory for the generated files
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Maximum number of frames sampled per video
    #[arg(long)]
    target_frames: Option<u32>,

    /// Maximum width of sampled frames in pixels
    #[arg(long)]
    max_width: Option<u32>,

    /// Gemini model to use
    #[arg(long)]
    model: Option<String>,

    /// Seconds to wait for each analysis
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Also write the analysis as JSON
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn apply(&self, config: &mut AppConfig) {
        let pipeline = &mut config.pipeline;
        if let Some(count) = self.target_frames {
            pipeline.sampler.target_count = count;
        }
        if let Some(width) = self.max_width {
            pipeline.sampler.max_width = width;
        }
        if let Some(model) = &self.model {
            pipeline.generation.model = model.clone();
        }
        if let Some(secs) = self.timeout_secs {
            pipeline.analysis_timeout = std::time::Duration::from_secs(secs);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    let mut config = AppConfig::from_env()?;
    cli.apply(&mut config);

    if !tripcut_media::ffmpeg_available() {
        bail!("ffmpeg was not found on PATH");
    }
    let client = GeminiClient::new(config.gemini())
        .with_context(|| format!("Set {} to your Gemini API key", tripcut_app::config::API_KEY_VAR))?;

    std::fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("Cannot create {}", cli.out_dir.display()))?;

    info!(videos = cli.videos.len(), model = %config.pipeline.generation.model, "Tripcut starting");

    let pipeline = Pipeline::new(
        ProjectStore::new(),
        Arc::new(FfmpegOpener),
        Arc::new(client),
        config.pipeline,
    );
    let ids: Vec<_> = cli
        .videos
        .iter()
        .map(|path| pipeline.submit(VideoInput::path(path)))
        .collect();

    let outcomes = pipeline.run_all(&ids).await;
    let stems = export::output_stems(&cli.videos);

    let mut failed = 0;
    for (((id, outcome), path), stem) in outcomes.into_iter().zip(&cli.videos).zip(&stems) {
        match outcome {
            RunOutcome::Done => {
                let Some(project) = pipeline.store().get(id) else {
                    continue;
                };
                let Some(analysis) = project.analysis.as_ref() else {
                    continue;
                };
                let written = match write_outputs(&cli.out_dir, stem, analysis, cli.json) {
                    Ok(written) => written,
                    Err(e) => {
                        failed += 1;
                        eprintln!("{}: {e:#}", path.display());
                        continue;
                    }
                };
                println!(
                    "{}: {} ({} frames, {} events) -> {}",
                    project.name,
                    analysis.title,
                    project.frames.len(),
                    analysis.timeline.len(),
                    written.display()
                );
                if let Some(url) = maps::directions_url(analysis) {
                    println!("  route: {url}");
                }
            }
            RunOutcome::Failed(message) => {
                failed += 1;
                eprintln!("{}: failed: {message}", path.display());
            }
            RunOutcome::Cancelled => {
                let status = pipeline.store().get(id).map(|p| p.status().clone());
                eprintln!(
                    "{}: stopped ({})",
                    path.display(),
                    status.as_ref().map_or("removed", ProjectStatus::name)
                );
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {} videos failed", cli.videos.len());
    }
    Ok(())
}

/// Write `<stem>.md` (and `<stem>.json`) into `out_dir`. Returns the
/// Markdown path.
fn write_outputs(
    out_dir: &Path,
    stem: &str,
    analysis: &tripcut_ai::AnalysisResult,
    json: bool,
) -> Result<PathBuf> {
    let markdown_path = out_dir.join(format!("{stem}.md"));
    std::fs::write(&markdown_path, export::to_markdown(analysis))
        .with_context(|| format!("Cannot write {}", markdown_path.display()))?;

    if json {
        let json_path = out_dir.join(format!("{stem}.json"));
        std::fs::write(&json_path, export::to_json(analysis)?)
            .with_context(|| format!("Cannot write {}", json_path.display()))?;
    }
    Ok(markdown_path)
}
