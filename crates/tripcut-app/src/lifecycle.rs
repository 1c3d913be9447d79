//! Per-project pipeline: sample frames, request an analysis, reconcile it.
//!
//! Each project runs as its own task with its own decoder. All failures are
//! caught here and recorded as the project's `Error` status; a project that
//! is deleted while running is abandoned without further writes.

use crate::error::{AppError, AppResult};
use crate::project::{Project, ProjectStatus};
use crate::store::ProjectStore;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, info, warn};
use tripcut_ai::{reconcile, AiError, AnalysisClient, AnalysisRequestBuilder, GenerationSettings};
use tripcut_core::format_timestamp;
use tripcut_media::{FrameSampler, MediaError, SamplerConfig, SourceOpener, VideoInput};
use uuid::Uuid;

/// Settings for a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub sampler: SamplerConfig,
    pub generation: GenerationSettings,
    /// Upper bound on the analysis call.
    pub analysis_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sampler: SamplerConfig::default(),
            generation: GenerationSettings::default(),
            analysis_timeout: Duration::from_secs(180),
        }
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Frames and analysis were published.
    Done,
    /// The project was moved to `Error` with this message.
    Failed(String),
    /// The project was deleted before the run finished.
    Cancelled,
}

/// Why a run stopped early.
enum Halt {
    Cancelled,
    Failed(AppError),
}

impl From<AppError> for Halt {
    fn from(err: AppError) -> Self {
        match err {
            AppError::ProjectNotFound(_) => Halt::Cancelled,
            other => Halt::Failed(other),
        }
    }
}

impl From<MediaError> for Halt {
    fn from(err: MediaError) -> Self {
        Halt::Failed(err.into())
    }
}

impl From<AiError> for Halt {
    fn from(err: AiError) -> Self {
        Halt::Failed(err.into())
    }
}

/// Drives projects from upload to analysis.
#[derive(Clone)]
pub struct Pipeline {
    store: ProjectStore,
    opener: Arc<dyn SourceOpener>,
    client: Arc<dyn AnalysisClient>,
    builder: AnalysisRequestBuilder,
    config: Arc<PipelineConfig>,
}

impl Pipeline {
    pub fn new(
        store: ProjectStore,
        opener: Arc<dyn SourceOpener>,
        client: Arc<dyn AnalysisClient>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            store,
            opener,
            client,
            builder: AnalysisRequestBuilder::new(config.generation.clone()),
            config: Arc::new(config),
        }
    }

    pub fn store(&self) -> &ProjectStore {
        &self.store
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Register a new idle project for `input`.
    pub fn submit(&self, input: VideoInput) -> Uuid {
        self.store.add(Project::from_input(input))
    }

    /// Run one project to completion.
    ///
    /// Never returns an error: failures are recorded on the project and
    /// reported through [`RunOutcome::Failed`].
    pub async fn run(&self, id: Uuid) -> RunOutcome {
        match self.execute(id).await {
            Ok(()) => {
                info!(%id, "Project complete");
                RunOutcome::Done
            }
            Err(Halt::Cancelled) => {
                debug!(%id, "Project removed during processing, stopping");
                RunOutcome::Cancelled
            }
            Err(Halt::Failed(err)) => self.fail(id, err),
        }
    }

    /// Run one project on its own task.
    pub fn spawn(&self, id: Uuid) -> JoinHandle<RunOutcome> {
        let pipeline = self.clone();
        tokio::spawn(async move { pipeline.run(id).await })
    }

    /// Run several projects concurrently.
    ///
    /// Outcomes are returned in the order of `ids`. A project whose task
    /// panicked is reported as failed.
    pub async fn run_all(&self, ids: &[Uuid]) -> Vec<(Uuid, RunOutcome)> {
        let mut tasks = JoinSet::new();
        for &id in ids {
            let pipeline = self.clone();
            tasks.spawn(async move { (id, pipeline.run(id).await) });
        }

        let mut finished = HashMap::with_capacity(ids.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((id, outcome)) => {
                    finished.insert(id, outcome);
                }
                Err(e) => warn!(error = %e, "Project task aborted"),
            }
        }

        ids.iter()
            .map(|&id| {
                let outcome = finished
                    .remove(&id)
                    .unwrap_or_else(|| RunOutcome::Failed("Processing task aborted".to_string()));
                (id, outcome)
            })
            .collect()
    }

    async fn execute(&self, id: Uuid) -> Result<(), Halt> {
        let input = self.store.get(id).ok_or(Halt::Cancelled)?.source;
        self.store.update_status(id, ProjectStatus::Extracting)?;
        info!(%id, name = %input.display_name(), "Extracting frames");

        let source = self.opener.open(&input).await?;
        let sampler = FrameSampler::new(self.config.sampler.clone());
        let frames = sampler
            .sample_with_progress(source, |progress| {
                debug!(
                    %id,
                    captured = progress.captured,
                    planned = progress.planned,
                    at = %format_timestamp(progress.time_offset),
                    "Sampling progress"
                );
            })
            .await?;
        let frames = Arc::new(frames);

        self.store.update_fields(id, |project| {
            project.transition(ProjectStatus::Analyzing)?;
            project.frames = Arc::clone(&frames);
            Ok(())
        })?;
        info!(%id, frames = frames.len(), "Analyzing frames");

        if frames.is_empty() {
            return Err(AiError::NoFrames.into());
        }
        let request = self.builder.build(&frames);
        let timeout = self.config.analysis_timeout;
        let raw = tokio::time::timeout(timeout, self.client.analyze(&request))
            .await
            .map_err(|_| AiError::Timeout(timeout))??;

        let analysis = reconcile(raw.as_deref(), &frames)?;
        self.store.update_fields(id, move |project| {
            project.transition(ProjectStatus::Done)?;
            project.analysis = Some(analysis);
            Ok(())
        })?;
        Ok(())
    }

    fn fail(&self, id: Uuid, err: AppError) -> RunOutcome {
        let message = err.to_string();
        let status = ProjectStatus::Error {
            message: message.clone(),
        };
        match self.store.update_status(id, status) {
            Ok(()) => {
                warn!(%id, error = %message, "Project failed");
                RunOutcome::Failed(message)
            }
            Err(AppError::ProjectNotFound(_)) => {
                debug!(%id, "Project removed before its failure was recorded");
                RunOutcome::Cancelled
            }
            Err(other) => {
                warn!(%id, error = %message, record_error = %other, "Could not record project failure");
                RunOutcome::Failed(message)
            }
        }
    }
}

/// Reattach one timeline event of a finished project to another frame.
///
/// Returns the frame index actually used after clamping.
pub fn reassign_event_frame(
    store: &ProjectStore,
    id: Uuid,
    event: usize,
    frame_index: i64,
) -> AppResult<usize> {
    store.update_fields(id, |project| {
        let frames = Arc::clone(&project.frames);
        let timeline_event = project
            .analysis
            .as_mut()
            .and_then(|analysis| analysis.timeline.get_mut(event))
            .ok_or(AppError::EventNotFound { project: id, event })?;
        Ok(timeline_event.reassign_frame(frame_index, &frames)?)
    })
}
