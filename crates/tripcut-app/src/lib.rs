//! Tripcut App - Project orchestration and export
//!
//! This crate ties the pipeline together:
//! - Projects and their processing lifecycle
//! - The shared project store
//! - Concurrent per-project pipeline runs
//! - Markdown/JSON export and map links
//! - Environment configuration for the `tripcut` binary

pub mod config;
pub mod error;
pub mod export;
pub mod lifecycle;
pub mod maps;
pub mod project;
pub mod store;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use lifecycle::{reassign_event_frame, Pipeline, PipelineConfig, RunOutcome};
pub use project::{Project, ProjectStatus};
pub use store::ProjectStore;
