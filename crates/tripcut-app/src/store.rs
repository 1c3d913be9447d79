//! In-memory project registry shared by the pipeline and the front end.

use crate::error::{AppError, AppResult};
use crate::project::{Project, ProjectStatus};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Shared handle to the list of projects.
///
/// Cloning is cheap and every clone sees the same projects. Each mutation
/// reads, modifies and writes back a whole record under the write lock, so
/// concurrent pipelines never interleave inside one update.
#[derive(Debug, Clone, Default)]
pub struct ProjectStore {
    projects: Arc<RwLock<Vec<Project>>>,
}

impl ProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a project and return its id.
    pub fn add(&self, project: Project) -> Uuid {
        let id = project.id();
        debug!(%id, name = %project.name, "Added project");
        self.projects.write().push(project);
        id
    }

    /// Snapshot of one project.
    pub fn get(&self, id: Uuid) -> Option<Project> {
        self.projects.read().iter().find(|p| p.id() == id).cloned()
    }

    /// Snapshot of all projects, in upload order.
    pub fn list(&self) -> Vec<Project> {
        self.projects.read().clone()
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.projects.read().iter().any(|p| p.id() == id)
    }

    pub fn len(&self) -> usize {
        self.projects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.read().is_empty()
    }

    /// Move a project to `status`.
    pub fn update_status(&self, id: Uuid, status: ProjectStatus) -> AppResult<()> {
        self.update_fields(id, |project| project.transition(status))
    }

    /// Apply `update` to a project under the write lock.
    ///
    /// If `update` fails the error is returned; any fields it already
    /// changed stay changed, so closures should validate before writing.
    pub fn update_fields<T>(
        &self,
        id: Uuid,
        update: impl FnOnce(&mut Project) -> AppResult<T>,
    ) -> AppResult<T> {
        let mut projects = self.projects.write();
        let project = projects
            .iter_mut()
            .find(|p| p.id() == id)
            .ok_or(AppError::ProjectNotFound(id))?;
        update(project)
    }

    /// Delete a project. Returns the removed record, if it existed.
    pub fn remove(&self, id: Uuid) -> Option<Project> {
        let mut projects = self.projects.write();
        let position = projects.iter().position(|p| p.id() == id)?;
        debug!(%id, "Removed project");
        Some(projects.remove(position))
    }
}
