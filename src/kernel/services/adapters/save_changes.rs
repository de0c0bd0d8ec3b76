//! 未保存修改的确认流程

use crate::kernel::project_manager::ProjectManager;
use crate::kernel::services::ports::{
    SaveChangesChoice, SaveChangesPrompt, SaveProjectChangesService,
};
use crate::models::{Project, SaveChangesReason};
use std::sync::Arc;

/// 总是给出同一个答案，用于无界面运行
pub struct FixedChoicePrompt(pub SaveChangesChoice);

impl SaveChangesPrompt for FixedChoicePrompt {
    fn ask(&self, _project: &Project, _reason: SaveChangesReason) -> SaveChangesChoice {
        self.0
    }
}

pub struct PromptingSaveChangesService {
    projects: ProjectManager,
    prompt: Arc<dyn SaveChangesPrompt>,
}

impl PromptingSaveChangesService {
    pub fn new(projects: ProjectManager, prompt: Arc<dyn SaveChangesPrompt>) -> Self {
        Self { projects, prompt }
    }
}

impl SaveProjectChangesService for PromptingSaveChangesService {
    fn ensure_changes_saved(&self, project: &Project, reason: SaveChangesReason) -> bool {
        // 以管理器里的最新状态为准，事件里的快照可能已过期
        let dirty = self
            .projects
            .project(project.location())
            .map_or(project.is_dirty(), |p| p.is_dirty());
        if !dirty {
            return true;
        }

        match self.prompt.ask(project, reason) {
            SaveChangesChoice::Save => match self.projects.save_now(project.location()) {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(
                        location = %project.location().display(),
                        error = %e,
                        "save before {:?} failed",
                        reason
                    );
                    false
                }
            },
            SaveChangesChoice::Discard => {
                tracing::info!(location = %project.location().display(), "discarding changes");
                true
            }
            SaveChangesChoice::Cancel => false,
        }
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/save_changes.rs"]
mod tests;
