//! 项目宿主：在宿主（UI）线程上串行分发项目事件
//!
//! - 激活 / 关闭由调用方同步触发，回调立即送达各观察者
//! - 后台保存的完成消息在 `poll` 中取出，随后驱动各观察者的定时逻辑

use super::project_manager::{ProjectError, ProjectManager, ProjectMessage};
use super::watchers::ProjectWatcher;
use crate::models::{Project, ProjectCancelEvent};
use std::path::Path;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Instant;

const MAX_PROJECT_MESSAGES_PER_TICK: usize = 64;

pub struct ProjectHost {
    projects: ProjectManager,
    rx: Receiver<ProjectMessage>,
    watchers: Vec<Box<dyn ProjectWatcher>>,
}

impl ProjectHost {
    pub fn new(projects: ProjectManager, rx: Receiver<ProjectMessage>) -> Self {
        Self {
            projects,
            rx,
            watchers: Vec::new(),
        }
    }

    pub fn projects(&self) -> &ProjectManager {
        &self.projects
    }

    pub fn add_watcher<W: ProjectWatcher + 'static>(&mut self, watcher: W) {
        tracing::debug!(watcher = watcher.name(), "watcher registered");
        self.watchers.push(Box::new(watcher));
    }

    pub fn watcher_names(&self) -> Vec<&'static str> {
        self.watchers.iter().map(|w| w.name()).collect()
    }

    pub fn load(&mut self, location: impl AsRef<Path>) -> Result<Project, ProjectError> {
        self.projects.load(location)
    }

    /// 切换激活项目；激活项目未变化时不通知观察者
    pub fn activate(&mut self, location: Option<&Path>) -> Result<(), ProjectError> {
        let (old, new) = self.projects.set_active(location)?;
        if old.as_ref().map(Project::location) == new.as_ref().map(Project::location) {
            return Ok(());
        }
        tracing::info!(
            old = ?old.as_ref().map(|p| p.location().display().to_string()),
            new = ?new.as_ref().map(|p| p.location().display().to_string()),
            "active project changed"
        );
        for watcher in &mut self.watchers {
            watcher.on_activated(old.as_ref(), new.as_ref());
        }
        Ok(())
    }

    pub fn save(&self, location: impl AsRef<Path>) -> Result<(), ProjectError> {
        self.projects.save(location)
    }

    /// 关闭项目；任一观察者取消时返回 `Ok(false)` 且项目保持打开
    pub fn close(&mut self, location: impl AsRef<Path>) -> Result<bool, ProjectError> {
        let location = location.as_ref();
        let project = self
            .projects
            .project(location)
            .ok_or_else(|| ProjectError::NotLoaded(location.to_path_buf()))?;

        let mut event = ProjectCancelEvent::new(project);
        for watcher in &mut self.watchers {
            watcher.on_closing(&mut event);
        }
        if event.cancel {
            tracing::info!(location = %location.display(), "close canceled");
            return Ok(false);
        }

        let is_active = self
            .projects
            .active_project()
            .is_some_and(|p| p.location() == location);
        if is_active {
            self.activate(None)?;
        }
        if let Some(project) = self.projects.remove(location) {
            for watcher in &mut self.watchers {
                watcher.on_closed(&project);
            }
        }
        Ok(true)
    }

    /// 由主循环定时调用；返回是否有项目状态变化
    pub fn poll(&mut self, now: Instant) -> bool {
        let mut changed = false;
        let mut drained = 0usize;
        loop {
            if drained >= MAX_PROJECT_MESSAGES_PER_TICK {
                break;
            }
            match self.rx.try_recv() {
                Ok(msg) => {
                    drained += 1;
                    changed |= self.handle_message(msg);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        for watcher in &mut self.watchers {
            watcher.on_tick(now);
        }
        changed
    }

    fn handle_message(&mut self, msg: ProjectMessage) -> bool {
        match msg {
            ProjectMessage::SaveCompleted {
                location,
                version,
                result,
            } => {
                let project = self.projects.complete_save(&location, version, &result);
                match (result, project) {
                    (Ok(()), Some(project)) => {
                        tracing::info!(location = %location.display(), version, "project saved");
                        for watcher in &mut self.watchers {
                            watcher.on_saved(&project);
                        }
                        true
                    }
                    (Ok(()), None) => {
                        tracing::debug!(location = %location.display(), "save completed for a closed project");
                        false
                    }
                    (Err(error), _) => {
                        tracing::warn!(location = %location.display(), error = %error, "save failed");
                        false
                    }
                }
            }
            ProjectMessage::Written { location, version } => {
                let Some(project) = self.projects.project(&location) else {
                    tracing::debug!(location = %location.display(), "write completed for a closed project");
                    return false;
                };
                tracing::info!(location = %location.display(), version, "project saved");
                for watcher in &mut self.watchers {
                    watcher.on_saved(&project);
                }
                true
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/host.rs"]
mod tests;
