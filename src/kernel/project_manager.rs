//! 项目管理：加载、激活、保存与关闭
//!
//! `ProjectManager` 是可克隆的共享句柄。后台保存只负责写盘，
//! 完成后通过 `ProjectMessage` 通知宿主线程，项目状态的推进都在宿主线程完成。

use crate::core::{ServiceError, ServiceLocator};
use crate::kernel::services::adapters::file::{read_project_text, write_rope_to_path};
use crate::kernel::services::adapters::CsvTextEditor;
use crate::kernel::services::ports::{AsyncExecutor, AsyncExecutorExt, CsvTextEditorInstance};
use crate::models::{location_tag, Project};
use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

#[derive(Debug)]
pub enum ProjectMessage {
    SaveCompleted {
        location: PathBuf,
        version: u64,
        result: Result<(), String>,
    },
    /// 同步保存已写盘并推进了保存点，不涉及进行中的后台保存
    Written { location: PathBuf, version: u64 },
}

#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("project not loaded: {}", .0.display())]
    NotLoaded(PathBuf),
    #[error("no editor instance registered for {}", .0.display())]
    EditorMissing(PathBuf),
    #[error("a save of {} is still running", .0.display())]
    SaveInProgress(PathBuf),
    #[error("io error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Service(#[from] ServiceError),
}

#[derive(Default)]
struct ProjectState {
    projects: FxHashMap<PathBuf, Project>,
    /// 加载顺序
    order: Vec<PathBuf>,
    active: Option<PathBuf>,
    saving: FxHashSet<PathBuf>,
}

#[derive(Clone)]
pub struct ProjectManager {
    state: Arc<RwLock<ProjectState>>,
    locator: ServiceLocator,
    executor: Arc<dyn AsyncExecutor>,
    tx: Sender<ProjectMessage>,
}

impl ProjectManager {
    pub fn new(
        locator: ServiceLocator,
        executor: Arc<dyn AsyncExecutor>,
    ) -> (Self, Receiver<ProjectMessage>) {
        let (tx, rx) = mpsc::channel();
        let manager = Self {
            state: Arc::new(RwLock::new(ProjectState::default())),
            locator,
            executor,
            tx,
        };
        (manager, rx)
    }

    pub fn locator(&self) -> &ServiceLocator {
        &self.locator
    }

    /// 从磁盘读取并登记项目；已加载的位置直接返回现有项目
    pub fn load(&self, location: impl AsRef<Path>) -> Result<Project, ProjectError> {
        let location = location.as_ref();
        if let Some(project) = self.project(location) {
            return Ok(project);
        }
        let text = read_project_text(location).map_err(|source| ProjectError::Io {
            path: location.to_path_buf(),
            source,
        })?;
        self.load_from_text(location, &text)
    }

    /// 以给定文本登记项目（不读盘），新建文件时使用
    pub fn load_from_text(
        &self,
        location: impl AsRef<Path>,
        text: &str,
    ) -> Result<Project, ProjectError> {
        let location = location.as_ref();
        if let Some(project) = self.project(location) {
            return Ok(project);
        }

        let tag = location_tag(location);
        let editor = Arc::new(CsvTextEditor::from_text(text));
        self.locator
            .register_instance::<CsvTextEditor>(Some(&tag), Arc::clone(&editor))?;
        let shared: Arc<dyn CsvTextEditorInstance> = editor;
        if let Err(e) = self
            .locator
            .register_instance::<dyn CsvTextEditorInstance>(Some(&tag), shared)
        {
            self.locator.remove::<CsvTextEditor>(Some(&tag));
            return Err(e.into());
        }

        let project = Project::new(location);
        let mut state = self.state.write();
        state.order.push(location.to_path_buf());
        state
            .projects
            .insert(location.to_path_buf(), project.clone());
        drop(state);

        tracing::info!(location = %location.display(), "project loaded");
        Ok(project)
    }

    pub fn project(&self, location: &Path) -> Option<Project> {
        self.state.read().projects.get(location).cloned()
    }

    pub fn projects(&self) -> Vec<Project> {
        let state = self.state.read();
        state
            .order
            .iter()
            .filter_map(|location| state.projects.get(location).cloned())
            .collect()
    }

    pub fn active_project(&self) -> Option<Project> {
        let state = self.state.read();
        state
            .active
            .as_ref()
            .and_then(|location| state.projects.get(location).cloned())
    }

    pub fn editor(&self, location: &Path) -> Option<Arc<dyn CsvTextEditorInstance>> {
        self.locator
            .resolve::<dyn CsvTextEditorInstance>(Some(&location_tag(location)))
    }

    /// 返回值表示标记是否发生变化
    pub fn set_is_dirty(&self, location: &Path, dirty: bool) -> bool {
        let mut state = self.state.write();
        match state.projects.get_mut(location) {
            Some(project) if project.is_dirty() != dirty => {
                project.set_is_dirty(dirty);
                true
            }
            _ => false,
        }
    }

    pub fn is_saving(&self, location: &Path) -> bool {
        self.state.read().saving.contains(location)
    }

    /// 后台保存：立即返回，结果以 `ProjectMessage::SaveCompleted` 送达。
    /// 同一项目同时只允许一个写盘任务，否则旧快照可能后写完覆盖新内容
    pub fn save(&self, location: impl AsRef<Path>) -> Result<(), ProjectError> {
        let location = location.as_ref().to_path_buf();
        let editor = self.editor_for_save(&location)?;

        let mut state = self.state.write();
        if state.saving.contains(&location) {
            return Err(ProjectError::SaveInProgress(location));
        }
        state.saving.insert(location.clone());
        drop(state);

        let snapshot = editor.snapshot();
        let version = snapshot.version;
        tracing::debug!(location = %location.display(), version, "save started");

        let tx = self.tx.clone();
        self.executor.spawn_future(async move {
            let path = location.clone();
            let write =
                tokio::task::spawn_blocking(move || write_rope_to_path(&path, &snapshot.rope))
                    .await;
            let result = match write {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => Err(e.to_string()),
                Err(e) => Err(e.to_string()),
            };
            let _ = tx.send(ProjectMessage::SaveCompleted {
                location,
                version,
                result,
            });
        });
        Ok(())
    }

    /// 同步保存：关闭确认流程需要在继续之前拿到结果。
    /// 后台保存进行中时拒绝，避免两次写盘交错
    pub fn save_now(&self, location: impl AsRef<Path>) -> Result<(), ProjectError> {
        let location = location.as_ref().to_path_buf();
        let editor = self.editor_for_save(&location)?;
        if self.is_saving(&location) {
            return Err(ProjectError::SaveInProgress(location));
        }
        let snapshot = editor.snapshot();

        write_rope_to_path(&location, &snapshot.rope).map_err(|source| ProjectError::Io {
            path: location.clone(),
            source,
        })?;
        editor.mark_saved(snapshot.version);
        tracing::debug!(location = %location.display(), version = snapshot.version, "project written");

        let _ = self.tx.send(ProjectMessage::Written {
            location,
            version: snapshot.version,
        });
        Ok(())
    }

    fn editor_for_save(
        &self,
        location: &Path,
    ) -> Result<Arc<dyn CsvTextEditorInstance>, ProjectError> {
        if self.project(location).is_none() {
            return Err(ProjectError::NotLoaded(location.to_path_buf()));
        }
        self.editor(location)
            .ok_or_else(|| ProjectError::EditorMissing(location.to_path_buf()))
    }

    /// 返回 (旧, 新) 激活项目
    pub(crate) fn set_active(
        &self,
        location: Option<&Path>,
    ) -> Result<(Option<Project>, Option<Project>), ProjectError> {
        let mut state = self.state.write();
        if let Some(location) = location {
            if !state.projects.contains_key(location) {
                return Err(ProjectError::NotLoaded(location.to_path_buf()));
            }
        }
        let old = state
            .active
            .as_ref()
            .and_then(|l| state.projects.get(l).cloned());
        state.active = location.map(Path::to_path_buf);
        let new = location.and_then(|l| state.projects.get(l).cloned());
        Ok((old, new))
    }

    /// 处理保存完成：成功时推进编辑器保存点，返回项目快照
    pub(crate) fn complete_save(
        &self,
        location: &Path,
        version: u64,
        result: &Result<(), String>,
    ) -> Option<Project> {
        self.state.write().saving.remove(location);
        let project = self.project(location)?;
        if result.is_ok() {
            if let Some(editor) = self.editor(location) {
                editor.mark_saved(version);
            }
        }
        Some(project)
    }

    pub(crate) fn remove(&self, location: &Path) -> Option<Project> {
        let mut state = self.state.write();
        let project = state.projects.remove(location)?;
        state.order.retain(|l| l != location);
        state.saving.remove(location);
        if state.active.as_deref() == Some(location) {
            state.active = None;
        }
        drop(state);

        let tag = location_tag(location);
        self.locator.remove::<dyn CsvTextEditorInstance>(Some(&tag));
        self.locator.remove::<CsvTextEditor>(Some(&tag));
        tracing::info!(location = %location.display(), "project removed");
        Some(project)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/project_manager.rs"]
mod tests;
