//! 脏状态观察者
//!
//! 把激活项目的编辑器脏状态同步到项目上并刷新窗口标题，
//! 同时按配置的间隔对有修改的项目发起自动保存。
//! 任一时刻最多只订阅一个编辑器的文本变化通知。

use super::{AutoSaveTimer, ProjectWatcher};
use crate::core::ServiceLocator;
use crate::kernel::project_manager::ProjectManager;
use crate::kernel::services::ports::{
    ConfigurationExt, ConfigurationService, CsvTextEditorInstance, EditorEvent,
    MainWindowTitleService, SaveProjectChangesService, SubscriptionId,
};
use crate::models::{Project, ProjectCancelEvent, SaveChangesReason};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Instant;

struct EditorBinding {
    location: PathBuf,
    editor: Arc<dyn CsvTextEditorInstance>,
    subscription: Option<SubscriptionId>,
}

impl EditorBinding {
    fn unsubscribe(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.editor.unsubscribe_text_changed(id);
        }
    }
}

pub struct IsDirtyProjectWatcher {
    projects: ProjectManager,
    locator: ServiceLocator,
    title: Arc<dyn MainWindowTitleService>,
    save_changes: Arc<dyn SaveProjectChangesService>,
    config: Arc<dyn ConfigurationService>,
    binding: Option<EditorBinding>,
    events_tx: Sender<EditorEvent>,
    events_rx: Receiver<EditorEvent>,
    auto_save_timer: AutoSaveTimer,
}

impl IsDirtyProjectWatcher {
    pub fn new(
        projects: ProjectManager,
        locator: ServiceLocator,
        title: Arc<dyn MainWindowTitleService>,
        save_changes: Arc<dyn SaveProjectChangesService>,
        config: Arc<dyn ConfigurationService>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::channel();
        let auto_save_timer = AutoSaveTimer::new(config.auto_save_interval(), Instant::now());
        tracing::debug!(
            interval_ms = auto_save_timer.interval().as_millis() as u64,
            "auto-save timer started"
        );
        Self {
            projects,
            locator,
            title,
            save_changes,
            config,
            binding: None,
            events_tx,
            events_rx,
            auto_save_timer,
        }
    }

    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    pub fn bound_project(&self) -> Option<&Path> {
        self.binding.as_ref().map(|b| b.location.as_path())
    }

    pub fn restart_auto_save_timer(&mut self, now: Instant) {
        self.auto_save_timer.restart(now);
    }

    /// 重新读取自动保存间隔（配置变更后调用）
    pub fn reload_auto_save_interval(&mut self, now: Instant) {
        let interval = self.config.auto_save_interval();
        self.auto_save_timer.set_interval(interval, now);
    }

    fn discard_pending_events(&mut self) {
        while self.events_rx.try_recv().is_ok() {}
    }

    /// 处理累积的文本变化通知；同一批通知只同步一次
    fn process_text_changes(&mut self) {
        let mut changed = false;
        while let Ok(EditorEvent::TextChanged { .. }) = self.events_rx.try_recv() {
            changed = true;
        }
        if changed {
            self.sync_dirty_state();
        }
    }

    fn sync_dirty_state(&self) {
        let Some(binding) = self.binding.as_ref() else {
            return;
        };
        let dirty = binding.editor.is_dirty();
        if let Some(project) = self.projects.active_project() {
            self.projects.set_is_dirty(project.location(), dirty);
        }
        self.title.update_title();
    }

    fn auto_save_if_needed(&self) {
        let Some(binding) = self.binding.as_ref() else {
            return;
        };
        if !binding.editor.is_dirty() || !self.config.auto_save_enabled() {
            return;
        }
        let Some(project) = self.projects.active_project() else {
            tracing::debug!("auto-save skipped: no active project");
            return;
        };
        let location = project.location();
        if self.projects.is_saving(location) {
            tracing::debug!(location = %location.display(), "auto-save skipped: previous save still running");
            return;
        }
        match self.projects.save(location) {
            Ok(()) => tracing::debug!(location = %location.display(), "auto-save started"),
            Err(e) => {
                tracing::debug!(location = %location.display(), error = %e, "auto-save not started")
            }
        }
    }
}

impl ProjectWatcher for IsDirtyProjectWatcher {
    fn name(&self) -> &'static str {
        "IsDirtyProjectWatcher"
    }

    fn on_activated(&mut self, _old: Option<&Project>, new: Option<&Project>) {
        if let Some(binding) = self.binding.as_mut() {
            binding.unsubscribe();
        }
        self.discard_pending_events();

        let Some(new) = new else {
            self.binding = None;
            return;
        };

        let resolved = self
            .locator
            .resolve::<dyn CsvTextEditorInstance>(Some(&new.tag()));
        let reuse = match (&self.binding, &resolved) {
            (Some(binding), Some(editor)) => Arc::ptr_eq(&binding.editor, editor),
            _ => false,
        };
        if !reuse {
            self.binding = resolved.map(|editor| EditorBinding {
                location: new.location().to_path_buf(),
                editor,
                subscription: None,
            });
        }

        match self.binding.as_mut() {
            Some(binding) => {
                binding.subscription =
                    Some(binding.editor.subscribe_text_changed(self.events_tx.clone()));
            }
            None => {
                tracing::debug!(location = %new.location().display(), "no editor instance registered");
            }
        }
    }

    fn on_saved(&mut self, _project: &Project) {
        self.sync_dirty_state();
    }

    fn on_closing(&mut self, event: &mut ProjectCancelEvent) {
        // 尚未处理的文本变化先同步，确认流程要看到最新的脏状态
        self.process_text_changes();
        if event.cancel {
            return;
        }
        if !self
            .save_changes
            .ensure_changes_saved(&event.project, SaveChangesReason::Closing)
        {
            tracing::info!(location = %event.project.location().display(), "closing canceled");
            event.cancel = true;
        }
    }

    fn on_closed(&mut self, project: &Project) {
        if self.bound_project() == Some(project.location()) {
            if let Some(mut binding) = self.binding.take() {
                binding.unsubscribe();
            }
            self.discard_pending_events();
        }
    }

    fn on_tick(&mut self, now: Instant) {
        self.process_text_changes();
        if self.auto_save_timer.poll(now) {
            self.auto_save_if_needed();
        }
    }
}

impl Drop for IsDirtyProjectWatcher {
    fn drop(&mut self) {
        if let Some(binding) = self.binding.as_mut() {
            binding.unsubscribe();
        }
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/watchers/is_dirty.rs"]
mod tests;
