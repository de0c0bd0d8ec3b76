//! 主窗口标题：`<应用名> - <项目位置>`，有未保存修改时追加 `*`

use crate::kernel::project_manager::ProjectManager;
use crate::kernel::services::ports::MainWindowTitleService;
use crate::models::Project;
use tokio::sync::watch;

pub const DEFAULT_APP_NAME: &str = "CSV Text Editor";

pub struct WindowTitleService {
    projects: ProjectManager,
    app_name: String,
    tx: watch::Sender<String>,
}

impl WindowTitleService {
    pub fn new(projects: ProjectManager) -> Self {
        Self::with_app_name(projects, DEFAULT_APP_NAME)
    }

    pub fn with_app_name(projects: ProjectManager, app_name: impl Into<String>) -> Self {
        let app_name = app_name.into();
        let (tx, _rx) = watch::channel(app_name.clone());
        let service = Self {
            projects,
            app_name,
            tx,
        };
        service.update_title();
        service
    }

    /// 订阅标题变化（只在标题文本真正改变时通知）
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.tx.subscribe()
    }

    fn compose(&self, project: Option<&Project>) -> String {
        match project {
            None => self.app_name.clone(),
            Some(project) => {
                let mut title = format!("{} - {}", self.app_name, project.location().display());
                if project.is_dirty() {
                    title.push('*');
                }
                title
            }
        }
    }
}

impl MainWindowTitleService for WindowTitleService {
    fn update_title(&self) {
        let title = self.compose(self.projects.active_project().as_ref());
        let changed = self.tx.send_if_modified(|current| {
            if *current == title {
                return false;
            }
            *current = title.clone();
            true
        });
        if changed {
            tracing::debug!(title = %title, "window title updated");
        }
    }

    fn title(&self) -> String {
        self.tx.borrow().clone()
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/title.rs"]
mod tests;
