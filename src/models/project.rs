use std::path::{Path, PathBuf};

/// 已加载的项目：以文件位置作为身份标识
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    location: PathBuf,
    is_dirty: bool,
}

impl Project {
    pub fn new(location: impl Into<PathBuf>) -> Self {
        Self {
            location: location.into(),
            is_dirty: false,
        }
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    pub fn set_is_dirty(&mut self, dirty: bool) {
        self.is_dirty = dirty;
    }

    /// 服务定位器里用于区分各项目实例的 tag
    pub fn tag(&self) -> String {
        location_tag(&self.location)
    }
}

pub fn location_tag(location: &Path) -> String {
    location.to_string_lossy().into_owned()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveChangesReason {
    Closing,
}

#[derive(Debug, Clone)]
pub struct ProjectCancelEvent {
    pub project: Project,
    pub cancel: bool,
}

impl ProjectCancelEvent {
    pub fn new(project: Project) -> Self {
        Self {
            project,
            cancel: false,
        }
    }
}
