//! Headless application core: projects, watchers and the host loop.

pub mod host;
pub mod project_manager;
pub mod services;
pub mod watchers;

pub use host::ProjectHost;
pub use project_manager::{ProjectError, ProjectManager, ProjectMessage};
pub use watchers::{AutoSaveTimer, IsDirtyProjectWatcher, ProjectWatcher};
