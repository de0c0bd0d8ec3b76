//! Service adapters: concrete implementations of the ports (IO/async).

pub mod config;
pub mod csv_editor;
pub mod file;
pub mod paths;
pub mod runtime;
pub mod save_changes;
pub mod title;

pub use config::ConfigService;
pub use csv_editor::CsvTextEditor;
pub use paths::{ensure_log_dir, get_log_dir, get_settings_path};
pub use runtime::AsyncRuntime;
pub use save_changes::{FixedChoicePrompt, PromptingSaveChangesService};
pub use title::{WindowTitleService, DEFAULT_APP_NAME};
