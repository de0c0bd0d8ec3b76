//! Service ports: traits + data contracts.

pub mod config;
pub mod editor;
pub mod runtime;
pub mod save_changes;
pub mod title;

pub use config::{ConfigurationExt, ConfigurationService};
pub use editor::{CsvTextEditorInstance, EditorEvent, SubscriptionId, TextSnapshot};
pub use runtime::{AsyncExecutor, AsyncExecutorExt, BoxFuture};
pub use save_changes::{SaveChangesChoice, SaveChangesPrompt, SaveProjectChangesService};
pub use title::MainWindowTitleService;
