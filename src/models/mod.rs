//! 数据模型层

pub mod csv_row;
pub mod project;

pub use csv_row::{format_row, quote_field};
pub use project::{location_tag, Project, ProjectCancelEvent, SaveChangesReason};
