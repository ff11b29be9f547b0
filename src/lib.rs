pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::memory::InMemoryCatalog;
pub use app::render::{render, OutputFormat};
pub use config::CatalogConfig;
pub use crate::core::{page::SchedulePage, selector::ScheduleSelector};
pub use utils::error::{Result, ScheduleError};
