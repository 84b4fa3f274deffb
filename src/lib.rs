pub mod adapters;
pub mod api;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::Cli;

pub use adapters::{FileMetadataCache, InMemoryUserStore, LocalStorage, SqliteUserStore};
pub use api::{ApiClient, ApiRequest};
pub use config::AppConfig;
pub use core::{engine::ImportEngine, importer::CsvUserImport, metadata::MetadataFetcher};
pub use utils::error::{AppError, Result};
