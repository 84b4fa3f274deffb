pub mod engine;
pub mod export;
pub mod importer;
pub mod list_view;
pub mod metadata;
pub mod once;
pub mod retry;
pub mod session;

pub use crate::domain::model::{ImportReport, Metadata, NewUser};
pub use crate::domain::ports::{ImportPipeline, MetadataCache, MetadataSource, Storage, UserStore};
pub use crate::utils::error::Result;
