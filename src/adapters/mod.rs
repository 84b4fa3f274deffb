// Adapters layer: concrete implementations of the domain ports.

pub mod local;
pub mod memory;
pub mod sqlite;

pub use local::{FileMetadataCache, LocalStorage};
pub use memory::InMemoryUserStore;
pub use sqlite::SqliteUserStore;
