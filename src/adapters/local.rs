use crate::domain::model::Metadata;
use crate::domain::ports::{MetadataCache, Storage};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn full_path(&self, path: &str) -> PathBuf {
        Path::new(&self.base_path).join(path)
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let data = tokio::fs::read(self.full_path(path)).await?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.full_path(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(full_path, data).await?;
        Ok(())
    }

    async fn remove_file(&self, path: &str) -> Result<()> {
        match tokio::fs::remove_file(self.full_path(path)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

pub const METADATA_FILE: &str = "metadata.json";

/// Keeps the last fetched franchise metadata as JSON in the state directory.
#[derive(Debug, Clone)]
pub struct FileMetadataCache {
    storage: LocalStorage,
}

impl FileMetadataCache {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl MetadataCache for FileMetadataCache {
    async fn store(&self, metadata: &Metadata) -> Result<()> {
        let json = serde_json::to_vec_pretty(metadata)?;
        self.storage.write_file(METADATA_FILE, &json).await?;
        tracing::debug!("Cached metadata at {}", self.storage.full_path(METADATA_FILE).display());
        Ok(())
    }

    async fn load(&self) -> Result<Option<Metadata>> {
        match self.storage.read_file(METADATA_FILE).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(crate::utils::error::AppError::Io(e)) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::MetadataStatus;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_then_read_nested_path() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());

        storage.write_file("exports/jobs.csv", b"Job ID\n").await.unwrap();
        let data = storage.read_file("exports/jobs.csv").await.unwrap();
        assert_eq!(data, b"Job ID\n");
    }

    #[tokio::test]
    async fn test_remove_missing_file_is_ok() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());
        assert!(storage.remove_file("session.json").await.is_ok());
    }

    #[tokio::test]
    async fn test_metadata_cache_empty_then_stored() {
        let dir = TempDir::new().unwrap();
        let cache = FileMetadataCache::new(LocalStorage::new(dir.path()));

        assert!(cache.load().await.unwrap().is_none());

        let metadata = Metadata {
            promotional_message: "Spring special".to_string(),
            statuses: vec![MetadataStatus {
                label: "Checked In".to_string(),
                value: "checked_in".to_string(),
            }],
            ..Default::default()
        };
        cache.store(&metadata).await.unwrap();

        assert_eq!(cache.load().await.unwrap(), Some(metadata));
    }
}
