use crate::domain::model::{ImportReport, Metadata, NewUser};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn remove_file(&self, path: &str) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Destination of the legacy user import.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Exact, case-sensitive lookup.
    async fn find_id_by_email(&self, email: &str) -> Result<Option<i64>>;
    async fn insert(&self, user: &NewUser) -> Result<i64>;
}

/// Where franchise metadata comes from.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn fetch_metadata(&self, token: Option<&str>) -> Result<Metadata>;
}

/// Client-side slot the last good metadata is kept in.
#[async_trait]
pub trait MetadataCache: Send + Sync {
    async fn store(&self, metadata: &Metadata) -> Result<()>;
    async fn load(&self) -> Result<Option<Metadata>>;
}

#[async_trait]
pub trait ImportPipeline: Send + Sync {
    type Row: Send;
    type Record: Send;

    async fn extract(&self) -> Result<Vec<Self::Row>>;
    async fn transform(&self, rows: Vec<Self::Row>) -> Result<(Vec<Self::Record>, ImportReport)>;
    async fn load(&self, records: Vec<Self::Record>, report: ImportReport) -> Result<ImportReport>;
}
