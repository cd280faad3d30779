use async_trait::async_trait;
use estimate_core::db::{DbConfig, RepositoryFactory};
use estimate_core::{EstimateRepository, RepositoryError};

use crate::repository::LocalRepository;

/// [`RepositoryFactory`] for the `"local"` backend.
///
/// `connection_string` is the JSON file to keep records in, or `":memory:"`
/// for a store that is discarded on exit.
pub struct LocalRepositoryFactory;

impl LocalRepositoryFactory {
    /// Opens the store with its concrete type, for callers that also need
    /// the [`estimate_core::OfflineRepository`] side (offline sync).
    pub async fn open(config: &DbConfig) -> Result<LocalRepository, RepositoryError> {
        match config.connection_string.trim() {
            ":memory:" => Ok(LocalRepository::in_memory()),
            path => LocalRepository::open(path).await,
        }
    }
}

#[async_trait]
impl RepositoryFactory for LocalRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "local"
    }

    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn EstimateRepository>, RepositoryError> {
        Ok(Box::new(Self::open(config).await?))
    }
}
