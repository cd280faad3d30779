use async_trait::async_trait;
use estimate_core::db::{DbConfig, RepositoryFactory};
use estimate_core::{EstimateRepository, RepositoryError};
use tracing::info;

use crate::repository::SqliteRepository;

/// Turns a configured connection string into a sqlx URL.
///
/// * `":memory:"` → an ephemeral in-memory database.
/// * anything already starting with `sqlite:` is passed through.
/// * a bare path → that file, created if it does not exist.
fn database_url(connection_string: &str) -> String {
    let trimmed = connection_string.trim();
    if trimmed == ":memory:" {
        "sqlite::memory:".to_string()
    } else if trimmed.starts_with("sqlite:") {
        trimmed.to_string()
    } else {
        format!("sqlite:{}?mode=rwc", trimmed)
    }
}

/// The `"sqlite"` backend. Opening a store also applies pending migrations.
///
/// ```rust,no_run
/// use estimate_core::db::RepositoryRegistry;
/// use estimate_db_sqlite::SqliteRepositoryFactory;
///
/// let mut registry = RepositoryRegistry::new();
/// registry.register(Box::new(SqliteRepositoryFactory));
/// ```
pub struct SqliteRepositoryFactory;

#[async_trait]
impl RepositoryFactory for SqliteRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn EstimateRepository>, RepositoryError> {
        let url = database_url(&config.connection_string);
        let repo = SqliteRepository::new(&url)
            .await
            .map_err(|e| RepositoryError::Connection(format!("{e:#}")))?;
        repo.run_migrations()
            .await
            .map_err(|e| RepositoryError::Database(format!("{e:#}")))?;
        info!(url = %url, "sqlite repository ready");
        Ok(Box::new(repo))
    }
}
