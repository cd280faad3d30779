use std::collections::HashMap;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::fallback::FallbackRepository;
use super::repository::{EstimateRepository, RepositoryError};

/// Where one store lives.
///
/// `backend` selects the factory by its [`RepositoryFactory::backend_name`];
/// the factory alone interprets `connection_string`.
///
/// | backend    | connection_string                       |
/// |------------|-----------------------------------------|
/// | `sqlite`   | `estimates.db`, `:memory:`              |
/// | `local`    | `estimates-offline.json`, `:memory:`    |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub backend: String,
    pub connection_string: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            backend: "sqlite".to_string(),
            connection_string: ":memory:".to_string(),
        }
    }
}

/// Opens stores for one backend. Backend crates export a unit struct
/// implementing this, and the binary registers each one at start-up.
#[async_trait]
pub trait RepositoryFactory: Send + Sync {
    /// Key used in [`DbConfig::backend`], e.g. `"sqlite"`.
    fn backend_name(&self) -> &'static str;

    /// Opens the store, creating it (tables, files) if needed.
    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn EstimateRepository>, RepositoryError>;
}

/// Backend name to factory. Fill it once with [`RepositoryRegistry::register`],
/// then open stores with [`RepositoryRegistry::create`] or
/// [`RepositoryRegistry::create_with_fallback`].
pub struct RepositoryRegistry {
    factories: HashMap<&'static str, Box<dyn RepositoryFactory>>,
}

impl RepositoryRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// A later factory with the same name wins.
    pub fn register(
        &mut self,
        factory: Box<dyn RepositoryFactory>,
    ) {
        self.factories.insert(factory.backend_name(), factory);
    }

    /// Sorted, for error messages and `--help` text.
    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Opens the store described by `config`.
    ///
    /// An unregistered backend is a [`RepositoryError::Configuration`] error
    /// listing the names that are registered; anything else comes from the
    /// factory.
    pub async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn EstimateRepository>, RepositoryError> {
        let factory = self
            .factories
            .get(config.backend.as_str())
            .ok_or_else(|| {
                RepositoryError::Configuration(format!(
                    "no '{}' backend (registered: {})",
                    config.backend,
                    self.available_backends().join(", ")
                ))
            })?;

        debug!(backend = %config.backend, "creating repository");
        factory.create(config).await
    }

    /// Build the repository used for saving, picking by availability.
    ///
    /// * Primary and fallback both open → a [`FallbackRepository`] that
    ///   diverts failed saves to the fallback.
    /// * Primary unavailable → the fallback alone.
    ///
    /// # Errors
    /// Returns the fallback's error when neither backend can be opened.
    pub async fn create_with_fallback(
        &self,
        primary: &DbConfig,
        fallback: &DbConfig,
    ) -> Result<Box<dyn EstimateRepository>, RepositoryError> {
        let fallback_repo = self.create(fallback).await;

        match (self.create(primary).await, fallback_repo) {
            (Ok(primary_repo), Ok(fallback_repo)) => Ok(Box::new(FallbackRepository::new(
                primary_repo,
                fallback_repo,
            ))),
            (Ok(primary_repo), Err(e)) => {
                warn!(error = %e, backend = %fallback.backend, "fallback store unavailable");
                Ok(primary_repo)
            }
            (Err(e), Ok(fallback_repo)) => {
                warn!(
                    error = %e,
                    primary = %primary.backend,
                    fallback = %fallback.backend,
                    "primary store unavailable, running in offline mode"
                );
                Ok(fallback_repo)
            }
            (Err(primary_err), Err(fallback_err)) => {
                warn!(error = %primary_err, backend = %primary.backend, "primary store unavailable");
                Err(fallback_err)
            }
        }
    }
}

impl Default for RepositoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use super::{
        DbConfig, EstimateRepository, RepositoryError, RepositoryFactory, RepositoryRegistry,
    };
    use crate::db::test_support::MemoryRepository;

    /// Opens an empty [`MemoryRepository`] named after the backend.
    struct MemoryFactory(&'static str);

    #[async_trait]
    impl RepositoryFactory for MemoryFactory {
        fn backend_name(&self) -> &'static str {
            self.0
        }

        async fn create(
            &self,
            _config: &DbConfig,
        ) -> Result<Box<dyn EstimateRepository>, RepositoryError> {
            Ok(Box::new(MemoryRepository::primary(self.0)))
        }
    }

    /// Always fails to connect.
    struct DownFactory(&'static str);

    #[async_trait]
    impl RepositoryFactory for DownFactory {
        fn backend_name(&self) -> &'static str {
            self.0
        }

        async fn create(
            &self,
            config: &DbConfig,
        ) -> Result<Box<dyn EstimateRepository>, RepositoryError> {
            Err(RepositoryError::Connection(format!(
                "{} at {} is down",
                self.0, config.connection_string
            )))
        }
    }

    fn registry(factories: Vec<Box<dyn RepositoryFactory>>) -> RepositoryRegistry {
        let mut registry = RepositoryRegistry::new();
        for factory in factories {
            registry.register(factory);
        }
        registry
    }

    fn config(backend: &str) -> DbConfig {
        DbConfig {
            backend: backend.to_string(),
            connection_string: "db".to_string(),
        }
    }

    #[test]
    fn default_config_is_in_memory_sqlite() {
        assert_eq!(DbConfig::default(), DbConfig {
            backend: "sqlite".to_string(),
            connection_string: ":memory:".to_string(),
        });
    }

    #[test]
    fn backends_are_listed_sorted_and_deduplicated() {
        let registry = registry(vec![
            Box::new(MemoryFactory("sqlite")),
            Box::new(MemoryFactory("local")),
            Box::new(DownFactory("sqlite")),
        ]);

        assert_eq!(registry.available_backends(), vec!["local", "sqlite"]);
        assert!(RepositoryRegistry::default().available_backends().is_empty());
    }

    #[tokio::test]
    async fn later_registration_replaces_earlier() {
        let registry = registry(vec![
            Box::new(MemoryFactory("sqlite")),
            Box::new(DownFactory("sqlite")),
        ]);

        let result = registry.create(&config("sqlite")).await;

        assert!(matches!(result, Err(RepositoryError::Connection(_))));
    }

    #[tokio::test]
    async fn create_opens_the_named_backend() {
        let registry = registry(vec![
            Box::new(MemoryFactory("sqlite")),
            Box::new(MemoryFactory("local")),
        ]);

        let repo = registry.create(&config("local")).await.unwrap();

        assert_eq!(repo.backend_name(), "local");
    }

    #[tokio::test]
    async fn unknown_backend_lists_registered_ones() {
        let registry = registry(vec![
            Box::new(MemoryFactory("sqlite")),
            Box::new(MemoryFactory("local")),
        ]);

        let result = registry.create(&config("postgres")).await;

        assert_eq!(
            result.err(),
            Some(RepositoryError::Configuration(
                "no 'postgres' backend (registered: local, sqlite)".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn both_available_wraps_primary_with_fallback() {
        let registry = registry(vec![
            Box::new(MemoryFactory("sqlite")),
            Box::new(MemoryFactory("local")),
        ]);

        let repo = registry
            .create_with_fallback(&config("sqlite"), &config("local"))
            .await
            .unwrap();

        assert_eq!(repo.backend_name(), "sqlite+local");
    }

    #[tokio::test]
    async fn primary_down_runs_on_fallback() {
        let registry = registry(vec![
            Box::new(DownFactory("sqlite")),
            Box::new(MemoryFactory("local")),
        ]);

        let repo = registry
            .create_with_fallback(&config("sqlite"), &config("local"))
            .await
            .unwrap();

        assert_eq!(repo.backend_name(), "local");
    }

    #[tokio::test]
    async fn fallback_down_runs_on_primary() {
        let registry = registry(vec![
            Box::new(MemoryFactory("sqlite")),
            Box::new(DownFactory("local")),
        ]);

        let repo = registry
            .create_with_fallback(&config("sqlite"), &config("local"))
            .await
            .unwrap();

        assert_eq!(repo.backend_name(), "sqlite");
    }

    #[tokio::test]
    async fn both_down_reports_fallback_error() {
        let registry = registry(vec![
            Box::new(DownFactory("sqlite")),
            Box::new(DownFactory("local")),
        ]);

        let result = registry
            .create_with_fallback(&config("sqlite"), &config("local"))
            .await;

        assert_eq!(
            result.err(),
            Some(RepositoryError::Connection("local at db is down".to_string()))
        );
    }
}
