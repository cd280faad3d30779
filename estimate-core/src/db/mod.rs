pub mod factory;
pub mod fallback;
pub mod repository;
pub mod sync;

#[cfg(test)]
pub(crate) mod test_support;

pub use factory::{DbConfig, RepositoryFactory, RepositoryRegistry};
pub use fallback::FallbackRepository;
pub use repository::{EstimateRepository, OfflineRepository, RepositoryError};
pub use sync::{SyncReport, sync_offline_data};
