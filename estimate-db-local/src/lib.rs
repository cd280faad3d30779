//! Local JSON-file store used when the primary database is unreachable.

pub mod factory;
pub mod repository;

pub use factory::LocalRepositoryFactory;
pub use repository::LocalRepository;
