//! Project gallery catalog loading.

pub mod loader;

pub use loader::{CatalogLoaderError, ProjectCatalogLoader, ProjectRecord};
