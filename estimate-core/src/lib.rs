pub mod calculations;
pub mod contact;
pub mod db;
pub mod gallery;
pub mod models;
pub mod wizard;

pub use db::repository::{EstimateRepository, OfflineRepository, RepositoryError};
pub use models::*;
