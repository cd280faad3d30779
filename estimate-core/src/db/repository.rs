use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{ContactSubmission, NewEstimateSubmission, StoredContact, StoredEstimate};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Persistence adapter for finished estimates and contact submissions.
///
/// Implementations stamp `id`, `created_at`, `source` and `status` on save.
#[async_trait]
pub trait EstimateRepository: Send + Sync {
    /// Short name of the backend, used in logs.
    fn backend_name(&self) -> &str;

    // Estimates
    async fn save_estimate(
        &self,
        submission: NewEstimateSubmission,
    ) -> Result<StoredEstimate, RepositoryError>;

    async fn get_estimate(&self, id: &str) -> Result<StoredEstimate, RepositoryError>;

    /// Newest first.
    async fn list_estimates(&self) -> Result<Vec<StoredEstimate>, RepositoryError>;

    // Contact submissions
    async fn save_contact(
        &self,
        submission: ContactSubmission,
    ) -> Result<StoredContact, RepositoryError>;

    /// Newest first.
    async fn list_contacts(&self) -> Result<Vec<StoredContact>, RepositoryError>;
}

/// A repository that can hold records not yet copied to the primary store.
#[async_trait]
pub trait OfflineRepository: EstimateRepository {
    /// Unsynced estimates, oldest first.
    async fn pending_estimates(&self) -> Result<Vec<StoredEstimate>, RepositoryError>;

    /// Unsynced contact submissions, oldest first.
    async fn pending_contacts(&self) -> Result<Vec<StoredContact>, RepositoryError>;

    async fn mark_estimate_synced(&self, id: &str) -> Result<(), RepositoryError>;

    async fn mark_contact_synced(&self, id: &str) -> Result<(), RepositoryError>;
}

// Shared handles let one store back both a fallback wrapper and an offline sync.
#[async_trait]
impl<T: EstimateRepository + ?Sized> EstimateRepository for Arc<T> {
    fn backend_name(&self) -> &str {
        (**self).backend_name()
    }

    async fn save_estimate(
        &self,
        submission: NewEstimateSubmission,
    ) -> Result<StoredEstimate, RepositoryError> {
        (**self).save_estimate(submission).await
    }

    async fn get_estimate(&self, id: &str) -> Result<StoredEstimate, RepositoryError> {
        (**self).get_estimate(id).await
    }

    async fn list_estimates(&self) -> Result<Vec<StoredEstimate>, RepositoryError> {
        (**self).list_estimates().await
    }

    async fn save_contact(
        &self,
        submission: ContactSubmission,
    ) -> Result<StoredContact, RepositoryError> {
        (**self).save_contact(submission).await
    }

    async fn list_contacts(&self) -> Result<Vec<StoredContact>, RepositoryError> {
        (**self).list_contacts().await
    }
}

#[async_trait]
impl<T: OfflineRepository + ?Sized> OfflineRepository for Arc<T> {
    async fn pending_estimates(&self) -> Result<Vec<StoredEstimate>, RepositoryError> {
        (**self).pending_estimates().await
    }

    async fn pending_contacts(&self) -> Result<Vec<StoredContact>, RepositoryError> {
        (**self).pending_contacts().await
    }

    async fn mark_estimate_synced(&self, id: &str) -> Result<(), RepositoryError> {
        (**self).mark_estimate_synced(id).await
    }

    async fn mark_contact_synced(&self, id: &str) -> Result<(), RepositoryError> {
        (**self).mark_contact_synced(id).await
    }
}
