use async_trait::async_trait;
use tracing::warn;

use super::repository::{EstimateRepository, RepositoryError};
use crate::models::{ContactSubmission, NewEstimateSubmission, StoredContact, StoredEstimate};

/// Saves to a primary store and diverts to a fallback when that save fails.
///
/// Each failed save is retried exactly once on the fallback. Reads always go
/// to the primary; records parked in the fallback are copied over later by
/// [`sync_offline_data`](super::sync::sync_offline_data).
pub struct FallbackRepository {
    primary: Box<dyn EstimateRepository>,
    fallback: Box<dyn EstimateRepository>,
    name: String,
}

impl FallbackRepository {
    pub fn new(
        primary: Box<dyn EstimateRepository>,
        fallback: Box<dyn EstimateRepository>,
    ) -> Self {
        let name = format!("{}+{}", primary.backend_name(), fallback.backend_name());
        Self {
            primary,
            fallback,
            name,
        }
    }

    pub fn primary(&self) -> &dyn EstimateRepository {
        self.primary.as_ref()
    }

    pub fn fallback(&self) -> &dyn EstimateRepository {
        self.fallback.as_ref()
    }
}

#[async_trait]
impl EstimateRepository for FallbackRepository {
    fn backend_name(&self) -> &str {
        &self.name
    }

    async fn save_estimate(
        &self,
        submission: NewEstimateSubmission,
    ) -> Result<StoredEstimate, RepositoryError> {
        match self.primary.save_estimate(submission.clone()).await {
            Ok(stored) => Ok(stored),
            Err(e) => {
                warn!(
                    error = %e,
                    fallback = self.fallback.backend_name(),
                    "primary save failed, storing estimate locally"
                );
                self.fallback.save_estimate(submission).await
            }
        }
    }

    async fn get_estimate(&self, id: &str) -> Result<StoredEstimate, RepositoryError> {
        self.primary.get_estimate(id).await
    }

    async fn list_estimates(&self) -> Result<Vec<StoredEstimate>, RepositoryError> {
        self.primary.list_estimates().await
    }

    async fn save_contact(
        &self,
        submission: ContactSubmission,
    ) -> Result<StoredContact, RepositoryError> {
        match self.primary.save_contact(submission.clone()).await {
            Ok(stored) => Ok(stored),
            Err(e) => {
                warn!(
                    error = %e,
                    fallback = self.fallback.backend_name(),
                    "primary save failed, storing contact locally"
                );
                self.fallback.save_contact(submission).await
            }
        }
    }

    async fn list_contacts(&self) -> Result<Vec<StoredContact>, RepositoryError> {
        self.primary.list_contacts().await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::db::test_support::{MemoryRepository, sample_contact, sample_submission};

    fn setup() -> (FallbackRepository, Arc<MemoryRepository>, Arc<MemoryRepository>) {
        let primary = Arc::new(MemoryRepository::primary("remote"));
        let fallback = Arc::new(MemoryRepository::offline("local"));
        let repo = FallbackRepository::new(
            Box::new(primary.clone()),
            Box::new(fallback.clone()),
        );
        (repo, primary, fallback)
    }

    #[test]
    fn backend_name_combines_both_stores() {
        let (repo, _, _) = setup();
        assert_eq!(repo.backend_name(), "remote+local");
    }

    #[tokio::test]
    async fn healthy_primary_receives_the_save() {
        let (repo, primary, fallback) = setup();

        let stored = repo.save_estimate(sample_submission()).await.unwrap();

        assert!(stored.synced);
        assert_eq!(primary.estimate_count(), 1);
        assert_eq!(fallback.estimate_count(), 0);
    }

    #[tokio::test]
    async fn failed_primary_save_lands_in_fallback() {
        let (repo, primary, fallback) = setup();
        primary.set_failing(true);

        let stored = repo.save_estimate(sample_submission()).await.unwrap();

        assert!(!stored.synced);
        assert_eq!(stored.id, "local_1");
        assert_eq!(primary.estimate_count(), 0);
        assert_eq!(fallback.estimate_count(), 1);
    }

    #[tokio::test]
    async fn contact_save_also_falls_back() {
        let (repo, primary, fallback) = setup();
        primary.set_failing(true);

        repo.save_contact(sample_contact()).await.unwrap();

        assert_eq!(fallback.contact_count(), 1);
    }

    #[tokio::test]
    async fn both_failing_returns_fallback_error() {
        let (repo, primary, fallback) = setup();
        primary.set_failing(true);
        fallback.set_failing(true);

        let err = repo.save_estimate(sample_submission()).await.unwrap_err();

        assert_eq!(err, RepositoryError::Connection("local is down".to_string()));
    }

    #[tokio::test]
    async fn reads_come_from_primary() {
        let (repo, primary, _) = setup();
        primary.set_failing(true);
        repo.save_estimate(sample_submission()).await.unwrap();

        assert!(repo.list_estimates().await.unwrap().is_empty());
        assert_eq!(
            repo.get_estimate("local_1").await.unwrap_err(),
            RepositoryError::NotFound
        );
    }
}
