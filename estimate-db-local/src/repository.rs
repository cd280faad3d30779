use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

use estimate_core::{
    CONTACT_SOURCE, ContactSubmission, ESTIMATE_SOURCE, EstimateRepository, NewEstimateSubmission,
    OfflineRepository, RepositoryError, STATUS_NEW, StoredContact, StoredEstimate,
};

const ID_PREFIX: &str = "offline_";

/// Everything the local store holds, as written to disk.
#[derive(Debug, Default, Serialize, Deserialize)]
struct LocalStore {
    #[serde(default)]
    estimates: Vec<StoredEstimate>,
    #[serde(default)]
    contacts: Vec<StoredContact>,
}

impl LocalStore {
    fn contains_id(&self, id: &str) -> bool {
        self.estimates.iter().any(|e| e.id == id) || self.contacts.iter().any(|c| c.id == id)
    }

    /// `offline_<millis>`, bumped past any id already taken.
    fn next_id(&self) -> String {
        let mut millis = Utc::now().timestamp_millis();
        loop {
            let id = format!("{ID_PREFIX}{millis}");
            if !self.contains_id(&id) {
                return id;
            }
            millis += 1;
        }
    }
}

/// Fallback store kept in a single JSON file (or only in memory).
///
/// Records saved here are marked unsynced until an offline sync copies them
/// into the primary store.
pub struct LocalRepository {
    path: Option<PathBuf>,
    store: Mutex<LocalStore>,
}

impl LocalRepository {
    /// Opens `path`, starting empty when the file does not exist yet.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let path = path.into();
        let store = match tokio::fs::read_to_string(&path).await {
            Ok(content) if content.trim().is_empty() => LocalStore::default(),
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                RepositoryError::Serialization(format!(
                    "Failed to parse '{}': {}",
                    path.display(),
                    e
                ))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => LocalStore::default(),
            Err(e) => {
                return Err(RepositoryError::Connection(format!(
                    "Failed to read '{}': {}",
                    path.display(),
                    e
                )));
            }
        };

        debug!(
            path = %path.display(),
            estimates = store.estimates.len(),
            contacts = store.contacts.len(),
            "opened local store"
        );

        Ok(Self {
            path: Some(path),
            store: Mutex::new(store),
        })
    }

    /// A store that lives only as long as this value.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            store: Mutex::new(LocalStore::default()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    async fn persist(&self, store: &LocalStore) -> Result<(), RepositoryError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                RepositoryError::Connection(format!(
                    "Failed to create '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let json = serde_json::to_string_pretty(store)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        tokio::fs::write(path, json).await.map_err(|e| {
            RepositoryError::Connection(format!("Failed to write '{}': {}", path.display(), e))
        })
    }
}

#[async_trait]
impl EstimateRepository for LocalRepository {
    fn backend_name(&self) -> &str {
        "local"
    }

    async fn save_estimate(
        &self,
        submission: NewEstimateSubmission,
    ) -> Result<StoredEstimate, RepositoryError> {
        let mut store = self.store.lock().await;
        let stored = StoredEstimate {
            id: store.next_id(),
            record: submission.record,
            estimate: submission.estimate,
            source: ESTIMATE_SOURCE.to_string(),
            status: STATUS_NEW.to_string(),
            synced: false,
            created_at: Utc::now(),
        };

        store.estimates.push(stored.clone());
        if let Err(e) = self.persist(&store).await {
            store.estimates.pop();
            return Err(e);
        }

        info!(id = %stored.id, "estimate stored locally");
        Ok(stored)
    }

    async fn get_estimate(&self, id: &str) -> Result<StoredEstimate, RepositoryError> {
        self.store
            .lock()
            .await
            .estimates
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn list_estimates(&self) -> Result<Vec<StoredEstimate>, RepositoryError> {
        Ok(self.store.lock().await.estimates.iter().rev().cloned().collect())
    }

    async fn save_contact(
        &self,
        submission: ContactSubmission,
    ) -> Result<StoredContact, RepositoryError> {
        let mut store = self.store.lock().await;
        let stored = StoredContact {
            id: store.next_id(),
            submission,
            source: CONTACT_SOURCE.to_string(),
            status: STATUS_NEW.to_string(),
            synced: false,
            created_at: Utc::now(),
        };

        store.contacts.push(stored.clone());
        if let Err(e) = self.persist(&store).await {
            store.contacts.pop();
            return Err(e);
        }

        info!(id = %stored.id, "contact request stored locally");
        Ok(stored)
    }

    async fn list_contacts(&self) -> Result<Vec<StoredContact>, RepositoryError> {
        Ok(self.store.lock().await.contacts.iter().rev().cloned().collect())
    }
}

#[async_trait]
impl OfflineRepository for LocalRepository {
    async fn pending_estimates(&self) -> Result<Vec<StoredEstimate>, RepositoryError> {
        Ok(self
            .store
            .lock()
            .await
            .estimates
            .iter()
            .filter(|e| !e.synced)
            .cloned()
            .collect())
    }

    async fn pending_contacts(&self) -> Result<Vec<StoredContact>, RepositoryError> {
        Ok(self
            .store
            .lock()
            .await
            .contacts
            .iter()
            .filter(|c| !c.synced)
            .cloned()
            .collect())
    }

    async fn mark_estimate_synced(&self, id: &str) -> Result<(), RepositoryError> {
        let mut store = self.store.lock().await;
        let estimate = store
            .estimates
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(RepositoryError::NotFound)?;
        estimate.synced = true;
        self.persist(&store).await
    }

    async fn mark_contact_synced(&self, id: &str) -> Result<(), RepositoryError> {
        let mut store = self.store.lock().await;
        let contact = store
            .contacts
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(RepositoryError::NotFound)?;
        contact.synced = true;
        self.persist(&store).await
    }
}
