//! In-memory repository used by the unit tests in this crate.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;

use super::repository::{EstimateRepository, OfflineRepository, RepositoryError};
use crate::models::{
    CONTACT_SOURCE, ContactSubmission, ESTIMATE_SOURCE, NewEstimateSubmission, STATUS_NEW,
    StoredContact, StoredEstimate,
};

pub(crate) struct MemoryRepository {
    name: &'static str,
    offline: bool,
    failing: AtomicBool,
    /// Saves allowed before `failing` switches on; `usize::MAX` means never.
    fail_after: AtomicUsize,
    estimates: Mutex<Vec<StoredEstimate>>,
    contacts: Mutex<Vec<StoredContact>>,
}

impl MemoryRepository {
    pub(crate) fn primary(name: &'static str) -> Self {
        Self::build(name, false)
    }

    /// Records are stored unsynced, as a local fallback store does.
    pub(crate) fn offline(name: &'static str) -> Self {
        Self::build(name, true)
    }

    fn build(name: &'static str, offline: bool) -> Self {
        Self {
            name,
            offline,
            failing: AtomicBool::new(false),
            fail_after: AtomicUsize::new(usize::MAX),
            estimates: Mutex::new(Vec::new()),
            contacts: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub(crate) fn fail_after(&self, saves: usize) {
        self.fail_after.store(saves, Ordering::SeqCst);
    }

    pub(crate) fn estimate_count(&self) -> usize {
        self.estimates.lock().unwrap().len()
    }

    pub(crate) fn contact_count(&self) -> usize {
        self.contacts.lock().unwrap().len()
    }

    fn check_available(&self) -> Result<(), RepositoryError> {
        let saved = self.estimate_count() + self.contact_count();
        if self.failing.load(Ordering::SeqCst) || saved >= self.fail_after.load(Ordering::SeqCst)
        {
            return Err(RepositoryError::Connection(format!("{} is down", self.name)));
        }
        Ok(())
    }

    fn next_id(&self) -> String {
        let n = self.estimate_count() + self.contact_count() + 1;
        format!("{}_{n}", self.name)
    }
}

#[async_trait]
impl EstimateRepository for MemoryRepository {
    fn backend_name(&self) -> &str {
        self.name
    }

    async fn save_estimate(
        &self,
        submission: NewEstimateSubmission,
    ) -> Result<StoredEstimate, RepositoryError> {
        self.check_available()?;
        let stored = StoredEstimate {
            id: self.next_id(),
            record: submission.record,
            estimate: submission.estimate,
            source: ESTIMATE_SOURCE.to_string(),
            status: STATUS_NEW.to_string(),
            synced: !self.offline,
            created_at: Utc::now(),
        };
        self.estimates.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn get_estimate(&self, id: &str) -> Result<StoredEstimate, RepositoryError> {
        self.estimates
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn list_estimates(&self) -> Result<Vec<StoredEstimate>, RepositoryError> {
        Ok(self.estimates.lock().unwrap().iter().rev().cloned().collect())
    }

    async fn save_contact(
        &self,
        submission: ContactSubmission,
    ) -> Result<StoredContact, RepositoryError> {
        self.check_available()?;
        let stored = StoredContact {
            id: self.next_id(),
            submission,
            source: CONTACT_SOURCE.to_string(),
            status: STATUS_NEW.to_string(),
            synced: !self.offline,
            created_at: Utc::now(),
        };
        self.contacts.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn list_contacts(&self) -> Result<Vec<StoredContact>, RepositoryError> {
        Ok(self.contacts.lock().unwrap().iter().rev().cloned().collect())
    }
}

#[async_trait]
impl OfflineRepository for MemoryRepository {
    async fn pending_estimates(&self) -> Result<Vec<StoredEstimate>, RepositoryError> {
        Ok(self
            .estimates
            .lock()
            .unwrap()
            .iter()
            .filter(|e| !e.synced)
            .cloned()
            .collect())
    }

    async fn pending_contacts(&self) -> Result<Vec<StoredContact>, RepositoryError> {
        Ok(self
            .contacts
            .lock()
            .unwrap()
            .iter()
            .filter(|c| !c.synced)
            .cloned()
            .collect())
    }

    async fn mark_estimate_synced(&self, id: &str) -> Result<(), RepositoryError> {
        let mut estimates = self.estimates.lock().unwrap();
        let estimate = estimates
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(RepositoryError::NotFound)?;
        estimate.synced = true;
        Ok(())
    }

    async fn mark_contact_synced(&self, id: &str) -> Result<(), RepositoryError> {
        let mut contacts = self.contacts.lock().unwrap();
        let contact = contacts
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(RepositoryError::NotFound)?;
        contact.synced = true;
        Ok(())
    }
}

/// A complete Tacoma commercial submission.
pub(crate) fn sample_submission() -> NewEstimateSubmission {
    use crate::calculations::estimate;
    use crate::models::{ContactInfo, EstimateRecord, ProjectType, Region, Timeline};

    let record = EstimateRecord {
        project_type: Some(ProjectType::Commercial),
        location: "Tacoma, WA".to_string(),
        region: Some(Region::Washington),
        square_footage: 2000,
        stories: 1,
        timeline: Some(Timeline::OneToThreeMonths),
        contact: ContactInfo {
            name: "Dana Reyes".to_string(),
            email: "dana@example.com".to_string(),
            phone: "509-555-0142".to_string(),
            company: None,
        },
        ..EstimateRecord::default()
    };
    let estimate = estimate(&record);
    NewEstimateSubmission { record, estimate }
}

pub(crate) fn sample_contact() -> ContactSubmission {
    ContactSubmission {
        kind: crate::models::InquiryKind::General,
        name: "Sam Ortiz".to_string(),
        email: "sam@example.com".to_string(),
        phone: None,
        company: None,
        project_type: None,
        message: Some("Do you build pole barns?".to_string()),
    }
}
