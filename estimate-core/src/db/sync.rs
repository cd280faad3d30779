use tracing::{info, warn};

use super::repository::{EstimateRepository, OfflineRepository, RepositoryError};
use crate::models::NewEstimateSubmission;

/// Counts from one [`sync_offline_data`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub estimates_synced: usize,
    pub contacts_synced: usize,
    /// Records still waiting in the offline store after this pass.
    pub remaining: usize,
}

impl SyncReport {
    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }
}

/// Copies every unsynced record from `offline` into `primary`, oldest first,
/// and marks each one synced after the primary accepts it.
///
/// A primary save failure ends the pass: that record and everything after it
/// stay pending and are counted in [`SyncReport::remaining`]. Errors from the
/// offline store itself are returned.
pub async fn sync_offline_data(
    offline: &dyn OfflineRepository,
    primary: &dyn EstimateRepository,
) -> Result<SyncReport, RepositoryError> {
    let estimates = offline.pending_estimates().await?;
    let contacts = offline.pending_contacts().await?;
    let total = estimates.len() + contacts.len();
    let mut report = SyncReport::default();

    if total == 0 {
        return Ok(report);
    }

    for pending in estimates {
        let submission = NewEstimateSubmission {
            record: pending.record,
            estimate: pending.estimate,
        };
        match primary.save_estimate(submission).await {
            Ok(stored) => {
                offline.mark_estimate_synced(&pending.id).await?;
                info!(local_id = %pending.id, id = %stored.id, "synced offline estimate");
                report.estimates_synced += 1;
            }
            Err(e) => {
                warn!(error = %e, local_id = %pending.id, "offline sync stopped");
                report.remaining = total - report.estimates_synced;
                return Ok(report);
            }
        }
    }

    for pending in contacts {
        match primary.save_contact(pending.submission).await {
            Ok(stored) => {
                offline.mark_contact_synced(&pending.id).await?;
                info!(local_id = %pending.id, id = %stored.id, "synced offline contact");
                report.contacts_synced += 1;
            }
            Err(e) => {
                warn!(error = %e, local_id = %pending.id, "offline sync stopped");
                report.remaining = total - report.estimates_synced - report.contacts_synced;
                return Ok(report);
            }
        }
    }

    info!(
        estimates = report.estimates_synced,
        contacts = report.contacts_synced,
        "offline data synced"
    );
    Ok(report)
}
