use std::time::Duration;

use tracing::{error, info, warn};

use super::{EstimateWizard, StepValidationError, WizardStep};
use crate::db::repository::EstimateRepository;
use crate::models::{NewEstimateSubmission, SaveOutcome};

/// Message shown when an estimate could not be stored.
pub const SAVE_FAILED_MESSAGE: &str = "Error generating estimate. Please try again or contact us.";

/// Tunables for an [`EstimateSession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Pause before results are shown, mimicking a long computation.
    pub processing_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            processing_delay: Duration::from_millis(3000),
        }
    }
}

/// One user's pass through the wizard, from empty record to stored estimate.
#[derive(Debug, Default)]
pub struct EstimateSession {
    wizard: EstimateWizard,
    config: SessionConfig,
    last_save: Option<SaveOutcome>,
}

impl EstimateSession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            wizard: EstimateWizard::new(),
            config,
            last_save: None,
        }
    }

    pub fn wizard(&self) -> &EstimateWizard {
        &self.wizard
    }

    pub fn wizard_mut(&mut self) -> &mut EstimateWizard {
        &mut self.wizard
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Outcome of the most recent [`EstimateSession::submit`], if any.
    pub fn last_save(&self) -> Option<&SaveOutcome> {
        self.last_save.as_ref()
    }

    /// Advances the wizard. Entering the results step waits out the
    /// processing delay before returning.
    pub async fn next(&mut self) -> Result<WizardStep, StepValidationError> {
        let was_complete = self.wizard.is_complete();
        let step = self.wizard.next()?;

        if !was_complete && step.is_terminal() && !self.config.processing_delay.is_zero() {
            tokio::time::sleep(self.config.processing_delay).await;
        }

        Ok(step)
    }

    pub fn previous(&mut self) -> WizardStep {
        self.wizard.previous()
    }

    /// Hands the finished record and its estimate to `repository`.
    ///
    /// Failures are logged and reported in the returned outcome; the wizard
    /// keeps its step and data so the user can try again. Once a save has
    /// succeeded, later calls return that outcome without saving again.
    pub async fn submit(
        &mut self,
        repository: &dyn EstimateRepository,
    ) -> SaveOutcome {
        if let Some(outcome) = self.last_save.as_ref().filter(|outcome| outcome.success) {
            return outcome.clone();
        }

        let Some(estimate) = self.wizard.estimate().cloned() else {
            warn!(
                step = self.wizard.step().number(),
                "submit called before the estimate was generated"
            );
            return SaveOutcome::failed("estimate is not complete");
        };

        let submission = NewEstimateSubmission {
            record: self.wizard.record().clone(),
            estimate,
        };

        let outcome = match repository.save_estimate(submission).await {
            Ok(stored) => {
                info!(id = %stored.id, synced = stored.synced, "estimate saved");
                SaveOutcome::saved(stored.id)
            }
            Err(e) => {
                error!(error = %e, "failed to save estimate");
                SaveOutcome::failed(SAVE_FAILED_MESSAGE)
            }
        };

        self.last_save = Some(outcome.clone());
        outcome
    }
}
