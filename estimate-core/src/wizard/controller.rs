use tracing::{debug, info};

use super::{EstimateDraft, StepValidationError, WizardStep, validate_step};
use crate::calculations::PricingEngine;
use crate::models::{ContactInfo, EstimateRecord, ProjectEstimate, ProjectType, Region};

/// State machine for one estimate flow.
///
/// Create one per flow and hand it to whatever renders it; there is no
/// shared instance. Forward navigation validates the active step and commits
/// its fields; backward navigation never validates and never clears anything.
#[derive(Debug, Clone, Default)]
pub struct EstimateWizard {
    step: WizardStep,
    draft: EstimateDraft,
    record: EstimateRecord,
    estimate: Option<ProjectEstimate>,
}

impl EstimateWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &EstimateDraft {
        &self.draft
    }

    /// Mutable access for the rendering layer to record field edits.
    pub fn draft_mut(&mut self) -> &mut EstimateDraft {
        &mut self.draft
    }

    /// Data committed so far.
    pub fn record(&self) -> &EstimateRecord {
        &self.record
    }

    /// Present once the results step has been reached.
    pub fn estimate(&self) -> Option<&ProjectEstimate> {
        self.estimate.as_ref()
    }

    pub fn is_complete(&self) -> bool {
        self.step.is_terminal()
    }

    /// Validates the active step against the draft without moving.
    pub fn validate_current(&self) -> Result<(), StepValidationError> {
        validate_step(self.step, &self.draft)
    }

    /// Attempts to advance one step.
    ///
    /// On failure the step index and the record are untouched. On success
    /// the active step's fields are committed and, when the results step is
    /// entered, the estimate is generated. Calling this on the results step
    /// does nothing.
    pub fn next(&mut self) -> Result<WizardStep, StepValidationError> {
        if self.step.is_terminal() {
            return Ok(self.step);
        }

        if let Err(reason) = self.validate_current() {
            debug!(step = self.step.number(), %reason, "step validation failed");
            return Err(reason);
        }

        self.commit_step();
        self.step = self.step.next();
        debug!(step = self.step.number(), "advanced wizard");

        if self.step.is_terminal() {
            let estimate = PricingEngine.calculate(&self.record);
            info!(
                low = %estimate.low,
                high = %estimate.high,
                weeks = estimate.timeline_weeks,
                "estimate generated"
            );
            self.estimate = Some(estimate);
        }

        Ok(self.step)
    }

    /// Moves back one step. Committed data and draft values are kept.
    pub fn previous(&mut self) -> WizardStep {
        self.step = self.step.previous();
        debug!(step = self.step.number(), "moved wizard back");
        self.step
    }

    /// Selects a project type and, as the selection cards do, immediately
    /// tries to advance when the first step is active.
    pub fn select_project_type(
        &mut self,
        project_type: ProjectType,
    ) -> Result<WizardStep, StepValidationError> {
        self.draft.project_type = Some(project_type);
        if self.step == WizardStep::ProjectType {
            self.next()
        } else {
            Ok(self.step)
        }
    }

    fn commit_step(&mut self) {
        let draft = &self.draft;
        match self.step {
            WizardStep::ProjectType => {
                self.record.project_type = draft.project_type.clone();
            }
            WizardStep::Location => {
                self.record.location = draft.location.trim().to_string();
                self.record.region = Region::detect(&self.record.location);
            }
            WizardStep::Details => {
                self.record.square_footage = draft.square_footage;
                self.record.stories = draft.stories.max(1);
                self.record.construction_type = draft.construction_type;
                self.record.special_requirements = non_empty(&draft.special_requirements);
            }
            WizardStep::Contact => {
                self.record.contact = ContactInfo {
                    name: draft.name.trim().to_string(),
                    email: draft.email.trim().to_string(),
                    phone: draft.phone.trim().to_string(),
                    company: non_empty(&draft.company),
                };
                self.record.timeline = draft.timeline;
            }
            WizardStep::Results => {}
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
