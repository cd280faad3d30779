//! Per-step predicates that gate forward navigation.
//!
//! | Step | Rule |
//! |------|------|
//! | 1    | a project type is selected |
//! | 2    | location is longer than 3 characters |
//! | 3    | square footage is at least 100 |
//! | 4    | name, email (`@` and `.`), phone (10+ digits), timeline, checked in that order |
//! | 5    | always valid |

use thiserror::Error;

use super::{EstimateDraft, WizardStep};

/// Smallest square footage the wizard will price.
pub const MIN_SQUARE_FOOTAGE: u32 = 100;
/// Minimum digits in a phone number, ignoring punctuation.
pub const MIN_PHONE_DIGITS: usize = 10;
/// A location must be strictly longer than this many characters.
pub const MIN_LOCATION_CHARS: usize = 3;

/// Why the active step cannot advance. The message is shown inline.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StepValidationError {
    #[error("select a project type")]
    MissingProjectType,

    #[error("enter a valid location")]
    InvalidLocation,

    #[error("enter valid square footage")]
    InvalidSquareFootage,

    #[error("enter your name")]
    MissingName,

    #[error("enter a valid email address")]
    InvalidEmail,

    #[error("enter a valid phone number")]
    InvalidPhone,

    #[error("select a timeline")]
    MissingTimeline,
}

impl StepValidationError {
    /// Draft field the message should be attached to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingProjectType => "project_type",
            Self::InvalidLocation => "location",
            Self::InvalidSquareFootage => "square_footage",
            Self::MissingName => "name",
            Self::InvalidEmail => "email",
            Self::InvalidPhone => "phone",
            Self::MissingTimeline => "timeline",
        }
    }
}

/// Runs the single rule for `step` against the draft. No I/O.
pub fn validate_step(
    step: WizardStep,
    draft: &EstimateDraft,
) -> Result<(), StepValidationError> {
    match step {
        WizardStep::ProjectType => validate_project_type(draft),
        WizardStep::Location => validate_location(draft),
        WizardStep::Details => validate_details(draft),
        WizardStep::Contact => validate_contact(draft),
        WizardStep::Results => Ok(()),
    }
}

fn validate_project_type(draft: &EstimateDraft) -> Result<(), StepValidationError> {
    match draft.project_type {
        Some(_) => Ok(()),
        None => Err(StepValidationError::MissingProjectType),
    }
}

/// Counts the trimmed text, matching what the committed record will hold.
fn validate_location(draft: &EstimateDraft) -> Result<(), StepValidationError> {
    if draft.location.trim().chars().count() > MIN_LOCATION_CHARS {
        Ok(())
    } else {
        Err(StepValidationError::InvalidLocation)
    }
}

fn validate_details(draft: &EstimateDraft) -> Result<(), StepValidationError> {
    if draft.square_footage >= MIN_SQUARE_FOOTAGE {
        Ok(())
    } else {
        Err(StepValidationError::InvalidSquareFootage)
    }
}

fn validate_contact(draft: &EstimateDraft) -> Result<(), StepValidationError> {
    if draft.name.trim().is_empty() {
        return Err(StepValidationError::MissingName);
    }
    if !(draft.email.contains('@') && draft.email.contains('.')) {
        return Err(StepValidationError::InvalidEmail);
    }
    if phone_digit_count(&draft.phone) < MIN_PHONE_DIGITS {
        return Err(StepValidationError::InvalidPhone);
    }
    if draft.timeline.is_none() {
        return Err(StepValidationError::MissingTimeline);
    }
    Ok(())
}

fn phone_digit_count(phone: &str) -> usize {
    phone.chars().filter(|c| c.is_ascii_digit()).count()
}
