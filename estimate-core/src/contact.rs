//! Consultation and general-inquiry contact forms.
//!
//! Only the fields a form marks as required are checked. A required field
//! fails with the first rule it breaks: blank, then (for email and phone)
//! the format check.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tracing::{error, info};

use crate::db::repository::EstimateRepository;
use crate::models::{ContactSubmission, InquiryKind, SaveOutcome};

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d\s\-\(\)\+\.]+$").unwrap());

/// Banner shown above a form that failed validation.
pub const FORM_INVALID_MESSAGE: &str = "Please correct the errors above";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactField {
    Name,
    Email,
    Phone,
    Company,
    ProjectType,
    Message,
}

impl ContactField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Company => "company",
            Self::ProjectType => "project_type",
            Self::Message => "message",
        }
    }
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContactValidationError {
    #[error("This field is required")]
    Required,

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Please enter a valid phone number")]
    InvalidPhone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: ContactField,
    pub error: ContactValidationError,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.error)
    }
}

/// Every field error from one validation pass, in field order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Please correct the errors above")]
pub struct ContactFormErrors(pub Vec<FieldError>);

impl ContactFormErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn for_field(&self, field: ContactField) -> Option<ContactValidationError> {
        self.0.iter().find(|e| e.field == field).map(|e| e.error)
    }
}

/// Raw form input as typed by the visitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactForm {
    pub kind: InquiryKind,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub project_type: String,
    pub message: String,
}

impl ContactForm {
    pub fn new(kind: InquiryKind) -> Self {
        Self {
            kind,
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            company: String::new(),
            project_type: String::new(),
            message: String::new(),
        }
    }

    /// Fields this kind of form will not submit without.
    pub fn required_fields(&self) -> &'static [ContactField] {
        match self.kind {
            InquiryKind::Consultation => &[
                ContactField::Name,
                ContactField::Email,
                ContactField::Phone,
                ContactField::ProjectType,
            ],
            InquiryKind::General => &[
                ContactField::Name,
                ContactField::Email,
                ContactField::Message,
            ],
        }
    }

    pub fn value(&self, field: ContactField) -> &str {
        match field {
            ContactField::Name => &self.name,
            ContactField::Email => &self.email,
            ContactField::Phone => &self.phone,
            ContactField::Company => &self.company,
            ContactField::ProjectType => &self.project_type,
            ContactField::Message => &self.message,
        }
    }

    /// Checks a single field the way a blur handler would.
    pub fn validate_field(&self, field: ContactField) -> Result<(), ContactValidationError> {
        check_value(field, self.value(field))
    }

    /// Checks every required field and collects all failures.
    pub fn validate(&self) -> Result<ContactSubmission, ContactFormErrors> {
        let errors: Vec<FieldError> = self
            .required_fields()
            .iter()
            .filter_map(|&field| {
                self.validate_field(field)
                    .err()
                    .map(|error| FieldError { field, error })
            })
            .collect();

        if !errors.is_empty() {
            return Err(ContactFormErrors(errors));
        }

        Ok(ContactSubmission {
            kind: self.kind,
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: optional(&self.phone),
            company: optional(&self.company),
            project_type: optional(&self.project_type),
            message: optional(&self.message),
        })
    }
}

fn check_value(field: ContactField, value: &str) -> Result<(), ContactValidationError> {
    if value.trim().is_empty() {
        return Err(ContactValidationError::Required);
    }
    match field {
        ContactField::Email if !EMAIL_REGEX.is_match(value) => {
            Err(ContactValidationError::InvalidEmail)
        }
        ContactField::Phone if !PHONE_REGEX.is_match(value) => {
            Err(ContactValidationError::InvalidPhone)
        }
        _ => Ok(()),
    }
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Validates `form` and hands it to `repository`.
///
/// Validation failures come back as `Err` and nothing is stored. A storage
/// failure is a soft failure: the outcome carries the kind's error message.
pub async fn submit_contact(
    form: &ContactForm,
    repository: &dyn EstimateRepository,
) -> Result<SaveOutcome, ContactFormErrors> {
    let submission = form.validate()?;
    let kind = submission.kind;

    match repository.save_contact(submission).await {
        Ok(stored) => {
            info!(id = %stored.id, kind = kind.as_str(), "contact request saved");
            Ok(SaveOutcome::saved(stored.id))
        }
        Err(e) => {
            error!(error = %e, kind = kind.as_str(), "failed to save contact request");
            Ok(SaveOutcome::failed(kind.failure_message()))
        }
    }
}
