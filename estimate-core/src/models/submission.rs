use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EstimateRecord, ProjectEstimate};

/// `source` stamped on estimates coming from the wizard.
pub const ESTIMATE_SOURCE: &str = "website";
/// `source` stamped on contact-form submissions.
pub const CONTACT_SOURCE: &str = "website_contact_form";
/// Initial workflow status of every stored submission.
pub const STATUS_NEW: &str = "new";

/// Finished wizard output handed to a repository (no id or timestamps).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEstimateSubmission {
    pub record: EstimateRecord,
    pub estimate: ProjectEstimate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEstimate {
    pub id: String,
    pub record: EstimateRecord,
    pub estimate: ProjectEstimate,
    pub source: String,
    pub status: String,
    /// False while the estimate only exists in a local fallback store.
    pub synced: bool,
    pub created_at: DateTime<Utc>,
}

/// Which contact form a submission came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InquiryKind {
    Consultation,
    General,
}

impl InquiryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Consultation => "consultation",
            Self::General => "general",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "consultation" => Some(Self::Consultation),
            "general" => Some(Self::General),
            _ => None,
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            Self::Consultation => {
                "Consultation request submitted! We'll contact you within 24 hours."
            }
            Self::General => {
                "Message sent successfully! We'll respond within 4 hours during business days."
            }
        }
    }

    pub fn failure_message(&self) -> &'static str {
        match self {
            Self::Consultation => "Error submitting request. Please try again or call us directly.",
            Self::General => "Error sending message. Please try again or call us directly.",
        }
    }
}

/// A validated contact form, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub kind: InquiryKind,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub project_type: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredContact {
    pub id: String,
    pub submission: ContactSubmission,
    pub source: String,
    pub status: String,
    pub synced: bool,
    pub created_at: DateTime<Utc>,
}

/// Result of handing a record to a persistence adapter.
///
/// Callers treat anything other than `success` as a soft failure: show a
/// message and keep the user's data where it is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveOutcome {
    pub success: bool,
    pub id: Option<String>,
    pub error: Option<String>,
}

impl SaveOutcome {
    pub fn saved(id: impl Into<String>) -> Self {
        Self {
            success: true,
            id: Some(id.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            id: None,
            error: Some(error.into()),
        }
    }
}
