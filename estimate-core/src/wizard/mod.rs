//! Five-step estimate wizard.
//!
//! [`EstimateWizard`] is the synchronous state machine; [`EstimateSession`]
//! wraps it with the simulated processing delay and the hand-off to a
//! persistence adapter.

mod controller;
mod draft;
mod session;
mod step;
mod validation;

pub use controller::EstimateWizard;
pub use draft::{EstimateDraft, parse_whole_number};
pub use session::{EstimateSession, SessionConfig};
pub use step::WizardStep;
pub use validation::{StepValidationError, validate_step};
