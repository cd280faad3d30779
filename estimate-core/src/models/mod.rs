mod construction_type;
mod estimate_record;
mod project;
mod project_estimate;
mod project_type;
mod region;
mod submission;
mod timeline;

pub use construction_type::ConstructionType;
pub use estimate_record::{ContactInfo, EstimateRecord};
pub use project::{Project, ProjectCategory};
pub use project_estimate::{CostBreakdown, ProjectEstimate};
pub use project_type::ProjectType;
pub use region::{Region, RegionFactors};
pub use submission::{
    CONTACT_SOURCE, ContactSubmission, ESTIMATE_SOURCE, InquiryKind, NewEstimateSubmission,
    STATUS_NEW, SaveOutcome, StoredContact, StoredEstimate,
};
pub use timeline::Timeline;
