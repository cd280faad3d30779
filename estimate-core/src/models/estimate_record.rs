use serde::{Deserialize, Serialize};

use super::{ConstructionType, ProjectType, Region, Timeline};

/// Contact details collected on the fourth wizard step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: Option<String>,
}

/// Everything the wizard has committed for one estimate session.
///
/// Fields are only written when the step that owns them passes validation,
/// so a record never holds half of a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateRecord {
    pub project_type: Option<ProjectType>,
    pub location: String,
    /// Derived from `location` when step 2 is committed.
    pub region: Option<Region>,
    pub square_footage: u32,
    pub stories: u32,
    pub construction_type: ConstructionType,
    pub special_requirements: Option<String>,
    pub timeline: Option<Timeline>,
    pub contact: ContactInfo,
}

impl Default for EstimateRecord {
    fn default() -> Self {
        Self {
            project_type: None,
            location: String::new(),
            region: None,
            square_footage: 0,
            stories: 1,
            construction_type: ConstructionType::default(),
            special_requirements: None,
            timeline: None,
            contact: ContactInfo::default(),
        }
    }
}
