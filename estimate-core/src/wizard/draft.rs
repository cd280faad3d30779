use serde::{Deserialize, Serialize};

use crate::models::{ConstructionType, ProjectType, Timeline};

/// Field values as currently entered, before any step commits them.
///
/// The rendering layer writes here freely; [`super::EstimateWizard::next`]
/// validates the active step against this draft and copies that step's
/// fields into the record. Values persist across back-navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateDraft {
    // Step 1
    pub project_type: Option<ProjectType>,

    // Step 2
    pub location: String,

    // Step 3
    pub square_footage: u32,
    pub stories: u32,
    pub construction_type: ConstructionType,
    pub special_requirements: String,

    // Step 4
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub timeline: Option<Timeline>,
}

impl Default for EstimateDraft {
    fn default() -> Self {
        Self {
            project_type: None,
            location: String::new(),
            square_footage: 0,
            stories: 1,
            construction_type: ConstructionType::default(),
            special_requirements: String::new(),
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            company: String::new(),
            timeline: None,
        }
    }
}

impl EstimateDraft {
    /// Sets square footage from raw text input. Unparseable text becomes 0.
    pub fn set_square_footage_input(&mut self, input: &str) {
        self.square_footage = parse_whole_number(input).unwrap_or(0);
    }

    /// Sets the story count from raw text input. Anything below 1 becomes 1.
    pub fn set_stories_input(&mut self, input: &str) {
        self.stories = parse_whole_number(input).unwrap_or(1).max(1);
    }

    /// Sets the finish level; unrecognised codes fall back to standard.
    pub fn set_construction_type_input(&mut self, input: &str) {
        self.construction_type = ConstructionType::parse(input).unwrap_or_default();
    }
}

/// Parses the leading whole number of `input`, ignoring surrounding
/// whitespace and `,` thousands separators.
///
/// `"2,500 sq ft"` parses as 2500. Returns `None` when no digits lead.
pub fn parse_whole_number(input: &str) -> Option<u32> {
    let digits: String = input
        .trim()
        .chars()
        .filter(|c| *c != ',')
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}
