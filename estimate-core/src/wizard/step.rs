use serde::{Deserialize, Serialize};

/// Position in the wizard. Steps are strictly ordered 1 through 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum WizardStep {
    /// Project type selection.
    #[default]
    ProjectType,
    /// Project location.
    Location,
    /// Size, stories, finish level and special requirements.
    Details,
    /// Contact details and timeline.
    Contact,
    /// Results; terminal.
    Results,
}

impl WizardStep {
    pub const COUNT: u8 = 5;

    pub fn number(&self) -> u8 {
        match self {
            Self::ProjectType => 1,
            Self::Location => 2,
            Self::Details => 3,
            Self::Contact => 4,
            Self::Results => 5,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Self::ProjectType),
            2 => Some(Self::Location),
            3 => Some(Self::Details),
            4 => Some(Self::Contact),
            5 => Some(Self::Results),
            _ => None,
        }
    }

    /// Following step, capped at [`WizardStep::Results`].
    pub fn next(&self) -> Self {
        Self::from_number(self.number() + 1).unwrap_or(Self::Results)
    }

    /// Preceding step, floored at [`WizardStep::ProjectType`].
    pub fn previous(&self) -> Self {
        Self::from_number(self.number().saturating_sub(1)).unwrap_or(Self::ProjectType)
    }

    pub fn is_terminal(&self) -> bool {
        *self == Self::Results
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::ProjectType => "Project Type",
            Self::Location => "Location",
            Self::Details => "Project Details",
            Self::Contact => "Contact & Timeline",
            Self::Results => "Your Estimate",
        }
    }

    /// Progress bar fill for this step, in whole percent.
    pub fn progress_percent(&self) -> u8 {
        self.number() * 100 / Self::COUNT
    }
}
