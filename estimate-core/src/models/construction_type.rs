use serde::{Deserialize, Serialize};

/// Finish level selected on the project-details step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstructionType {
    Basic,
    #[default]
    Standard,
    Premium,
    Luxury,
}

impl ConstructionType {
    pub fn all() -> &'static [ConstructionType] {
        &[
            ConstructionType::Basic,
            ConstructionType::Standard,
            ConstructionType::Premium,
            ConstructionType::Luxury,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Standard => "standard",
            Self::Premium => "premium",
            Self::Luxury => "luxury",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Some(Self::Basic),
            "standard" => Some(Self::Standard),
            "premium" => Some(Self::Premium),
            "luxury" => Some(Self::Luxury),
            _ => None,
        }
    }
}
