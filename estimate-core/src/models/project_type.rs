use serde::{Deserialize, Serialize};

/// Kind of building the customer wants priced.
///
/// Codes that are not in the fixed list are kept verbatim as [`ProjectType::Other`]
/// so they survive persistence; pricing treats them like [`ProjectType::Commercial`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProjectType {
    Commercial,
    Medical,
    Religious,
    Industrial,
    Winery,
    Custom,
    Other(String),
}

impl ProjectType {
    /// Every project type offered on the first wizard step.
    pub fn all() -> &'static [ProjectType] {
        &[
            ProjectType::Commercial,
            ProjectType::Medical,
            ProjectType::Religious,
            ProjectType::Industrial,
            ProjectType::Winery,
            ProjectType::Custom,
        ]
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Commercial => "commercial",
            Self::Medical => "medical",
            Self::Religious => "religious",
            Self::Industrial => "industrial",
            Self::Winery => "winery",
            Self::Custom => "custom",
            Self::Other(code) => code,
        }
    }

    /// Parses a selection code. Matching is case-insensitive and never fails.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "commercial" => Self::Commercial,
            "medical" => Self::Medical,
            "religious" => Self::Religious,
            "industrial" => Self::Industrial,
            "winery" => Self::Winery,
            "custom" => Self::Custom,
            _ => Self::Other(s.trim().to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Commercial => "Commercial",
            Self::Medical => "Medical Facility",
            Self::Religious => "Religious Facility",
            Self::Industrial => "Industrial",
            Self::Winery => "Winery",
            Self::Custom => "Custom Project",
            Self::Other(code) => code,
        }
    }
}

impl From<String> for ProjectType {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<ProjectType> for String {
    fn from(value: ProjectType) -> Self {
        value.as_str().to_string()
    }
}
