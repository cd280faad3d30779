use serde::{Deserialize, Serialize};

use super::ProjectType;

/// Portfolio category used by the project gallery filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectCategory {
    Commercial,
    Medical,
    Religious,
    Industrial,
    Winery,
}

impl ProjectCategory {
    pub fn all() -> &'static [ProjectCategory] {
        &[
            ProjectCategory::Commercial,
            ProjectCategory::Medical,
            ProjectCategory::Religious,
            ProjectCategory::Industrial,
            ProjectCategory::Winery,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Commercial => "commercial",
            Self::Medical => "medical",
            Self::Religious => "religious",
            Self::Industrial => "industrial",
            Self::Winery => "winery",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "commercial" => Some(Self::Commercial),
            "medical" => Some(Self::Medical),
            "religious" => Some(Self::Religious),
            "industrial" => Some(Self::Industrial),
            "winery" => Some(Self::Winery),
            _ => None,
        }
    }

    /// Project type the estimator is pre-filled with from a project's details.
    pub fn project_type(&self) -> ProjectType {
        ProjectType::parse(self.as_str())
    }
}

/// A completed project shown in the portfolio gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub category: ProjectCategory,
    pub title: String,
    pub location: String,
    pub description: String,
    pub year: i32,
    pub size: String,
    pub features: Vec<String>,
    pub featured: bool,
}
