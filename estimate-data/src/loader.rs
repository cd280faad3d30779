use std::collections::HashSet;
use std::io::Read;

use estimate_core::{Project, ProjectCategory};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when loading a project catalog.
#[derive(Debug, Error)]
pub enum CatalogLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Invalid category '{category}' for project '{id}'")]
    InvalidCategory { id: String, category: String },

    #[error("Duplicate project id '{0}'")]
    DuplicateId(String),

    #[error("Project on line {0} has no id")]
    MissingId(usize),
}

impl From<csv::Error> for CatalogLoaderError {
    fn from(err: csv::Error) -> Self {
        CatalogLoaderError::CsvParse(err.to_string())
    }
}

/// A single row of the project catalog CSV.
///
/// - `id`: stable slug used for detail lookups (e.g. `winery-walla-walla`)
/// - `category`: one of commercial, medical, religious, industrial, winery
/// - `features`: `;`-separated highlight list
/// - `featured`: `true`/`false`, empty meaning false
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ProjectRecord {
    pub id: String,
    pub category: String,
    pub title: String,
    pub location: String,
    pub description: String,
    pub year: i32,
    pub size: String,
    #[serde(default)]
    pub features: String,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub featured: bool,
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s.as_deref().map(str::trim) {
        None | Some("") => Ok(false),
        Some(v) if v.eq_ignore_ascii_case("true") || v == "1" => Ok(true),
        Some(v) if v.eq_ignore_ascii_case("false") || v == "0" => Ok(false),
        Some(v) => Err(serde::de::Error::custom(format!(
            "expected true/false, got '{}'",
            v
        ))),
    }
}

impl ProjectRecord {
    fn feature_list(&self) -> Vec<String> {
        self.features
            .split(';')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Loader for the portfolio shown in the project gallery.
pub struct ProjectCatalogLoader;

impl ProjectCatalogLoader {
    /// Parse catalog rows from a CSV reader without validating them.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<ProjectRecord>, CatalogLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: ProjectRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Validate rows and turn them into gallery projects, keeping file order.
    pub fn into_projects(records: Vec<ProjectRecord>) -> Result<Vec<Project>, CatalogLoaderError> {
        let mut seen = HashSet::new();
        let mut projects = Vec::with_capacity(records.len());

        for (index, record) in records.into_iter().enumerate() {
            if record.id.is_empty() {
                // Header is line 1.
                return Err(CatalogLoaderError::MissingId(index + 2));
            }
            if !seen.insert(record.id.clone()) {
                return Err(CatalogLoaderError::DuplicateId(record.id));
            }
            let category = ProjectCategory::parse(&record.category).ok_or_else(|| {
                CatalogLoaderError::InvalidCategory {
                    id: record.id.clone(),
                    category: record.category.clone(),
                }
            })?;
            let features = record.feature_list();

            projects.push(Project {
                id: record.id,
                category,
                title: record.title,
                location: record.location,
                description: record.description,
                year: record.year,
                size: record.size,
                features,
                featured: record.featured,
            });
        }

        debug!(count = projects.len(), "loaded project catalog");
        Ok(projects)
    }

    /// [`parse`](Self::parse) followed by [`into_projects`](Self::into_projects).
    pub fn load<R: Read>(reader: R) -> Result<Vec<Project>, CatalogLoaderError> {
        Self::into_projects(Self::parse(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const HEADER: &str = "id,category,title,location,description,year,size,features,featured\n";

    fn csv(rows: &str) -> String {
        format!("{HEADER}{rows}")
    }

    #[test]
    fn parses_row_and_splits_features() {
        let data = csv(
            "barn-yakima,industrial,Yakima Equipment Barn,\"Yakima, WA\",Pole barn,2021,\"6,000 sq ft\",Clear Span; Radiant Floor ;,true\n",
        );

        let projects = ProjectCatalogLoader::load(data.as_bytes()).unwrap();

        assert_eq!(projects.len(), 1);
        let barn = &projects[0];
        assert_eq!(barn.category, ProjectCategory::Industrial);
        assert_eq!(barn.location, "Yakima, WA");
        assert_eq!(barn.size, "6,000 sq ft");
        assert_eq!(barn.features, vec!["Clear Span", "Radiant Floor"]);
        assert!(barn.featured);
    }

    #[test]
    fn empty_featured_and_features_default() {
        let data = csv("a,winery,A,B,C,2020,1 sq ft,,\n");

        let projects = ProjectCatalogLoader::load(data.as_bytes()).unwrap();

        assert!(projects[0].features.is_empty());
        assert!(!projects[0].featured);
    }

    #[test]
    fn category_is_case_insensitive() {
        let data = csv("a,Medical,A,B,C,2020,1 sq ft,,false\n");

        let projects = ProjectCatalogLoader::load(data.as_bytes()).unwrap();

        assert_eq!(projects[0].category, ProjectCategory::Medical);
    }

    #[test]
    fn unknown_category_is_rejected() {
        let data = csv("shed-1,custom,A,B,C,2020,1 sq ft,,false\n");

        let result = ProjectCatalogLoader::load(data.as_bytes());

        assert!(matches!(
            result,
            Err(CatalogLoaderError::InvalidCategory { id, category })
                if id == "shed-1" && category == "custom"
        ));
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let data = csv("a,winery,A,B,C,2020,1 sq ft,,\na,medical,A,B,C,2021,1 sq ft,,\n");

        let result = ProjectCatalogLoader::load(data.as_bytes());

        assert!(matches!(result, Err(CatalogLoaderError::DuplicateId(id)) if id == "a"));
    }

    #[test]
    fn missing_id_reports_line() {
        let data = csv("a,winery,A,B,C,2020,1 sq ft,,\n,medical,A,B,C,2021,1 sq ft,,\n");

        let result = ProjectCatalogLoader::load(data.as_bytes());

        assert!(matches!(result, Err(CatalogLoaderError::MissingId(3))));
    }

    #[test]
    fn bad_year_is_a_csv_error() {
        let data = csv("a,winery,A,B,C,last year,1 sq ft,,\n");

        let result = ProjectCatalogLoader::parse(data.as_bytes());

        assert!(matches!(result, Err(CatalogLoaderError::CsvParse(_))));
    }

    #[test]
    fn bad_flag_is_a_csv_error() {
        let data = csv("a,winery,A,B,C,2020,1 sq ft,,maybe\n");

        let result = ProjectCatalogLoader::parse(data.as_bytes());

        assert!(matches!(result, Err(CatalogLoaderError::CsvParse(_))));
    }
}
