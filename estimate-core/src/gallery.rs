//! Portfolio gallery: category filter and "load more" paging.

use tracing::debug;

use crate::models::{Project, ProjectCategory};

/// Projects revealed per page.
pub const PROJECTS_PER_PAGE: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GalleryFilter {
    #[default]
    All,
    Category(ProjectCategory),
}

impl GalleryFilter {
    /// `"all"` or a category name.
    pub fn parse(s: &str) -> Option<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            Some(Self::All)
        } else {
            ProjectCategory::parse(s).map(Self::Category)
        }
    }

    pub fn matches(&self, project: &Project) -> bool {
        match self {
            Self::All => true,
            Self::Category(category) => project.category == *category,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProjectGallery {
    projects: Vec<Project>,
    filter: GalleryFilter,
    page: usize,
    per_page: usize,
}

impl ProjectGallery {
    pub fn new(projects: Vec<Project>) -> Self {
        Self {
            projects,
            filter: GalleryFilter::All,
            page: 1,
            per_page: PROJECTS_PER_PAGE,
        }
    }

    pub fn with_page_size(mut self, per_page: usize) -> Self {
        self.per_page = per_page.max(1);
        self
    }

    pub fn filter(&self) -> GalleryFilter {
        self.filter
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Changing the filter starts over at the first page.
    pub fn set_filter(&mut self, filter: GalleryFilter) {
        self.filter = filter;
        self.page = 1;
        debug!(?filter, matches = self.filtered().count(), "gallery filter changed");
    }

    pub fn filtered(&self) -> impl Iterator<Item = &Project> {
        self.projects.iter().filter(|p| self.filter.matches(p))
    }

    /// Everything revealed so far: the first `page * per_page` matches.
    pub fn visible(&self) -> Vec<&Project> {
        self.filtered().take(self.page * self.per_page).collect()
    }

    pub fn has_more(&self) -> bool {
        self.filtered().count() > self.page * self.per_page
    }

    /// Reveals the next page and returns only the newly shown projects.
    pub fn load_more(&mut self) -> Vec<&Project> {
        if !self.has_more() {
            return Vec::new();
        }
        let start = self.page * self.per_page;
        self.page += 1;
        self.filtered().skip(start).take(self.per_page).collect()
    }

    /// Looks a project up by id, ignoring the active filter.
    pub fn find(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }
}

impl Default for ProjectGallery {
    fn default() -> Self {
        Self::new(default_catalog())
    }
}

#[allow(clippy::too_many_arguments)]
fn project(
    id: &str,
    category: ProjectCategory,
    title: &str,
    location: &str,
    description: &str,
    year: i32,
    size: &str,
    features: [&str; 3],
    featured: bool,
) -> Project {
    Project {
        id: id.to_string(),
        category,
        title: title.to_string(),
        location: location.to_string(),
        description: description.to_string(),
        year,
        size: size.to_string(),
        features: features.iter().map(|f| f.to_string()).collect(),
        featured,
    }
}

/// The portfolio shipped with the site.
pub fn default_catalog() -> Vec<Project> {
    use ProjectCategory::*;

    vec![
        project(
            "commercial-office-pasco",
            Commercial,
            "Pacific Northwest Office Complex",
            "Pasco, WA",
            "25,000 sq ft modern commercial building with energy-efficient systems",
            2023,
            "25,000 sq ft",
            ["LEED Certified", "Smart Building Tech", "Energy Efficient"],
            true,
        ),
        project(
            "medical-center-kennewick",
            Medical,
            "Columbia Medical Center",
            "Kennewick, WA",
            "State-of-the-art healthcare facility with specialized equipment",
            2024,
            "18,000 sq ft",
            ["Healthcare Compliant", "Advanced HVAC", "Patient Centered"],
            true,
        ),
        project(
            "church-richland",
            Religious,
            "Trinity Community Church",
            "Richland, WA",
            "Beautiful sanctuary with modern acoustics and lighting",
            2023,
            "12,000 sq ft",
            ["Sacred Architecture", "Acoustic Optimized", "Multi-Purpose"],
            true,
        ),
        project(
            "winery-walla-walla",
            Winery,
            "Columbia Valley Winery",
            "Walla Walla, WA",
            "Award-winning winery with tasting room and production facility",
            2024,
            "15,000 sq ft",
            ["Temperature Controlled", "Tasting Room", "Production Facility"],
            true,
        ),
        project(
            "industrial-spokane",
            Industrial,
            "Northwest Manufacturing Facility",
            "Spokane, WA",
            "Heavy-duty manufacturing facility with specialized equipment",
            2023,
            "45,000 sq ft",
            ["Heavy Load Bearing", "Industrial Grade", "Safety Compliant"],
            false,
        ),
        project(
            "commercial-portland",
            Commercial,
            "Portland Business Center",
            "Portland, OR",
            "Multi-tenant commercial complex with retail and office space",
            2022,
            "32,000 sq ft",
            ["Multi-Tenant", "Retail Space", "Modern Design"],
            false,
        ),
        project(
            "medical-boise",
            Medical,
            "Boise Family Health Clinic",
            "Boise, ID",
            "Family healthcare clinic with pediatric and adult care facilities",
            2023,
            "8,500 sq ft",
            ["Family Focused", "Pediatric Suite", "Modern Equipment"],
            false,
        ),
        project(
            "religious-eugene",
            Religious,
            "Faith Community Center",
            "Eugene, OR",
            "Multi-purpose religious facility with worship and community spaces",
            2022,
            "16,000 sq ft",
            ["Multi-Purpose", "Community Kitchen", "Event Space"],
            false,
        ),
        project(
            "industrial-coeur-dalene",
            Industrial,
            "Mountain West Warehouse",
            "Coeur d'Alene, ID",
            "Distribution warehouse with advanced logistics systems",
            2024,
            "60,000 sq ft",
            ["Distribution Hub", "Logistics Systems", "Loading Docks"],
            false,
        ),
    ]
}
