use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Service region recognised from the free-text project location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Washington,
    Oregon,
    Idaho,
}

/// Regional cost indices. Each index is a multiplier around 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionFactors {
    pub permit_cost: Decimal,
    pub labor_cost: Decimal,
    pub material_cost: Decimal,
}

impl RegionFactors {
    /// Mean of the three indices; this is the multiplier applied to a price.
    pub fn average(&self) -> Decimal {
        (self.permit_cost + self.labor_cost + self.material_cost) / Decimal::from(3)
    }
}

/// Substrings checked against the lowercased location, in priority order.
const DETECTION_TABLE: &[(&[&str], Region)] = &[
    (&["wa", "washington"], Region::Washington),
    (&["or", "oregon"], Region::Oregon),
    (&["id", "idaho"], Region::Idaho),
];

impl Region {
    /// Detects the region by naive case-insensitive substring match.
    ///
    /// The first table entry with any matching key wins, so `"Tacoma, WA"` is
    /// Washington and `"Portland, OR"` is Oregon. Locations that match nothing
    /// get no regional adjustment.
    pub fn detect(location: &str) -> Option<Self> {
        let lowered = location.to_lowercase();
        DETECTION_TABLE
            .iter()
            .find(|(keys, _)| keys.iter().any(|key| lowered.contains(key)))
            .map(|(_, region)| *region)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Washington => "washington",
            Self::Oregon => "oregon",
            Self::Idaho => "idaho",
        }
    }

    /// Parses a stored region code. Unlike [`Region::detect`] this is exact.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "washington" => Some(Self::Washington),
            "oregon" => Some(Self::Oregon),
            "idaho" => Some(Self::Idaho),
            _ => None,
        }
    }

    pub fn factors(&self) -> RegionFactors {
        match self {
            Self::Washington => RegionFactors {
                permit_cost: Decimal::new(12, 1),
                labor_cost: Decimal::new(11, 1),
                material_cost: Decimal::new(10, 1),
            },
            Self::Oregon => RegionFactors {
                permit_cost: Decimal::new(11, 1),
                labor_cost: Decimal::new(10, 1),
                material_cost: Decimal::new(105, 2),
            },
            Self::Idaho => RegionFactors {
                permit_cost: Decimal::new(90, 2),
                labor_cost: Decimal::new(95, 2),
                material_cost: Decimal::new(98, 2),
            },
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Washington => "Washington State",
            Self::Oregon => "Oregon",
            Self::Idaho => "Idaho",
        }
    }

    /// Site notes shown alongside the location once a region is recognised.
    pub fn considerations(&self) -> &'static [&'static str] {
        match self {
            Self::Washington => &[
                "Standard WA building codes apply",
                "Regional material suppliers available",
                "Skilled labor market (higher costs)",
                "Pacific Northwest weather considerations",
            ],
            Self::Oregon => &[
                "Oregon building codes and permits",
                "Good material delivery access",
                "Competitive labor market",
                "Mild climate advantages",
            ],
            Self::Idaho => &[
                "Idaho building requirements",
                "Lower material delivery costs",
                "Cost-effective labor market",
                "Continental climate considerations",
            ],
        }
    }
}
