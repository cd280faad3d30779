use serde::{Deserialize, Serialize};

/// When the customer wants construction to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeline {
    #[serde(rename = "immediate")]
    Immediate,
    #[serde(rename = "1-3months")]
    OneToThreeMonths,
    #[serde(rename = "3-6months")]
    ThreeToSixMonths,
    #[serde(rename = "6months+")]
    SixMonthsPlus,
}

impl Timeline {
    pub fn all() -> &'static [Timeline] {
        &[
            Timeline::Immediate,
            Timeline::OneToThreeMonths,
            Timeline::ThreeToSixMonths,
            Timeline::SixMonthsPlus,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Immediate => "immediate",
            Self::OneToThreeMonths => "1-3months",
            Self::ThreeToSixMonths => "3-6months",
            Self::SixMonthsPlus => "6months+",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "immediate" => Some(Self::Immediate),
            "1-3months" => Some(Self::OneToThreeMonths),
            "3-6months" => Some(Self::ThreeToSixMonths),
            "6months+" => Some(Self::SixMonthsPlus),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Immediate => "ASAP",
            Self::OneToThreeMonths => "1-3 Months",
            Self::ThreeToSixMonths => "3-6 Months",
            Self::SixMonthsPlus => "6+ Months",
        }
    }
}
