use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Split of the midpoint price into cost categories, in whole dollars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub materials: Decimal,
    pub labor: Decimal,
    pub permits: Decimal,
    pub management: Decimal,
}

impl CostBreakdown {
    pub fn total(&self) -> Decimal {
        self.materials + self.labor + self.permits + self.management
    }
}

/// Output of the pricing engine for a completed record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectEstimate {
    /// Unrounded midpoint price the range and breakdown derive from.
    pub price: Decimal,
    pub low: Decimal,
    pub high: Decimal,
    pub breakdown: CostBreakdown,
    /// Lower bound of the schedule, in weeks.
    pub timeline_weeks: u32,
}

impl ProjectEstimate {
    /// Upper bound of the displayed schedule range.
    pub fn timeline_weeks_max(&self) -> u32 {
        self.timeline_weeks.saturating_add(4)
    }

    /// Schedule as shown to the customer, e.g. `"4-8 weeks"`.
    pub fn schedule_label(&self) -> String {
        format!("{}-{} weeks", self.timeline_weeks, self.timeline_weeks_max())
    }
}
