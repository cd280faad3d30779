//! Construction cost estimate for a completed wizard record.
//!
//! # Algorithm
//!
//! | Step | Adjustment |
//! |------|------------|
//! | 1    | Look up `(base, multiplier)` for the project type (unknown → commercial) |
//! | 2    | `price = base × square footage × multiplier` |
//! | 3    | More than one story: `× (1 + (stories − 1) × 0.15)` |
//! | 4    | Construction type: basic 0.8, standard 1.0, premium 1.3, luxury 1.6 |
//! | 5    | Timeline: immediate 1.2, 1–3 months 1.0, 3–6 months 0.95, 6+ months 0.9 |
//! | 6    | Recognised region: `×` mean of its permit, labor and material indices |
//! | 7    | Range: `low = round(price × 0.85)`, `high = round(price × 1.15)` |
//! | 8    | Breakdown of `price`: materials 40%, labor 35%, permits 10%, management 15% |
//! | 9    | Weeks: `ceil(sqft / 1000) × 2 + (stories − 1) × 2 + finish extra` |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use estimate_core::calculations::estimate;
//! use estimate_core::{EstimateRecord, ProjectType, Region, Timeline};
//!
//! let record = EstimateRecord {
//!     project_type: Some(ProjectType::Commercial),
//!     location: "Tacoma, WA".to_string(),
//!     region: Region::detect("Tacoma, WA"),
//!     square_footage: 2000,
//!     timeline: Some(Timeline::OneToThreeMonths),
//!     ..Default::default()
//! };
//!
//! let result = estimate(&record);
//!
//! assert_eq!(result.low, dec!(280500));
//! assert_eq!(result.high, dec!(379500));
//! assert_eq!(result.timeline_weeks, 4);
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::{div_ceil, round_to_dollar, share_of};
use crate::models::{
    ConstructionType, CostBreakdown, EstimateRecord, ProjectEstimate, ProjectType, Region,
    Timeline,
};

/// Per-square-foot base rate and complexity multiplier for a project type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceFactors {
    pub base: Decimal,
    pub multiplier: Decimal,
}

/// Stateless calculator for [`ProjectEstimate`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct PricingEngine;

/// Shorthand for `PricingEngine.calculate(record)`.
pub fn estimate(record: &EstimateRecord) -> ProjectEstimate {
    PricingEngine.calculate(record)
}

impl PricingEngine {
    /// Prices a record. Missing or unrecognised selections fall back to
    /// neutral factors, so this never fails.
    pub fn calculate(
        &self,
        record: &EstimateRecord,
    ) -> ProjectEstimate {
        let factors = self.price_factors(record.project_type.as_ref());

        let mut price = self.base_price(factors, record.square_footage);
        price *= self.stories_factor(record.stories);
        price *= self.construction_factor(record.construction_type);
        price *= self.timeline_factor(record.timeline);
        if let Some(region) = record.region {
            price *= self.region_factor(region);
        }

        let (low, high) = self.price_range(price);
        let breakdown = self.breakdown(price);
        let timeline_weeks = self.timeline_weeks(
            record.square_footage,
            record.stories,
            record.construction_type,
        );

        debug!(%price, %low, %high, timeline_weeks, "calculated project estimate");

        ProjectEstimate {
            price,
            low,
            high,
            breakdown,
            timeline_weeks,
        }
    }

    /// Looks up the base rate table. Unknown or missing types use commercial.
    pub fn price_factors(
        &self,
        project_type: Option<&ProjectType>,
    ) -> PriceFactors {
        let (base, multiplier) = match project_type {
            Some(ProjectType::Medical) => (200, Decimal::new(13, 1)),
            Some(ProjectType::Religious) => (120, Decimal::new(9, 1)),
            Some(ProjectType::Industrial) => (100, Decimal::new(8, 1)),
            Some(ProjectType::Winery) => (180, Decimal::new(12, 1)),
            Some(ProjectType::Custom) => (175, Decimal::new(11, 1)),
            Some(ProjectType::Commercial | ProjectType::Other(_)) | None => (150, Decimal::ONE),
        };
        PriceFactors {
            base: Decimal::from(base),
            multiplier,
        }
    }

    fn base_price(
        &self,
        factors: PriceFactors,
        square_footage: u32,
    ) -> Decimal {
        factors.base * Decimal::from(square_footage) * factors.multiplier
    }

    /// Each story above the first adds 15%.
    fn stories_factor(
        &self,
        stories: u32,
    ) -> Decimal {
        if stories > 1 {
            Decimal::ONE + Decimal::from(stories - 1) * Decimal::new(15, 2)
        } else {
            Decimal::ONE
        }
    }

    fn construction_factor(
        &self,
        construction_type: ConstructionType,
    ) -> Decimal {
        match construction_type {
            ConstructionType::Basic => Decimal::new(8, 1),
            ConstructionType::Standard => Decimal::ONE,
            ConstructionType::Premium => Decimal::new(13, 1),
            ConstructionType::Luxury => Decimal::new(16, 1),
        }
    }

    fn timeline_factor(
        &self,
        timeline: Option<Timeline>,
    ) -> Decimal {
        match timeline {
            Some(Timeline::Immediate) => Decimal::new(12, 1),
            Some(Timeline::ThreeToSixMonths) => Decimal::new(95, 2),
            Some(Timeline::SixMonthsPlus) => Decimal::new(9, 1),
            Some(Timeline::OneToThreeMonths) | None => Decimal::ONE,
        }
    }

    fn region_factor(
        &self,
        region: Region,
    ) -> Decimal {
        region.factors().average()
    }

    /// ±15% around the midpoint, rounded to whole dollars.
    fn price_range(
        &self,
        price: Decimal,
    ) -> (Decimal, Decimal) {
        (
            round_to_dollar(price * Decimal::new(85, 2)),
            round_to_dollar(price * Decimal::new(115, 2)),
        )
    }

    /// Shares of the midpoint price; each share is rounded on its own.
    fn breakdown(
        &self,
        price: Decimal,
    ) -> CostBreakdown {
        CostBreakdown {
            materials: share_of(price, Decimal::new(40, 2)),
            labor: share_of(price, Decimal::new(35, 2)),
            permits: share_of(price, Decimal::new(10, 2)),
            management: share_of(price, Decimal::new(15, 2)),
        }
    }

    /// Schedule lower bound in weeks; no fixed floor is added. Saturates at
    /// `u32::MAX` for absurd story counts.
    fn timeline_weeks(
        &self,
        square_footage: u32,
        stories: u32,
        construction_type: ConstructionType,
    ) -> u32 {
        let extra = match construction_type {
            ConstructionType::Luxury => 4,
            ConstructionType::Premium => 2,
            ConstructionType::Basic | ConstructionType::Standard => 0,
        };
        div_ceil(square_footage, 1000)
            .saturating_mul(2)
            .saturating_add(stories.saturating_sub(1).saturating_mul(2))
            .saturating_add(extra)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn tacoma_record() -> EstimateRecord {
        EstimateRecord {
            project_type: Some(ProjectType::Commercial),
            location: "Tacoma, WA".to_string(),
            region: Some(Region::Washington),
            square_footage: 2000,
            stories: 1,
            construction_type: ConstructionType::Standard,
            timeline: Some(Timeline::OneToThreeMonths),
            ..Default::default()
        }
    }

    fn unadjusted_record() -> EstimateRecord {
        EstimateRecord {
            location: "Phoenix, AZ".to_string(),
            region: None,
            ..tacoma_record()
        }
    }

    // =========================================================================
    // price_factors tests
    // =========================================================================

    #[test]
    fn price_factors_for_medical() {
        let factors = PricingEngine.price_factors(Some(&ProjectType::Medical));

        assert_eq!(factors.base, dec!(200));
        assert_eq!(factors.multiplier, dec!(1.3));
    }

    #[test]
    fn price_factors_unknown_type_uses_commercial() {
        let unknown = ProjectType::Other("treehouse".to_string());

        assert_eq!(
            PricingEngine.price_factors(Some(&unknown)),
            PricingEngine.price_factors(Some(&ProjectType::Commercial))
        );
    }

    #[test]
    fn price_factors_missing_type_uses_commercial() {
        assert_eq!(
            PricingEngine.price_factors(None),
            PricingEngine.price_factors(Some(&ProjectType::Commercial))
        );
    }

    // =========================================================================
    // stories_factor tests
    // =========================================================================

    #[test]
    fn stories_factor_single_story_is_neutral() {
        assert_eq!(PricingEngine.stories_factor(1), dec!(1));
    }

    #[test]
    fn stories_factor_adds_fifteen_percent_per_extra_story() {
        assert_eq!(PricingEngine.stories_factor(3), dec!(1.30));
    }

    // =========================================================================
    // timeline_weeks tests
    // =========================================================================

    #[test]
    fn timeline_weeks_rounds_square_footage_up() {
        let weeks = PricingEngine.timeline_weeks(2500, 1, ConstructionType::Standard);

        // ceil(2.5) * 2 = 6
        assert_eq!(weeks, 6);
    }

    #[test]
    fn timeline_weeks_adds_stories_and_finish_extra() {
        let weeks = PricingEngine.timeline_weeks(2000, 3, ConstructionType::Luxury);

        // 2 * 2 + 2 * 2 + 4 = 12
        assert_eq!(weeks, 12);
    }

    #[test]
    fn timeline_weeks_saturates_on_huge_story_count() {
        let record = EstimateRecord {
            stories: 3_000_000_000,
            ..tacoma_record()
        };

        let result = estimate(&record);

        assert_eq!(result.timeline_weeks, u32::MAX);
        assert_eq!(result.timeline_weeks_max(), u32::MAX);
    }

    #[test]
    fn timeline_weeks_premium_extra() {
        assert_eq!(
            PricingEngine.timeline_weeks(1000, 1, ConstructionType::Premium),
            4
        );
    }

    // =========================================================================
    // calculate (integration) tests
    // =========================================================================

    #[test]
    fn calculate_tacoma_commercial_example() {
        let result = estimate(&tacoma_record());

        // 150 * 2000 * 1.0 = 300000; Washington mean (1.2 + 1.1 + 1.0) / 3 = 1.1
        assert_eq!(result.price, dec!(330000));
        assert_eq!(result.low, dec!(280500));
        assert_eq!(result.high, dec!(379500));
        assert_eq!(result.timeline_weeks, 4);
        assert_eq!(result.schedule_label(), "4-8 weeks");
    }

    #[test]
    fn calculate_breakdown_splits_midpoint_price() {
        let result = estimate(&tacoma_record());

        assert_eq!(result.breakdown.materials, dec!(132000));
        assert_eq!(result.breakdown.labor, dec!(115500));
        assert_eq!(result.breakdown.permits, dec!(33000));
        assert_eq!(result.breakdown.management, dec!(49500));
        assert_eq!(result.breakdown.total(), dec!(330000));
    }

    #[test]
    fn calculate_without_region_has_no_adjustment() {
        let result = estimate(&unadjusted_record());

        assert_eq!(result.price, dec!(300000));
        assert_eq!(result.low, dec!(255000));
        assert_eq!(result.high, dec!(345000));
    }

    #[test]
    fn calculate_applies_every_multiplier() {
        let record = EstimateRecord {
            project_type: Some(ProjectType::Medical),
            stories: 2,
            construction_type: ConstructionType::Premium,
            timeline: Some(Timeline::Immediate),
            ..unadjusted_record()
        };

        let result = estimate(&record);

        // 200 * 2000 * 1.3 = 520000; * 1.15 = 598000; * 1.3 = 777400; * 1.2 = 932880
        assert_eq!(result.price, dec!(932880));
        assert_eq!(result.low, dec!(792948));
        assert_eq!(result.high, dec!(1072812));
    }

    #[test]
    fn calculate_unknown_type_matches_commercial() {
        let treehouse = EstimateRecord {
            project_type: Some(ProjectType::Other("treehouse".to_string())),
            ..tacoma_record()
        };

        assert_eq!(estimate(&treehouse), estimate(&tacoma_record()));
    }

    #[test]
    fn calculate_is_deterministic() {
        let record = tacoma_record();

        assert_eq!(estimate(&record), estimate(&record));
    }

    #[test]
    fn calculate_breakdown_sum_within_one_of_rounded_price() {
        let record = EstimateRecord {
            project_type: Some(ProjectType::Religious),
            square_footage: 1234,
            stories: 2,
            construction_type: ConstructionType::Basic,
            timeline: Some(Timeline::ThreeToSixMonths),
            location: "Boise, ID".to_string(),
            region: Some(Region::Idaho),
            ..Default::default()
        };

        let result = estimate(&record);
        let difference = (result.breakdown.total() - round_to_dollar(result.price)).abs();

        assert!(difference <= dec!(1), "difference was {difference}");
    }

    #[test]
    fn calculate_range_ratio_holds_within_rounding() {
        for project_type in ProjectType::all() {
            for square_footage in [100, 1500, 48_250] {
                let record = EstimateRecord {
                    project_type: Some(project_type.clone()),
                    square_footage,
                    region: Some(Region::Oregon),
                    ..tacoma_record()
                };

                let result = estimate(&record);
                let expected_high = result.low * dec!(1.15) / dec!(0.85);

                assert!(result.low < result.high);
                assert!(
                    (result.high - expected_high).abs() <= dec!(2),
                    "high {} vs expected {}",
                    result.high,
                    expected_high
                );
            }
        }
    }
}
