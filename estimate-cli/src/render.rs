//! Plain-text views of estimates, stored records and gallery projects.

use std::fmt::Write as _;

use estimate_core::{
    EstimateRecord, Project, ProjectEstimate, ProjectType, StoredContact, StoredEstimate,
};
use rust_decimal::{Decimal, RoundingStrategy};

/// `$280,500`. Rounds to whole dollars, half away from zero.
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

fn format_count(n: u32) -> String {
    format_currency(Decimal::from(n))
        .trim_start_matches('$')
        .to_string()
}

fn project_label(project_type: Option<&ProjectType>) -> &str {
    project_type.map(ProjectType::label).unwrap_or("Unspecified")
}

/// The results step.
pub fn render_estimate(record: &EstimateRecord, estimate: &ProjectEstimate) -> String {
    let mut out = String::new();
    let stories = if record.stories == 1 { "story" } else { "stories" };

    // Writing into a String cannot fail.
    let _ = writeln!(out, "Your Estimate");
    let _ = writeln!(out, "  Project:    {}", project_label(record.project_type.as_ref()));
    match record.region {
        Some(region) => {
            let _ = writeln!(out, "  Location:   {} ({})", record.location, region.display_name());
        }
        None => {
            let _ = writeln!(out, "  Location:   {}", record.location);
        }
    }
    let _ = writeln!(
        out,
        "  Size:       {} sq ft, {} {}, {} construction",
        format_count(record.square_footage),
        record.stories,
        stories,
        record.construction_type.as_str()
    );
    if let Some(timeline) = record.timeline {
        let _ = writeln!(out, "  Start:      {}", timeline.label());
    }
    let _ = writeln!(
        out,
        "  Range:      {} - {}",
        format_currency(estimate.low),
        format_currency(estimate.high)
    );
    let _ = writeln!(out, "  Schedule:   {}", estimate.schedule_label());

    let breakdown = &estimate.breakdown;
    let _ = writeln!(out, "  Breakdown:");
    for (label, amount) in [
        ("Materials", breakdown.materials),
        ("Labor", breakdown.labor),
        ("Permits", breakdown.permits),
        ("Management", breakdown.management),
    ] {
        let _ = writeln!(out, "    {label:<12}{:>12}", format_currency(amount));
    }

    if let Some(region) = record.region {
        let _ = writeln!(out, "  Regional considerations:");
        for note in region.considerations() {
            let _ = writeln!(out, "    - {note}");
        }
    }

    out
}

/// One line per stored estimate for `list`.
pub fn render_stored_estimate(stored: &StoredEstimate) -> String {
    let pending = if stored.synced { "" } else { "  (not synced)" };
    format!(
        "{}  {}  {:<18}  {:<24}  {} - {}{}",
        stored.id,
        stored.created_at.format("%Y-%m-%d"),
        project_label(stored.record.project_type.as_ref()),
        stored.record.location,
        format_currency(stored.estimate.low),
        format_currency(stored.estimate.high),
        pending
    )
}

pub fn render_stored_contact(stored: &StoredContact) -> String {
    let pending = if stored.synced { "" } else { "  (not synced)" };
    let submission = &stored.submission;
    format!(
        "{}  {}  {:<12}  {} <{}>{}",
        stored.id,
        stored.created_at.format("%Y-%m-%d"),
        submission.kind.as_str(),
        submission.name,
        submission.email,
        pending
    )
}

/// Gallery card: title, category, location and size.
pub fn render_project_line(project: &Project) -> String {
    let star = if project.featured { "*" } else { " " };
    format!(
        "{star} {:<22} {:<11} {} ({}, {})",
        project.id,
        project.category.as_str(),
        project.title,
        project.location,
        project.size
    )
}

/// Detail view for `gallery --show`.
pub fn render_project(project: &Project) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", project.title);
    let _ = writeln!(
        out,
        "  {} | {} | {} | {}",
        project.category.project_type().label(),
        project.location,
        project.year,
        project.size
    );
    let _ = writeln!(out, "  {}", project.description);
    for feature in &project.features {
        let _ = writeln!(out, "    - {feature}");
    }
    out
}

#[cfg(test)]
mod tests {
    use estimate_core::calculations::PricingEngine;
    use estimate_core::{ContactInfo, Region, Timeline};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(format_currency(dec!(280500)), "$280,500");
        assert_eq!(format_currency(dec!(1229580.00)), "$1,229,580");
        assert_eq!(format_currency(dec!(999)), "$999");
        assert_eq!(format_currency(Decimal::ZERO), "$0");
    }

    #[test]
    fn currency_rounds_half_away_from_zero() {
        assert_eq!(format_currency(dec!(49999.5)), "$50,000");
        assert_eq!(format_currency(dec!(-1234.5)), "-$1,235");
    }

    #[test]
    fn estimate_view_shows_range_and_region_notes() {
        let record = EstimateRecord {
            project_type: Some(ProjectType::Commercial),
            location: "Tacoma, WA".to_string(),
            region: Some(Region::Washington),
            square_footage: 2000,
            stories: 1,
            timeline: Some(Timeline::OneToThreeMonths),
            contact: ContactInfo {
                name: "Sam Rivera".to_string(),
                email: "sam@example.com".to_string(),
                phone: "253-555-0100".to_string(),
                company: None,
            },
            ..EstimateRecord::default()
        };
        let estimate = PricingEngine.calculate(&record);

        let view = render_estimate(&record, &estimate);

        assert!(view.contains("  Project:    Commercial\n"));
        assert!(view.contains("  Location:   Tacoma, WA (Washington State)\n"));
        assert!(view.contains("  Size:       2,000 sq ft, 1 story, standard construction\n"));
        assert!(view.contains("  Range:      $280,500 - $379,500\n"));
        assert!(view.contains("    - Pacific Northwest weather considerations\n"));
    }

    #[test]
    fn estimate_view_without_region_has_no_notes() {
        let record = EstimateRecord {
            project_type: None,
            location: "Phoenix, AZ".to_string(),
            square_footage: 1500,
            stories: 2,
            ..EstimateRecord::default()
        };
        let estimate = PricingEngine.calculate(&record);

        let view = render_estimate(&record, &estimate);

        assert!(view.contains("  Project:    Unspecified\n"));
        assert!(view.contains("  Location:   Phoenix, AZ\n"));
        assert!(view.contains("2 stories"));
        assert!(!view.contains("Regional considerations"));
    }

    #[test]
    fn project_detail_lists_features() {
        let gallery = estimate_core::gallery::ProjectGallery::default();
        let project = gallery.visible()[0];

        let view = render_project(project);

        assert!(view.starts_with(&project.title));
        for feature in &project.features {
            assert!(view.contains(feature.as_str()));
        }
    }
}
