//! Report cards for the "load reports" list

use minijinja::context;
use serde::Serialize;

use crate::features::hazards::models::HazardReport;
use crate::shared::constants::{DESCRIPTION_PLACEHOLDER, EMPTY_STATE_MESSAGE};
use crate::shared::templates::{render_template, TemplateError};
use crate::shared::text::{tag_label, tag_slug};

/// en-US long date with 2-digit hour and minute, e.g. "October 17, 2026 at 03:04 PM"
const REPORTED_ON_FORMAT: &str = "%B %-d, %Y at %I:%M %p";

/// Display-ready fields of one card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HazardCard {
    pub image_url: String,
    pub hazard_type: String,
    pub type_label: String,
    pub severity_label: String,
    pub severity_class: String,
    pub location: String,
    pub description: String,
    pub reported_on: String,
}

impl From<&HazardReport> for HazardCard {
    fn from(report: &HazardReport) -> Self {
        Self {
            image_url: report.image_url.clone(),
            hazard_type: report.hazard_type.clone(),
            type_label: tag_label(&report.hazard_type),
            severity_label: report.severity.to_uppercase(),
            severity_class: format!("severity-{}", tag_slug(&report.severity)),
            location: report.location.clone(),
            description: report
                .description
                .as_deref()
                .filter(|d| !d.is_empty())
                .unwrap_or(DESCRIPTION_PLACEHOLDER)
                .to_string(),
            reported_on: report.created_at.format(REPORTED_ON_FORMAT).to_string(),
        }
    }
}

pub fn render_card(report: &HazardReport) -> Result<String, TemplateError> {
    render_template(
        "hazards/card.html.jinja",
        context! { card => HazardCard::from(report) },
    )
}

/// Cards in the given order, or the empty-state message when there are none
pub fn render_report_list(reports: &[HazardReport]) -> Result<String, TemplateError> {
    if reports.is_empty() {
        return render_template(
            "hazards/empty.html.jinja",
            context! { message => EMPTY_STATE_MESSAGE },
        );
    }

    let cards = reports
        .iter()
        .map(render_card)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(cards.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn report(hazard_type: &str, description: Option<&str>) -> HazardReport {
        HazardReport {
            id: Uuid::now_v7(),
            hazard_type: hazard_type.to_string(),
            location: "Main St & 5th".to_string(),
            severity: "high".to_string(),
            description: description.map(str::to_string),
            image_url: "http://localhost:9000/hazard-reports/hazards/1_a.jpg".to_string(),
            image_key: "hazards/1_a.jpg".to_string(),
            status: "reported".to_string(),
            created_at: Utc.with_ymd_and_hms(2026, 10, 17, 15, 4, 0).unwrap(),
        }
    }

    #[test]
    fn test_card_fields() {
        let card = HazardCard::from(&report("trip-hazard", Some("Loose paving slab")));
        assert_eq!(card.type_label, "TRIP HAZARD");
        assert_eq!(card.severity_label, "HIGH");
        assert_eq!(card.severity_class, "severity-high");
        assert_eq!(card.description, "Loose paving slab");
        assert_eq!(card.reported_on, "October 17, 2026 at 03:04 PM");
    }

    #[test]
    fn test_missing_description_uses_placeholder() {
        assert_eq!(
            HazardCard::from(&report("pothole", None)).description,
            DESCRIPTION_PLACEHOLDER
        );
        assert_eq!(
            HazardCard::from(&report("pothole", Some(""))).description,
            DESCRIPTION_PLACEHOLDER
        );
    }

    #[test]
    fn test_morning_time_is_zero_padded() {
        let mut r = report("pothole", None);
        r.created_at = Utc.with_ymd_and_hms(2026, 1, 5, 9, 7, 0).unwrap();
        assert_eq!(HazardCard::from(&r).reported_on, "January 5, 2026 at 09:07 AM");
    }

    #[test]
    fn test_render_card_markup() {
        let html = render_card(&report("pothole", None)).unwrap();
        assert!(html.contains(r#"<div class="report-card">"#));
        assert!(html.contains(r#"<span class="hazard-type">POTHOLE</span>"#));
        assert!(html.contains(r#"<span class="severity severity-high">HIGH</span>"#));
        assert!(html.contains("Main St &amp; 5th"));
        assert!(html.contains(DESCRIPTION_PLACEHOLDER));
        assert!(html.contains("Reported on October 17, 2026 at 03:04 PM"));
    }

    #[test]
    fn test_render_card_escapes_user_text() {
        let html = render_card(&report("pothole", Some("<script>alert(1)</script>"))).unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_empty_list_is_only_the_empty_state() {
        let html = render_report_list(&[]).unwrap();
        assert_eq!(
            html.trim(),
            format!(r#"<p class="empty-state">{}</p>"#, EMPTY_STATE_MESSAGE)
        );
        assert!(!html.contains("report-card"));
    }

    #[test]
    fn test_list_keeps_given_order() {
        let reports = vec![
            report("first-one", None),
            report("second-one", None),
            report("third-one", None),
        ];
        let html = render_report_list(&reports).unwrap();
        assert_eq!(html.matches(r#"class="report-card""#).count(), 3);

        let first = html.find("FIRST ONE").unwrap();
        let second = html.find("SECOND ONE").unwrap();
        let third = html.find("THIRD ONE").unwrap();
        assert!(first < second && second < third);
    }
}
