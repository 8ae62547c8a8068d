use std::fmt::Write as _;

use crate::models::{TravelPreferences, TripParams, TripPlanResult};

pub const NO_FLIGHTS_NOTICE: &str = "No specific flight details found for these dates.";

pub fn headline(params: &TripParams) -> String {
    format!(
        "Your {} to {} is about to begin!",
        params.theme.label(),
        params.destination()
    )
}

/// Reminders for the essentials toggled on in the sidebar.
pub fn travel_essentials(preferences: &TravelPreferences) -> Vec<String> {
    let mut essentials = Vec::new();
    if preferences.visa_check {
        essentials.push("Check visa requirements for your destination".to_string());
    }
    if preferences.travel_insurance {
        essentials.push("Arrange travel insurance before departure".to_string());
    }
    if preferences.currency_rates {
        essentials.push("Review currency exchange rates".to_string());
    }
    essentials
}

pub fn render_plan_text(params: &TripParams, result: &TripPlanResult) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", headline(params));
    let _ = writeln!(
        out,
        "{} -> {} | {} to {} | {} class\n",
        params.origin_code.trim(),
        params.destination(),
        params.departure_date,
        params.return_date,
        params.preferences.flight_class.label()
    );

    for notice in &result.notices {
        let _ = writeln!(out, "! {notice}");
    }
    if !result.notices.is_empty() {
        out.push('\n');
    }

    let _ = writeln!(out, "## Flight Options");
    if result.flights.is_empty() {
        let _ = writeln!(out, "{NO_FLIGHTS_NOTICE}");
    } else {
        let pretty = serde_json::to_string_pretty(result.flights.offers())
            .unwrap_or_else(|_| result.flights.to_prompt_json());
        let _ = writeln!(out, "{pretty}");
    }

    let _ = writeln!(out, "\n## Hotels & Dining\n{}", result.hospitality.trim());
    let _ = writeln!(out, "\n## Your Itinerary\n{}", result.itinerary.trim());

    if !result.travel_essentials.is_empty() {
        let _ = writeln!(out, "\n## Travel Essentials");
        for item in &result.travel_essentials {
            let _ = writeln!(out, "- {item}");
        }
    }

    if !result.packing_checklist.is_empty() {
        let _ = writeln!(out, "\n## Packing Checklist");
        for entry in &result.packing_checklist {
            let mark = if entry.packed { "x" } else { " " };
            let _ = writeln!(out, "[{mark}] {}", entry.item);
        }
    }

    let _ = writeln!(out, "\nTravel plan generated successfully!");
    out
}
