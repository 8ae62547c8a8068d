use crate::models::{RankedFlightList, TripParams};

pub fn research_prompt(params: &TripParams) -> String {
    format!(
        "Research the best attractions and activities in {} for a {}-day {} trip. \
         The traveler enjoys: {}. Budget: {}.",
        params.destination(),
        params.trip_days,
        params.theme.label().to_lowercase(),
        params.activity_preferences.trim(),
        params.preferences.budget.label(),
    )
}

pub fn hospitality_prompt(params: &TripParams) -> String {
    format!(
        "Find the best hotels and restaurants near attractions in {}. \
         Preferences: {}, Budget: {}, Hotel Rating: {}.",
        params.destination(),
        params.activity_preferences.trim(),
        params.preferences.budget.label(),
        params.preferences.hotel_rating.label(),
    )
}

/// Embeds both earlier agent outputs verbatim plus the ranked flights as JSON.
pub fn itinerary_prompt(
    params: &TripParams,
    research: &str,
    hospitality: &str,
    flights: &RankedFlightList,
) -> String {
    format!(
        "Create a {}-day itinerary for {}. Attractions: {}. Hotels: {}. Flight options: {}.",
        params.trip_days,
        params.destination(),
        research,
        hospitality,
        flights.to_prompt_json(),
    )
}
