use std::cmp::Ordering;

use serde_json::Value;

use crate::models::{FlightOffer, FlightSearchResponse, RankedFlightList};

pub const MAX_RANKED_FLIGHTS: usize = 3;

/// Picks the cheapest offers out of the provider's `best_flights` list.
///
/// Offers without a numeric price rank after every priced offer. The sort is
/// stable, so equal prices and unpriced offers keep the provider's order.
pub fn rank_flights(response: &FlightSearchResponse) -> RankedFlightList {
    let Some(best_flights) = response.get("best_flights").and_then(Value::as_array) else {
        return RankedFlightList::default();
    };

    let mut offers = best_flights
        .iter()
        .filter_map(|entry| entry.as_object().cloned().map(FlightOffer))
        .collect::<Vec<_>>();

    offers.sort_by(|lhs, rhs| compare_by_price(lhs.price(), rhs.price()));
    offers.truncate(MAX_RANKED_FLIGHTS);

    RankedFlightList(offers)
}

fn compare_by_price(lhs: Option<f64>, rhs: Option<f64>) -> Ordering {
    match (lhs, rhs) {
        (Some(lhs), Some(rhs)) => lhs.total_cmp(&rhs),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
