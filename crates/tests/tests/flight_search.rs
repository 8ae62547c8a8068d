use axum::http::StatusCode;
use serde_json::{json, Value};
use voyage_core::{rank_flights, FlightOffer, FlightRoute};
use voyage_tests::{closed_endpoint, flight_query, StubProvider};

fn route() -> FlightRoute {
    FlightRoute {
        origin_code: "BOM".to_string(),
        destination_code: "DEL".to_string(),
        departure_date: "2026-11-02".parse().unwrap(),
        return_date: "2026-11-07".parse().unwrap(),
    }
}

#[tokio::test]
async fn successful_search_sends_provider_params_and_ranks() {
    let provider = StubProvider::with_best_flights(json!([
        { "price": 500, "flights": [{ "airline": "Air India" }] },
        { "type": "Round trip" },
        { "price": 100 },
        { "price": 300 },
        { "total_duration": 135 }
    ]))
    .await;

    let fetch = flight_query(&provider.endpoint).fetch(route()).await;
    assert!(!fetch.failed());

    let prices = rank_flights(&fetch.response)
        .offers()
        .iter()
        .map(FlightOffer::price)
        .collect::<Vec<_>>();
    assert_eq!(prices, vec![Some(100.0), Some(300.0), Some(500.0)]);

    let query = provider.last_query().expect("provider should see one query");
    assert_eq!(provider.hits(), 1);
    assert_eq!(query["engine"], "google_flights");
    assert_eq!(query["departure_id"], "BOM");
    assert_eq!(query["arrival_id"], "DEL");
    assert_eq!(query["outbound_date"], "2026-11-02");
    assert_eq!(query["return_date"], "2026-11-07");
    assert_eq!(query["currency"], "INR");
    assert_eq!(query["hl"], "en");
    assert_eq!(query["api_key"], "serp-test-key");
}

#[tokio::test]
async fn non_200_status_degrades_to_empty_result() {
    let provider = StubProvider::spawn(
        StatusCode::UNAUTHORIZED,
        json!({ "error": "Invalid API key." }).to_string(),
    )
    .await;

    let fetch = flight_query(&provider.endpoint).fetch(route()).await;

    assert!(fetch.response.is_empty());
    assert!(rank_flights(&fetch.response).is_empty());
    assert_eq!(
        fetch.notice.as_deref(),
        Some("Error fetching flight data: 401")
    );
    assert_eq!(provider.hits(), 1);
}

#[tokio::test]
async fn success_status_other_than_200_is_still_a_failure() {
    let provider = StubProvider::spawn(StatusCode::ACCEPTED, "{}").await;

    let fetch = flight_query(&provider.endpoint).fetch(route()).await;

    assert_eq!(
        fetch.notice.as_deref(),
        Some("Error fetching flight data: 202")
    );
}

#[tokio::test]
async fn transport_failure_degrades_to_empty_result() {
    let endpoint = closed_endpoint().await;

    let fetch = flight_query(&endpoint).fetch(route()).await;

    assert!(fetch.response.is_empty());
    assert!(rank_flights(&fetch.response).is_empty());
    let notice = fetch.notice.expect("transport failure should leave a notice");
    assert!(notice.starts_with("An error occurred while fetching flights: "));
    assert!(!notice.contains("serp-test-key"));
    assert!(!notice.contains("api_key="));
}

#[tokio::test]
async fn undecodable_body_degrades_to_empty_result() {
    let provider = StubProvider::spawn(StatusCode::OK, "<html>maintenance</html>").await;

    let fetch = flight_query(&provider.endpoint).fetch(route()).await;

    assert!(fetch.response.is_empty());
    assert!(fetch
        .notice
        .as_deref()
        .is_some_and(|notice| notice.starts_with("An error occurred while fetching flights")
            && !notice.contains("serp-test-key")));
}

#[tokio::test]
async fn response_without_best_flights_ranks_empty() {
    let provider = StubProvider::spawn(
        StatusCode::OK,
        json!({ "other_flights": [{ "price": 80 }] }).to_string(),
    )
    .await;

    let fetch = flight_query(&provider.endpoint).fetch(route()).await;

    assert!(!fetch.failed());
    assert_eq!(fetch.response.get("best_flights"), None::<&Value>);
    assert!(rank_flights(&fetch.response).is_empty());
}
