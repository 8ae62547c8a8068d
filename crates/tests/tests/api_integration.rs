use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use voyage_api::{build_router, AccessGuard, ApiState, ServiceConfig};
use voyage_tests::{
    closed_endpoint, scripted_planner, trip_params_json, CallLog, Script, StubProvider,
    TEST_SERVICE_KEY,
};

fn router_for(endpoint: &str, script: Script) -> (Router, CallLog) {
    router_with_service(endpoint, script, ServiceConfig::default())
}

fn router_with_service(endpoint: &str, script: Script, service: ServiceConfig) -> (Router, CallLog) {
    let (planner, calls) = scripted_planner(endpoint, script);
    let guard = AccessGuard::from_config(&ServiceConfig {
        api_key: TEST_SERVICE_KEY.to_string(),
        ..service
    });
    (build_router(ApiState::new(planner), guard), calls)
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("x-api-key", TEST_SERVICE_KEY)
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_is_public_and_reports_metrics() {
    let endpoint = closed_endpoint().await;
    let (app, _) = router_for(&endpoint, Script::default());

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
    assert!(response.headers().contains_key("x-request-id"));
    let body = read_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["metrics"]["plans_total"], 0);
}

#[tokio::test]
async fn caller_request_id_is_echoed() {
    let endpoint = closed_endpoint().await;
    let (app, _) = router_for(&endpoint, Script::default());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "trip-req-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers().get("x-request-id").unwrap(), "trip-req-42");
}

#[tokio::test]
async fn plan_requires_service_key() {
    let endpoint = closed_endpoint().await;
    let (app, calls) = router_for(&endpoint, Script::default());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/plan")
                .header("content-type", "application/json")
                .body(Body::from(trip_params_json().to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(read_json(response).await["error"], "unauthorized");
    assert!(calls.lock().is_empty());
}

#[tokio::test]
async fn plan_runs_full_pipeline_end_to_end() {
    let provider = StubProvider::with_best_flights(json!([
        { "price": 500, "airline_logo": "ai.png" },
        { "price": 100, "airline_logo": "6e.png" },
        { "layovers": [] },
        { "price": 300, "airline_logo": "uk.png" }
    ]))
    .await;
    let (app, calls) = router_for(&provider.endpoint, Script::default());

    let response = app
        .oneshot(post_json("/v1/plan", &trip_params_json()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    let plan = read_json(response).await;

    let prices = plan["flights"]
        .as_array()
        .unwrap()
        .iter()
        .map(|offer| offer["price"].as_i64().unwrap())
        .collect::<Vec<_>>();
    assert_eq!(prices, vec![100, 300, 500]);
    assert_eq!(plan["notices"], json!([]));
    assert_eq!(plan["itinerary"], "Day 1: Old Delhi heritage walk");
    assert_eq!(plan["packing_checklist"].as_array().unwrap().len(), 5);
    assert!(!plan["run_id"].as_str().unwrap().is_empty());

    assert_eq!(provider.hits(), 1);
    let calls = calls.lock();
    assert_eq!(calls.len(), 3);
    let mut first_two = calls[..2]
        .iter()
        .map(|(agent, _)| agent.as_str())
        .collect::<Vec<_>>();
    first_two.sort_unstable();
    assert_eq!(first_two, vec!["hospitality", "research"]);

    let (last_agent, last_prompt) = &calls[2];
    assert_eq!(last_agent, "itinerary");
    assert!(last_prompt.starts_with("Create a 5-day itinerary for DEL."));
    assert!(last_prompt.contains("Research: Humayun's Tomb, Chandni Chowk food walk"));
    assert!(last_prompt.contains("Hotels: The Lodhi; Dining: Indian Accent"));
    let ranked = serde_json::to_string(&plan["flights"]).unwrap();
    assert!(last_prompt.ends_with(&format!("Flight options: {ranked}.")));
}

#[tokio::test]
async fn provider_failure_still_produces_plan_with_notice() {
    let provider = StubProvider::spawn(StatusCode::INTERNAL_SERVER_ERROR, "{}").await;
    let (app, calls) = router_for(&provider.endpoint, Script::default());

    let response = app
        .oneshot(post_json("/v1/plan", &trip_params_json()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let plan = read_json(response).await;
    assert_eq!(plan["flights"], json!([]));
    assert_eq!(plan["notices"], json!(["Error fetching flight data: 500"]));
    assert_eq!(calls.lock().len(), 3);
    assert!(calls.lock()[2].1.ends_with("Flight options: []."));
}

#[tokio::test]
async fn agent_failure_maps_to_bad_gateway() {
    let provider = StubProvider::with_best_flights(json!([])).await;
    let script = Script {
        research: Err(503),
        ..Script::default()
    };
    let (app, calls) = router_for(&provider.endpoint, script);

    let response = app
        .oneshot(post_json("/v1/plan", &trip_params_json()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = read_json(response).await;
    assert_eq!(body["error"], "planning_failed");
    assert_eq!(body["stage"], "research");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("planning failed during research step"));
    assert!(calls.lock().iter().all(|(agent, _)| agent != "itinerary"));
}

#[tokio::test]
async fn out_of_range_trip_is_rejected_without_side_effects() {
    let provider = StubProvider::with_best_flights(json!([])).await;
    let (app, calls) = router_for(&provider.endpoint, Script::default());
    let mut params = trip_params_json();
    params["trip_days"] = json!(0);

    let response = app.oneshot(post_json("/v1/plan", &params)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["error"], "invalid_trip");
    assert_eq!(provider.hits(), 0);
    assert!(calls.lock().is_empty());
}

#[tokio::test]
async fn flights_route_returns_ranked_top_three() {
    let provider = StubProvider::with_best_flights(json!([
        { "price": 900 },
        { "price": 200 },
        { "price": 700 },
        { "price": 400 }
    ]))
    .await;
    let (app, calls) = router_for(&provider.endpoint, Script::default());

    let response = app
        .oneshot(post_json(
            "/v1/flights",
            &json!({
                "origin_code": "BOM",
                "destination_code": "DEL",
                "departure_date": "2026-11-02",
                "return_date": "2026-11-07"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(
        body["flights"],
        json!([{ "price": 200 }, { "price": 400 }, { "price": 700 }])
    );
    assert_eq!(body["notices"], json!([]));
    assert!(calls.lock().is_empty());
}

#[tokio::test]
async fn flights_route_trims_airport_codes_before_searching() {
    let provider = StubProvider::with_best_flights(json!([])).await;
    let (app, _) = router_for(&provider.endpoint, Script::default());

    let response = app
        .oneshot(post_json(
            "/v1/flights",
            &json!({
                "origin_code": " BOM ",
                "destination_code": "DEL ",
                "departure_date": "2026-11-02",
                "return_date": "2026-11-07"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let query = provider.last_query().unwrap();
    assert_eq!(query["departure_id"], "BOM");
    assert_eq!(query["arrival_id"], "DEL");
}

#[tokio::test]
async fn rate_limit_rejects_excess_requests_per_client() {
    let endpoint = closed_endpoint().await;
    let (app, _) = router_with_service(
        &endpoint,
        Script::default(),
        ServiceConfig {
            rate_limit_window: Duration::from_secs(60),
            rate_limit_max: 1,
            ..ServiceConfig::default()
        },
    );
    let route = json!({
        "origin_code": "BOM",
        "destination_code": "DEL",
        "departure_date": "2026-11-02",
        "return_date": "2026-11-07"
    });

    let first = app
        .clone()
        .oneshot(post_json("/v1/flights", &route))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app.oneshot(post_json("/v1/flights", &route)).await.unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(second.headers().contains_key("retry-after"));
}
