mod config;
mod rate_limit;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Json, State};
use axum::http::{header, HeaderValue, Method, Request, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{body::Body, Router};
use reqwest::Client;
use serde::Serialize;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use voyage_agents::{OpenAiAgent, PlanError, ReasoningAgent, TripPlanner};
use voyage_core::{FlightRoute, RankedFlightList, TripParams};
use voyage_observability::{AppMetrics, MetricsSnapshot};

pub use crate::config::{AppConfig, ServiceConfig, DEFAULT_BIND, DEFAULT_SERVICE_KEY};
pub use crate::rate_limit::ClientRateLimiter;

const MAX_BODY_BYTES: usize = 64 * 1024;

pub struct ApiState<A>
where
    A: ReasoningAgent,
{
    pub planner: Arc<TripPlanner<A>>,
    pub metrics: Arc<AppMetrics>,
}

impl<A> Clone for ApiState<A>
where
    A: ReasoningAgent,
{
    fn clone(&self) -> Self {
        Self {
            planner: self.planner.clone(),
            metrics: self.metrics.clone(),
        }
    }
}

impl<A> ApiState<A>
where
    A: ReasoningAgent,
{
    pub fn new(planner: TripPlanner<A>) -> Self {
        let metrics = planner.metrics().clone();
        Self {
            planner: Arc::new(planner),
            metrics,
        }
    }
}

/// Service-key and rate-limit checks shared by every non-public route.
#[derive(Clone)]
pub struct AccessGuard {
    api_key: Arc<str>,
    limiter: ClientRateLimiter,
}

impl AccessGuard {
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self {
            api_key: Arc::from(config.api_key.as_str()),
            limiter: ClientRateLimiter::new(config.rate_limit_window, config.rate_limit_max),
        }
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp_utc: String,
    metrics: MetricsSnapshot,
}

#[derive(Debug, Serialize)]
struct FlightsResponse {
    flights: RankedFlightList,
    notices: Vec<String>,
}

pub async fn build_app(config: AppConfig) -> Result<Router> {
    let metrics = AppMetrics::shared();
    let http_client = Client::builder()
        .build()
        .context("failed to build HTTP client")?;

    let planner = TripPlanner::from_config(http_client, config.planner, metrics);
    info!(
        bind = %config.service.bind,
        rate_limit_max = config.service.rate_limit_max,
        "trip planner initialised"
    );

    Ok(build_router::<OpenAiAgent>(
        ApiState::new(planner),
        AccessGuard::from_config(&config.service),
    ))
}

pub fn build_router<A>(state: ApiState<A>, guard: AccessGuard) -> Router
where
    A: ReasoningAgent + 'static,
{
    Router::new()
        .route("/health", get(health::<A>))
        .route("/v1/plan", post(plan_trip::<A>))
        .route("/v1/flights", post(search_flights::<A>))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(middleware::from_fn_with_state(
            guard.clone(),
            api_key_middleware,
        ))
        .layer(middleware::from_fn_with_state(guard, rate_limit_middleware))
        .with_state(state)
}

async fn health<A>(State(state): State<ApiState<A>>) -> impl IntoResponse
where
    A: ReasoningAgent + 'static,
{
    let payload = HealthResponse {
        status: "ok",
        timestamp_utc: chrono::Utc::now().to_rfc3339(),
        metrics: state.metrics.snapshot(),
    };
    (StatusCode::OK, Json(payload))
}

async fn plan_trip<A>(State(state): State<ApiState<A>>, Json(params): Json<TripParams>) -> Response
where
    A: ReasoningAgent + 'static,
{
    match state.planner.generate_plan(params).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(error @ PlanError::InvalidTrip(_)) => {
            error_response(StatusCode::BAD_REQUEST, "invalid_trip", &error.to_string())
        }
        Err(error) => {
            let stage = error.failed_stage().map(|stage| stage.stage());
            (
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({
                    "error": "planning_failed",
                    "stage": stage,
                    "message": error.to_string()
                })),
            )
                .into_response()
        }
    }
}

async fn search_flights<A>(
    State(state): State<ApiState<A>>,
    Json(route): Json<FlightRoute>,
) -> impl IntoResponse
where
    A: ReasoningAgent + 'static,
{
    let summary = state.planner.search_flights(route).await;
    (
        StatusCode::OK,
        Json(FlightsResponse {
            flights: summary.flights,
            notices: summary.notices,
        }),
    )
}

fn error_response(status: StatusCode, code: &str, message: &str) -> Response {
    (
        status,
        Json(serde_json::json!({
            "error": code,
            "message": message
        })),
    )
        .into_response()
}

fn is_public_endpoint(path: &str) -> bool {
    matches!(path, "/health")
}

async fn api_key_middleware(
    State(guard): State<AccessGuard>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if request.method() == Method::OPTIONS || is_public_endpoint(request.uri().path()) {
        return next.run(request).await;
    }

    let header_key = request
        .headers()
        .get("x-api-key")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if header_key != guard.api_key.as_ref() {
        return error_response(
            StatusCode::UNAUTHORIZED,
            "unauthorized",
            "missing or invalid x-api-key",
        );
    }

    next.run(request).await
}

async fn rate_limit_middleware(
    State(guard): State<AccessGuard>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if request.method() == Method::OPTIONS || is_public_endpoint(request.uri().path()) {
        return next.run(request).await;
    }

    let ip = request_ip(&request);
    if let Err(retry_after) = guard.limiter.check(&ip) {
        let mut response = error_response(
            StatusCode::TOO_MANY_REQUESTS,
            "rate_limited",
            "rate limit exceeded for this IP",
        );
        let seconds = retry_after.as_secs().max(1).to_string();
        if let Ok(value) = HeaderValue::from_str(&seconds) {
            response.headers_mut().insert(header::RETRY_AFTER, value);
        }
        return response;
    }

    next.run(request).await
}

fn request_ip(request: &Request<Body>) -> String {
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .map(|value| {
            value
                .split(',')
                .next()
                .unwrap_or("unknown")
                .trim()
                .to_string()
        })
        .unwrap_or_else(|| "local".to_string())
}

async fn security_headers_middleware(request: Request<Body>, next: Next) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
    );

    response
}
