use reqwest::{Client, StatusCode};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{info, instrument, warn};
use voyage_core::{FlightRoute, FlightSearchRequest, FlightSearchResponse};

pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://serpapi.com/search";
pub const DEFAULT_CURRENCY: &str = "INR";
pub const DEFAULT_LANGUAGE: &str = "en";
const SEARCH_ENGINE: &str = "google_flights";

#[derive(Debug, Clone)]
pub struct FlightSearchConfig {
    pub api_key: String,
    pub endpoint: String,
    pub currency: String,
    pub language: String,
}

impl FlightSearchConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            currency: DEFAULT_CURRENCY.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

/// Why a search produced no data. The display text doubles as the notice
/// shown to the user.
#[derive(Debug, Error)]
pub enum FlightFetchError {
    #[error("Error fetching flight data: {0}")]
    Status(u16),
    #[error("An error occurred while fetching flights: {0}")]
    Transport(#[source] reqwest::Error),
}

impl FlightFetchError {
    // The request URL carries the provider key in its query string.
    fn transport(error: reqwest::Error) -> Self {
        Self::Transport(error.without_url())
    }
}

#[derive(Debug, Clone, Default)]
pub struct FlightFetch {
    pub response: FlightSearchResponse,
    pub notice: Option<String>,
}

impl FlightFetch {
    fn degraded(error: FlightFetchError) -> Self {
        Self {
            response: FlightSearchResponse::empty(),
            notice: Some(error.to_string()),
        }
    }

    pub fn failed(&self) -> bool {
        self.notice.is_some()
    }
}

/// Single-attempt client for the flight search provider. Failures never
/// propagate: they degrade to an empty response plus a notice.
#[derive(Clone)]
pub struct FlightQuery {
    client: Client,
    config: FlightSearchConfig,
}

impl FlightQuery {
    pub fn new(client: Client, config: FlightSearchConfig) -> Self {
        Self { client, config }
    }

    pub fn request_for(&self, route: FlightRoute) -> FlightSearchRequest {
        FlightSearchRequest::new(route, &self.config.currency, &self.config.language)
    }

    #[instrument(skip(self), fields(origin = %route.origin_code, destination = %route.destination_code))]
    pub async fn fetch(&self, route: FlightRoute) -> FlightFetch {
        let request = self.request_for(route);
        match self.try_fetch(&request).await {
            Ok(response) => {
                let best_flights = response
                    .get("best_flights")
                    .and_then(|value| value.as_array())
                    .map_or(0, |offers| offers.len());
                info!(best_flights, "flight search completed");
                FlightFetch {
                    response,
                    notice: None,
                }
            }
            Err(error) => {
                warn!(error = %error, "flight search degraded to empty result");
                FlightFetch::degraded(error)
            }
        }
    }

    async fn try_fetch(
        &self,
        request: &FlightSearchRequest,
    ) -> Result<FlightSearchResponse, FlightFetchError> {
        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&search_params(request, &self.config.api_key))
            .send()
            .await
            .map_err(FlightFetchError::transport)?;

        if response.status() != StatusCode::OK {
            return Err(FlightFetchError::Status(response.status().as_u16()));
        }

        let body: Map<String, Value> = response
            .json()
            .await
            .map_err(FlightFetchError::transport)?;
        Ok(FlightSearchResponse(body))
    }
}

pub fn search_params(request: &FlightSearchRequest, api_key: &str) -> Vec<(&'static str, String)> {
    vec![
        ("engine", SEARCH_ENGINE.to_string()),
        ("departure_id", request.origin_code.clone()),
        ("arrival_id", request.destination_code.clone()),
        ("outbound_date", request.departure_date.to_string()),
        ("return_date", request.return_date.to_string()),
        ("currency", request.currency.clone()),
        ("hl", request.locale.clone()),
        ("api_key", api_key.to_string()),
    ]
}
