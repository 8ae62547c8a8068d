use std::collections::HashMap;
use std::env;

use thiserror::Error;
use voyage_flights::{FlightSearchConfig, DEFAULT_CURRENCY, DEFAULT_LANGUAGE, DEFAULT_SEARCH_ENDPOINT};

use crate::openai::{OpenAiConfig, DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL};

pub const SEARCH_KEY_VAR: &str = "SERPAPI_KEY";
pub const REASONING_KEY_VAR: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} is missing. Please add it to your .env file.")]
    MissingCredential(&'static str),
    #[error("{name} has an invalid value {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

/// Everything a planner needs, read once at startup.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    pub flights: FlightSearchConfig,
    pub openai: OpenAiConfig,
}

impl PlannerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_map(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::from_lookup(|name| vars.get(name).cloned())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let search_key =
            non_empty(SEARCH_KEY_VAR).ok_or(ConfigError::MissingCredential(SEARCH_KEY_VAR))?;
        let reasoning_key =
            non_empty(REASONING_KEY_VAR).ok_or(ConfigError::MissingCredential(REASONING_KEY_VAR))?;

        Ok(Self {
            flights: FlightSearchConfig {
                api_key: search_key,
                endpoint: non_empty("VOYAGE_FLIGHT_SEARCH_URL")
                    .unwrap_or_else(|| DEFAULT_SEARCH_ENDPOINT.to_string()),
                currency: non_empty("VOYAGE_CURRENCY")
                    .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
                language: non_empty("VOYAGE_LANGUAGE")
                    .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            },
            openai: OpenAiConfig {
                api_key: reasoning_key,
                model: non_empty("VOYAGE_OPENAI_MODEL")
                    .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
                base_url: non_empty("VOYAGE_OPENAI_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            },
        })
    }
}
