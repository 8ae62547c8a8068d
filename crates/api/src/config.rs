use std::collections::HashMap;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use voyage_agents::{ConfigError, PlannerConfig};

pub const DEFAULT_BIND: &str = "0.0.0.0:8080";
pub const DEFAULT_SERVICE_KEY: &str = "dev-voyage-key";

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind: String,
    pub api_key: String,
    pub rate_limit_window: Duration,
    pub rate_limit_max: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            api_key: DEFAULT_SERVICE_KEY.to_string(),
            rate_limit_window: Duration::from_secs(60),
            rate_limit_max: 20,
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_map(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::from_lookup(|name| vars.get(name).cloned())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let window_secs = parse_or(
            "VOYAGE_RATE_LIMIT_WINDOW_SECONDS",
            &lookup,
            defaults.rate_limit_window.as_secs(),
        )?;

        Ok(Self {
            bind: lookup("VOYAGE_BIND").unwrap_or(defaults.bind),
            api_key: lookup("VOYAGE_API_KEY")
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or(defaults.api_key),
            rate_limit_window: Duration::from_secs(window_secs),
            rate_limit_max: parse_or("VOYAGE_RATE_LIMIT_MAX", &lookup, defaults.rate_limit_max)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub planner: PlannerConfig,
    pub service: ServiceConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            planner: PlannerConfig::from_env()?,
            service: ServiceConfig::from_env()?,
        })
    }
}

fn parse_or<T: FromStr>(
    name: &'static str,
    lookup: &impl Fn(&str) -> Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<T>().map_err(|_| ConfigError::InvalidValue {
            name,
            value: raw,
        }),
    }
}
