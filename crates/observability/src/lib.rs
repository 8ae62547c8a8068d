use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: OnceCell<()> = OnceCell::new();

#[derive(Debug, Default)]
pub struct AppMetrics {
    plans_total: AtomicU64,
    plans_failed_total: AtomicU64,
    flight_searches_total: AtomicU64,
    flight_search_failures_total: AtomicU64,
    agent_calls_total: AtomicU64,
    agent_failures_total: AtomicU64,
    total_latency_millis: AtomicU64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub plans_total: u64,
    pub plans_failed_total: u64,
    pub flight_searches_total: u64,
    pub flight_search_failures_total: u64,
    pub agent_calls_total: u64,
    pub agent_failures_total: u64,
    pub avg_plan_latency_millis: f64,
}

impl AppMetrics {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_plan(&self) {
        self.plans_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_plan_failure(&self) {
        self.plans_failed_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_flight_search(&self, failed: bool) {
        self.flight_searches_total.fetch_add(1, Ordering::Relaxed);
        if failed {
            self.flight_search_failures_total
                .fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_agent_call(&self, failed: bool) {
        self.agent_calls_total.fetch_add(1, Ordering::Relaxed);
        if failed {
            self.agent_failures_total.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn observe_latency(&self, duration: Duration) {
        self.total_latency_millis
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let plans = self.plans_total.load(Ordering::Relaxed);
        let latency = self.total_latency_millis.load(Ordering::Relaxed);

        MetricsSnapshot {
            plans_total: plans,
            plans_failed_total: self.plans_failed_total.load(Ordering::Relaxed),
            flight_searches_total: self.flight_searches_total.load(Ordering::Relaxed),
            flight_search_failures_total: self
                .flight_search_failures_total
                .load(Ordering::Relaxed),
            agent_calls_total: self.agent_calls_total.load(Ordering::Relaxed),
            agent_failures_total: self.agent_failures_total.load(Ordering::Relaxed),
            avg_plan_latency_millis: if plans == 0 {
                0.0
            } else {
                latency as f64 / plans as f64
            },
        }
    }
}

pub fn init_tracing(service_name: &str) {
    TRACING_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}=info,voyage_api=info,voyage_agents=info,voyage_flights=info",
                service_name
            ))
        });

        tracing_subscriber::fmt()
            .json()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .with_current_span(true)
            .with_span_list(true)
            .init();
    });
}
