mod config;
mod openai;
mod roles;

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use reqwest::Client;
use thiserror::Error;
use tracing::{info, instrument, warn};
use uuid::Uuid;
use voyage_core::{
    hospitality_prompt, itinerary_prompt, rank_flights, research_prompt, travel_essentials,
    validate_trip, AgentResult, CoreError, FlightRoute, RankedFlightList, TripParams,
    TripPlanResult,
};
use voyage_flights::{FlightQuery, FlightSearchConfig};
use voyage_observability::AppMetrics;

pub use config::{ConfigError, PlannerConfig, REASONING_KEY_VAR, SEARCH_KEY_VAR};
pub use openai::{
    extract_output_text, OpenAiAgent, OpenAiConfig, DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL,
};
pub use roles::AgentRole;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("agent returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("agent returned no output text")]
    EmptyOutput,
}

/// An external reasoning capability: one prompt in, one block of text out.
pub trait ReasoningAgent: Send + Sync {
    fn name(&self) -> &str;

    fn run(&self, prompt: &str) -> impl Future<Output = Result<AgentResult, AgentError>> + Send;
}

#[derive(Debug, Error)]
pub enum PlanError {
    #[error(transparent)]
    InvalidTrip(#[from] CoreError),
    #[error("planning failed during {stage} step: {source}")]
    Agent {
        stage: AgentRole,
        #[source]
        source: AgentError,
    },
}

impl PlanError {
    pub fn failed_stage(&self) -> Option<AgentRole> {
        match self {
            Self::Agent { stage, .. } => Some(*stage),
            Self::InvalidTrip(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AgentRoster<A> {
    pub researcher: A,
    pub hotel_finder: A,
    pub planner: A,
}

impl AgentRoster<OpenAiAgent> {
    pub fn openai(client: Client, config: OpenAiConfig) -> Self {
        let config = Arc::new(config);
        Self {
            researcher: OpenAiAgent::new(client.clone(), config.clone(), AgentRole::Researcher),
            hotel_finder: OpenAiAgent::new(client.clone(), config.clone(), AgentRole::HotelFinder),
            planner: OpenAiAgent::new(client, config, AgentRole::Planner),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FlightSummary {
    pub flights: RankedFlightList,
    pub notices: Vec<String>,
}

/// Runs one trip plan: flight search and ranking, then research and
/// hospitality, then the itinerary built from everything before it.
#[derive(Clone)]
pub struct TripPlanner<A>
where
    A: ReasoningAgent,
{
    flights: FlightQuery,
    agents: Arc<AgentRoster<A>>,
    metrics: Arc<AppMetrics>,
}

impl TripPlanner<OpenAiAgent> {
    pub fn openai(
        client: Client,
        flight_config: FlightSearchConfig,
        openai_config: OpenAiConfig,
        metrics: Arc<AppMetrics>,
    ) -> Self {
        Self::new(
            FlightQuery::new(client.clone(), flight_config),
            AgentRoster::openai(client, openai_config),
            metrics,
        )
    }

    pub fn from_config(client: Client, config: PlannerConfig, metrics: Arc<AppMetrics>) -> Self {
        Self::openai(client, config.flights, config.openai, metrics)
    }
}

impl<A> TripPlanner<A>
where
    A: ReasoningAgent,
{
    pub fn new(flights: FlightQuery, agents: AgentRoster<A>, metrics: Arc<AppMetrics>) -> Self {
        Self {
            flights,
            agents: Arc::new(agents),
            metrics,
        }
    }

    pub fn metrics(&self) -> &Arc<AppMetrics> {
        &self.metrics
    }

    pub async fn search_flights(&self, route: FlightRoute) -> FlightSummary {
        let fetch = self.flights.fetch(route).await;
        self.metrics.record_flight_search(fetch.failed());

        FlightSummary {
            flights: rank_flights(&fetch.response),
            notices: fetch.notice.into_iter().collect(),
        }
    }

    #[instrument(skip(self, params), fields(destination = %params.destination(), days = params.trip_days))]
    pub async fn generate_plan(&self, params: TripParams) -> Result<TripPlanResult, PlanError> {
        validate_trip(&params)?;

        let started = Instant::now();
        let run_id = Uuid::new_v4().to_string();
        self.metrics.inc_plan();

        let outcome = self.run_pipeline(&run_id, &params).await;
        self.metrics.observe_latency(started.elapsed());

        match &outcome {
            Ok(result) => info!(
                run_id = %run_id,
                flights = result.flights.len(),
                notices = result.notices.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "trip plan generated"
            ),
            Err(error) => {
                self.metrics.inc_plan_failure();
                warn!(run_id = %run_id, error = %error, "trip plan failed");
            }
        }

        outcome
    }

    async fn run_pipeline(
        &self,
        run_id: &str,
        params: &TripParams,
    ) -> Result<TripPlanResult, PlanError> {
        let FlightSummary { flights, notices } = self.search_flights(params.flight_route()).await;

        // Research and hospitality share no output; both run to completion and
        // the research error wins when both fail.
        let (research, hospitality) = tokio::join!(
            self.call_agent(
                AgentRole::Researcher,
                &self.agents.researcher,
                research_prompt(params)
            ),
            self.call_agent(
                AgentRole::HotelFinder,
                &self.agents.hotel_finder,
                hospitality_prompt(params)
            ),
        );
        let (research, hospitality) = (research?, hospitality?);

        let itinerary = self
            .call_agent(
                AgentRole::Planner,
                &self.agents.planner,
                itinerary_prompt(params, &research.content, &hospitality.content, &flights),
            )
            .await?;

        Ok(TripPlanResult {
            run_id: run_id.to_string(),
            flights,
            research: research.content,
            hospitality: hospitality.content,
            itinerary: itinerary.content,
            notices,
            packing_checklist: params.preferences.packing_checklist.clone(),
            travel_essentials: travel_essentials(&params.preferences),
        })
    }

    async fn call_agent(
        &self,
        role: AgentRole,
        agent: &A,
        prompt: String,
    ) -> Result<AgentResult, PlanError> {
        let outcome = agent.run(&prompt).await;
        self.metrics.record_agent_call(outcome.is_err());

        outcome.map_err(|source| {
            warn!(agent = agent.name(), stage = %role, error = %source, "agent call failed");
            PlanError::Agent {
                stage: role,
                source,
            }
        })
    }
}
