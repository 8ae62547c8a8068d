use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use reqwest::Client;
use voyage_agents::{PlannerConfig, TripPlanner};
use voyage_core::{
    default_packing_checklist, render_plan_text, BudgetTier, FlightClass, FlightRoute,
    HotelRating, TravelPreferences, TripParams, TripTheme, NO_FLIGHTS_NOTICE,
};
use voyage_observability::{init_tracing, AppMetrics};

#[derive(Debug, Parser)]
#[command(name = "voyage")]
#[command(about = "AI-powered travel planner")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search flights, research the destination and build an itinerary.
    Plan {
        #[command(flatten)]
        route: RouteArgs,
        #[arg(long, default_value_t = 5)]
        days: u8,
        #[arg(long, default_value = "couple-getaway")]
        theme: String,
        #[arg(long, default_value = "Relaxing on the beach, exploring historical sites")]
        activities: String,
        #[arg(long, default_value = "economy")]
        budget: String,
        #[arg(long, default_value = "economy")]
        flight_class: String,
        #[arg(long, default_value = "any")]
        hotel_rating: String,
        #[arg(long)]
        visa_check: bool,
        #[arg(long)]
        travel_insurance: bool,
        #[arg(long)]
        currency_rates: bool,
        /// Print the raw plan as JSON instead of the formatted report.
        #[arg(long)]
        json: bool,
    },
    /// Show the three cheapest flights for a route.
    Flights {
        #[command(flatten)]
        route: RouteArgs,
    },
}

#[derive(Debug, Args)]
struct RouteArgs {
    #[arg(long, default_value = "BOM")]
    origin: String,
    #[arg(long, default_value = "DEL")]
    destination: String,
    /// Departure date (YYYY-MM-DD), defaults to today.
    #[arg(long)]
    departure: Option<NaiveDate>,
    /// Return date (YYYY-MM-DD), defaults to today.
    #[arg(long = "return")]
    return_date: Option<NaiveDate>,
}

impl RouteArgs {
    fn into_route(self) -> FlightRoute {
        let today = Local::now().date_naive();
        FlightRoute {
            origin_code: self.origin,
            destination_code: self.destination,
            departure_date: self.departure.unwrap_or(today),
            return_date: self.return_date.unwrap_or(today),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing("voyage_cli");
    let cli = Cli::parse();

    let config = PlannerConfig::from_env()?;
    let http_client = Client::builder()
        .build()
        .context("failed to build HTTP client")?;
    let planner = TripPlanner::from_config(http_client, config, AppMetrics::shared());

    match cli.command {
        Command::Plan {
            route,
            days,
            theme,
            activities,
            budget,
            flight_class,
            hotel_rating,
            visa_check,
            travel_insurance,
            currency_rates,
            json,
        } => {
            let route = route.into_route();
            let params = TripParams {
                origin_code: route.origin_code,
                destination_code: route.destination_code,
                departure_date: route.departure_date,
                return_date: route.return_date,
                trip_days: days,
                theme: TripTheme::parse(&theme).context("invalid --theme value")?,
                activity_preferences: activities,
                preferences: TravelPreferences {
                    budget: BudgetTier::parse(&budget).context("invalid --budget value")?,
                    flight_class: FlightClass::parse(&flight_class)
                        .context("invalid --flight-class value")?,
                    hotel_rating: HotelRating::parse(&hotel_rating)
                        .context("invalid --hotel-rating value")?,
                    packing_checklist: default_packing_checklist(),
                    visa_check,
                    travel_insurance,
                    currency_rates,
                },
            };

            let result = planner.generate_plan(params.clone()).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", render_plan_text(&params, &result));
            }
        }
        Command::Flights { route } => {
            let summary = planner.search_flights(route.into_route()).await;
            for notice in &summary.notices {
                eprintln!("{notice}");
            }
            if summary.flights.is_empty() {
                println!("{NO_FLIGHTS_NOTICE}");
            } else {
                println!("{}", serde_json::to_string_pretty(&summary.flights)?);
            }
        }
    }

    Ok(())
}
