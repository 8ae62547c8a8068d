pub mod models;
pub mod prompts;
pub mod ranking;
pub mod render;
pub mod validation;

pub use models::*;
pub use prompts::{hospitality_prompt, itinerary_prompt, research_prompt};
pub use ranking::{rank_flights, MAX_RANKED_FLIGHTS};
pub use render::{headline, render_plan_text, travel_essentials, NO_FLIGHTS_NOTICE};
pub use validation::{validate_trip, CoreError, MAX_TRIP_DAYS, MIN_TRIP_DAYS};
