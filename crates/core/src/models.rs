use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripTheme {
    #[default]
    CoupleGetaway,
    FamilyVacation,
    AdventureTrip,
    SoloExploration,
}

impl TripTheme {
    pub fn parse(value: &str) -> Option<Self> {
        match normalize_choice(value).as_str() {
            "couple" | "couple_getaway" | "couplegetaway" => Some(Self::CoupleGetaway),
            "family" | "family_vacation" | "familyvacation" => Some(Self::FamilyVacation),
            "adventure" | "adventure_trip" | "adventuretrip" => Some(Self::AdventureTrip),
            "solo" | "solo_exploration" | "soloexploration" => Some(Self::SoloExploration),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::CoupleGetaway => "Couple Getaway",
            Self::FamilyVacation => "Family Vacation",
            Self::AdventureTrip => "Adventure Trip",
            Self::SoloExploration => "Solo Exploration",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetTier {
    #[default]
    Economy,
    Standard,
    Luxury,
}

impl BudgetTier {
    pub fn parse(value: &str) -> Option<Self> {
        match normalize_choice(value).as_str() {
            "economy" | "budget" => Some(Self::Economy),
            "standard" => Some(Self::Standard),
            "luxury" => Some(Self::Luxury),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Economy => "Economy",
            Self::Standard => "Standard",
            Self::Luxury => "Luxury",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightClass {
    #[default]
    Economy,
    Business,
    FirstClass,
}

impl FlightClass {
    pub fn parse(value: &str) -> Option<Self> {
        match normalize_choice(value).as_str() {
            "economy" => Some(Self::Economy),
            "business" => Some(Self::Business),
            "first" | "first_class" | "firstclass" => Some(Self::FirstClass),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Economy => "Economy",
            Self::Business => "Business",
            Self::FirstClass => "First Class",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HotelRating {
    #[default]
    Any,
    ThreeStar,
    FourStar,
    FiveStar,
}

impl HotelRating {
    pub fn parse(value: &str) -> Option<Self> {
        match normalize_choice(value).as_str() {
            "any" => Some(Self::Any),
            "3" | "3_star" | "three_star" | "threestar" => Some(Self::ThreeStar),
            "4" | "4_star" | "four_star" | "fourstar" => Some(Self::FourStar),
            "5" | "5_star" | "five_star" | "fivestar" => Some(Self::FiveStar),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Any => "Any",
            Self::ThreeStar => "3⭐",
            Self::FourStar => "4⭐",
            Self::FiveStar => "5⭐",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackingItem {
    pub item: String,
    pub packed: bool,
}

pub fn default_packing_checklist() -> Vec<PackingItem> {
    [
        ("Clothes", true),
        ("Comfortable Footwear", true),
        ("Sunglasses & Sunscreen", false),
        ("Travel Guidebook", false),
        ("Medications & First-Aid", true),
    ]
    .into_iter()
    .map(|(item, packed)| PackingItem {
        item: item.to_string(),
        packed,
    })
    .collect()
}

/// Sidebar preferences. Only `budget` and `hotel_rating` reach the agents; the
/// rest is echoed back for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TravelPreferences {
    pub budget: BudgetTier,
    pub flight_class: FlightClass,
    pub hotel_rating: HotelRating,
    pub packing_checklist: Vec<PackingItem>,
    pub visa_check: bool,
    pub travel_insurance: bool,
    pub currency_rates: bool,
}

impl Default for TravelPreferences {
    fn default() -> Self {
        Self {
            budget: BudgetTier::default(),
            flight_class: FlightClass::default(),
            hotel_rating: HotelRating::default(),
            packing_checklist: default_packing_checklist(),
            visa_check: false,
            travel_insurance: false,
            currency_rates: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripParams {
    pub origin_code: String,
    pub destination_code: String,
    pub departure_date: NaiveDate,
    pub return_date: NaiveDate,
    pub trip_days: u8,
    #[serde(default)]
    pub theme: TripTheme,
    #[serde(default = "default_activity_preferences")]
    pub activity_preferences: String,
    #[serde(default)]
    pub preferences: TravelPreferences,
}

pub fn default_activity_preferences() -> String {
    "Relaxing on the beach, exploring historical sites".to_string()
}

impl TripParams {
    pub fn flight_route(&self) -> FlightRoute {
        FlightRoute {
            origin_code: self.origin_code.clone(),
            destination_code: self.destination_code.clone(),
            departure_date: self.departure_date,
            return_date: self.return_date,
        }
        .normalized()
    }

    pub fn destination(&self) -> &str {
        self.destination_code.trim()
    }
}

/// The caller-supplied half of a flight search; currency and locale are
/// attached from configuration when the request is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightRoute {
    pub origin_code: String,
    pub destination_code: String,
    pub departure_date: NaiveDate,
    pub return_date: NaiveDate,
}

impl FlightRoute {
    /// Airport codes with surrounding whitespace removed.
    pub fn normalized(self) -> Self {
        Self {
            origin_code: self.origin_code.trim().to_string(),
            destination_code: self.destination_code.trim().to_string(),
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightSearchRequest {
    pub origin_code: String,
    pub destination_code: String,
    pub departure_date: NaiveDate,
    pub return_date: NaiveDate,
    pub currency: String,
    pub locale: String,
}

impl FlightSearchRequest {
    pub fn new(route: FlightRoute, currency: &str, locale: &str) -> Self {
        let route = route.normalized();
        Self {
            origin_code: route.origin_code,
            destination_code: route.destination_code,
            departure_date: route.departure_date,
            return_date: route.return_date,
            currency: currency.to_string(),
            locale: locale.to_string(),
        }
    }
}

/// Raw provider payload. An empty object stands for "no data".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlightSearchResponse(pub Map<String, Value>);

impl FlightSearchResponse {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

/// One provider offer, kept opaque apart from its price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlightOffer(pub Map<String, Value>);

impl FlightOffer {
    /// Numeric `price`, or `None` when the field is absent or not a number.
    pub fn price(&self) -> Option<f64> {
        self.0.get("price").and_then(Value::as_f64)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankedFlightList(pub Vec<FlightOffer>);

impl RankedFlightList {
    pub fn offers(&self) -> &[FlightOffer] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_prompt_json(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_else(|_| "[]".to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentResult {
    pub content: String,
}

impl AgentResult {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripPlanResult {
    pub run_id: String,
    pub flights: RankedFlightList,
    pub research: String,
    pub hospitality: String,
    pub itinerary: String,
    pub notices: Vec<String>,
    pub packing_checklist: Vec<PackingItem>,
    pub travel_essentials: Vec<String>,
}

fn normalize_choice(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .replace(['-', ' '], "_")
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || *ch == '_')
        .collect()
}
