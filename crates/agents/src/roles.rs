use std::fmt;

use serde_json::{json, Value};

/// The three agents a plan is built from, in the order their results appear
/// in the final itinerary prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentRole {
    Researcher,
    HotelFinder,
    Planner,
}

impl AgentRole {
    pub fn name(self) -> &'static str {
        match self {
            Self::Researcher => "Researcher",
            Self::HotelFinder => "Hotel & Restaurant Finder",
            Self::Planner => "Planner",
        }
    }

    pub fn stage(self) -> &'static str {
        match self {
            Self::Researcher => "research",
            Self::HotelFinder => "hospitality",
            Self::Planner => "itinerary",
        }
    }

    pub fn instructions(self) -> &'static [&'static str] {
        match self {
            Self::Researcher => &[
                "Identify the travel destination specified by the user.",
                "Gather detailed information on the destination, including climate, culture, and safety tips.",
                "Find popular attractions, landmarks, and must-visit places.",
                "Search for activities that match the user's interests and travel style.",
                "Provide structured summaries with key insights.",
            ],
            Self::HotelFinder => &[
                "Search for top-rated hotels near major attractions.",
                "Recommend restaurants matching user preferences.",
                "Prioritize based on ratings, price, and distance.",
            ],
            Self::Planner => &[
                "Create a detailed day-by-day itinerary.",
                "Optimize schedule based on user budget and preferences.",
                "Estimate travel times and activity durations.",
                "Provide a well-formatted final itinerary.",
            ],
        }
    }

    /// Researcher and hotel finder look things up on the web; the planner
    /// works only from its prompt.
    pub fn uses_web_search(self) -> bool {
        !matches!(self, Self::Planner)
    }

    pub fn system_prompt(self) -> String {
        let mut prompt = format!("You are the {} agent of a travel planner.", self.name());
        for line in self.instructions() {
            prompt.push('\n');
            prompt.push_str("- ");
            prompt.push_str(line);
        }
        prompt
    }

    pub fn tools(self) -> Vec<Value> {
        if self.uses_web_search() {
            vec![json!({ "type": "web_search_preview" })]
        } else {
            Vec::new()
        }
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.stage())
    }
}
