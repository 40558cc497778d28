use serde::{Deserialize, Serialize};

/// Latitude/longitude pair in decimal degrees.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// A named point of interest. `title` is display identity only and is not
/// guaranteed unique. `coordinates` must be present for map and photo
/// features but generation may legitimately omit it.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Location {
    pub title: String,
    pub description: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Destination {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

/// One day of the itinerary. `day` is 1-based and unique within an
/// itinerary; `activities` are opaque formatted strings that may embed
/// lightweight markup. An activity belongs to exactly one day at a time.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ItineraryDay {
    pub day: u32,
    pub activities: Vec<String>,
}

/// The full generated artifact for one trip. Created whole by a successful
/// generation, replaced whole on regenerate, mutated in place through the
/// itinerary operations while browsing.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TravelSuggestions {
    pub destination: Destination,
    #[serde(rename = "mustSeeAttractions")]
    pub must_see_attractions: Vec<Location>,
    #[serde(rename = "hiddenGems")]
    pub hidden_gems: Vec<Location>,
    pub restaurants: Vec<Location>,
    #[serde(default)]
    pub accommodation: Vec<Location>,
    #[serde(default)]
    pub events: Vec<Location>,
    #[serde(rename = "practicalAdvice", default)]
    pub practical_advice: String,
    pub itinerary: Vec<ItineraryDay>,
}

impl TravelSuggestions {
    /// Every point of interest that can be drawn on the map, in artifact
    /// order: attractions, gems, restaurants, then events.
    pub fn mappable_locations(&self) -> Vec<&Location> {
        self.must_see_attractions
            .iter()
            .chain(self.hidden_gems.iter())
            .chain(self.restaurants.iter())
            .chain(self.events.iter())
            .filter(|l| l.coordinates.is_some())
            .collect()
    }
}
