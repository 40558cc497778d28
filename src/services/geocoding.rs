use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::time::Duration;

use crate::models::trip::Coordinates;

const NOMINATIM_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";
const USER_AGENT: &str = "tripweaver-api/0.1 (trip planner)";
const MAX_CANDIDATES: usize = 5;

#[derive(Debug)]
pub enum GeocodingError {
    HttpError(reqwest::Error),
    ResponseError(String),
}

impl fmt::Display for GeocodingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeocodingError::HttpError(err) => write!(f, "HTTP error: {}", err),
            GeocodingError::ResponseError(msg) => write!(f, "Response error: {}", msg),
        }
    }
}

impl Error for GeocodingError {}

impl From<reqwest::Error> for GeocodingError {
    fn from(err: reqwest::Error) -> Self {
        GeocodingError::HttpError(err)
    }
}

/// One autocomplete candidate for a free-text place query.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PlaceCandidate {
    pub name: String,
    pub coordinates: Coordinates,
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    display_name: String,
    lat: String,
    lon: String,
}

#[derive(Clone)]
pub struct GeocodingService {
    client: Client,
}

impl GeocodingService {
    pub fn new() -> Result<Self, GeocodingError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client })
    }

    /// Free-text place search used to back the destination autocomplete.
    pub async fn search(&self, query: &str) -> Result<Vec<PlaceCandidate>, GeocodingError> {
        let response = self
            .client
            .get(NOMINATIM_ENDPOINT)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("limit", &MAX_CANDIDATES.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodingError::ResponseError(format!(
                "Place search failed with status {}",
                status
            )));
        }

        let places: Vec<NominatimPlace> = response.json().await.map_err(|e| {
            GeocodingError::ResponseError(format!("Failed to parse response: {}", e))
        })?;

        // Coordinates arrive as strings; entries that fail to parse are
        // dropped rather than failing the whole lookup.
        let candidates = places
            .into_iter()
            .filter_map(|place| {
                let lat = place.lat.parse::<f64>().ok()?;
                let lng = place.lon.parse::<f64>().ok()?;
                Some(PlaceCandidate {
                    name: place.display_name,
                    coordinates: Coordinates { lat, lng },
                })
            })
            .collect();

        Ok(candidates)
    }
}
