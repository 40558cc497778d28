use mongodb::bson::oid::ObjectId;
use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

use crate::models::trip::TravelSuggestions;

/// Persistence envelope for one trip. The suggestions document is stored
/// whole; re-saves are last-writer-wins. `share_id` is the public handle
/// for read-only shared access.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SavedTrip {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub share_id: String,
    pub title: String,
    pub destination: String,
    pub suggestions: TravelSuggestions,
    pub created_at: Option<DateTime>,
    pub updated_at: Option<DateTime>,
}

/// Listing view without the suggestions payload.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TripSummary {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub share_id: String,
    pub title: String,
    pub destination: String,
    pub created_at: Option<DateTime>,
    pub updated_at: Option<DateTime>,
}

impl From<&SavedTrip> for TripSummary {
    fn from(trip: &SavedTrip) -> Self {
        Self {
            id: trip.id,
            share_id: trip.share_id.clone(),
            title: trip.title.clone(),
            destination: trip.destination.clone(),
            created_at: trip.created_at,
            updated_at: trip.updated_at,
        }
    }
}
