use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, DateTime};
use mongodb::{Client, Collection};
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::saved_trip::{SavedTrip, TripSummary};
use crate::models::trip::{ItineraryDay, TravelSuggestions};
use crate::services::itinerary_ops::ItineraryError;

const DATABASE: &str = "Tripweaver";
const COLLECTION: &str = "Trips";

#[derive(Debug)]
pub enum TripError {
    NotFound,
    InvalidId(String),
    Itinerary(ItineraryError),
    Database(mongodb::error::Error),
}

impl fmt::Display for TripError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TripError::NotFound => write!(f, "trip not found"),
            TripError::InvalidId(id) => write!(f, "invalid id: {}", id),
            TripError::Itinerary(err) => write!(f, "itinerary operation failed: {}", err),
            TripError::Database(err) => write!(f, "database error: {}", err),
        }
    }
}

impl Error for TripError {}

impl From<mongodb::error::Error> for TripError {
    fn from(err: mongodb::error::Error) -> Self {
        TripError::Database(err)
    }
}

impl From<ItineraryError> for TripError {
    fn from(err: ItineraryError) -> Self {
        TripError::Itinerary(err)
    }
}

fn trips(client: &Client) -> Collection<SavedTrip> {
    client.database(DATABASE).collection(COLLECTION)
}

fn parse_oid(id: &str) -> Result<ObjectId, TripError> {
    ObjectId::parse_str(id).map_err(|_| TripError::InvalidId(id.to_string()))
}

/// Persists a new immutable snapshot of the artifact under the owner,
/// minting a fresh public share id.
pub async fn save_trip(
    client: &Arc<Client>,
    user_id: &str,
    title: &str,
    suggestions: TravelSuggestions,
) -> Result<SavedTrip, TripError> {
    let now = DateTime::now();
    let mut trip = SavedTrip {
        id: None,
        user_id: parse_oid(user_id)?,
        share_id: Uuid::new_v4().to_string(),
        title: title.to_string(),
        destination: suggestions.destination.name.clone(),
        suggestions,
        created_at: Some(now),
        updated_at: Some(now),
    };

    let inserted = trips(client).insert_one(&trip).await?;
    trip.id = inserted.inserted_id.as_object_id();
    Ok(trip)
}

pub async fn list_trips(client: &Arc<Client>, user_id: &str) -> Result<Vec<TripSummary>, TripError> {
    let owner = parse_oid(user_id)?;
    let cursor = trips(client)
        .find(doc! { "user_id": owner })
        .sort(doc! { "updated_at": -1 })
        .await?;
    let saved: Vec<SavedTrip> = cursor.try_collect().await?;
    Ok(saved.iter().map(TripSummary::from).collect())
}

pub async fn get_trip(
    client: &Arc<Client>,
    user_id: &str,
    trip_id: &str,
) -> Result<SavedTrip, TripError> {
    let filter = doc! { "_id": parse_oid(trip_id)?, "user_id": parse_oid(user_id)? };
    trips(client).find_one(filter).await?.ok_or(TripError::NotFound)
}

/// Public read-only access by share id.
pub async fn get_shared_trip(client: &Arc<Client>, share_id: &str) -> Result<SavedTrip, TripError> {
    trips(client)
        .find_one(doc! { "share_id": share_id })
        .await?
        .ok_or(TripError::NotFound)
}

/// Re-save: replaces the stored artifact wholesale. Last-writer-wins; no
/// optimistic concurrency check against the stored copy.
pub async fn update_trip(
    client: &Arc<Client>,
    user_id: &str,
    trip_id: &str,
    title: &str,
    suggestions: TravelSuggestions,
) -> Result<SavedTrip, TripError> {
    let filter = doc! { "_id": parse_oid(trip_id)?, "user_id": parse_oid(user_id)? };
    let mut trip = trips(client)
        .find_one(filter.clone())
        .await?
        .ok_or(TripError::NotFound)?;

    trip.title = title.to_string();
    trip.destination = suggestions.destination.name.clone();
    trip.suggestions = suggestions;
    trip.updated_at = Some(DateTime::now());

    trips(client).replace_one(filter, &trip).await?;
    Ok(trip)
}

pub async fn delete_trip(
    client: &Arc<Client>,
    user_id: &str,
    trip_id: &str,
) -> Result<(), TripError> {
    let filter = doc! { "_id": parse_oid(trip_id)?, "user_id": parse_oid(user_id)? };
    let result = trips(client).delete_one(filter).await?;
    if result.deleted_count == 0 {
        return Err(TripError::NotFound);
    }
    Ok(())
}

/// Loads the trip, applies one itinerary mutation, and writes the document
/// back. The closure sees the live day list; any itinerary error aborts
/// without persisting.
pub async fn mutate_itinerary<F>(
    client: &Arc<Client>,
    user_id: &str,
    trip_id: &str,
    operation: F,
) -> Result<SavedTrip, TripError>
where
    F: FnOnce(&mut Vec<ItineraryDay>) -> Result<(), ItineraryError>,
{
    let filter = doc! { "_id": parse_oid(trip_id)?, "user_id": parse_oid(user_id)? };
    let mut trip = trips(client)
        .find_one(filter.clone())
        .await?
        .ok_or(TripError::NotFound)?;

    operation(&mut trip.suggestions.itinerary)?;
    trip.updated_at = Some(DateTime::now());

    trips(client).replace_one(filter, &trip).await?;
    Ok(trip)
}
