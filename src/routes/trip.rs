use actix_web::{web, HttpResponse, Responder};
use mongodb::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::middleware::auth::Claims;
use crate::models::trip::{Location, TravelSuggestions};
use crate::services::photos::{self, PhotoService};
use crate::services::subscription_service::{self, SubscriptionError};
use crate::services::trip_service::{self, TripError};

#[derive(Serialize, Deserialize)]
pub struct SaveTripInput {
    pub title: String,
    pub suggestions: TravelSuggestions,
}

pub(crate) fn trip_error_response(err: TripError) -> HttpResponse {
    match err {
        TripError::NotFound => HttpResponse::NotFound().body("Trip not found"),
        TripError::InvalidId(_) => HttpResponse::BadRequest().body("Invalid ID"),
        TripError::Itinerary(e) => HttpResponse::BadRequest().body(e.to_string()),
        TripError::Database(e) => {
            log::error!("Trip storage error: {}", e);
            HttpResponse::InternalServerError().body("Failed to access trips")
        }
    }
}

/// Saving (and thereby sharing) is a premium action.
async fn premium_gate(client: &Arc<Client>, user_id: &str) -> Option<HttpResponse> {
    match subscription_service::require_active(client, user_id).await {
        Ok(()) => None,
        Err(SubscriptionError::NotSubscribed) => Some(
            HttpResponse::PaymentRequired().body("An active subscription is required to save trips"),
        ),
        Err(SubscriptionError::InvalidId(_)) => {
            Some(HttpResponse::BadRequest().body("Invalid ID"))
        }
        Err(SubscriptionError::Database(e)) => {
            log::error!("Subscription lookup failed: {}", e);
            Some(HttpResponse::InternalServerError().body("Failed to check subscription"))
        }
    }
}

/*
    POST /api/trips
*/
pub async fn save_trip(
    claims: Claims,
    data: web::Data<Arc<Client>>,
    input: web::Json<SaveTripInput>,
) -> impl Responder {
    let client = data.into_inner();
    if let Some(denied) = premium_gate(&client, &claims.user_id).await {
        return denied;
    }

    let input = input.into_inner();
    match trip_service::save_trip(&client, &claims.user_id, &input.title, input.suggestions).await
    {
        Ok(trip) => HttpResponse::Ok().json(trip),
        Err(err) => trip_error_response(err),
    }
}

/*
    GET /api/trips
*/
pub async fn list_trips(claims: Claims, data: web::Data<Arc<Client>>) -> impl Responder {
    let client = data.into_inner();
    match trip_service::list_trips(&client, &claims.user_id).await {
        Ok(summaries) => HttpResponse::Ok().json(summaries),
        Err(err) => trip_error_response(err),
    }
}

/*
    GET /api/trips/{id}
*/
pub async fn get_trip(
    claims: Claims,
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
) -> impl Responder {
    let client = data.into_inner();
    match trip_service::get_trip(&client, &claims.user_id, &path.into_inner()).await {
        Ok(trip) => HttpResponse::Ok().json(trip),
        Err(err) => trip_error_response(err),
    }
}

/*
    PUT /api/trips/{id}  (re-save, last-writer-wins)
*/
pub async fn update_trip(
    claims: Claims,
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
    input: web::Json<SaveTripInput>,
) -> impl Responder {
    let client = data.into_inner();
    if let Some(denied) = premium_gate(&client, &claims.user_id).await {
        return denied;
    }

    let input = input.into_inner();
    match trip_service::update_trip(
        &client,
        &claims.user_id,
        &path.into_inner(),
        &input.title,
        input.suggestions,
    )
    .await
    {
        Ok(trip) => HttpResponse::Ok().json(trip),
        Err(err) => trip_error_response(err),
    }
}

/*
    DELETE /api/trips/{id}
*/
pub async fn delete_trip(
    claims: Claims,
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
) -> impl Responder {
    let client = data.into_inner();
    match trip_service::delete_trip(&client, &claims.user_id, &path.into_inner()).await {
        Ok(()) => HttpResponse::Ok().body("Trip deleted"),
        Err(err) => trip_error_response(err),
    }
}

/*
    GET /api/trips/{id}/photos  (batch lookup over the trip's mappable points)
*/
pub async fn get_trip_photos(
    claims: Claims,
    data: web::Data<Arc<Client>>,
    photo_service: web::Data<PhotoService>,
    path: web::Path<String>,
) -> impl Responder {
    let client = data.into_inner();
    let trip = match trip_service::get_trip(&client, &claims.user_id, &path.into_inner()).await {
        Ok(trip) => trip,
        Err(err) => return trip_error_response(err),
    };

    let locations: Vec<Location> = trip
        .suggestions
        .mappable_locations()
        .into_iter()
        .cloned()
        .collect();
    let results = photos::photos_for_locations(photo_service.get_ref(), &locations).await;
    HttpResponse::Ok().json(results)
}

/*
    GET /api/shared/{share_id}  (public, read-only)
*/
pub async fn get_shared_trip(
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
) -> impl Responder {
    let client = data.into_inner();
    match trip_service::get_shared_trip(&client, &path.into_inner()).await {
        Ok(trip) => HttpResponse::Ok().json(trip),
        Err(err) => trip_error_response(err),
    }
}
