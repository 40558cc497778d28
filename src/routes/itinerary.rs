use actix_web::{web, HttpResponse, Responder};
use mongodb::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::middleware::auth::Claims;
use crate::routes::trip::trip_error_response;
use crate::services::itinerary_ops::{self, DragPayload};
use crate::services::trajectory;
use crate::services::trip_service;

#[derive(Serialize, Deserialize)]
pub struct AppendActivityInput {
    pub day: u32,
    pub activity: String,
}

#[derive(Serialize, Deserialize)]
pub struct ReorderActivityInput {
    pub day: u32,
    #[serde(rename = "sourceIndex")]
    pub source_index: usize,
    #[serde(rename = "targetIndex")]
    pub target_index: usize,
}

#[derive(Serialize, Deserialize)]
pub struct MoveActivityInput {
    #[serde(rename = "sourceDay")]
    pub source_day: u32,
    #[serde(rename = "targetDay")]
    pub target_day: u32,
    #[serde(rename = "sourceIndex")]
    pub source_index: usize,
    #[serde(rename = "targetIndex")]
    pub target_index: usize,
}

/// Body of a drop: the payload attached at drag start plus the drop target.
#[derive(Serialize, Deserialize)]
pub struct DropActivityInput {
    pub payload: DragPayload,
    #[serde(rename = "targetDay")]
    pub target_day: u32,
    #[serde(rename = "targetIndex")]
    pub target_index: usize,
}

/*
    POST /api/trips/{id}/activities
*/
pub async fn append_activity(
    claims: Claims,
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
    input: web::Json<AppendActivityInput>,
) -> impl Responder {
    let client = data.into_inner();
    let input = input.into_inner();
    let result = trip_service::mutate_itinerary(&client, &claims.user_id, &path.into_inner(), |days| {
        itinerary_ops::append_activity(days, input.day, input.activity);
        Ok(())
    })
    .await;

    match result {
        Ok(trip) => HttpResponse::Ok().json(trip.suggestions.itinerary),
        Err(err) => trip_error_response(err),
    }
}

/*
    PUT /api/trips/{id}/activities/reorder
*/
pub async fn reorder_activity(
    claims: Claims,
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
    input: web::Json<ReorderActivityInput>,
) -> impl Responder {
    let client = data.into_inner();
    let input = input.into_inner();
    let result = trip_service::mutate_itinerary(&client, &claims.user_id, &path.into_inner(), |days| {
        itinerary_ops::reorder_within_day(days, input.day, input.source_index, input.target_index)
    })
    .await;

    match result {
        Ok(trip) => HttpResponse::Ok().json(trip.suggestions.itinerary),
        Err(err) => trip_error_response(err),
    }
}

/*
    PUT /api/trips/{id}/activities/move
*/
pub async fn move_activity(
    claims: Claims,
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
    input: web::Json<MoveActivityInput>,
) -> impl Responder {
    let client = data.into_inner();
    let input = input.into_inner();
    let result = trip_service::mutate_itinerary(&client, &claims.user_id, &path.into_inner(), |days| {
        itinerary_ops::move_across_days(
            days,
            input.source_day,
            input.target_day,
            input.source_index,
            input.target_index,
        )
    })
    .await;

    match result {
        Ok(trip) => HttpResponse::Ok().json(trip.suggestions.itinerary),
        Err(err) => trip_error_response(err),
    }
}

/*
    PUT /api/trips/{id}/activities/drop
*/
pub async fn drop_activity(
    claims: Claims,
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
    input: web::Json<DropActivityInput>,
) -> impl Responder {
    let client = data.into_inner();
    let input = input.into_inner();
    let result = trip_service::mutate_itinerary(&client, &claims.user_id, &path.into_inner(), |days| {
        itinerary_ops::apply_drop(days, input.payload, input.target_day, input.target_index)
    })
    .await;

    match result {
        Ok(trip) => HttpResponse::Ok().json(trip.suggestions.itinerary),
        Err(err) => trip_error_response(err),
    }
}

/*
    DELETE /api/trips/{id}/activities/{day}/{index}
*/
pub async fn delete_activity(
    claims: Claims,
    data: web::Data<Arc<Client>>,
    path: web::Path<(String, u32, usize)>,
) -> impl Responder {
    let client = data.into_inner();
    let (trip_id, day, index) = path.into_inner();
    let result = trip_service::mutate_itinerary(&client, &claims.user_id, &trip_id, |days| {
        itinerary_ops::delete_activity(days, day, index)
    })
    .await;

    match result {
        Ok(trip) => HttpResponse::Ok().json(trip.suggestions.itinerary),
        Err(err) => trip_error_response(err),
    }
}

/*
    GET /api/trips/{id}/trajectory  (ordered points for the map polyline)
*/
pub async fn get_trajectory(
    claims: Claims,
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
) -> impl Responder {
    let client = data.into_inner();
    match trip_service::get_trip(&client, &claims.user_id, &path.into_inner()).await {
        Ok(trip) => HttpResponse::Ok().json(trajectory::trajectory_for(&trip.suggestions)),
        Err(err) => trip_error_response(err),
    }
}
