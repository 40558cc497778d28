use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;

use crate::models::trip::Coordinates;
use crate::services::geocoding::GeocodingService;
use crate::services::photos::PhotoService;

#[derive(Deserialize)]
pub struct PlaceQuery {
    q: String,
}

#[derive(Deserialize)]
pub struct PhotoQuery {
    q: String,
    lat: Option<f64>,
    lng: Option<f64>,
}

/*
    GET /api/places?q=...  (destination autocomplete)
*/
pub async fn search_places(
    query: web::Query<PlaceQuery>,
    data: web::Data<GeocodingService>,
) -> impl Responder {
    if query.q.trim().is_empty() {
        return HttpResponse::BadRequest().body("Query is required");
    }

    match data.search(&query.q).await {
        Ok(candidates) => HttpResponse::Ok().json(candidates),
        Err(err) => {
            log::error!("Place search failed: {}", err);
            HttpResponse::BadGateway().body("Place search unavailable")
        }
    }
}

/*
    GET /api/photos?q=...&lat=...&lng=...
*/
pub async fn search_photos(
    query: web::Query<PhotoQuery>,
    data: web::Data<PhotoService>,
) -> impl Responder {
    if query.q.trim().is_empty() {
        return HttpResponse::BadRequest().body("Query is required");
    }

    let near = match (query.lat, query.lng) {
        (Some(lat), Some(lng)) => Some(Coordinates { lat, lng }),
        _ => None,
    };

    // Empty results are valid; the client simply shows no photo.
    match data.search(&query.q, near).await {
        Ok(urls) => HttpResponse::Ok().json(urls),
        Err(err) => {
            log::error!("Photo search failed: {}", err);
            HttpResponse::BadGateway().body("Photo search unavailable")
        }
    }
}
