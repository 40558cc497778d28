use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;

use crate::models::request::PlanRequest;
use crate::services::gemini::GeminiClient;
use crate::services::plan_service::{self, PlanError};

/*
    POST /api/plan
*/
pub async fn generate(
    data: web::Data<Arc<GeminiClient>>,
    input: web::Json<PlanRequest>,
) -> impl Responder {
    let input = input.into_inner();

    if input.destination.trim().is_empty() {
        return HttpResponse::BadRequest().body("Destination is required");
    }
    if input.duration_days == 0 {
        return HttpResponse::BadRequest().body("Duration must be at least 1 day");
    }

    match plan_service::generate_suggestions(data.as_ref().as_ref(), &input).await {
        Ok(suggestions) => HttpResponse::Ok().json(suggestions),
        Err(PlanError::Completion(err)) => {
            log::error!("Completion call failed: {}", err);
            HttpResponse::BadGateway().body("Generation service unavailable")
        }
        // Decode and structural-validation failures are the same thing to
        // the user: the generation failed, resubmit. No partial result.
        Err(err) => {
            log::warn!("Generation rejected: {}", err);
            HttpResponse::UnprocessableEntity().body("Generation failed, please try again")
        }
    }
}
