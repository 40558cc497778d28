//! The generation pipeline: prompt construction, model call, tolerant
//! decode, structural validation. Failure at any step is a generation
//! failure, surfaced once and never retried; no partial artifact ever
//! leaves this module.

use std::error::Error;
use std::fmt;

use crate::models::request::PlanRequest;
use crate::models::trip::TravelSuggestions;
use crate::services::gemini::{CompletionError, CompletionProvider};
use crate::services::response_decoder::{decode_completion, DecodeError};
use crate::services::validation::{validate_suggestions, ValidationError};

#[derive(Debug)]
pub enum PlanError {
    Completion(CompletionError),
    Decode(DecodeError),
    Validation(ValidationError),
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::Completion(err) => write!(f, "completion failed: {}", err),
            PlanError::Decode(err) => write!(f, "decode failed: {}", err),
            PlanError::Validation(err) => write!(f, "validation failed: {}", err),
        }
    }
}

impl Error for PlanError {}

impl From<CompletionError> for PlanError {
    fn from(err: CompletionError) -> Self {
        PlanError::Completion(err)
    }
}

impl From<DecodeError> for PlanError {
    fn from(err: DecodeError) -> Self {
        PlanError::Decode(err)
    }
}

impl From<ValidationError> for PlanError {
    fn from(err: ValidationError) -> Self {
        PlanError::Validation(err)
    }
}

/// Builds the generation prompt, embedding the target JSON shape. The shape
/// description exists only to steer the model; parsing never trusts it.
pub fn build_prompt(request: &PlanRequest) -> String {
    let interests = if request.interests.is_empty() {
        "general sightseeing".to_string()
    } else {
        request.interests.join(", ")
    };

    format!(
        "You are a travel planner. Create a {duration}-day trip plan for {destination} \
         focused on: {interests}.\n\
         Respond with a single JSON object and nothing else, using exactly this shape:\n\
         {{\n\
         \"destination\": {{\"name\": string, \"coordinates\": {{\"lat\": number, \"lng\": number}}}},\n\
         \"mustSeeAttractions\": [{{\"title\": string, \"description\": string, \"location\": string, \
         \"coordinates\": {{\"lat\": number, \"lng\": number}}}}],\n\
         \"hiddenGems\": [same shape as mustSeeAttractions],\n\
         \"restaurants\": [same shape as mustSeeAttractions],\n\
         \"accommodation\": [same shape as mustSeeAttractions],\n\
         \"events\": [same shape as mustSeeAttractions],\n\
         \"practicalAdvice\": string,\n\
         \"itinerary\": [{{\"day\": number, \"activities\": [string]}}]\n\
         }}\n\
         Include at least 4 mustSeeAttractions, 4 hiddenGems and 4 restaurants, and exactly \
         {duration} itinerary day records numbered 1 through {duration}. Activity strings may \
         use **bold** markers and <br> line breaks.",
        duration = request.duration_days,
        destination = request.destination,
        interests = interests,
    )
}

/// Runs the full pipeline against the given provider.
pub async fn generate_suggestions(
    provider: &impl CompletionProvider,
    request: &PlanRequest,
) -> Result<TravelSuggestions, PlanError> {
    let prompt = build_prompt(request);
    let completion = provider.complete(&prompt).await?;
    let value = decode_completion(&completion)?;
    let suggestions = validate_suggestions(&value)?;
    Ok(suggestions)
}
