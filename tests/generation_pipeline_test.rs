use serde_json::json;

use tripweaver_api::models::request::PlanRequest;
use tripweaver_api::services::gemini::{CompletionError, CompletionProvider};
use tripweaver_api::services::plan_service::{build_prompt, generate_suggestions, PlanError};

/// Stand-in for the hosted model: replays a canned completion.
struct CannedProvider {
    completion: String,
}

impl CompletionProvider for CannedProvider {
    async fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
        Ok(self.completion.clone())
    }
}

struct FailingProvider;

impl CompletionProvider for FailingProvider {
    async fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
        Err(CompletionError::ResponseError(
            "Generation request failed with status 503".to_string(),
        ))
    }
}

fn poi(title: &str, lat: f64, lng: f64) -> serde_json::Value {
    json!({
        "title": title,
        "description": format!("{} is well worth a visit.", title),
        "location": format!("{}, Lisbon", title),
        "coordinates": { "lat": lat, "lng": lng }
    })
}

fn lisbon_document() -> serde_json::Value {
    json!({
        "destination": { "name": "Lisbon", "coordinates": { "lat": 38.7223, "lng": -9.1393 } },
        "mustSeeAttractions": [
            poi("Belém Tower", 38.6916, -9.2160),
            poi("Jerónimos Monastery", 38.6979, -9.2063),
            poi("Castle of São Jorge", 38.7139, -9.1335),
            poi("Praça do Comércio", 38.7077, -9.1365)
        ],
        "hiddenGems": [
            poi("LX Factory", 38.7033, -9.1782),
            poi("Jardim da Estrela", 38.7139, -9.1604),
            poi("Miradouro da Graça", 38.7163, -9.1312),
            poi("Feira da Ladra", 38.7158, -9.1248)
        ],
        "restaurants": [
            poi("Time Out Market", 38.7070, -9.1458),
            poi("Cervejaria Ramiro", 38.7208, -9.1357),
            poi("Pastéis de Belém", 38.6975, -9.2031),
            poi("Taberna da Rua das Flores", 38.7101, -9.1436)
        ],
        "accommodation": [],
        "events": [],
        "practicalAdvice": "Buy a Viva Viagem card; wear shoes with grip on the calçada.",
        "itinerary": [
            { "day": 1, "activities": ["**Morning**: Alfama walk", "**Afternoon**: Castle of São Jorge"] },
            { "day": 2, "activities": ["**Morning**: Belém Tower", "**Afternoon**: Jerónimos Monastery"] },
            { "day": 3, "activities": ["**All day**: Sintra day trip"] }
        ]
    })
}

fn lisbon_request() -> PlanRequest {
    PlanRequest {
        destination: "Lisbon".to_string(),
        duration_days: 3,
        interests: vec!["Food".to_string(), "History".to_string()],
    }
}

#[actix_rt::test]
async fn fenced_completion_round_trips_into_a_typed_artifact() {
    let provider = CannedProvider {
        completion: format!(
            "Here is your trip plan:\n```json\n{}\n```\nEnjoy Lisbon!",
            serde_json::to_string_pretty(&lisbon_document()).unwrap()
        ),
    };

    let suggestions = generate_suggestions(&provider, &lisbon_request())
        .await
        .unwrap();

    assert_eq!(suggestions.destination.name, "Lisbon");
    assert!(suggestions.must_see_attractions.len() >= 4);
    assert!(suggestions.hidden_gems.len() >= 4);
    assert!(suggestions.restaurants.len() >= 4);

    let day_numbers: Vec<u32> = suggestions.itinerary.iter().map(|d| d.day).collect();
    assert_eq!(day_numbers, vec![1, 2, 3]);
}

#[actix_rt::test]
async fn prose_only_completion_is_a_decode_failure() {
    let provider = CannedProvider {
        completion: "I'm sorry, I cannot plan this trip.".to_string(),
    };

    let err = generate_suggestions(&provider, &lisbon_request())
        .await
        .unwrap_err();
    assert!(matches!(err, PlanError::Decode(_)));
}

#[actix_rt::test]
async fn malformed_shape_is_a_validation_failure() {
    // Parses fine but the itinerary is the wrong shape.
    let provider = CannedProvider {
        completion: json!({
            "destination": { "name": "Lisbon" },
            "mustSeeAttractions": [],
            "hiddenGems": [],
            "restaurants": [],
            "itinerary": { "day1": ["walk"] }
        })
        .to_string(),
    };

    let err = generate_suggestions(&provider, &lisbon_request())
        .await
        .unwrap_err();
    match err {
        PlanError::Validation(v) => {
            assert!(v.violations.iter().any(|m| m.contains("itinerary")));
        }
        other => panic!("expected validation failure, got {:?}", other),
    }
}

#[actix_rt::test]
async fn transport_failure_propagates_as_completion_error() {
    let err = generate_suggestions(&FailingProvider, &lisbon_request())
        .await
        .unwrap_err();
    assert!(matches!(err, PlanError::Completion(_)));
}

#[test]
fn prompt_embeds_request_and_target_shape() {
    let prompt = build_prompt(&lisbon_request());
    assert!(prompt.contains("Lisbon"));
    assert!(prompt.contains("3-day"));
    assert!(prompt.contains("Food, History"));
    assert!(prompt.contains("mustSeeAttractions"));
    assert!(prompt.contains("\"itinerary\""));
}
