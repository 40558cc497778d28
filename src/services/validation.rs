//! Structural validation of a decoded completion against the
//! TravelSuggestions shape. A parseable-but-malformed document is rejected
//! exactly like a parse failure: the result is either a fully typed value
//! or the complete list of violations, never silently-coerced partial data.

use serde_json::Value;
use std::error::Error;
use std::fmt;

use crate::models::trip::TravelSuggestions;

#[derive(Debug)]
pub struct ValidationError {
    pub violations: Vec<String>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid suggestions document: {}", self.violations.join("; "))
    }
}

impl Error for ValidationError {}

/// Checks the decoded value against the expected shape and, when clean,
/// converts it into the typed artifact. All violations are collected in one
/// pass so a bad generation is diagnosable from a single error.
pub fn validate_suggestions(value: &Value) -> Result<TravelSuggestions, ValidationError> {
    let mut violations = Vec::new();

    let root = match value.as_object() {
        Some(root) => root,
        None => {
            return Err(ValidationError {
                violations: vec!["top-level value is not an object".to_string()],
            })
        }
    };

    match root.get("destination").and_then(Value::as_object) {
        Some(destination) => {
            match destination.get("name").and_then(Value::as_str) {
                Some(name) if !name.trim().is_empty() => {}
                _ => violations.push("destination.name must be a non-empty string".to_string()),
            }
            if let Some(coords) = destination.get("coordinates") {
                check_coordinates(coords, "destination.coordinates", &mut violations);
            }
        }
        None => violations.push("destination must be an object".to_string()),
    }

    for field in ["mustSeeAttractions", "hiddenGems", "restaurants"] {
        check_location_array(root.get(field), field, true, &mut violations);
    }
    for field in ["accommodation", "events"] {
        check_location_array(root.get(field), field, false, &mut violations);
    }

    if let Some(advice) = root.get("practicalAdvice") {
        if !advice.is_string() {
            violations.push("practicalAdvice must be a string".to_string());
        }
    }

    check_itinerary(root.get("itinerary"), &mut violations);

    if !violations.is_empty() {
        return Err(ValidationError { violations });
    }

    serde_json::from_value(value.clone()).map_err(|e| ValidationError {
        violations: vec![format!("deserialization failed: {}", e)],
    })
}

fn check_location_array(
    value: Option<&Value>,
    field: &str,
    required: bool,
    violations: &mut Vec<String>,
) {
    let entries = match value {
        Some(Value::Array(entries)) => entries,
        Some(_) => {
            violations.push(format!("{} must be an array", field));
            return;
        }
        None => {
            if required {
                violations.push(format!("{} is missing", field));
            }
            return;
        }
    };

    for (i, entry) in entries.iter().enumerate() {
        let record = match entry.as_object() {
            Some(record) => record,
            None => {
                violations.push(format!("{}[{}] is not an object", field, i));
                continue;
            }
        };
        for key in ["title", "description", "location"] {
            if !record.get(key).map(Value::is_string).unwrap_or(false) {
                violations.push(format!("{}[{}].{} must be a string", field, i, key));
            }
        }
        if let Some(coords) = record.get("coordinates") {
            if !coords.is_null() {
                check_coordinates(coords, &format!("{}[{}].coordinates", field, i), violations);
            }
        }
    }
}

fn check_coordinates(value: &Value, path: &str, violations: &mut Vec<String>) {
    let pair = match value.as_object() {
        Some(pair) => pair,
        None => {
            violations.push(format!("{} must be an object", path));
            return;
        }
    };
    for key in ["lat", "lng"] {
        if !pair.get(key).map(Value::is_number).unwrap_or(false) {
            violations.push(format!("{}.{} must be a number", path, key));
        }
    }
}

fn check_itinerary(value: Option<&Value>, violations: &mut Vec<String>) {
    let days = match value {
        Some(Value::Array(days)) => days,
        Some(_) => {
            violations.push("itinerary must be an array".to_string());
            return;
        }
        None => {
            violations.push("itinerary is missing".to_string());
            return;
        }
    };

    let mut seen_days = Vec::new();
    for (i, entry) in days.iter().enumerate() {
        let record = match entry.as_object() {
            Some(record) => record,
            None => {
                violations.push(format!("itinerary[{}] is not an object", i));
                continue;
            }
        };
        match record.get("day").and_then(Value::as_u64) {
            Some(day) if day >= 1 => {
                if seen_days.contains(&day) {
                    violations.push(format!("itinerary[{}]: duplicate day number {}", i, day));
                }
                seen_days.push(day);
            }
            _ => violations.push(format!("itinerary[{}].day must be a positive integer", i)),
        }
        match record.get("activities") {
            Some(Value::Array(activities)) => {
                for (j, activity) in activities.iter().enumerate() {
                    if !activity.is_string() {
                        violations.push(format!(
                            "itinerary[{}].activities[{}] must be a string",
                            i, j
                        ));
                    }
                }
            }
            _ => violations.push(format!("itinerary[{}].activities must be an array", i)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal_document() -> Value {
        json!({
            "destination": { "name": "Lisbon", "coordinates": { "lat": 38.72, "lng": -9.14 } },
            "mustSeeAttractions": [
                { "title": "Belém Tower", "description": "Riverside fort", "location": "Belém" }
            ],
            "hiddenGems": [],
            "restaurants": [],
            "practicalAdvice": "Wear comfortable shoes.",
            "itinerary": [
                { "day": 1, "activities": ["**Morning**: Alfama walk"] }
            ]
        })
    }

    #[test]
    fn minimal_document_validates() {
        let suggestions = validate_suggestions(&minimal_document()).unwrap();
        assert_eq!(suggestions.destination.name, "Lisbon");
        assert_eq!(suggestions.itinerary.len(), 1);
    }

    #[test]
    fn missing_required_array_is_rejected() {
        let mut doc = minimal_document();
        doc.as_object_mut().unwrap().remove("restaurants");
        let err = validate_suggestions(&doc).unwrap_err();
        assert!(err.violations.iter().any(|v| v.contains("restaurants")));
    }

    #[test]
    fn duplicate_day_numbers_are_rejected() {
        let mut doc = minimal_document();
        doc["itinerary"] = json!([
            { "day": 1, "activities": [] },
            { "day": 1, "activities": [] }
        ]);
        let err = validate_suggestions(&doc).unwrap_err();
        assert!(err.violations.iter().any(|v| v.contains("duplicate day")));
    }

    #[test]
    fn all_violations_are_enumerated() {
        let doc = json!({
            "destination": { "name": "" },
            "mustSeeAttractions": [ { "title": 7 } ],
            "itinerary": "three days"
        });
        let err = validate_suggestions(&doc).unwrap_err();
        assert!(err.violations.len() >= 4);
    }

    #[test]
    fn non_object_root_is_rejected() {
        let err = validate_suggestions(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(err.violations.len(), 1);
    }
}
