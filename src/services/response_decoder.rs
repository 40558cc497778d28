//! Resilient decoding of LLM completions that are supposed to contain one
//! JSON value. Model output is not a trusted grammar: completions arrive
//! wrapped in markdown fences, padded with narrative prose, or containing
//! sloppy JSON (smart quotes, trailing commas, stray comments). The cascade
//! here tries a strictly ordered sequence of interpretations, least invasive
//! first, so well-formed output is never mangled by the cleanup heuristics.
//!
//! The decoder is a pure function of its input and does no logging; callers
//! own diagnostics. A propagated error means the generation failed outright;
//! there is no partial-document recovery.

use regex::Regex;
use serde_json::Value;
use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum DecodeError {
    /// The text contains no `{`/`[` ... `}`/`]` span at all.
    NoStructuredSpan,
    /// Every stage of the cascade failed; carries one reason per stage.
    AllStagesFailed(Vec<String>),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::NoStructuredSpan => {
                write!(f, "no structured span found in completion")
            }
            DecodeError::AllStagesFailed(reasons) => {
                write!(f, "all decode stages failed: {}", reasons.join("; "))
            }
        }
    }
}

impl Error for DecodeError {}

/// Best-effort extraction of the single JSON value a completion is expected
/// to carry. Stages run in order and stop at the first successful parse:
///
/// 1. direct parse of the trimmed text;
/// 2. strip a fenced code block and retry;
/// 3. parse only the first-`{`-to-last-`}` (or bracket) span;
/// 4. parse the span after deterministic text normalization;
/// 5. give up with an aggregated per-stage error.
pub fn decode_completion(raw: &str) -> Result<Value, DecodeError> {
    let mut failures: Vec<String> = Vec::new();
    let trimmed = raw.trim();

    match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => return Ok(value),
        Err(e) => failures.push(format!("direct parse: {}", e)),
    }

    let unfenced = strip_code_fences(trimmed);
    match serde_json::from_str::<Value>(unfenced.trim()) {
        Ok(value) => return Ok(value),
        Err(e) => failures.push(format!("fence-stripped parse: {}", e)),
    }

    let span = match extract_structured_span(&unfenced) {
        Some(span) => span,
        None => return Err(DecodeError::NoStructuredSpan),
    };
    match serde_json::from_str::<Value>(&span) {
        Ok(value) => return Ok(value),
        Err(e) => failures.push(format!("span parse: {}", e)),
    }

    let normalized = normalize_span(&span);
    match serde_json::from_str::<Value>(&normalized) {
        Ok(value) => Ok(value),
        Err(e) => {
            failures.push(format!("normalized parse: {}", e));
            Err(DecodeError::AllStagesFailed(failures))
        }
    }
}

/// Removes an enclosing markdown code fence, keeping the body. Text without
/// a fence passes through unchanged.
fn strip_code_fences(text: &str) -> String {
    let fence = Regex::new(r"(?s)^```[a-zA-Z]*\s*(.*?)\s*```\s*$").unwrap();
    match fence.captures(text) {
        Some(caps) => caps[1].to_string(),
        None => text.to_string(),
    }
}

/// Greedy first-opener to last-closer span over the fence-stripped text.
fn extract_structured_span(text: &str) -> Option<String> {
    let span = Regex::new(r"(?s)[\{\[].*[\}\]]").unwrap();
    span.find(text).map(|m| m.as_str().to_string())
}

/// Deterministic cleanup targeting the sloppy-JSON failure modes commonly
/// seen in completions. Applied only after stricter stages have failed;
/// best-effort, since pathological string content can in principle be
/// corrupted by these rewrites.
fn normalize_span(span: &str) -> String {
    let mut text = span
        .replace('\u{201C}', "\"")
        .replace('\u{201D}', "\"")
        .replace('\u{2018}', "'")
        .replace('\u{2019}', "'");

    // Trailing // comments. The leading whitespace requirement keeps
    // protocol-relative and https:// content inside strings intact.
    text = Regex::new(r"(?m)\s//[^\n]*$")
        .unwrap()
        .replace_all(&text, "")
        .into_owned();

    // Trailing commas before a closing brace or bracket.
    text = Regex::new(r",\s*([\}\]])")
        .unwrap()
        .replace_all(&text, "$1")
        .into_owned();

    // Collapse internal newlines and repeated whitespace.
    text = Regex::new(r"\s+")
        .unwrap()
        .replace_all(&text, " ")
        .into_owned();

    // Normalize spacing immediately around object keys and string values.
    text = Regex::new(r#""\s*:"#)
        .unwrap()
        .replace_all(&text, "\":")
        .into_owned();
    text = Regex::new(r#":\s*""#)
        .unwrap()
        .replace_all(&text, ": \"")
        .into_owned();

    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn well_formed_input_parses_directly() {
        let text = r#"{"destination": {"name": "Lisbon"}, "count": 3}"#;
        let decoded = decode_completion(text).unwrap();
        assert_eq!(decoded, serde_json::from_str::<Value>(text).unwrap());
    }

    #[test]
    fn fenced_block_decodes_to_same_value() {
        let body = r#"{"name": "Alfama", "rating": 4.5}"#;
        let fenced = format!("```json\n{}\n```", body);
        assert_eq!(
            decode_completion(&fenced).unwrap(),
            decode_completion(body).unwrap()
        );
    }

    #[test]
    fn surrounding_prose_is_ignored() {
        let body = r#"{"name": "Belém Tower", "day": 2}"#;
        let noisy = format!("Sure, here you go:\n{}\nHope that helps!", body);
        assert_eq!(
            decode_completion(&noisy).unwrap(),
            serde_json::from_str::<Value>(body).unwrap()
        );
    }

    #[test]
    fn trailing_comma_is_tolerated() {
        let text = r#"{"items": ["a", "b",], "n": 2,}"#;
        let decoded = decode_completion(text).unwrap();
        assert_eq!(decoded, json!({"items": ["a", "b"], "n": 2}));
    }

    #[test]
    fn smart_quotes_are_normalized() {
        let text = "{\u{201C}name\u{201D}: \u{201C}Sintra\u{201D}}";
        let decoded = decode_completion(text).unwrap();
        assert_eq!(decoded, json!({"name": "Sintra"}));
    }

    #[test]
    fn text_without_any_span_fails() {
        let err = decode_completion("I could not produce an itinerary.").unwrap_err();
        assert!(matches!(err, DecodeError::NoStructuredSpan));
    }

    #[test]
    fn exhausted_cascade_reports_every_stage() {
        // Contains braces but is irreparably malformed.
        let err = decode_completion("{ this is : not even close }").unwrap_err();
        match err {
            DecodeError::AllStagesFailed(reasons) => {
                assert_eq!(reasons.len(), 4);
                assert!(reasons[0].starts_with("direct parse"));
                assert!(reasons[3].starts_with("normalized parse"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn array_root_is_accepted() {
        let text = "Here are the points:\n[{\"lat\": 1.0, \"lng\": 2.0}]";
        let decoded = decode_completion(text).unwrap();
        assert!(decoded.is_array());
    }
}
