use serde::{Deserialize, Serialize};

/// What the user asked for: a destination, a trip length, and interests.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PlanRequest {
    pub destination: String,
    #[serde(rename = "durationDays")]
    pub duration_days: u32,
    #[serde(default)]
    pub interests: Vec<String>,
}
