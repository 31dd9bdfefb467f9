//! Canonical shape of the record handed over by the voice-intake agent.
//!
//! The producer is loosely typed, so every field is optional and parsing is
//! lenient: wrong-typed fields are treated as missing rather than rejected.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MAX_FAKE_PROBABILITY: f64 = 100.0;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SharedIntake {
    #[serde(default)]
    pub caller_name: Option<String>,
    #[serde(default)]
    pub caller_phone: Option<String>,
    #[serde(default)]
    pub gps_hint: Option<String>,
    #[serde(default)]
    pub caller_location_free_text: Option<String>,
    #[serde(default)]
    pub incident_type: Option<String>,
    #[serde(default)]
    pub symptoms: Option<Vec<String>>,
    #[serde(default)]
    pub conscious: Option<bool>,
    #[serde(default)]
    pub breathing: Option<bool>,
    #[serde(default)]
    pub fake_probability: Option<f64>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub suggested_first_aid: Option<Vec<String>>,
    #[serde(default)]
    pub raw_transcript: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntakeError {
    #[error("intake payload must be a JSON object")]
    NotAnObject,
    #[error("fake_probability {0} is outside 0..=100")]
    FakeProbabilityOutOfRange(f64),
    #[error("intake carries no usable fields")]
    Empty,
}

impl SharedIntake {
    /// Reads a raw JSON payload field by field, dropping values of the wrong type.
    pub fn from_value(payload: &serde_json::Value) -> Result<Self, IntakeError> {
        if !payload.is_object() {
            return Err(IntakeError::NotAnObject);
        }

        Ok(Self {
            caller_name: text(payload, "caller_name"),
            caller_phone: text(payload, "caller_phone"),
            gps_hint: text(payload, "gps_hint"),
            caller_location_free_text: text(payload, "caller_location_free_text"),
            incident_type: text(payload, "incident_type"),
            symptoms: text_list(payload, "symptoms"),
            conscious: payload.get("conscious").and_then(serde_json::Value::as_bool),
            breathing: payload.get("breathing").and_then(serde_json::Value::as_bool),
            fake_probability: payload
                .get("fake_probability")
                .and_then(|v| v.as_f64().or_else(|| v.as_str()?.trim().parse().ok())),
            language: text(payload, "language"),
            suggested_first_aid: text_list(payload, "suggested_first_aid"),
            raw_transcript: text(payload, "raw_transcript"),
        })
    }

    /// Preferred location: the GPS hint beats the caller's own description.
    pub fn location(&self) -> Option<&str> {
        self.gps_hint
            .as_deref()
            .or(self.caller_location_free_text.as_deref())
    }

    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

pub fn validate_intake(intake: &SharedIntake) -> Result<(), IntakeError> {
    if intake.is_empty() {
        return Err(IntakeError::Empty);
    }
    if let Some(p) = intake.fake_probability {
        if !(0.0..=MAX_FAKE_PROBABILITY).contains(&p) {
            return Err(IntakeError::FakeProbabilityOutOfRange(p));
        }
    }
    Ok(())
}

fn text(payload: &serde_json::Value, key: &str) -> Option<String> {
    payload
        .get(key)
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

fn text_list(payload: &serde_json::Value, key: &str) -> Option<Vec<String>> {
    payload.get(key).and_then(serde_json::Value::as_array).map(|xs| {
        xs.iter()
            .filter_map(serde_json::Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
            .collect::<Vec<_>>()
    })
}
