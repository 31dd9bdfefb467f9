//! Folds a voice-intake record into the call and situation panels.

use crate::state::{CallDetails, CallStatus, Situation};
use intake_registry::SharedIntake;

pub fn apply_intake(call: &mut CallDetails, situation: &mut Situation, intake: &SharedIntake) {
    if let Some(name) = present(&intake.caller_name) {
        call.caller_name = name.to_string();
    }
    if let Some(phone) = present(&intake.caller_phone) {
        call.phone = phone.to_string();
    }
    if let Some(location) = intake.location().filter(|s| !s.trim().is_empty()) {
        call.location = location.to_string();
    }
    if let Some(kind) = present(&intake.incident_type) {
        call.incident_type = kind.to_string();
    }
    call.status = CallStatus::Connected;

    if let Some(symptoms) = &intake.symptoms {
        situation.symptoms = symptoms.clone();
    }
    // A flag the agent did not report reads as the alarming value.
    situation.is_unconscious = intake.conscious != Some(true);
    situation.is_not_breathing = intake.breathing != Some(true);
    if let Some(p) = intake.fake_probability {
        situation.fake_probability = p;
    }
    situation.notes = intake_notes(intake);
}

pub fn intake_notes(intake: &SharedIntake) -> String {
    let fake = intake
        .fake_probability
        .map(|p| format!("{p}%"))
        .unwrap_or_else(|| "unknown".into());
    let language = present(&intake.language).unwrap_or("unknown");
    let first_aid = intake
        .suggested_first_aid
        .as_ref()
        .map(|xs| xs.join(", "))
        .unwrap_or_default();
    let transcript = present(&intake.raw_transcript).unwrap_or_default();

    format!(
        "[Voice Agent Intake]\nFake Probability: {fake}\nLanguage: {language}\nFirst Aid: {first_aid}\n\nTranscript: {transcript}"
    )
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{initial_call, initial_situation};

    #[test]
    fn missing_fields_keep_previous_values() {
        let mut call = initial_call();
        let mut situation = initial_situation();
        let intake = SharedIntake {
            incident_type: Some("Street fight".into()),
            conscious: Some(true),
            ..SharedIntake::default()
        };

        apply_intake(&mut call, &mut situation, &intake);

        assert_eq!(call.caller_name, "Rajesh Kumar");
        assert_eq!(call.location, "Dadar Station");
        assert_eq!(call.incident_type, "Street fight");
        assert_eq!(situation.symptoms.len(), 3);
        assert!(!situation.is_unconscious);
        assert!(situation.is_not_breathing);
    }

    #[test]
    fn free_text_location_used_without_gps_hint() {
        let mut call = initial_call();
        let mut situation = initial_situation();
        let intake = SharedIntake {
            caller_location_free_text: Some("Marine Drive".into()),
            caller_phone: Some("  ".into()),
            ..SharedIntake::default()
        };

        apply_intake(&mut call, &mut situation, &intake);

        assert_eq!(call.location, "Marine Drive");
        assert_eq!(call.phone, "+91-98765-43210");
    }

    #[test]
    fn notes_carry_intake_context() {
        let intake = SharedIntake {
            fake_probability: Some(8.0),
            language: Some("Marathi".into()),
            suggested_first_aid: Some(vec!["CPR".into(), "Recovery position".into()]),
            raw_transcript: Some("He collapsed near platform 3".into()),
            ..SharedIntake::default()
        };
        let notes = intake_notes(&intake);
        assert!(notes.starts_with("[Voice Agent Intake]"));
        assert!(notes.contains("Fake Probability: 8%"));
        assert!(notes.contains("First Aid: CPR, Recovery position"));
        assert!(notes.ends_with("Transcript: He collapsed near platform 3"));
    }
}
