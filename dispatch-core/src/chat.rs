use crate::services::{nearest_facility, FacilityKind};
use crate::state::ConsoleState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sender {
    Agent,
    Dispatcher,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: u64,
    pub sender: Sender,
    pub text: String,
    pub at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatLog {
    pub messages: Vec<ChatMessage>,
}

impl ChatLog {
    /// Opening analysis posted by the agent when the console comes up.
    pub fn opening(incident_type: &str, protocol: &[&str], at: DateTime<Utc>) -> Self {
        let steps = protocol
            .iter()
            .take(3)
            .map(|s| format!("- {s}"))
            .collect::<Vec<_>>()
            .join("\n");

        let mut log = Self::default();
        log.push(
            Sender::Agent,
            format!("Hello, I've analyzed the call. The reported incident is {incident_type}."),
            at,
        );
        log.push(
            Sender::Agent,
            format!(
                "I recommend following the {incident_type} protocol. Here are the first few steps:\n{steps}"
            ),
            at,
        );
        log
    }

    /// Appends a message and returns its id. Ids start at 1 and are never reused.
    pub fn push(&mut self, sender: Sender, text: String, at: DateTime<Utc>) -> u64 {
        let id = self.messages.last().map(|m| m.id + 1).unwrap_or(1);
        self.messages.push(ChatMessage {
            id,
            sender,
            text,
            at,
        });
        id
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }
}

/// Canned agent answer keyed on words in the dispatcher's message.
pub fn scripted_reply(state: &ConsoleState, input: &str) -> String {
    let lower = input.to_lowercase();

    if lower.contains("step") || lower.contains("next") {
        "The next step is: Check breathing and pulse. If no pulse, begin CPR immediately.".into()
    } else if lower.contains("ambulance") || lower.contains("eta") {
        let nearest = state
            .resources
            .iter()
            .filter(|r| r.is_ambulance())
            .min_by(|a, b| a.eta.total_cmp(&b.eta));
        match nearest {
            Some(r) => format!(
                "The nearest ambulance ({}) is {} minutes away. I recommend dispatching it immediately.",
                r.id, r.eta
            ),
            None => "No ambulance is currently available in the fleet.".into(),
        }
    } else if lower.contains("hospital") {
        match nearest_facility(FacilityKind::Hospital, state.call.coordinates) {
            Some(h) => format!(
                "The nearest hospital is {}, {} km away (about {} minutes by road).",
                h.name, h.distance_km, h.eta_minutes
            ),
            None => "No hospital is listed within 5 km of the incident.".into(),
        }
    } else {
        "I've noted that. Is there anything specific you need help with regarding the protocol?".into()
    }
}
