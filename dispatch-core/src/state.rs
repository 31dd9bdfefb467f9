//! The console as one value plus a transition function.
//!
//! Every UI action, clock tick and intake hand-off is a [`ConsoleEvent`];
//! [`reduce`] folds it into a new [`ConsoleState`]. Re-ranking only happens
//! on the commit-edits transition, never while fields are being typed.

use crate::catalog;
use crate::chat::{ChatLog, Sender};
use crate::dispatch::{self, DispatchOrder, Notice};
use crate::geo::Coordinates;
use crate::intake::apply_intake;
use crate::ranking;
use crate::resources::Resource;
use crate::selection::SelectionSet;
use chrono::{DateTime, Utc};
use intake_registry::SharedIntake;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Below this fake-call probability (percent) a call is treated as genuine.
pub const FAKE_RISK_THRESHOLD: f64 = 20.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallStatus {
    Connected,
    Disconnected,
    CallbackNeeded,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CallDetails {
    pub caller_name: String,
    pub age: Option<u32>,
    pub phone: String,
    /// Key into the location table; free text while editing.
    pub location: String,
    pub coordinates: Coordinates,
    pub incident_type: String,
    pub status: CallStatus,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Situation {
    pub symptoms: Vec<String>,
    pub is_unconscious: bool,
    pub is_not_breathing: bool,
    /// Percent, 0..=100.
    pub fake_probability: f64,
    pub notes: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FakeRisk {
    Low,
    Elevated,
}

impl Situation {
    pub fn fake_risk(&self) -> FakeRisk {
        if self.fake_probability < FAKE_RISK_THRESHOLD {
            FakeRisk::Low
        } else {
            FakeRisk::Elevated
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallField {
    CallerName,
    Age,
    Phone,
    Location,
    IncidentType,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vital {
    Unconscious,
    NotBreathing,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConsoleEvent {
    BeginEditing,
    CommitEdits,
    ToggleEditing,
    EditCallField { field: CallField, value: String },
    SetCallStatus { status: CallStatus },
    ToggleVital { vital: Vital },
    AddSymptom { text: String },
    RemoveSymptom { index: usize },
    ToggleResource { id: String },
    Dispatch { at: DateTime<Utc> },
    CancelDispatch,
    Override,
    DismissNotice,
    Tick { at: DateTime<Utc> },
    ReceiveIntake { intake: SharedIntake },
    SendChat { text: String, at: DateTime<Utc> },
    AgentReply { text: String, at: DateTime<Utc> },
}

impl ConsoleEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            ConsoleEvent::BeginEditing => "begin_editing",
            ConsoleEvent::CommitEdits => "commit_edits",
            ConsoleEvent::ToggleEditing => "toggle_editing",
            ConsoleEvent::EditCallField { .. } => "edit_call_field",
            ConsoleEvent::SetCallStatus { .. } => "set_call_status",
            ConsoleEvent::ToggleVital { .. } => "toggle_vital",
            ConsoleEvent::AddSymptom { .. } => "add_symptom",
            ConsoleEvent::RemoveSymptom { .. } => "remove_symptom",
            ConsoleEvent::ToggleResource { .. } => "toggle_resource",
            ConsoleEvent::Dispatch { .. } => "dispatch",
            ConsoleEvent::CancelDispatch => "cancel_dispatch",
            ConsoleEvent::Override => "override",
            ConsoleEvent::DismissNotice => "dismiss_notice",
            ConsoleEvent::Tick { .. } => "tick",
            ConsoleEvent::ReceiveIntake { .. } => "receive_intake",
            ConsoleEvent::SendChat { .. } => "send_chat",
            ConsoleEvent::AgentReply { .. } => "agent_reply",
        }
    }

    /// Clock ticks carry no operator intent and are not worth journaling.
    pub fn is_transient(&self) -> bool {
        matches!(self, ConsoleEvent::Tick { .. })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConsoleState {
    pub call: CallDetails,
    pub situation: Situation,
    pub resources: Vec<Resource>,
    pub selection: SelectionSet,
    pub editing: bool,
    pub clock: DateTime<Utc>,
    pub chat: ChatLog,
    pub notice: Option<Notice>,
    pub last_dispatch: Option<DispatchOrder>,
}

impl ConsoleState {
    /// Catalog seed with the first ranking already applied.
    pub fn seeded(now: DateTime<Utc>) -> Self {
        let call = catalog::initial_call();
        let resources = catalog::initial_resources();
        let selection = resources
            .first()
            .map(|r| SelectionSet::single(r.id.clone()))
            .unwrap_or_default();
        let chat = ChatLog::opening(&call.incident_type, catalog::protocol_steps(), now);

        Self {
            call,
            situation: catalog::initial_situation(),
            resources,
            selection,
            editing: false,
            clock: now,
            chat,
            notice: None,
            last_dispatch: None,
        }
        .commit()
    }

    pub fn apply(self, event: ConsoleEvent) -> Self {
        reduce(self, event)
    }

    pub fn dispatch_label(&self) -> String {
        dispatch::dispatch_label(&self.resources, &self.selection)
    }

    pub fn selected_resources(&self) -> Vec<&Resource> {
        dispatch::selected_resources(&self.resources, &self.selection)
    }

    /// Leaves editing mode and re-ranks against the committed call details.
    fn commit(mut self) -> Self {
        self.editing = false;
        let ranking = ranking::recompute(
            &self.call.location,
            self.call.coordinates,
            &self.call.incident_type,
            &self.resources,
        );
        self.call.coordinates = ranking.coordinates;
        self.resources = ranking.resources;
        if let Some(id) = ranking.auto_select {
            self.selection.replace_with(id);
        }
        self
    }
}

pub fn reduce(mut state: ConsoleState, event: ConsoleEvent) -> ConsoleState {
    match event {
        ConsoleEvent::BeginEditing => {
            state.editing = true;
            state
        }
        ConsoleEvent::CommitEdits => {
            if state.editing {
                state.commit()
            } else {
                state
            }
        }
        ConsoleEvent::ToggleEditing => {
            if state.editing {
                state.commit()
            } else {
                state.editing = true;
                state
            }
        }
        ConsoleEvent::EditCallField { field, value } => {
            if state.editing {
                edit_call_field(&mut state.call, field, value);
            }
            state
        }
        ConsoleEvent::SetCallStatus { status } => {
            state.call.status = status;
            state
        }
        ConsoleEvent::ToggleVital { vital } => {
            if state.editing {
                match vital {
                    Vital::Unconscious => {
                        state.situation.is_unconscious = !state.situation.is_unconscious
                    }
                    Vital::NotBreathing => {
                        state.situation.is_not_breathing = !state.situation.is_not_breathing
                    }
                }
            }
            state
        }
        ConsoleEvent::AddSymptom { text } => {
            let text = text.trim();
            if !text.is_empty() {
                state.situation.symptoms.push(text.to_string());
            }
            state
        }
        ConsoleEvent::RemoveSymptom { index } => {
            if index < state.situation.symptoms.len() {
                state.situation.symptoms.remove(index);
            }
            state
        }
        ConsoleEvent::ToggleResource { id } => {
            if state.resources.iter().any(|r| r.id == id) {
                state.selection.toggle(&id);
            }
            state
        }
        ConsoleEvent::Dispatch { at } => {
            match dispatch::build_order(
                &state.call,
                &state.situation,
                &state.resources,
                &state.selection,
                at,
            ) {
                Some(order) => {
                    let units = order.unit_ids();
                    info!(
                        units = %units.join(","),
                        location = %state.call.location,
                        incident_type = %state.call.incident_type,
                        "dispatch initiated"
                    );
                    state.notice = Some(Notice::DispatchInitiated {
                        units,
                        location: state.call.location.clone(),
                        incident_type: state.call.incident_type.clone(),
                    });
                    state.last_dispatch = Some(order);
                }
                None => state.notice = Some(Notice::NoResourceSelected),
            }
            state
        }
        ConsoleEvent::CancelDispatch => {
            state.notice = Some(Notice::DispatchCancelled);
            state
        }
        ConsoleEvent::Override => {
            state.notice = Some(Notice::OverrideUnavailable);
            state
        }
        ConsoleEvent::DismissNotice => {
            state.notice = None;
            state
        }
        ConsoleEvent::Tick { at } => {
            state.clock = at;
            state
        }
        ConsoleEvent::ReceiveIntake { intake } => {
            info!(
                incident_type = intake.incident_type.as_deref().unwrap_or("-"),
                location = intake.location().unwrap_or("-"),
                "voice intake received"
            );
            apply_intake(&mut state.call, &mut state.situation, &intake);
            state.commit()
        }
        ConsoleEvent::SendChat { text, at } => {
            let text = text.trim();
            if !text.is_empty() {
                state.chat.push(Sender::Dispatcher, text.to_string(), at);
            }
            state
        }
        ConsoleEvent::AgentReply { text, at } => {
            if !text.trim().is_empty() {
                state.chat.push(Sender::Agent, text, at);
            }
            state
        }
    }
}

fn edit_call_field(call: &mut CallDetails, field: CallField, value: String) {
    match field {
        CallField::CallerName => call.caller_name = value,
        CallField::Age => call.age = value.trim().parse().ok(),
        CallField::Phone => call.phone = value,
        CallField::Location => call.location = value,
        CallField::IncidentType => call.incident_type = value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::lookup_location;

    fn t(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000 + secs, 0).expect("timestamp")
    }

    fn replay(events: Vec<ConsoleEvent>) -> ConsoleState {
        events
            .into_iter()
            .fold(ConsoleState::seeded(t(0)), reduce)
    }

    fn edit(field: CallField, value: &str) -> ConsoleEvent {
        ConsoleEvent::EditCallField {
            field,
            value: value.into(),
        }
    }

    #[test]
    fn seeded_state_is_already_ranked() {
        let state = ConsoleState::seeded(t(0));
        assert_eq!(state.resources[0].id, "AMB-042");
        assert_eq!(state.selection.iter().collect::<Vec<_>>(), vec!["AMB-042"]);
        assert_eq!(state.dispatch_label(), "DISPATCH AMBULANCE");
        assert!(!state.editing);
        assert_eq!(state.chat.messages.len(), 2);
    }

    #[test]
    fn edits_do_not_rerank_until_commit() {
        let state = replay(vec![
            ConsoleEvent::BeginEditing,
            edit(CallField::Location, "Gateway of India"),
            edit(CallField::IncidentType, "Armed Robbery"),
        ]);
        assert!(state.editing);
        assert_eq!(state.call.coordinates, catalog::DADAR_STATION);
        assert!(state.resources[0].is_ambulance());

        let state = state.apply(ConsoleEvent::CommitEdits);
        assert!(!state.editing);
        assert_eq!(state.call.coordinates, lookup_location("Gateway of India").expect("known"));
        assert!(state
            .resources
            .iter()
            .filter(|r| r.is_ai_suggested)
            .all(|r| r.kind_contains("police") || r.is_ambulance()));
        let first = state.resources.iter().find(|r| r.is_ai_suggested).expect("suggested");
        assert_eq!(state.selection.iter().collect::<Vec<_>>(), vec![first.id.as_str()]);
    }

    #[test]
    fn edits_outside_editing_mode_are_ignored() {
        let state = replay(vec![
            edit(CallField::CallerName, "Someone Else"),
            ConsoleEvent::ToggleVital {
                vital: Vital::Unconscious,
            },
        ]);
        assert_eq!(state.call.caller_name, "Rajesh Kumar");
        assert!(state.situation.is_unconscious);
    }

    #[test]
    fn commit_without_editing_is_noop() {
        let seeded = ConsoleState::seeded(t(0));
        let toggled = seeded.clone().apply(ConsoleEvent::ToggleResource {
            id: "POL-100".into(),
        });
        let after = toggled.clone().apply(ConsoleEvent::CommitEdits);
        assert_eq!(after, toggled);
    }

    #[test]
    fn unknown_location_keeps_coordinates() {
        let state = replay(vec![
            ConsoleEvent::ToggleEditing,
            edit(CallField::Location, "Unmapped Lane 4"),
            ConsoleEvent::ToggleEditing,
        ]);
        assert_eq!(state.call.location, "Unmapped Lane 4");
        assert_eq!(state.call.coordinates, catalog::DADAR_STATION);
    }

    #[test]
    fn unclassified_commit_keeps_manual_selection() {
        let state = replay(vec![
            ConsoleEvent::ToggleResource { id: "POL-100".into() },
            ConsoleEvent::BeginEditing,
            edit(CallField::IncidentType, "Lost wallet"),
            ConsoleEvent::CommitEdits,
        ]);
        assert!(state.resources.iter().all(|r| !r.is_ai_suggested));
        assert_eq!(state.selection.iter().collect::<Vec<_>>(), vec!["AMB-042", "POL-100"]);
        assert_eq!(state.dispatch_label(), "DISPATCH 2 UNITS");
    }

    #[test]
    fn unknown_resource_toggle_is_ignored() {
        let state = replay(vec![ConsoleEvent::ToggleResource { id: "HELI-1".into() }]);
        assert_eq!(state.selection.len(), 1);
    }

    #[test]
    fn dispatch_without_selection_raises_notice() {
        let state = replay(vec![
            ConsoleEvent::ToggleResource { id: "AMB-042".into() },
            ConsoleEvent::Dispatch { at: t(5) },
        ]);
        assert_eq!(state.notice, Some(Notice::NoResourceSelected));
        assert_eq!(state.last_dispatch, None);
        assert_eq!(state.dispatch_label(), "SELECT RESOURCE");
    }

    #[test]
    fn dispatch_records_order_and_notice() {
        let state = replay(vec![
            ConsoleEvent::ToggleResource { id: "POL-100".into() },
            ConsoleEvent::Dispatch { at: t(9) },
        ]);
        let order = state.last_dispatch.as_ref().expect("order");
        assert_eq!(order.unit_ids(), vec!["AMB-042", "POL-100"]);
        assert_eq!(order.timestamp, t(9));
        assert!(matches!(
            state.notice,
            Some(Notice::DispatchInitiated { ref units, .. }) if units.len() == 2
        ));

        let state = state.apply(ConsoleEvent::DismissNotice);
        assert_eq!(state.notice, None);
        assert!(state.last_dispatch.is_some());
    }

    #[test]
    fn intake_maps_fields_and_reranks() {
        let intake = SharedIntake {
            caller_name: Some("Meera Shah".into()),
            gps_hint: Some("Bandra Bandstand".into()),
            incident_type: Some("Kitchen fire".into()),
            conscious: Some(true),
            breathing: Some(true),
            ..SharedIntake::default()
        };
        let state = replay(vec![ConsoleEvent::ReceiveIntake { intake }]);

        assert_eq!(state.call.caller_name, "Meera Shah");
        assert_eq!(state.call.status, CallStatus::Connected);
        assert_eq!(state.call.coordinates, lookup_location("Bandra Bandstand").expect("known"));
        assert!(!state.situation.is_unconscious);
        assert!(!state.situation.is_not_breathing);
        assert!(state.situation.notes.starts_with("[Voice Agent Intake]"));
        assert_eq!(
            state.resources.iter().filter(|r| r.is_ai_suggested).count(),
            6
        );
        assert_eq!(state.selection.len(), 1);
        assert_eq!(state.selection.first(), Some(state.resources[0].id.as_str()));
    }

    #[test]
    fn symptoms_and_vitals() {
        let state = replay(vec![
            ConsoleEvent::AddSymptom { text: "  Cyanosis ".into() },
            ConsoleEvent::AddSymptom { text: "   ".into() },
            ConsoleEvent::RemoveSymptom { index: 0 },
            ConsoleEvent::RemoveSymptom { index: 99 },
            ConsoleEvent::BeginEditing,
            ConsoleEvent::ToggleVital {
                vital: Vital::NotBreathing,
            },
        ]);
        assert_eq!(
            state.situation.symptoms,
            vec!["Not breathing", "Severe chest pain", "Cyanosis"]
        );
        assert!(!state.situation.is_not_breathing);
        assert_eq!(state.situation.fake_risk(), FakeRisk::Low);
    }

    #[test]
    fn age_edit_parses_or_clears() {
        let state = replay(vec![
            ConsoleEvent::BeginEditing,
            edit(CallField::Age, " 42 "),
        ]);
        assert_eq!(state.call.age, Some(42));
        let state = state.apply(edit(CallField::Age, "forty"));
        assert_eq!(state.call.age, None);
    }

    #[test]
    fn chat_and_clock() {
        let state = replay(vec![
            ConsoleEvent::Tick { at: t(1) },
            ConsoleEvent::SendChat {
                text: "eta?".into(),
                at: t(2),
            },
            ConsoleEvent::SendChat {
                text: " ".into(),
                at: t(2),
            },
            ConsoleEvent::AgentReply {
                text: "On it".into(),
                at: t(3),
            },
        ]);
        assert_eq!(state.clock, t(1));
        assert_eq!(state.chat.messages.len(), 4);
        let last = state.chat.last().expect("message");
        assert_eq!(last.id, 4);
        assert_eq!(last.sender, Sender::Agent);
    }

    #[test]
    fn events_roundtrip_through_json() {
        let event = ConsoleEvent::EditCallField {
            field: CallField::IncidentType,
            value: "Fire".into(),
        };
        let json = serde_json::to_value(&event).expect("encode");
        assert_eq!(json["type"], "edit_call_field");
        assert_eq!(json["field"], "incident_type");
        let back: ConsoleEvent = serde_json::from_value(json).expect("decode");
        assert_eq!(back, event);
    }
}
