use crate::resources::Resource;
use crate::selection::SelectionSet;
use crate::state::{CallDetails, Situation};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What would be handed to the field units.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DispatchOrder {
    pub call: CallDetails,
    pub situation: Situation,
    pub resources: Vec<Resource>,
    pub timestamp: DateTime<Utc>,
}

impl DispatchOrder {
    pub fn unit_ids(&self) -> Vec<String> {
        self.resources.iter().map(|r| r.id.clone()).collect()
    }
}

/// A blocking notice the dispatcher has to acknowledge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    DispatchInitiated {
        units: Vec<String>,
        location: String,
        incident_type: String,
    },
    NoResourceSelected,
    DispatchCancelled,
    OverrideUnavailable,
}

impl Notice {
    pub fn message(&self) -> String {
        match self {
            Notice::DispatchInitiated {
                units,
                location,
                incident_type,
            } => format!(
                "DISPATCH INITIATED\n\nUnits: {}\nLocation: {location}\nIncident: {incident_type}\n\nNotifying units...",
                units.join(", ")
            ),
            Notice::NoResourceSelected => "Please select at least one resource to dispatch.".into(),
            Notice::DispatchCancelled => "Dispatch Cancelled. Resetting form...".into(),
            Notice::OverrideUnavailable => "Override functionality not implemented".into(),
        }
    }
}

/// Selected resources in resource-table order.
pub fn selected_resources<'a>(
    resources: &'a [Resource],
    selection: &SelectionSet,
) -> Vec<&'a Resource> {
    resources
        .iter()
        .filter(|r| selection.contains(&r.id))
        .collect()
}

pub fn dispatch_label(resources: &[Resource], selection: &SelectionSet) -> String {
    match selection.len() {
        0 => "SELECT RESOURCE".into(),
        1 => {
            let kind = selection
                .first()
                .and_then(|id| resources.iter().find(|r| r.id == id))
                .map(|r| r.kind.as_str());
            match kind {
                Some(k) if k.contains("Ambulance") => "DISPATCH AMBULANCE".into(),
                Some(k) if k.contains("Fire") => "DISPATCH FIRE".into(),
                Some(k) if k.contains("Police") => "DISPATCH POLICE".into(),
                _ => "DISPATCH RESOURCE".into(),
            }
        }
        n => format!("DISPATCH {n} UNITS"),
    }
}

pub fn build_order(
    call: &CallDetails,
    situation: &Situation,
    resources: &[Resource],
    selection: &SelectionSet,
    at: DateTime<Utc>,
) -> Option<DispatchOrder> {
    let chosen = selected_resources(resources, selection);
    if chosen.is_empty() {
        return None;
    }
    Some(DispatchOrder {
        call: call.clone(),
        situation: situation.clone(),
        resources: chosen.into_iter().cloned().collect(),
        timestamp: at,
    })
}
