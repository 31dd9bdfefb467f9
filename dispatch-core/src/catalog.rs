//! Fixed seed data for the console: the opening call, the location lookup
//! table, the responder fleet, fixed facilities and the cardiac protocol.

use crate::geo::Coordinates;
use crate::resources::Resource;
use crate::services::{Facility, FacilityKind};
use crate::state::{CallDetails, CallStatus, Situation};

pub const DADAR_STATION: Coordinates = Coordinates::new(19.0178, 72.8478);

const LOCATIONS: &[(&str, Coordinates)] = &[
    ("Dadar Station", DADAR_STATION),
    ("Gateway of India", Coordinates::new(18.9220, 72.8347)),
    ("Bandra Bandstand", Coordinates::new(19.0596, 72.8295)),
    ("Juhu Beach", Coordinates::new(19.0988, 72.8264)),
    ("Andheri Station", Coordinates::new(19.1136, 72.8697)),
    ("Powai Lake", Coordinates::new(19.1267, 72.9156)),
    ("Marine Drive", Coordinates::new(18.944, 72.823)),
    (
        "Chhatrapati Shivaji Maharaj Terminus",
        Coordinates::new(18.9415, 72.8352),
    ),
];

const FACILITIES: &[(&str, FacilityKind, Coordinates)] = &[
    ("Byculla Fire Station", FacilityKind::FireStation, Coordinates::new(18.9790, 72.8340)),
    ("Dadar Fire Station", FacilityKind::FireStation, Coordinates::new(19.0190, 72.8440)),
    ("Andheri Fire Station", FacilityKind::FireStation, Coordinates::new(19.1190, 72.8470)),
    ("Dadar Police Station", FacilityKind::PoliceStation, Coordinates::new(19.0200, 72.8430)),
    ("Colaba Police Station", FacilityKind::PoliceStation, Coordinates::new(18.9067, 72.8147)),
    ("Bandra Police Station", FacilityKind::PoliceStation, Coordinates::new(19.0550, 72.8400)),
    ("Andheri Police Station", FacilityKind::PoliceStation, Coordinates::new(19.1170, 72.8530)),
    ("KEM Hospital", FacilityKind::Hospital, Coordinates::new(19.0030, 72.8420)),
    ("Hinduja Hospital", FacilityKind::Hospital, Coordinates::new(19.0330, 72.8380)),
    ("Lilavati Hospital", FacilityKind::Hospital, Coordinates::new(19.0510, 72.8290)),
    ("Bombay Hospital", FacilityKind::Hospital, Coordinates::new(18.9410, 72.8270)),
    ("Cooper Hospital", FacilityKind::Hospital, Coordinates::new(19.1080, 72.8370)),
];

const PROTOCOL_STEPS: &[&str] = &[
    "Verify scene safety",
    "Check responsiveness",
    "Call for additional resources",
    "Check breathing and pulse",
    "Begin CPR if no pulse",
    "Attach AED as soon as available",
    "Administer Epinephrine",
    "Secure airway",
    "Monitor vitals",
    "Prepare for transport",
];

/// Exact-name lookup. Unknown names yield `None` and callers keep their
/// previous coordinates.
pub fn lookup_location(name: &str) -> Option<Coordinates> {
    LOCATIONS
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, coords)| *coords)
}

pub fn known_locations() -> impl Iterator<Item = &'static str> {
    LOCATIONS.iter().map(|(name, _)| *name)
}

pub fn facilities() -> impl Iterator<Item = Facility> {
    FACILITIES.iter().map(|(name, kind, position)| Facility {
        name: (*name).to_string(),
        kind: *kind,
        position: *position,
    })
}

pub fn protocol_steps() -> &'static [&'static str] {
    PROTOCOL_STEPS
}

pub fn initial_call() -> CallDetails {
    CallDetails {
        caller_name: "Rajesh Kumar".into(),
        age: Some(65),
        phone: "+91-98765-43210".into(),
        location: "Dadar Station".into(),
        coordinates: DADAR_STATION,
        incident_type: "Cardiac Arrest".into(),
        status: CallStatus::Connected,
    }
}

pub fn initial_situation() -> Situation {
    Situation {
        symptoms: vec![
            "Unconscious".into(),
            "Not breathing".into(),
            "Severe chest pain".into(),
        ],
        is_unconscious: true,
        is_not_breathing: true,
        fake_probability: 15.0,
        notes: String::new(),
    }
}

pub fn initial_resources() -> Vec<Resource> {
    vec![
        Resource::new("AMB-042", "Ambulance (ALS)", Coordinates::new(19.0250, 72.8550)),
        Resource::new("AMB-018", "Ambulance (BLS)", Coordinates::new(19.0400, 72.8300)),
        Resource::new("FIRE-101", "Fire Engine", Coordinates::new(19.0100, 72.8600)),
        Resource::new("POL-555", "Police Patrol", Coordinates::new(19.0150, 72.8350)),
        Resource::new("AMB-099", "Ambulance (ALS)", Coordinates::new(19.0600, 72.8400)),
        Resource::new("POL-100", "Police SUV", Coordinates::new(19.0120, 72.8450)),
        Resource::new("FIRE-202", "Ladder Truck", Coordinates::new(19.0800, 72.8800)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_exact_match() {
        assert_eq!(lookup_location("Dadar Station"), Some(DADAR_STATION));
        assert_eq!(lookup_location("dadar station"), None);
        assert_eq!(lookup_location("Atlantis"), None);
        assert_eq!(known_locations().count(), 8);
    }

    #[test]
    fn every_facility_kind_is_stocked() {
        for kind in FacilityKind::ALL {
            assert!(facilities().any(|f| f.kind == kind), "{kind:?}");
        }
    }

    #[test]
    fn resource_ids_are_unique() {
        let resources = initial_resources();
        let mut ids: Vec<_> = resources.iter().map(|r| r.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), resources.len());
    }
}
