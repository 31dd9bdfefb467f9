//! Nearest fixed facility (fire station, police station, hospital) to a
//! point, with great-circle distance and a road-padded ETA.

use crate::catalog;
use crate::geo::{self, Coordinates};
use serde::{Deserialize, Serialize};

/// Facilities further than this are reported as not found.
pub const SEARCH_RADIUS_KM: f64 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacilityKind {
    FireStation,
    PoliceStation,
    Hospital,
}

impl FacilityKind {
    pub const ALL: [FacilityKind; 3] = [
        FacilityKind::FireStation,
        FacilityKind::PoliceStation,
        FacilityKind::Hospital,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FacilityKind::FireStation => "Fire Station",
            FacilityKind::PoliceStation => "Police Station",
            FacilityKind::Hospital => "Hospital",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub name: String,
    pub kind: FacilityKind,
    pub position: Coordinates,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NearestService {
    pub name: String,
    pub position: Coordinates,
    pub distance_km: f64,
    pub eta_minutes: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServiceEntry {
    pub kind: FacilityKind,
    pub label: String,
    /// `None` when nothing of this kind lies within the search radius.
    pub nearest: Option<NearestService>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServiceReport {
    pub location: String,
    pub coordinates: Coordinates,
    pub services: Vec<ServiceEntry>,
}

/// Closest facility of `kind` within the search radius. Ties keep catalog order.
pub fn nearest_facility(kind: FacilityKind, origin: Coordinates) -> Option<NearestService> {
    catalog::facilities()
        .filter(|f| f.kind == kind)
        .map(|f| {
            let km = origin.haversine_km_to(&f.position);
            (f, km)
        })
        .filter(|(_, km)| *km <= SEARCH_RADIUS_KM)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(f, km)| NearestService {
            name: f.name,
            position: f.position,
            distance_km: geo::round2(km),
            eta_minutes: geo::road_eta_minutes(km),
        })
}

/// Nearest service of every kind for a named location, or `None` when the
/// location is not in the lookup table.
pub fn nearest_services(location: &str) -> Option<ServiceReport> {
    let coordinates = catalog::lookup_location(location)?;
    let services = FacilityKind::ALL
        .into_iter()
        .map(|kind| ServiceEntry {
            kind,
            label: kind.label().to_string(),
            nearest: nearest_facility(kind, coordinates),
        })
        .collect();
    Some(ServiceReport {
        location: location.to_string(),
        coordinates,
        services,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DADAR_STATION;

    fn nearest_name(report: &ServiceReport, kind: FacilityKind) -> Option<&str> {
        report
            .services
            .iter()
            .find(|s| s.kind == kind)
            .and_then(|s| s.nearest.as_ref())
            .map(|n| n.name.as_str())
    }

    #[test]
    fn dadar_has_every_service_nearby() {
        let report = nearest_services("Dadar Station").expect("known location");
        assert_eq!(report.coordinates, DADAR_STATION);
        assert_eq!(
            nearest_name(&report, FacilityKind::FireStation),
            Some("Dadar Fire Station")
        );
        assert_eq!(
            nearest_name(&report, FacilityKind::PoliceStation),
            Some("Dadar Police Station")
        );
        assert_eq!(nearest_name(&report, FacilityKind::Hospital), Some("KEM Hospital"));
    }

    #[test]
    fn eta_uses_road_padding() {
        let kem = nearest_facility(FacilityKind::Hospital, DADAR_STATION).expect("hospital");
        assert_eq!(kem.distance_km, 1.76);
        let straight = DADAR_STATION.haversine_km_to(&kem.position);
        assert_eq!(kem.eta_minutes, geo::road_eta_minutes(straight));
        assert!(kem.eta_minutes > 3.0 && kem.eta_minutes < 4.5);
    }

    #[test]
    fn nothing_beyond_search_radius() {
        let report = nearest_services("Powai Lake").expect("known location");
        assert!(report.services.iter().all(|s| s.nearest.is_none()));
        assert_eq!(report.services.len(), 3);
    }

    #[test]
    fn unknown_location_has_no_report() {
        assert_eq!(nearest_services("Atlantis"), None);
    }
}
