use serde::{Deserialize, Serialize};

/// Approximate kilometres per degree near the service area's latitude.
pub const KM_PER_DEGREE: f64 = 111.0;

/// Minutes per kilometre at the assumed 30 km/h average response speed.
pub const MINUTES_PER_KM: f64 = 2.0;

/// Fixed dispatch/startup overhead added to every ETA.
pub const STARTUP_MINUTES: f64 = 1.0;

/// Mean Earth radius used for great-circle distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Straight-line to road distance factor for facility ETAs.
pub const ROAD_WINDING_FACTOR: f64 = 1.3;

/// Average city driving speed assumed for facility ETAs.
pub const AVERAGE_SPEED_KMPH: f64 = 35.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub long: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, long: f64) -> Self {
        Self { lat, long }
    }

    /// Flat-plane distance in degree space scaled to kilometres.
    ///
    /// Only meaningful for metro-scale separations; this is not a geodesic.
    pub fn planar_km_to(&self, other: &Coordinates) -> f64 {
        let dlat = self.lat - other.lat;
        let dlong = self.long - other.long;
        (dlat * dlat + dlong * dlong).sqrt() * KM_PER_DEGREE
    }

    /// Great-circle distance in kilometres.
    pub fn haversine_km_to(&self, other: &Coordinates) -> f64 {
        let (lat1, lat2) = (self.lat.to_radians(), other.lat.to_radians());
        let dlat = lat2 - lat1;
        let dlong = (other.long - self.long).to_radians();
        let h = (dlat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (dlong / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
    }
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Driving minutes for a straight-line distance, padded for road winding.
pub fn road_eta_minutes(straight_km: f64) -> f64 {
    round1(straight_km * ROAD_WINDING_FACTOR / AVERAGE_SPEED_KMPH * 60.0)
}

pub fn distance_km(base: &Coordinates, incident: &Coordinates) -> f64 {
    round1(base.planar_km_to(incident))
}

pub fn eta_minutes(distance_km: f64) -> f64 {
    round1(distance_km * MINUTES_PER_KM + STARTUP_MINUTES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_scaled_and_rounded() {
        let incident = Coordinates::new(19.0178, 72.8478);
        let base = Coordinates::new(19.0250, 72.8550);
        assert_eq!(distance_km(&base, &incident), 1.1);
        assert_eq!(distance_km(&incident, &incident), 0.0);
    }

    #[test]
    fn eta_adds_startup_overhead() {
        assert_eq!(eta_minutes(0.0), 1.0);
        assert_eq!(eta_minutes(1.1), 3.2);
        assert_eq!(eta_minutes(4.8), 10.6);
    }

    #[test]
    fn haversine_matches_known_distance() {
        let gateway = Coordinates::new(18.9220, 72.8347);
        let powai = Coordinates::new(19.1267, 72.9156);
        let km = gateway.haversine_km_to(&powai);
        assert!((km - 24.2).abs() < 0.3, "got {km}");
        assert_eq!(gateway.haversine_km_to(&gateway), 0.0);
    }

    #[test]
    fn road_eta_pads_for_winding() {
        assert_eq!(road_eta_minutes(0.0), 0.0);
        assert_eq!(road_eta_minutes(3.5), 7.8);
        assert_eq!(round2(1.23456), 1.23);
    }
}
