use crate::catalog;
use crate::geo::{self, Coordinates};
use crate::resources::Resource;
use crate::rules::classify_incident;
use tracing::debug;

#[derive(Clone, Debug, PartialEq)]
pub struct Ranking {
    pub coordinates: Coordinates,
    pub resources: Vec<Resource>,
    /// Sole default selection, when anything was suggested.
    pub auto_select: Option<String>,
}

/// Looks the location name up in the catalog, keeping `previous` when it is
/// unknown.
pub fn resolve_coordinates(location: &str, previous: Coordinates) -> Coordinates {
    catalog::lookup_location(location).unwrap_or(previous)
}

/// Rewrites the derived fields of every resource and returns them ordered
/// suggested-first, then by ascending ETA. Equal keys keep their input order.
pub fn rank_resources(
    incident: Coordinates,
    incident_type: &str,
    resources: &[Resource],
) -> Vec<Resource> {
    let category = classify_incident(incident_type);

    let mut ranked: Vec<Resource> = resources
        .iter()
        .map(|r| {
            let distance = geo::distance_km(&r.base, &incident);
            Resource {
                distance,
                eta: geo::eta_minutes(distance),
                is_ai_suggested: category.accepts(&r.kind),
                ..r.clone()
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.is_ai_suggested
            .cmp(&a.is_ai_suggested)
            .then_with(|| a.eta.total_cmp(&b.eta))
    });
    ranked
}

pub fn recompute(
    location: &str,
    previous: Coordinates,
    incident_type: &str,
    resources: &[Resource],
) -> Ranking {
    let coordinates = resolve_coordinates(location, previous);
    let resources = rank_resources(coordinates, incident_type, resources);
    let auto_select = resources
        .iter()
        .find(|r| r.is_ai_suggested)
        .map(|r| r.id.clone());

    debug!(
        location,
        incident_type,
        suggested = resources.iter().filter(|r| r.is_ai_suggested).count(),
        auto_select = auto_select.as_deref().unwrap_or("-"),
        "resources re-ranked"
    );

    Ranking {
        coordinates,
        resources,
        auto_select,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{initial_resources, DADAR_STATION};

    fn ids(resources: &[Resource]) -> Vec<&str> {
        resources.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn cardiac_arrest_at_dadar_prefers_ambulances() {
        let ranking = recompute(
            "Dadar Station",
            DADAR_STATION,
            "Cardiac Arrest",
            &initial_resources(),
        );

        assert_eq!(
            ids(&ranking.resources),
            vec!["AMB-042", "AMB-018", "AMB-099", "POL-100", "POL-555", "FIRE-101", "FIRE-202"]
        );
        assert_eq!(ranking.auto_select.as_deref(), Some("AMB-042"));

        let first = &ranking.resources[0];
        assert_eq!(first.distance, 1.1);
        assert_eq!(first.eta, 3.2);
        assert!(ranking
            .resources
            .iter()
            .all(|r| r.is_ai_suggested == r.is_ambulance()));
    }

    #[test]
    fn fire_suggests_fire_police_and_ambulance_but_not_ladder_truck() {
        let ranked = rank_resources(DADAR_STATION, "House Fire", &initial_resources());
        let suggested: Vec<&str> = ranked
            .iter()
            .filter(|r| r.is_ai_suggested)
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(suggested.len(), 6);
        assert!(!suggested.contains(&"FIRE-202"));
        assert_eq!(ranked.last().map(|r| r.id.as_str()), Some("FIRE-202"));
    }

    #[test]
    fn unclassified_incident_orders_by_eta_only() {
        let ranking = recompute(
            "Dadar Station",
            DADAR_STATION,
            "Noise complaint",
            &initial_resources(),
        );
        assert!(ranking.resources.iter().all(|r| !r.is_ai_suggested));
        assert_eq!(ranking.auto_select, None);
        assert_eq!(ranking.resources[0].id, "POL-100");
        assert!(ranking
            .resources
            .windows(2)
            .all(|w| w[0].eta <= w[1].eta));
    }

    #[test]
    fn unknown_location_keeps_previous_coordinates() {
        let previous = Coordinates::new(19.1, 72.9);
        let ranking = recompute(
            "Nowhere Junction",
            previous,
            "Cardiac Arrest",
            &initial_resources(),
        );
        assert_eq!(ranking.coordinates, previous);
    }

    #[test]
    fn equal_eta_keeps_input_order() {
        let here = Coordinates::new(19.0, 72.8);
        let resources = vec![
            Resource::new("B", "Ambulance", here),
            Resource::new("A", "Ambulance", here),
        ];
        let ranked = rank_resources(here, "medical", &resources);
        assert_eq!(ids(&ranked), vec!["B", "A"]);
    }

    #[test]
    fn base_coordinates_are_never_rewritten() {
        let before = initial_resources();
        let ranked = rank_resources(Coordinates::new(18.9, 72.8), "robbery", &before);
        for r in &ranked {
            let original = before.iter().find(|b| b.id == r.id).expect("same fleet");
            assert_eq!(r.base, original.base);
        }
        assert_eq!(ranked.len(), before.len());
    }
}
