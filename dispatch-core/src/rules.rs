use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IncidentCategory {
    Fire,
    Violence,
    Medical,
    Unclassified,
}

const FIRE_KEYWORDS: &[&str] = &["fire"];
const VIOLENCE_KEYWORDS: &[&str] = &["murder", "fight", "violence", "robbery"];
const MEDICAL_KEYWORDS: &[&str] = &["cardiac", "heart", "pregnancy", "medical", "breathing"];

/// Buckets an incident type by substring. First match wins, in the order
/// fire, violence, medical.
pub fn classify_incident(incident_type: &str) -> IncidentCategory {
    let lower = incident_type.to_lowercase();
    let hit = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));

    if hit(FIRE_KEYWORDS) {
        IncidentCategory::Fire
    } else if hit(VIOLENCE_KEYWORDS) {
        IncidentCategory::Violence
    } else if hit(MEDICAL_KEYWORDS) {
        IncidentCategory::Medical
    } else {
        IncidentCategory::Unclassified
    }
}

impl IncidentCategory {
    /// Resource-type keywords that qualify a unit for this category.
    pub fn accepted_resource_keywords(&self) -> &'static [&'static str] {
        match self {
            IncidentCategory::Fire => &["fire", "police", "ambulance"],
            IncidentCategory::Violence => &["police", "ambulance"],
            IncidentCategory::Medical => &["ambulance"],
            IncidentCategory::Unclassified => &[],
        }
    }

    pub fn accepts(&self, resource_kind: &str) -> bool {
        let lower = resource_kind.to_lowercase();
        self.accepted_resource_keywords()
            .iter()
            .any(|k| lower.contains(k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_keyword() {
        assert_eq!(classify_incident("Cardiac Arrest"), IncidentCategory::Medical);
        assert_eq!(classify_incident("Building FIRE"), IncidentCategory::Fire);
        assert_eq!(classify_incident("armed robbery"), IncidentCategory::Violence);
        assert_eq!(classify_incident("Difficulty Breathing"), IncidentCategory::Medical);
        assert_eq!(classify_incident("Lost pet"), IncidentCategory::Unclassified);
        assert_eq!(classify_incident(""), IncidentCategory::Unclassified);
    }

    #[test]
    fn fire_takes_precedence_over_violence_and_medical() {
        assert_eq!(classify_incident("fire and violence"), IncidentCategory::Fire);
        assert_eq!(classify_incident("fight after heart attack"), IncidentCategory::Violence);
    }

    #[test]
    fn acceptance_is_case_insensitive_substring() {
        assert!(IncidentCategory::Fire.accepts("Fire Engine"));
        assert!(!IncidentCategory::Fire.accepts("Ladder Truck"));
        assert!(IncidentCategory::Violence.accepts("Police SUV"));
        assert!(!IncidentCategory::Medical.accepts("Police Patrol"));
        assert!(IncidentCategory::Medical.accepts("AMBULANCE (BLS)"));
        assert!(!IncidentCategory::Unclassified.accepts("Ambulance (ALS)"));
    }
}
