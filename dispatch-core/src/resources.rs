use crate::geo::Coordinates;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    /// Free-text classification, e.g. "Ambulance (ALS)" or "Police SUV".
    pub kind: String,
    /// Home position. Never rewritten by ranking.
    pub base: Coordinates,
    /// Derived: kilometres to the incident.
    pub distance: f64,
    /// Derived: minutes to the incident.
    pub eta: f64,
    /// Derived: matches the incident's category.
    pub is_ai_suggested: bool,
}

impl Resource {
    pub fn new(id: &str, kind: &str, base: Coordinates) -> Self {
        Self {
            id: id.to_string(),
            kind: kind.to_string(),
            base,
            distance: 0.0,
            eta: 0.0,
            is_ai_suggested: false,
        }
    }

    /// Resources are drawn at their home position; nothing tracks live movement.
    pub fn position(&self) -> Coordinates {
        self.base
    }

    pub fn kind_contains(&self, keyword: &str) -> bool {
        self.kind.to_lowercase().contains(keyword)
    }

    pub fn is_ambulance(&self) -> bool {
        self.kind_contains("ambulance")
    }
}
