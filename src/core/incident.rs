use crate::core::geo::LatLng;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity grades for a reported incident, ordered from least to most severe
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum IncidentSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl IncidentSeverity {
    /// Intensity weight contributed to the density layer
    pub fn weight(&self) -> f64 {
        match self {
            IncidentSeverity::Low => 0.3,
            IncidentSeverity::Medium => 0.5,
            IncidentSeverity::High => 0.8,
            IncidentSeverity::Critical => 1.0,
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            IncidentSeverity::Low => "Low",
            IncidentSeverity::Medium => "Medium",
            IncidentSeverity::High => "High",
            IncidentSeverity::Critical => "Critical",
        }
    }

    /// Display color used for marker dots and popup badges
    pub fn color(&self) -> &'static str {
        match self {
            IncidentSeverity::Low => "#22c55e",
            IncidentSeverity::Medium => "#eab308",
            IncidentSeverity::High => "#f97316",
            IncidentSeverity::Critical => "#ef4444",
        }
    }

    pub fn all() -> &'static [IncidentSeverity] {
        &[
            IncidentSeverity::Low,
            IncidentSeverity::Medium,
            IncidentSeverity::High,
            IncidentSeverity::Critical,
        ]
    }
}

impl std::fmt::Display for IncidentSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IncidentSeverity::Low => write!(f, "low"),
            IncidentSeverity::Medium => write!(f, "medium"),
            IncidentSeverity::High => write!(f, "high"),
            IncidentSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Fixed set of incident categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentCategory {
    VerbalHarassment,
    PhysicalHarassment,
    Discrimination,
    Stalking,
    Bullying,
    OnlineHarassment,
    Other,
}

impl IncidentCategory {
    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            IncidentCategory::VerbalHarassment => "Verbal Harassment",
            IncidentCategory::PhysicalHarassment => "Physical Harassment",
            IncidentCategory::Discrimination => "Discrimination",
            IncidentCategory::Stalking => "Stalking",
            IncidentCategory::Bullying => "Bullying",
            IncidentCategory::OnlineHarassment => "Online Harassment",
            IncidentCategory::Other => "Other",
        }
    }

    pub fn all() -> &'static [IncidentCategory] {
        &[
            IncidentCategory::VerbalHarassment,
            IncidentCategory::PhysicalHarassment,
            IncidentCategory::Discrimination,
            IncidentCategory::Stalking,
            IncidentCategory::Bullying,
            IncidentCategory::OnlineHarassment,
            IncidentCategory::Other,
        ]
    }
}

/// A single reported incident with location, category, severity and narrative.
///
/// Immutable once created; the surrounding application owns the collection
/// and replaces the engine's view wholesale on change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime<Utc>,
    pub category: IncidentCategory,
    pub severity: IncidentSeverity,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_description: Option<String>,
}

impl Incident {
    pub fn position(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }

    /// Resolved location text: the explicit description when present,
    /// otherwise formatted coordinates
    pub fn resolved_location(&self) -> String {
        self.location_description
            .clone()
            .unwrap_or_else(|| format!("Coordinates: {}", self.position()))
    }
}
