use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HormoneStatus {
    Normal,
    High,
    Low,
    Critical,
}

impl HormoneStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HormoneStatus::Normal => "normal",
            HormoneStatus::High => "high",
            HormoneStatus::Low => "low",
            HormoneStatus::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl Trend {
    pub fn from_change(change: f64) -> Self {
        if change > 0.0 {
            Trend::Up
        } else if change < 0.0 {
            Trend::Down
        } else {
            Trend::Stable
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReferenceRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl ReferenceRange {
    pub fn new(min: f64, max: f64, unit: &str) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            text: Some(format!("{min}-{max} {unit}")),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// A single named lab value as it appears on a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HormoneReading {
    pub name: String,
    pub full_name: String,
    pub value: f64,
    pub unit: String,
    #[serde(default)]
    pub reference_range: ReferenceRange,
    pub status: HormoneStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<Trend>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change: Option<f64>,
}

impl HormoneReading {
    pub fn is_normal(&self) -> bool {
        self.status == HormoneStatus::Normal
    }

    /// Matches either the normalized name or the display name, ignoring case.
    pub fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name) || self.full_name.eq_ignore_ascii_case(name)
    }
}
