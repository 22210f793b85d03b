//! Core data types for predictdash
//!
//! This module defines the records the backend hands us:
//! - `PredictionRecord`: a single model prediction
//! - `ModelSummary`: a server-side aggregate for one (dataset, model) pair
//! - `ModelStatus`: lifecycle label attached to a summary
//!
//! Both are read-only from the client's perspective. They are fetched,
//! held in memory, and discarded.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Anything that can be partitioned by dataset
pub trait Categorized {
    /// The category key (dataset name)
    fn category(&self) -> &str;
}

/// A list element served by the backend
pub trait Record: Categorized {
    /// Check the record invariants
    fn is_well_formed(&self) -> bool;
}

/// Anything that can be ranked by a numeric metric
pub trait Ranked {
    /// The value used for ranking, higher is better
    fn metric(&self) -> f64;
}

/// A single prediction produced by a model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionRecord {
    /// Prediction domain, e.g. "Car Price"
    pub dataset: String,
    /// Model that produced the value
    #[serde(alias = "modelName")]
    pub model_name: String,
    /// Raw prediction value, units depend on the dataset
    pub output: f64,
    /// Classification confidence in [0, 1]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// ISO 8601 creation timestamp
    #[serde(alias = "createdAt", default)]
    pub created_at: String,
}

impl PredictionRecord {
    /// Create a new prediction record stamped with the current time
    pub fn new(dataset: impl Into<String>, model_name: impl Into<String>, output: f64) -> Self {
        Self {
            dataset: dataset.into(),
            model_name: model_name.into(),
            output,
            confidence: None,
            created_at: Utc::now().to_rfc3339(),
        }
    }

    /// Builder method: set confidence
    pub fn confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Builder method: set creation timestamp
    pub fn created_at(mut self, created_at: impl Into<String>) -> Self {
        self.created_at = created_at.into();
        self
    }

    /// Parsed creation timestamp
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }
}

impl Categorized for PredictionRecord {
    fn category(&self) -> &str {
        &self.dataset
    }
}

impl Record for PredictionRecord {
    /// Dataset and model name must be non-empty, and a confidence (when
    /// present) must lie in [0, 1].
    fn is_well_formed(&self) -> bool {
        !self.dataset.trim().is_empty()
            && !self.model_name.trim().is_empty()
            && self
                .confidence
                .map(|c| (0.0..=1.0).contains(&c))
                .unwrap_or(true)
    }
}

/// Lifecycle label of a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ModelStatus {
    Active,
    Inactive,
    /// Any label the backend sends that we don't recognize
    #[default]
    Unknown,
}

impl ModelStatus {
    /// Parse a status label, case-insensitively
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "active" => ModelStatus::Active,
            "inactive" => ModelStatus::Inactive,
            _ => ModelStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelStatus::Active => "Active",
            ModelStatus::Inactive => "Inactive",
            ModelStatus::Unknown => "Unknown",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, ModelStatus::Active)
    }
}

impl std::fmt::Display for ModelStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl Serialize for ModelStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ModelStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(ModelStatus::from_label(&label))
    }
}

/// Server-computed aggregate of many predictions for one (dataset, model) pair
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelSummary {
    pub dataset: String,
    #[serde(alias = "modelName")]
    pub model_name: String,
    /// Average prediction output across `records` predictions
    #[serde(alias = "avgOutput")]
    pub avg_output: f64,
    /// Number of predictions contributing to the aggregate
    #[serde(default)]
    pub records: u64,
    #[serde(default)]
    pub status: ModelStatus,
    #[serde(alias = "createdAt", default)]
    pub created_at: String,
    #[serde(alias = "updatedAt", default)]
    pub updated_at: String,
}

impl ModelSummary {
    /// Create a new active summary stamped with the current time
    pub fn new(dataset: impl Into<String>, model_name: impl Into<String>, avg_output: f64) -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            dataset: dataset.into(),
            model_name: model_name.into(),
            avg_output,
            records: 0,
            status: ModelStatus::Active,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Builder method: set record count
    pub fn records(mut self, records: u64) -> Self {
        self.records = records;
        self
    }

    /// Builder method: set status
    pub fn status(mut self, status: ModelStatus) -> Self {
        self.status = status;
        self
    }

    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }

    pub fn updated_at_utc(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.updated_at)
    }
}

impl Categorized for ModelSummary {
    fn category(&self) -> &str {
        &self.dataset
    }
}

impl Record for ModelSummary {
    fn is_well_formed(&self) -> bool {
        !self.dataset.trim().is_empty() && !self.model_name.trim().is_empty()
    }
}

impl Ranked for ModelSummary {
    fn metric(&self) -> f64 {
        self.avg_output
    }
}

/// Parse an ISO 8601 timestamp
///
/// Accepts RFC 3339 and naive date-times (treated as UTC), since the
/// backend emits both.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_prediction_deserializes_snake_and_camel() {
        let snake: PredictionRecord = serde_json::from_str(
            r#"{"dataset":"Titanic Survival","model_name":"rf","output":1,"confidence":0.87,"created_at":"2024-01-15T10:30:00Z"}"#,
        )
        .unwrap();
        let camel: PredictionRecord = serde_json::from_str(
            r#"{"dataset":"Titanic Survival","modelName":"rf","output":1,"confidence":0.87,"createdAt":"2024-01-15T10:30:00Z"}"#,
        )
        .unwrap();

        assert_eq!(snake, camel);
        assert_eq!(snake.confidence, Some(0.87));
    }

    #[test]
    fn test_prediction_without_confidence() {
        let record: PredictionRecord = serde_json::from_str(
            r#"{"dataset":"Car Price","model_name":"xgb","output":18500.0,"created_at":"2024-01-15T10:30:00"}"#,
        )
        .unwrap();

        assert!(record.confidence.is_none());
        assert!(record.is_well_formed());

        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("confidence"));
    }

    #[test]
    fn test_well_formed() {
        assert!(PredictionRecord::new("Car Price", "xgb", 1.0).is_well_formed());
        assert!(!PredictionRecord::new("", "xgb", 1.0).is_well_formed());
        assert!(!PredictionRecord::new("Car Price", "  ", 1.0).is_well_formed());
        assert!(!PredictionRecord::new("Titanic Survival", "rf", 1.0)
            .confidence(1.5)
            .is_well_formed());

        assert!(!ModelSummary::new("Car Price", "", 1.0).is_well_formed());
    }

    #[test]
    fn test_model_status_labels() {
        assert_eq!(ModelStatus::from_label("Active"), ModelStatus::Active);
        assert_eq!(ModelStatus::from_label("inactive"), ModelStatus::Inactive);
        assert_eq!(ModelStatus::from_label("retired"), ModelStatus::Unknown);

        let summary: ModelSummary = serde_json::from_str(
            r#"{"dataset":"Car Price","model_name":"xgb","avg_output":22000,"records":12,"status":"ACTIVE","created_at":"","updated_at":""}"#,
        )
        .unwrap();
        assert!(summary.status.is_active());
        assert_eq!(summary.records, 12);

        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"status\":\"Active\""));
    }

    #[test]
    fn test_missing_status_defaults_to_unknown() {
        assert_eq!(ModelStatus::default(), ModelStatus::Unknown);

        let summary: ModelSummary = serde_json::from_str(
            r#"{"dataset":"Car Price","model_name":"xgb","avg_output":22000}"#,
        )
        .unwrap();
        assert_eq!(summary.status, ModelStatus::Unknown);
        assert!(!summary.status.is_active());
    }

    #[test]
    fn test_parse_timestamp() {
        let rfc = parse_timestamp("2024-01-15T10:30:00+02:00").unwrap();
        assert_eq!(rfc.hour(), 8);

        let naive = parse_timestamp("2024-01-15T10:30:00.123456").unwrap();
        assert_eq!(naive.day(), 15);
        assert_eq!(naive.hour(), 10);

        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("yesterday").is_none());
    }
}
