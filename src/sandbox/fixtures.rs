//! Sandbox fixtures
//!
//! In-memory data served by the sandbox backend. Either the built-in
//! sample set or a JSON file shaped like [`Fixtures`].

use chrono::{Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::SandboxError;
use crate::domain::{ModelStatus, ModelSummary, PredictionRecord};

/// Data served by the sandbox
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixtures {
    #[serde(default)]
    pub predictions: Vec<PredictionRecord>,
    #[serde(default)]
    pub models: Vec<ModelSummary>,
}

impl Fixtures {
    /// Load fixtures from a JSON file
    pub fn load(path: &Path) -> Result<Self, SandboxError> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| SandboxError::Fixtures(format!("{}: {}", path.display(), e)))
    }

    /// Deterministic sample data across a handful of datasets
    pub fn sample() -> Self {
        let base = Utc
            .with_ymd_and_hms(2024, 1, 15, 9, 0, 0)
            .single()
            .unwrap_or_else(Utc::now);
        let at = |minutes: i64| (base + Duration::minutes(minutes)).to_rfc3339();

        let predictions = vec![
            PredictionRecord::new("Titanic Survival", "random_forest", 1.0)
                .confidence(0.87)
                .created_at(at(0)),
            PredictionRecord::new("Car Price", "xgboost", 18500.0).created_at(at(3)),
            PredictionRecord::new("Movie Rating", "knn_regressor", 7.2).created_at(at(7)),
            PredictionRecord::new("Titanic Survival", "logistic_regression", 0.0)
                .confidence(0.64)
                .created_at(at(12)),
            PredictionRecord::new("Heart Disease", "gradient_boosting", 1.0)
                .confidence(0.73)
                .created_at(at(18)),
            PredictionRecord::new("Car Price", "linear_regression", 22340.5).created_at(at(25)),
            PredictionRecord::new("House Price", "xgboost", 412000.0).created_at(at(31)),
            PredictionRecord::new("Movie Rating", "knn_regressor", 4.6).created_at(at(40)),
        ];

        let summary = |dataset: &str, model: &str, avg: f64, records: u64, status: ModelStatus| {
            let mut s = ModelSummary::new(dataset, model, avg)
                .records(records)
                .status(status);
            s.created_at = at(-7 * 24 * 60);
            s.updated_at = at(40);
            s
        };

        let models = vec![
            summary("Car Price", "linear_regression", 22000.0, 140, ModelStatus::Active),
            summary("Car Price", "xgboost", 31000.0, 212, ModelStatus::Active),
            summary("Car Price", "random_forest", 31000.0, 96, ModelStatus::Inactive),
            summary("Movie Rating", "knn_regressor", 7.2, 58, ModelStatus::Active),
            summary("Titanic Survival", "random_forest", 0.82, 391, ModelStatus::Active),
            summary("Titanic Survival", "logistic_regression", 0.79, 402, ModelStatus::Active),
            summary("Heart Disease", "gradient_boosting", 0.61, 77, ModelStatus::Inactive),
            summary("House Price", "xgboost", 387500.0, 64, ModelStatus::Active),
        ];

        Self { predictions, models }
    }
}
