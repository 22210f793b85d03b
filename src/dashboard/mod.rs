//! Dashboard
//!
//! Wires the model and prediction pollers to the aggregator:
//!
//! ```text
//! AuthSession ──token──► PollingFetcher<ModelSummary>      ──► Leaderboard
//!                    └──► PollingFetcher<PredictionRecord> ──► history (grouped)
//!                                                          └─► DashboardSummary
//! ```

use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use crate::aggregate::{group_by_dataset, Grouped, Leaderboard};
use crate::auth::AuthSession;
use crate::backend::{Endpoint, Transport};
use crate::display::format_output;
use crate::domain::{ModelSummary, PredictionRecord};
use crate::poller::{PollHandle, PollingFetcher};

/// Endpoints the dashboard polls
#[derive(Debug, Clone)]
pub struct DashboardEndpoints {
    pub models: Endpoint,
    pub predictions: Endpoint,
}

impl Default for DashboardEndpoints {
    fn default() -> Self {
        Self {
            models: Endpoint::models(),
            predictions: Endpoint::predictions(),
        }
    }
}

/// Best model of one dataset, ready for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestModel {
    pub dataset: String,
    pub model_name: String,
    pub avg_output: f64,
    pub display: String,
}

/// Headline numbers for the dashboard overview
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub datasets: usize,
    pub models: usize,
    pub active_models: usize,
    pub total_predictions: u64,
    pub best_per_dataset: Vec<BestModel>,
    pub errors: Vec<String>,
}

/// Model leaderboard and prediction history for one session
pub struct Dashboard {
    session: Arc<AuthSession>,
    models: Arc<PollingFetcher<ModelSummary>>,
    predictions: Arc<PollingFetcher<PredictionRecord>>,
}

/// Running pollers of a dashboard; dropping it stops both
pub struct DashboardHandle {
    pub models: PollHandle,
    pub predictions: PollHandle,
}

impl DashboardHandle {
    pub fn stop(self) {
        self.models.stop();
        self.predictions.stop();
    }
}

impl Dashboard {
    pub fn new(
        transport: Arc<dyn Transport>,
        session: Arc<AuthSession>,
        endpoints: DashboardEndpoints,
    ) -> Self {
        let models = Arc::new(PollingFetcher::new(
            endpoints.models,
            Arc::clone(&transport),
            &session,
        ));
        let predictions = Arc::new(PollingFetcher::new(
            endpoints.predictions,
            transport,
            &session,
        ));

        Self {
            session,
            models,
            predictions,
        }
    }

    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    pub fn models(&self) -> &Arc<PollingFetcher<ModelSummary>> {
        &self.models
    }

    pub fn predictions(&self) -> &Arc<PollingFetcher<PredictionRecord>> {
        &self.predictions
    }

    /// Poll both endpoints once, concurrently
    pub async fn refresh_once(&self) {
        if !self.session.is_authorized() {
            tracing::info!("Not authorized, dashboard stays empty");
            return;
        }
        tokio::join!(self.models.tick(), self.predictions.tick());
    }

    /// Ask both background pollers for an immediate tick
    pub fn refresh_all(&self) {
        self.models.refresh();
        self.predictions.refresh();
    }

    /// Start background polling of both endpoints
    pub fn start(&self, interval: Option<Duration>) -> DashboardHandle {
        DashboardHandle {
            models: Arc::clone(&self.models).start(interval),
            predictions: Arc::clone(&self.predictions).start(interval),
        }
    }

    /// Current model leaderboard
    pub fn leaderboard(&self) -> Leaderboard {
        Leaderboard::from_summaries(self.models.snapshot().data)
    }

    /// Current prediction history, grouped by dataset in arrival order
    pub fn history(&self) -> Grouped<PredictionRecord> {
        group_by_dataset(self.predictions.snapshot().data)
    }

    /// Headline numbers across both views
    pub fn summary(&self) -> DashboardSummary {
        let models = self.models.snapshot();
        let predictions = self.predictions.snapshot();

        let datasets: HashSet<&str> = models
            .data
            .iter()
            .map(|m| m.dataset.as_str())
            .chain(predictions.data.iter().map(|p| p.dataset.as_str()))
            .collect();

        let active_models = models.data.iter().filter(|m| m.status.is_active()).count();
        let total_predictions = predictions
            .total_records
            .unwrap_or(predictions.data.len() as u64);

        let leaderboard = Leaderboard::from_summaries(models.data.clone());
        let best_per_dataset = leaderboard
            .winners()
            .map(|entry| BestModel {
                dataset: entry.summary.dataset.clone(),
                model_name: entry.summary.model_name.clone(),
                avg_output: entry.summary.avg_output,
                display: format_output(&entry.summary.dataset, entry.summary.avg_output, None).value,
            })
            .collect();

        let errors = [models.error.clone(), predictions.error.clone()]
            .into_iter()
            .flatten()
            .collect();

        DashboardSummary {
            datasets: datasets.len(),
            models: models.data.len(),
            active_models,
            total_predictions,
            best_per_dataset,
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::BearerToken;
    use crate::backend::{BackendError, BackendResult, MODELS_PATH, PREDICTIONS_PATH};
    use async_trait::async_trait;
    use serde_json::{json, Value};

    struct StaticTransport;

    #[async_trait]
    impl Transport for StaticTransport {
        async fn get_json(&self, path: &str, _token: &BearerToken) -> BackendResult<Value> {
            match path {
                MODELS_PATH => Ok(json!([
                    {"dataset": "Car Price", "model_name": "lin", "avg_output": 22000.0, "records": 10, "status": "Active"},
                    {"dataset": "Car Price", "model_name": "xgb", "avg_output": 31000.0, "records": 8, "status": "Active"},
                    {"dataset": "Movie Rating", "model_name": "knn", "avg_output": 7.2, "records": 3, "status": "Inactive"},
                ])),
                PREDICTIONS_PATH => Ok(json!({
                    "success": true,
                    "total_records": 40,
                    "data": [
                        {"dataset": "Titanic Survival", "model_name": "rf", "output": 1, "confidence": 0.87, "created_at": "2024-01-15T10:30:00Z"},
                        {"dataset": "Car Price", "model_name": "xgb", "output": 18500.0, "created_at": "2024-01-15T10:31:00Z"},
                        {"dataset": "Titanic Survival", "model_name": "rf", "output": 0, "confidence": 0.64, "created_at": "2024-01-15T10:32:00Z"},
                    ]
                })),
                other => Err(BackendError::Status {
                    status: 404,
                    message: other.to_string(),
                }),
            }
        }
    }

    fn dashboard(session: AuthSession) -> Dashboard {
        Dashboard::new(
            Arc::new(StaticTransport),
            Arc::new(session),
            DashboardEndpoints::default(),
        )
    }

    #[tokio::test]
    async fn test_refresh_builds_views() {
        let dash = dashboard(AuthSession::with_token(BearerToken::new("tok")));
        dash.refresh_once().await;

        let board = dash.leaderboard();
        assert_eq!(board.datasets.len(), 2);
        assert_eq!(board.dataset("Car Price").unwrap().best().unwrap().summary.model_name, "xgb");

        let history = dash.history();
        assert_eq!(history.keys().collect::<Vec<_>>(), vec!["Titanic Survival", "Car Price"]);
        assert_eq!(history.get("Titanic Survival").unwrap().len(), 2);

        let summary = dash.summary();
        assert_eq!(summary.datasets, 3);
        assert_eq!(summary.models, 3);
        assert_eq!(summary.active_models, 2);
        assert_eq!(summary.total_predictions, 40);
        assert_eq!(summary.best_per_dataset[0].display, "$31,000");
        assert_eq!(summary.best_per_dataset[1].display, "7.2/10");
        assert!(summary.errors.is_empty());
    }

    #[tokio::test]
    async fn test_unauthorized_dashboard_is_empty() {
        let dash = dashboard(AuthSession::new());
        dash.refresh_once().await;

        assert!(dash.leaderboard().is_empty());
        assert!(dash.history().is_empty());

        let summary = dash.summary();
        assert_eq!(summary.models, 0);
        assert_eq!(summary.total_predictions, 0);
    }

    #[tokio::test]
    async fn test_fetch_errors_surface_in_summary() {
        let endpoints = DashboardEndpoints {
            models: Endpoint::new("/missing", crate::backend::Envelope::Bare),
            ..Default::default()
        };
        let dash = Dashboard::new(
            Arc::new(StaticTransport),
            Arc::new(AuthSession::with_token(BearerToken::new("tok"))),
            endpoints,
        );
        dash.refresh_once().await;

        let summary = dash.summary();
        assert_eq!(summary.errors.len(), 1);
        assert!(summary.errors[0].contains("404"));
        assert_eq!(summary.total_predictions, 40);
    }
}
