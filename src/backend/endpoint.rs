//! Endpoint descriptions

use super::Envelope;

pub const PREDICTIONS_PATH: &str = "/common/all-predictions";
pub const MODELS_PATH: &str = "/common/get-all-models-data";

/// A list endpoint and the envelope it answers with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub path: String,
    pub envelope: Envelope,
}

impl Endpoint {
    pub fn new(path: impl Into<String>, envelope: Envelope) -> Self {
        Self {
            path: path.into(),
            envelope,
        }
    }

    /// Prediction history, wrapped in `{success, total_records, data}`
    pub fn predictions() -> Self {
        Self::new(PREDICTIONS_PATH, Envelope::Wrapped)
    }

    /// Model summaries, served as a bare array
    pub fn models() -> Self {
        Self::new(MODELS_PATH, Envelope::Bare)
    }
}
