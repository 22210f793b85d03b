//! Prediction domain
//!
//! Records fetched from the prediction backend and the traits the
//! aggregator uses to group and rank them.

pub mod types;

pub use types::{
    parse_timestamp, Categorized, ModelStatus, ModelSummary, PredictionRecord, Ranked, Record,
};
