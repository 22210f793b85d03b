//! Response envelopes
//!
//! The backend is inconsistent about how it wraps list responses:
//!
//! ```text
//! GET /common/all-predictions       -> {"success": true, "total_records": 3, "data": [...]}
//! GET /common/get-all-models-data   -> [...]
//! ```
//!
//! Each endpoint is configured with the envelope it uses. Extraction is
//! tolerant: any shape mismatch yields an empty list instead of an error.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::Record;

/// How an endpoint wraps its list payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Envelope {
    /// `{success, total_records, data: [...]}`
    Wrapped,
    /// Bare JSON array
    Bare,
}

/// Records pulled out of a response body
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted<T> {
    pub items: Vec<T>,
    /// Server-reported total, wrapped envelopes only
    pub total_records: Option<u64>,
    /// Elements discarded because they broke record invariants
    pub dropped: usize,
}

impl<T> Default for Extracted<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total_records: None,
            dropped: 0,
        }
    }
}

impl Envelope {
    /// Extract the record list from a parsed response body
    pub fn extract<T>(&self, body: Value) -> Extracted<T>
    where
        T: Record + DeserializeOwned,
    {
        let (array, total_records) = match (self, body) {
            (Envelope::Wrapped, Value::Object(mut map)) => {
                let total = map.get("total_records").and_then(Value::as_u64);
                match map.remove("data") {
                    Some(data @ Value::Array(_)) => (data, total),
                    _ => {
                        tracing::warn!("Wrapped response has no data array, using empty list");
                        return Extracted {
                            total_records: total,
                            ..Extracted::default()
                        };
                    }
                }
            }
            (Envelope::Bare, array @ Value::Array(_)) => (array, None),
            (envelope, _) => {
                tracing::warn!(?envelope, "Response body does not match envelope, using empty list");
                return Extracted::default();
            }
        };

        let records: Vec<T> = match serde_json::from_value(array) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(error = %e, "Response records do not match schema, using empty list");
                return Extracted {
                    total_records,
                    ..Extracted::default()
                };
            }
        };

        let before = records.len();
        let items: Vec<T> = records.into_iter().filter(|r| r.is_well_formed()).collect();
        let dropped = before - items.len();
        if dropped > 0 {
            tracing::debug!(dropped, "Dropped malformed records");
        }

        Extracted {
            items,
            total_records,
            dropped,
        }
    }
}

impl std::fmt::Display for Envelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Envelope::Wrapped => write!(f, "wrapped"),
            Envelope::Bare => write!(f, "bare"),
        }
    }
}
