//! Fetch state exposed to consumers
//!
//! Every request gets a sequence number when it is issued. A response is
//! applied only if it is newer than the last applied one, so a slow
//! response can never overwrite fresher data.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::backend::Extracted;

/// `{data, loading, error}` for one polled resource
#[derive(Debug, Clone, Serialize)]
pub struct FetchState<T> {
    /// Last successfully fetched records
    pub data: Vec<T>,
    /// A request newer than the applied one is in flight
    pub loading: bool,
    /// Message from the most recent failed request
    pub error: Option<String>,
    /// Server-reported total, when the envelope carries one
    pub total_records: Option<u64>,
    /// When `data` was last replaced
    pub last_updated: Option<DateTime<Utc>>,
    /// Sequence number of the newest issued request
    pub issued: u64,
    /// Sequence number of the newest applied response
    pub applied: u64,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            loading: false,
            error: None,
            total_records: None,
            last_updated: None,
            issued: 0,
            applied: 0,
        }
    }
}

impl<T> FetchState<T> {
    /// Record a newly issued request and return its sequence number
    pub fn begin(&mut self) -> u64 {
        self.issued += 1;
        self.loading = true;
        self.issued
    }

    /// Apply the outcome of request `seq`
    ///
    /// Returns `false` (and changes nothing) when a newer response has
    /// already been applied.
    pub fn settle(&mut self, seq: u64, outcome: Result<Extracted<T>, String>) -> bool {
        if seq <= self.applied {
            return false;
        }

        self.applied = seq;
        match outcome {
            Ok(extracted) => {
                self.data = extracted.items;
                self.total_records = extracted.total_records;
                self.error = None;
                self.last_updated = Some(Utc::now());
            }
            Err(message) => {
                // stale-while-error: keep previous data
                self.error = Some(message);
            }
        }
        self.loading = self.applied < self.issued;
        true
    }

    /// Whether a response has been applied since the last invalidation
    pub fn has_loaded(&self) -> bool {
        self.last_updated.is_some() || self.error.is_some()
    }

    /// Drop everything fetched so far along with every outstanding request
    ///
    /// Sequence numbers keep counting, so tickets issued before this call
    /// are discarded by [`settle`](Self::settle). Returns whether anything
    /// changed.
    pub fn invalidate(&mut self) -> bool {
        let changed = !self.data.is_empty()
            || self.error.is_some()
            || self.total_records.is_some()
            || self.last_updated.is_some()
            || self.applied < self.issued;

        self.data.clear();
        self.error = None;
        self.total_records = None;
        self.last_updated = None;
        self.abandon();
        changed
    }

    /// Give up on outstanding requests, keeping the current data
    pub fn abandon(&mut self) -> bool {
        let changed = self.applied < self.issued;
        self.applied = self.issued;
        self.loading = false;
        changed
    }
}
