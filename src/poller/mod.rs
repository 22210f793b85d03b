//! Polling
//!
//! Interval-based fetching of bearer-protected list endpoints.
//!
//! # Lifecycle
//!
//! ```text
//! tick ──► token? ──no──► skip (no request)
//!            │
//!           yes
//!            ▼
//!   issue (seq = n, loading = true)
//!            ▼
//!   GET endpoint ──► extract envelope ──► settle(seq = n)
//!                                            │
//!                       n <= applied ? discard : apply
//! ```
//!
//! Responses may overlap when a request is slower than the poll interval;
//! the sequence numbers guarantee the newest issued request wins.

mod fetcher;
mod state;

pub use fetcher::{PollHandle, PollingFetcher, Ticket};
pub use state::FetchState;
