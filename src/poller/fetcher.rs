//! Polling Fetcher
//!
//! Fetches a bearer-protected list resource on demand and on a fixed
//! interval, publishing a [`FetchState`] through a `watch` channel.

use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Notify};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{Interval, MissedTickBehavior};

use super::state::FetchState;
use crate::auth::{AuthSession, BearerToken};
use crate::backend::{Endpoint, Extracted, Transport};
use crate::domain::Record;

/// A request that has been issued but not yet settled
#[derive(Debug, Clone)]
pub struct Ticket {
    pub seq: u64,
    token: BearerToken,
}

/// Polls one endpoint and exposes `{data, loading, error}`
pub struct PollingFetcher<T> {
    endpoint: Endpoint,
    transport: Arc<dyn Transport>,
    token_rx: watch::Receiver<Option<BearerToken>>,
    state_tx: watch::Sender<FetchState<T>>,
    refresh: Notify,
}

impl<T> PollingFetcher<T>
where
    T: Record + DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Create a fetcher gated on the session's bearer token
    pub fn new(endpoint: Endpoint, transport: Arc<dyn Transport>, session: &AuthSession) -> Self {
        let (state_tx, _) = watch::channel(FetchState::default());
        Self {
            endpoint,
            transport,
            token_rx: session.subscribe(),
            state_tx,
            refresh: Notify::new(),
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Clone of the current state
    pub fn snapshot(&self) -> FetchState<T> {
        self.state_tx.borrow().clone()
    }

    /// Watch state changes
    pub fn subscribe(&self) -> watch::Receiver<FetchState<T>> {
        self.state_tx.subscribe()
    }

    /// Issue a request if a token is available
    ///
    /// Without a token nothing is issued, and anything fetched under an
    /// earlier token is dropped.
    pub fn issue(&self) -> Option<Ticket> {
        let token = match self.token_rx.borrow().clone() {
            Some(token) => token,
            None => {
                tracing::debug!(path = %self.endpoint.path, "No backend token, skipping fetch");
                self.invalidate();
                return None;
            }
        };

        let mut seq = 0;
        self.state_tx.send_modify(|state| seq = state.begin());
        Some(Ticket { seq, token })
    }

    /// Perform the request for a ticket and return the extracted records
    pub async fn fetch(&self, ticket: &Ticket) -> Result<Extracted<T>, String> {
        match self
            .transport
            .get_json(&self.endpoint.path, &ticket.token)
            .await
        {
            Ok(body) => Ok(self.endpoint.envelope.extract(body)),
            Err(e) => {
                tracing::warn!(path = %self.endpoint.path, seq = ticket.seq, error = %e, "Fetch failed");
                Err(e.to_string())
            }
        }
    }

    /// Apply a fetch outcome, discarding it if a newer one already landed
    pub fn settle(&self, seq: u64, outcome: Result<Extracted<T>, String>) -> bool {
        let applied = self
            .state_tx
            .send_if_modified(|state| state.settle(seq, outcome));

        if !applied {
            tracing::debug!(path = %self.endpoint.path, seq, "Discarded stale response");
        }
        applied
    }

    /// Apply the outcome of a ticket unless its token has since been
    /// replaced or revoked
    pub fn settle_ticket(&self, ticket: &Ticket, outcome: Result<Extracted<T>, String>) -> bool {
        let current = self.token_rx.borrow().as_ref() == Some(&ticket.token);
        if !current {
            tracing::debug!(path = %self.endpoint.path, seq = ticket.seq, "Discarded response for a revoked token");
            return false;
        }
        self.settle(ticket.seq, outcome)
    }

    /// Clear data and outstanding requests, e.g. after the identity changed
    pub fn invalidate(&self) {
        if self.state_tx.send_if_modified(|state| state.invalidate()) {
            tracing::debug!(path = %self.endpoint.path, "Fetch state invalidated");
        }
    }

    /// Stop waiting on outstanding requests, keeping the current data
    fn abandon(&self) {
        self.state_tx.send_if_modified(|state| state.abandon());
    }

    /// Run one poll tick: at most one request
    ///
    /// Returns whether a request was made.
    pub async fn tick(&self) -> bool {
        let Some(ticket) = self.issue() else {
            return false;
        };

        let outcome = self.fetch(&ticket).await;
        self.settle_ticket(&ticket, outcome);
        true
    }

    /// Ask the background loop for an immediate tick
    pub fn refresh(&self) {
        self.refresh.notify_one();
    }

    /// Start background polling
    ///
    /// Ticks immediately, then every `interval`, plus whenever a token
    /// arrives or [`refresh`](Self::refresh) is called. `None` or a zero
    /// interval polls on those events only.
    pub fn start(self: Arc<Self>, interval: Option<Duration>) -> PollHandle {
        let interval = interval.filter(|d| !d.is_zero());

        tracing::info!(
            path = %self.endpoint.path,
            interval = ?interval,
            "Starting poller"
        );

        let fetcher = Arc::clone(&self);
        let handle = tokio::spawn(async move { self.run(interval).await });
        PollHandle {
            handle,
            on_stop: Some(Box::new(move || fetcher.abandon())),
        }
    }

    async fn run(self: Arc<Self>, interval: Option<Duration>) {
        let mut token_rx = self.token_rx.clone();
        token_rx.borrow_and_update();

        let mut ticker = interval.map(|period| {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker
        });
        let mut in_flight = JoinSet::new();

        // interval's first tick is immediate; on-demand mode needs an explicit one
        if ticker.is_none() {
            self.spawn_tick(&mut in_flight);
        }

        loop {
            tokio::select! {
                _ = next_tick(&mut ticker) => {
                    self.spawn_tick(&mut in_flight);
                }
                changed = token_rx.changed() => {
                    if changed.is_err() {
                        tracing::debug!(path = %self.endpoint.path, "Auth session closed, stopping poller");
                        break;
                    }
                    // a new identity never sees the previous one's data
                    self.invalidate();
                    if token_rx.borrow_and_update().is_some() {
                        self.spawn_tick(&mut in_flight);
                    }
                }
                _ = self.refresh.notified() => {
                    self.spawn_tick(&mut in_flight);
                }
                Some(_) = in_flight.join_next(), if !in_flight.is_empty() => {}
            }
        }
    }

    /// Issue synchronously so sequence numbers follow tick order, then let
    /// the request run concurrently with later ticks.
    fn spawn_tick(self: &Arc<Self>, in_flight: &mut JoinSet<()>) {
        let Some(ticket) = self.issue() else {
            return;
        };

        let fetcher = Arc::clone(self);
        in_flight.spawn(async move {
            let outcome = fetcher.fetch(&ticket).await;
            fetcher.settle_ticket(&ticket, outcome);
        });
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

/// Handle to a running poll loop
///
/// Dropping the handle cancels the timer and abandons in-flight requests.
/// The last fetched data stays readable and `loading` is cleared.
pub struct PollHandle {
    handle: JoinHandle<()>,
    on_stop: Option<Box<dyn FnOnce() + Send>>,
}

impl PollHandle {
    /// Stop polling
    pub fn stop(self) {
        drop(self);
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.handle.abort();
        if let Some(on_stop) = self.on_stop.take() {
            on_stop();
        }
    }
}
