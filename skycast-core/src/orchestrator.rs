//! Search orchestration: validate, query, interpret, remember.
//!
//! The orchestrator is an explicit context object; whatever drives the UI owns
//! it and calls into it from its event handlers. Rendering subscribes to the
//! state exposed here ([`SearchOrchestrator::displayed`],
//! [`SearchOrchestrator::visible_error`], [`SearchOrchestrator::status`]).

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use crate::{
    api::{WeatherApiClient, interpret},
    error::{SearchError, SubmitError},
    model::{Mode, Query, WeatherResult},
    storage::{CitySelector, RecentCityStore},
    validate::{sanitize, validate},
};

/// How long an error message stays visible unless replaced or dismissed.
pub const ERROR_DISPLAY_DURATION: Duration = Duration::from_secs(5);

/// UI-visible lifecycle: `Idle -> Loading -> (Result | Error) -> Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Idle,
    Loading,
    Result,
    Error,
}

/// Latest error message and the instant after which it is hidden.
#[derive(Debug, Clone, Default)]
pub struct ErrorBanner {
    current: Option<(String, Instant)>,
}

impl ErrorBanner {
    /// Show `message`, replacing (and restarting the timer of) any previous one.
    pub fn show(&mut self, message: String, now: Instant) {
        self.current = Some((message, now + ERROR_DISPLAY_DURATION));
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }

    /// Message still visible at `now`; an expired message is cleared.
    pub fn visible(&mut self, now: Instant) -> Option<&str> {
        if matches!(&self.current, Some((_, deadline)) if now >= *deadline) {
            self.current = None;
        }
        self.current.as_ref().map(|(message, _)| message.as_str())
    }
}

/// A dispatched request that has not resolved yet.
///
/// Holds no borrow of the orchestrator, so it can be awaited elsewhere (or
/// spawned) while the orchestrator keeps handling events.
#[derive(Debug)]
pub struct PendingSearch {
    seq: u64,
    query: Query,
    client: Arc<dyn WeatherApiClient>,
}

impl PendingSearch {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Issue exactly one API call and classify what comes back.
    pub async fn run(self) -> SettledSearch {
        let outcome = match self.client.fetch(&self.query).await {
            Ok(response) => interpret(&self.query, &response),
            Err(err) => {
                tracing::warn!(error = %err, city = self.query.city(), "weather request failed");
                Err(SearchError::Network(err.0))
            }
        };

        SettledSearch { seq: self.seq, query: self.query, outcome }
    }
}

/// A resolved request waiting to be applied.
#[derive(Debug)]
pub struct SettledSearch {
    seq: u64,
    query: Query,
    outcome: Result<WeatherResult, SearchError>,
}

impl SettledSearch {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

#[derive(Debug)]
pub struct SearchOrchestrator {
    client: Arc<dyn WeatherApiClient>,
    recent: RecentCityStore,
    mode: Mode,
    status: Status,
    displayed: Option<WeatherResult>,
    last_city: Option<String>,
    banner: ErrorBanner,
    latest_seq: u64,
}

impl SearchOrchestrator {
    pub fn new(client: Arc<dyn WeatherApiClient>, recent: RecentCityStore, mode: Mode) -> Self {
        Self {
            client,
            recent,
            mode,
            status: Status::Idle,
            displayed: None,
            last_city: None,
            banner: ErrorBanner::default(),
            latest_seq: 0,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Submitting is disabled while a request is in flight; input stays editable.
    pub fn can_submit(&self) -> bool {
        self.status != Status::Loading
    }

    pub fn displayed(&self) -> Option<&WeatherResult> {
        self.displayed.as_ref()
    }

    /// City of the last search that succeeded, as the user typed it.
    pub fn last_city(&self) -> Option<&str> {
        self.last_city.as_deref()
    }

    pub fn recent(&self) -> &RecentCityStore {
        &self.recent
    }

    /// Error message visible at `now`. Expiry returns an `Error` status to `Idle`.
    pub fn visible_error(&mut self, now: Instant) -> Option<&str> {
        let visible = self.banner.visible(now).is_some();
        if !visible && self.status == Status::Error {
            self.status = Status::Idle;
        }
        self.banner.visible(now)
    }

    pub fn dismiss_error(&mut self) {
        self.banner.dismiss();
        if self.status == Status::Error {
            self.status = Status::Idle;
        }
    }

    /// Drop any displayed result or error and go back to `Idle`.
    pub fn clear(&mut self) {
        self.banner.dismiss();
        self.displayed = None;
        if self.status != Status::Loading {
            self.status = Status::Idle;
        }
    }

    /// Live input filter, applied on every keystroke. Typing clears a visible error.
    pub fn sanitize_input(&mut self, raw: &str) -> String {
        let cleaned = sanitize(raw);
        if !cleaned.is_empty() {
            self.dismiss_error();
        }
        cleaned
    }

    /// Change the mode for the next submission.
    ///
    /// When a result is on screen and the mode actually changed, returns the
    /// query that re-issues the last successful city under the new mode.
    pub fn set_mode(&mut self, mode: Mode) -> Option<Query> {
        let changed = self.mode != mode;
        self.mode = mode;

        if !changed || self.displayed.is_none() {
            return None;
        }
        self.last_city.as_ref().map(|city| Query::new(city.clone(), mode))
    }

    /// [`Self::set_mode`], then run the re-issued query if there is one.
    pub async fn switch_mode(&mut self, mode: Mode) -> Option<Result<WeatherResult, SearchError>> {
        let query = self.set_mode(mode)?;
        Some(self.execute(query).await)
    }

    /// Start a request for `query`. Anything dispatched earlier becomes stale.
    pub fn dispatch(&mut self, query: Query) -> PendingSearch {
        self.latest_seq += 1;
        self.status = Status::Loading;
        self.displayed = None;
        self.banner.dismiss();

        tracing::debug!(
            seq = self.latest_seq,
            city = query.city(),
            mode = %query.mode(),
            "dispatching search"
        );

        PendingSearch { seq: self.latest_seq, query, client: Arc::clone(&self.client) }
    }

    /// Apply a resolved request, unless a newer one has been dispatched since.
    ///
    /// Returns `None` for stale responses, which leave all state untouched.
    pub fn settle(
        &mut self,
        settled: SettledSearch,
    ) -> Option<Result<WeatherResult, SearchError>> {
        if settled.seq < self.latest_seq {
            tracing::debug!(
                seq = settled.seq,
                latest = self.latest_seq,
                city = settled.query.city(),
                "discarding superseded response"
            );
            return None;
        }
        Some(self.apply(settled))
    }

    /// Dispatch `query`, await it and apply the outcome.
    pub async fn execute(&mut self, query: Query) -> Result<WeatherResult, SearchError> {
        let pending = self.dispatch(query);
        let settled = pending.run().await;
        self.apply(settled)
    }

    /// Validate raw input under the current mode and search for it.
    ///
    /// Every failure is also shown as an error message.
    pub async fn submit(&mut self, raw: &str) -> Result<WeatherResult, SubmitError> {
        match validate(raw, self.mode) {
            Ok(query) => Ok(self.execute(query).await?),
            Err(err) => {
                self.fail(err.message());
                Err(err.into())
            }
        }
    }

    /// Search again for a remembered city. `None` if the selector matches nothing.
    pub async fn search_recent(
        &mut self,
        selector: CitySelector<'_>,
    ) -> Option<Result<WeatherResult, SubmitError>> {
        let city = self.recent.select(selector)?.to_string();
        Some(self.submit(&city).await)
    }

    fn apply(&mut self, settled: SettledSearch) -> Result<WeatherResult, SearchError> {
        let SettledSearch { query, outcome, .. } = settled;

        match &outcome {
            Ok(result) => {
                self.recent.record(query.city());
                self.last_city = Some(query.city().to_string());
                self.displayed = Some(result.clone());
                self.banner.dismiss();
                self.status = Status::Result;
            }
            Err(err) => {
                tracing::debug!(error = %err, city = query.city(), "search failed");
                self.fail(err.message());
            }
        }

        outcome
    }

    fn fail(&mut self, message: String) {
        self.banner.show(message, Instant::now());
        self.displayed = None;
        self.status = Status::Error;
    }
}
