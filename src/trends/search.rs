//! Sequential, client-throttled keyword trend search
//!
//! The eCFR search API publishes no rate limit, so exact-count requests are
//! issued one at a time with a fixed pause after each. A search moves through
//! `Idle -> Collecting -> Throttling -> Summarizing -> Idle`; starting a new
//! search discards everything the previous one accumulated.

use chrono::{Local, NaiveDate};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Notify};

use super::error::{TrendError, TrendResult};
use super::query::SearchQuery;
use super::report::{DroppedDate, Progress, SearchPhase, SearchReport, SearchStatus};
use super::series::{filter_and_deduplicate, DateCount, RateResult};
use crate::client::SearchApi;
use crate::config::TrendConfig;
use crate::stats::SlugCatalog;
use crate::utils::error::FetchError;

/// Fixed parameters shared by every search on one controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSettings {
    /// Pause after every exact-count request
    pub delay: Duration,

    /// Dates before this are never queried
    pub earliest_date: NaiveDate,

    /// Series split point; the cutoff itself counts as "after"
    pub cutoff_date: NaiveDate,
}

impl From<&TrendConfig> for SearchSettings {
    fn from(config: &TrendConfig) -> Self {
        Self {
            delay: Duration::from_millis(config.delay_ms),
            earliest_date: config.earliest_date,
            cutoff_date: config.cutoff_date,
        }
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self::from(&crate::config::Config::default().trend)
    }
}

#[derive(Debug, Default)]
struct CancelState {
    cancelled: AtomicBool,
    notify: Notify,
}

/// Cloneable handle that stops a running search after its current request
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    inner: Arc<CancelState>,
}

impl CancelHandle {
    /// Request cancellation
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    /// Whether cancellation was requested
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Resolve once cancellation is requested
    pub async fn cancelled(&self) {
        loop {
            let notified = self.inner.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }

    fn reset(&self) {
        self.inner.cancelled.store(false, Ordering::SeqCst);
    }
}

/// Controller owning all state of one keyword trend search
pub struct TrendSearch<A: SearchApi> {
    api: A,
    settings: SearchSettings,
    catalog: Option<SlugCatalog>,
    phase: SearchPhase,
    results: Vec<DateCount>,
    dropped: Vec<DroppedDate>,
    rates: RateResult,
    status_tx: watch::Sender<SearchStatus>,
    cancel: CancelHandle,
}

impl<A: SearchApi> TrendSearch<A> {
    /// Create a controller over `api`
    #[must_use]
    pub fn new(api: A, settings: SearchSettings) -> Self {
        let (status_tx, _) = watch::channel(SearchStatus::default());

        Self {
            api,
            settings,
            catalog: None,
            phase: SearchPhase::Idle,
            results: Vec::new(),
            dropped: Vec::new(),
            rates: RateResult::default(),
            status_tx,
            cancel: CancelHandle::default(),
        }
    }

    /// Validate agency filters against a known slug set
    #[must_use]
    pub fn with_slug_catalog(mut self, catalog: SlugCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Settings in effect
    #[must_use]
    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    /// Current lifecycle phase
    #[must_use]
    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    /// Latest progress snapshot
    #[must_use]
    pub fn progress(&self) -> Progress {
        self.status_tx.borrow().progress
    }

    /// Counts gathered by the most recent search
    #[must_use]
    pub fn results(&self) -> &[DateCount] {
        &self.results
    }

    /// Dates the most recent search had to skip
    #[must_use]
    pub fn dropped(&self) -> &[DroppedDate] {
        &self.dropped
    }

    /// Rates from the most recent search; unset until summarized
    #[must_use]
    pub fn rates(&self) -> RateResult {
        self.rates
    }

    /// Watch phase and progress changes
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SearchStatus> {
        self.status_tx.subscribe()
    }

    /// Handle for stopping a search from another task
    #[must_use]
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Dates on which `keyword` has any match, ascending
    ///
    /// # Errors
    ///
    /// Returns the underlying `FetchError`; no retry is attempted
    pub async fn list_candidate_dates(&self, keyword: &str) -> Result<Vec<NaiveDate>, FetchError> {
        let mut dates = self.api.daily_counts(keyword).await?;
        dates.sort_unstable();
        dates.dedup();

        tracing::debug!(keyword, candidates = dates.len(), "Listed candidate dates");

        Ok(dates)
    }

    /// Exact match count for `keyword` on `date`
    ///
    /// # Errors
    ///
    /// Returns the underlying `FetchError`
    pub async fn fetch_exact_count(
        &self,
        keyword: &str,
        date: NaiveDate,
        agency: Option<&str>,
    ) -> Result<u64, FetchError> {
        let count = self.api.count(keyword, date, agency).await?;
        tracing::debug!(keyword, %date, count, "Fetched exact count");
        Ok(count)
    }

    /// Run a search with the configured delay
    ///
    /// # Errors
    ///
    /// See [`TrendSearch::run_search`]
    pub async fn run(&mut self, query: SearchQuery) -> TrendResult<SearchReport> {
        let delay = self.settings.delay;
        self.run_search(query, delay).await
    }

    /// Run a full search, pausing `delay` after every exact-count request
    ///
    /// At most one request is in flight at any time. Per-date failures are
    /// recorded on the report and do not stop the loop.
    ///
    /// # Errors
    ///
    /// Returns `TrendError::InvalidQuery` before any request is sent, or
    /// `TrendError::Listing` if the candidate-date call fails.
    pub async fn run_search(
        &mut self,
        query: SearchQuery,
        delay: Duration,
    ) -> TrendResult<SearchReport> {
        self.reset();

        query.validate(self.catalog.as_ref())?;

        tracing::info!(
            keyword = %query.keyword,
            agency = ?query.agency,
            start = ?query.start,
            end = ?query.end,
            delay_ms = delay.as_millis() as u64,
            "Starting trend search"
        );

        self.set_phase(SearchPhase::Collecting);
        let candidates = match self.list_candidate_dates(&query.keyword).await {
            Ok(dates) => dates,
            Err(source) => {
                tracing::error!(keyword = %query.keyword, error = %source, "Candidate listing failed");
                self.set_phase(SearchPhase::Idle);
                return Err(TrendError::Listing {
                    keyword: query.keyword,
                    source,
                });
            }
        };

        let today = Local::now().date_naive();
        let end = Some(query.end.map_or(today, |end| end.min(today)));
        let planned = filter_and_deduplicate(
            &candidates,
            self.settings.earliest_date,
            query.start,
            end,
        );
        let total = planned.len();

        tracing::info!(
            candidates = candidates.len(),
            planned = total,
            "Deduplicated to one date per month"
        );

        self.set_phase(SearchPhase::Throttling);
        self.set_progress(Progress::new(0, total));

        let mut cancelled = false;
        for (index, &date) in planned.iter().enumerate() {
            if self.cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            match self
                .fetch_exact_count(&query.keyword, date, query.agency.as_deref())
                .await
            {
                Ok(count) => self.results.push(DateCount::new(date, count)),
                Err(e) => {
                    tracing::warn!(%date, error = %e, "Failed to fetch count, skipping date");
                    self.dropped.push(DroppedDate {
                        date,
                        reason: e.to_string(),
                    });
                }
            }

            self.set_progress(Progress::new(index + 1, total));

            tokio::select! {
                () = tokio::time::sleep(delay) => {}
                () = self.cancel.cancelled() => {}
            }
        }

        if cancelled {
            tracing::info!(
                completed = self.status_tx.borrow().progress.current,
                total,
                "Search cancelled, keeping partial results"
            );
        }

        self.set_phase(SearchPhase::Summarizing);
        self.results.sort_by_key(|point| point.date);
        self.rates = RateResult::from_series(&self.results, self.settings.cutoff_date);

        tracing::info!(
            points = self.results.len(),
            dropped = self.dropped.len(),
            before = ?self.rates.before_cutoff,
            after = ?self.rates.after_cutoff,
            "Trend search complete"
        );

        self.set_phase(SearchPhase::Idle);

        Ok(SearchReport {
            query,
            series: self.results.clone(),
            rates: self.rates,
            cutoff: self.settings.cutoff_date,
            dropped: self.dropped.clone(),
            candidates: candidates.len(),
            planned: total,
            cancelled,
        })
    }

    fn reset(&mut self) {
        self.results.clear();
        self.dropped.clear();
        self.rates = RateResult::default();
        self.cancel.reset();
        self.phase = SearchPhase::Idle;
        self.status_tx.send_replace(SearchStatus::default());
    }

    fn set_phase(&mut self, phase: SearchPhase) {
        self.phase = phase;
        self.status_tx.send_modify(|status| status.phase = phase);
    }

    fn set_progress(&self, progress: Progress) {
        self.status_tx.send_modify(|status| status.progress = progress);
    }
}
