//! Comparison session: the fetch → aggregate → record cycle
//!
//! A session owns the current query, the last good comparison result, the
//! search history and the state shown to the presentation layer. Searches
//! are split into [`ComparisonSession::begin_search`] and
//! [`ComparisonSession::complete_search`] so the fetch can run on another
//! thread. Every search gets a sequence number and only the latest one may
//! update the session.

use chrono::{DateTime, Local};
use tracing::{debug, warn};

use super::aggregator::ComparisonAggregator;
use super::compare_client::PriceFetcher;
use super::history::{HistoryStore, SearchHistoryLog};
use crate::types::{
    ComparisonResult, MarginStatus, PriceCompareError, Result, SessionState, FETCH_ERROR_MESSAGE,
};

/// Handle for one issued search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub seq: u64,
    pub query: String,
}

/// What happened to a completed search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Fetch succeeded and the result is now current
    Succeeded,
    /// Fetch failed; session is in the Error state
    Failed,
    /// A newer search was issued; this response was discarded
    Stale,
}

/// Interactive comparison session
pub struct ComparisonSession {
    store: Box<dyn HistoryStore>,
    query: String,
    state: SessionState,
    result: Option<ComparisonResult>,
    fetched_at: Option<DateTime<Local>>,
    history: Vec<String>,
    latest_seq: u64,
}

impl ComparisonSession {
    /// Create a session, loading history from `store` once
    pub fn new(store: Box<dyn HistoryStore>) -> Self {
        let history = SearchHistoryLog::normalize(store.load());
        Self {
            store,
            query: String::new(),
            state: SessionState::Idle,
            result: None,
            fetched_at: None,
            history,
            latest_seq: 0,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Last good result; survives a failed fetch
    pub fn result(&self) -> Option<&ComparisonResult> {
        self.result.as_ref()
    }

    pub fn fetched_at(&self) -> Option<DateTime<Local>> {
        self.fetched_at
    }

    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    /// Validate `query`, move to Loading and hand out a ticket for the fetch.
    ///
    /// A blank query fails with `EmptyQuery` and leaves the session untouched.
    pub fn begin_search(&mut self, query: &str) -> Result<SearchTicket> {
        let query = query.trim();
        if query.is_empty() {
            return Err(PriceCompareError::EmptyQuery);
        }

        self.latest_seq += 1;
        self.query = query.to_string();
        self.state = SessionState::Loading {
            query: self.query.clone(),
        };
        debug!(seq = self.latest_seq, query, "search issued");

        Ok(SearchTicket {
            seq: self.latest_seq,
            query: self.query.clone(),
        })
    }

    /// Apply the fetch outcome for `ticket`, unless a newer search superseded it.
    pub fn complete_search(
        &mut self,
        ticket: &SearchTicket,
        outcome: Result<ComparisonResult>,
    ) -> SearchOutcome {
        if ticket.seq != self.latest_seq {
            debug!(
                seq = ticket.seq,
                latest = self.latest_seq,
                "discarding stale response"
            );
            return SearchOutcome::Stale;
        }

        match outcome {
            Ok(result) => {
                self.result = Some(result.clone());
                self.fetched_at = Some(Local::now());
                self.state = SessionState::Success(result);
                self.record_query(&ticket.query);
                SearchOutcome::Succeeded
            }
            Err(e) => {
                warn!(query = %ticket.query, error = %e, "comparison fetch failed");
                self.state = SessionState::Error {
                    message: FETCH_ERROR_MESSAGE.to_string(),
                };
                SearchOutcome::Failed
            }
        }
    }

    /// Run a whole search synchronously
    pub fn start_search(
        &mut self,
        query: &str,
        fetcher: &dyn PriceFetcher,
    ) -> Result<SearchOutcome> {
        let ticket = self.begin_search(query)?;
        let outcome = fetcher.fetch_prices(&ticket.query);
        Ok(self.complete_search(&ticket, outcome))
    }

    /// Re-run a search from history
    pub fn replay_search(
        &mut self,
        entry: &str,
        fetcher: &dyn PriceFetcher,
    ) -> Result<SearchOutcome> {
        self.set_query(entry);
        let query = self.query.clone();
        self.start_search(&query, fetcher)
    }

    /// Replace the query field without searching
    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
    }

    /// Margin over the current result; None when nothing has been fetched.
    ///
    /// Aggregation failures degrade to `Unavailable` and never touch the state.
    pub fn margin(&self) -> Option<MarginStatus> {
        let result = self.result.as_ref()?;
        Some(match ComparisonAggregator::aggregate(result) {
            Ok(summary) => MarginStatus::Available(summary),
            Err(e) => {
                debug!(error = %e, "margin unavailable");
                MarginStatus::Unavailable(e.to_string())
            }
        })
    }

    /// Return a finished search to Idle. Loading is left alone.
    pub fn reset(&mut self) {
        if self.state.is_terminal() {
            self.state = SessionState::Idle;
        }
    }

    pub fn clear_history(&mut self) -> Result<()> {
        self.history.clear();
        self.store.persist(&self.history)
    }

    fn record_query(&mut self, query: &str) {
        match SearchHistoryLog::record(&self.history, query) {
            Ok(updated) => {
                self.history = updated;
                if let Err(e) = self.store.persist(&self.history) {
                    warn!(error = %e, "failed to persist search history");
                }
            }
            // Tickets only carry validated queries
            Err(e) => warn!(error = %e, "search not recorded"),
        }
    }
}
