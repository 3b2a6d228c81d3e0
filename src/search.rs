// src/search.rs
//! Search page view model: query text, last results and the error shown
//! above them.
//!
//! Requests run as spawned tasks and report back through a completion
//! channel, same as the sources page, so the console stays responsive while a
//! search is in flight.

use tokio::sync::mpsc;

use crate::api::{DynBackend, FetchError};
use crate::model::SearchResult;
use crate::query::{parse_query, QueryError};

/// Finished search request, applied back on the view's loop.
#[derive(Debug)]
pub struct SearchDone(pub Result<Vec<SearchResult>, FetchError>);

pub struct SearchView {
    backend: DynBackend,
    query: String,
    results: Vec<SearchResult>,
    in_flight: usize,
    error: Option<FetchError>,
    done_tx: mpsc::UnboundedSender<SearchDone>,
    done_rx: mpsc::UnboundedReceiver<SearchDone>,
}

impl SearchView {
    pub fn new(backend: DynBackend) -> Self {
        let (done_tx, done_rx) = mpsc::unbounded_channel();
        Self {
            backend,
            query: String::new(),
            results: Vec::new(),
            in_flight: 0,
            error: None,
            done_tx,
            done_rx,
        }
    }

    /// Start a search without waiting for it. Sets loading and clears the
    /// previous error; the outcome arrives through [`Self::next_completion`].
    pub fn begin_search(&mut self, query: &str) {
        self.query = query.to_string();
        self.in_flight += 1;
        self.error = None;
        tracing::debug!(target: "search", query_len = query.len(), "search started");

        let backend = self.backend.clone();
        let tx = self.done_tx.clone();
        let query = self.query.clone();
        tokio::spawn(async move {
            let res = backend.search(&query).await;
            let _ = tx.send(SearchDone(res));
        });
    }

    /// Results are replaced only on success; on failure the previous results
    /// stay and the error is kept for display.
    pub fn apply(&mut self, done: SearchDone) {
        self.in_flight = self.in_flight.saturating_sub(1);
        match done.0 {
            Ok(results) => {
                tracing::info!(target: "search", hits = results.len(), "search finished");
                self.results = results;
            }
            Err(e) => {
                tracing::warn!(target: "search", status = e.status(), error = %e, "search failed");
                self.error = Some(e);
            }
        }
    }

    /// Next finished request. Never resolves while nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<SearchDone> {
        self.done_rx.recv().await
    }

    /// Wait for the next finished request and apply it.
    pub async fn process_next(&mut self) -> bool {
        match self.next_completion().await {
            Some(done) => {
                self.apply(done);
                true
            }
            None => false,
        }
    }

    /// Run a search to completion.
    pub async fn search(&mut self, query: &str) {
        self.begin_search(query);
        while self.is_loading() {
            if !self.process_next().await {
                break;
            }
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    /// True while any search request is still outstanding.
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    /// `None` without error, `"N/A"` when no response arrived, else the status.
    pub fn error_code(&self) -> Option<String> {
        self.error.as_ref().map(FetchError::code)
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(FetchError::explanation)
    }

    /// Local syntax problem with the current query, if any.
    pub fn query_hint(&self) -> Option<QueryError> {
        if self.query.trim().is_empty() {
            return None;
        }
        parse_query(&self.query).err()
    }
}
