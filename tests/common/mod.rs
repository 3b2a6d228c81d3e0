// tests/common/mod.rs
// Scripted in-memory backend shared by the view tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use chrono::{TimeZone, Utc};
use kcdb_console::api::{Backend, FetchError};
use kcdb_console::model::{IngestStatus, ScheduledSource, SearchResult, Source};

pub struct StubBackend {
    pub sources: Mutex<Result<Vec<Source>, FetchError>>,
    pub status: Mutex<Result<IngestStatus, FetchError>>,
    pub search: Mutex<Result<Vec<SearchResult>, FetchError>>,
    pub source_calls: AtomicUsize,
    pub status_calls: AtomicUsize,
    pub queries: Mutex<Vec<String>>,
}

impl StubBackend {
    pub fn healthy() -> Self {
        Self {
            sources: Mutex::new(Ok(sample_sources())),
            status: Mutex::new(Ok(sample_status())),
            search: Mutex::new(Ok(Vec::new())),
            source_calls: AtomicUsize::new(0),
            status_calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn with_search(self, res: Result<Vec<SearchResult>, FetchError>) -> Self {
        *self.search.lock().unwrap() = res;
        self
    }

    pub fn with_sources(self, res: Result<Vec<Source>, FetchError>) -> Self {
        *self.sources.lock().unwrap() = res;
        self
    }

    pub fn with_status(self, res: Result<IngestStatus, FetchError>) -> Self {
        *self.status.lock().unwrap() = res;
        self
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn source_calls(&self) -> usize {
        self.source_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Backend for StubBackend {
    async fn fetch_sources(&self) -> Result<Vec<Source>, FetchError> {
        self.source_calls.fetch_add(1, Ordering::SeqCst);
        self.sources.lock().unwrap().clone()
    }

    async fn fetch_ingest_status(&self) -> Result<IngestStatus, FetchError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.status.lock().unwrap().clone()
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, FetchError> {
        self.queries.lock().unwrap().push(query.to_string());
        self.search.lock().unwrap().clone()
    }
}

pub fn sample_sources() -> Vec<Source> {
    vec![
        Source {
            uid: "digikey".into(),
            name: "Digi-Key".into(),
            last_ingested: Utc.with_ymd_and_hms(2025, 5, 2, 9, 30, 0).unwrap(),
        },
        Source {
            uid: "lcsc".into(),
            name: "LCSC".into(),
            last_ingested: Utc.timestamp_opt(0, 0).unwrap(),
        },
    ]
}

pub fn sample_status() -> IngestStatus {
    IngestStatus {
        next_sources: vec![
            ScheduledSource {
                uid: "lcsc".into(),
                scheduled_at: Utc.with_ymd_and_hms(2025, 5, 2, 10, 0, 0).unwrap(),
            },
            ScheduledSource {
                uid: "digikey".into(),
                scheduled_at: Utc.with_ymd_and_hms(2025, 5, 2, 11, 0, 0).unwrap(),
            },
        ],
    }
}

/// Backend whose requests never finish, for checking that views stay responsive.
pub struct HangingBackend;

#[async_trait::async_trait]
impl Backend for HangingBackend {
    async fn fetch_sources(&self) -> Result<Vec<Source>, FetchError> {
        std::future::pending().await
    }

    async fn fetch_ingest_status(&self) -> Result<IngestStatus, FetchError> {
        std::future::pending().await
    }

    async fn search(&self, _query: &str) -> Result<Vec<SearchResult>, FetchError> {
        std::future::pending().await
    }
}
