// src/api/mod.rs
//! Backend access: the `Backend` seam used by the views plus its HTTP implementation.

pub mod error;
pub mod http;

use crate::model::{IngestStatus, SearchResult, Source};

pub use error::FetchError;
pub use http::HttpBackend;

pub const PATH_SOURCES: &str = "/sources/all";
pub const PATH_INGEST_STATUS: &str = "/ingestor/status";
pub const PATH_SEARCH: &str = "/search/all";

/// The three calls the console makes against kcdb.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    async fn fetch_sources(&self) -> Result<Vec<Source>, FetchError>;
    async fn fetch_ingest_status(&self) -> Result<IngestStatus, FetchError>;
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, FetchError>;
}

/// Convenient alias used by the views.
pub type DynBackend = std::sync::Arc<dyn Backend>;
