// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod config;
pub mod model;
pub mod page;
pub mod query;
pub mod render;
pub mod search;
pub mod sources;
pub mod telemetry;

// ---- Re-exports for stable public API ----
pub use crate::api::{Backend, DynBackend, FetchError, HttpBackend};
pub use crate::config::ConsoleConfig;
pub use crate::page::{Navigator, Page, PageBus, PageChanged};
pub use crate::search::SearchView;
pub use crate::sources::{SourcesSnapshot, StatusPoller};
