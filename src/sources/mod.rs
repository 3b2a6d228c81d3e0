// src/sources/mod.rs
//! Sources page: source list, ingestor schedule and freshness predicates.

pub mod freshness;
pub mod poller;

pub use freshness::{is_due_at, is_due_now, is_next_in, is_up};
pub use poller::{
    Completion, PollState, PollTransition, SourcesSnapshot, StatusPoller,
    DEFAULT_STATUS_INTERVAL,
};
