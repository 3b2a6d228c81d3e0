// src/sources/freshness.rs
use chrono::{DateTime, Utc};

use crate::model::{is_never_ingested, IngestStatus};

/// False only for the "never ingested" epoch marker.
pub fn is_up(last_ingested: DateTime<Utc>) -> bool {
    !is_never_ingested(last_ingested)
}

/// Has the scheduled ingestion time already passed?
pub fn is_due_now(scheduled: DateTime<Utc>) -> bool {
    is_due_at(scheduled, Utc::now())
}

pub fn is_due_at(scheduled: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now > scheduled
}

/// True when `uid` heads the ingestor's queue.
pub fn is_next_in(status: Option<&IngestStatus>, uid: &str) -> bool {
    status
        .and_then(IngestStatus::next)
        .is_some_and(|next| next.uid == uid)
}
