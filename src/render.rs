// src/render.rs
//! Plain-text rendering of the two pages.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};

use crate::search::SearchView;
use crate::sources::{is_due_at, is_up, SourcesSnapshot};

const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Sources table. `now` decides which schedule entries are already due.
pub fn render_sources(snap: &SourcesSnapshot, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    if snap.loading {
        out.push_str("loading...\n");
    }
    if let Some(e) = &snap.error {
        let _ = writeln!(out, "error [{}]: {}", e.code(), e.explanation());
    }

    let _ = writeln!(out, "{:<2} {:<16} {:<28} {:<24}", "", "SOURCE", "NAME", "LAST INGESTED");
    for src in &snap.sources {
        let marker = if snap.is_next_to_ingest(&src.uid) { ">" } else { "" };
        let last = if is_up(src.last_ingested) {
            src.last_ingested.format(TS_FORMAT).to_string()
        } else {
            "never".to_string()
        };
        let _ = writeln!(out, "{marker:<2} {:<16} {:<28} {last:<24}", src.uid, src.name);
    }

    if let Some(status) = &snap.ingest_status {
        out.push_str("\nnext ingestions:\n");
        if status.next_sources.is_empty() {
            out.push_str("  (none scheduled)\n");
        }
        for entry in &status.next_sources {
            let due = if is_due_at(entry.scheduled_at, now) {
                " (due now)"
            } else {
                ""
            };
            let _ = writeln!(
                out,
                "  {:<16} {}{due}",
                entry.uid,
                entry.scheduled_at.format(TS_FORMAT)
            );
        }
    }
    out
}

/// Result list, or the error header when the last search failed.
pub fn render_search(view: &SearchView) -> String {
    let mut out = String::new();
    if view.is_loading() {
        out.push_str("searching...\n");
    }
    if let Some(hint) = view.query_hint() {
        let _ = writeln!(out, "hint: {hint}");
    }
    if let (Some(code), Some(msg)) = (view.error_code(), view.error_message()) {
        let _ = writeln!(out, "error [{code}]: {msg}");
        return out;
    }
    if view.results().is_empty() {
        out.push_str("no results\n");
        return out;
    }
    for (i, r) in view.results().iter().enumerate() {
        let _ = writeln!(out, "{:>3}. {}", i + 1, r.title());
    }
    out
}

/// Decides when the sources table is worth printing again: a page entry
/// publishes several intermediate snapshots (loading, sources, status) and
/// only settled, changed ones are drawn.
#[derive(Debug, Default)]
pub struct SourcesRedraw {
    last: Option<SourcesSnapshot>,
}

impl SourcesRedraw {
    pub fn should_draw(&mut self, snap: &SourcesSnapshot) -> bool {
        if snap.loading || self.last.as_ref() == Some(snap) {
            return false;
        }
        self.last = Some(snap.clone());
        true
    }

    /// Forget the last drawn table so the next settled snapshot is printed.
    pub fn reset(&mut self) {
        self.last = None;
    }
}
