// src/model.rs
//! Records exchanged with the kcdb backend.
//!
//! Field names belong to the backend API; aliases cover the spellings seen for
//! the same fields so a renamed column does not blank the console.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A content source known to the ingestor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Source {
    #[serde(deserialize_with = "de_uid")]
    pub uid: String,
    #[serde(alias = "label", default)]
    pub name: String,
    /// Epoch start means "never ingested".
    #[serde(alias = "last_updated", alias = "updated_at")]
    pub last_ingested: DateTime<Utc>,
}

impl Source {
    pub fn is_up(&self) -> bool {
        crate::sources::is_up(self.last_ingested)
    }
}

/// One upcoming ingestion slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScheduledSource {
    #[serde(deserialize_with = "de_uid")]
    pub uid: String,
    #[serde(alias = "at", alias = "next_run")]
    pub scheduled_at: DateTime<Utc>,
}

/// Ingestor schedule, first entry is the next one to run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngestStatus {
    #[serde(alias = "next", default)]
    pub next_sources: Vec<ScheduledSource>,
}

impl IngestStatus {
    pub fn next(&self) -> Option<&ScheduledSource> {
        self.next_sources.first()
    }
}

/// A search hit. Its shape is owned by the backend, so it stays raw JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct SearchResult(pub serde_json::Value);

impl SearchResult {
    /// Best-effort one-line title for terminal output.
    pub fn title(&self) -> String {
        for key in ["name", "title", "part_number", "uid", "id"] {
            match self.0.get(key) {
                Some(serde_json::Value::String(s)) if !s.is_empty() => return s.clone(),
                Some(serde_json::Value::Number(n)) => return n.to_string(),
                _ => {}
            }
        }
        self.0.to_string()
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SearchRequest<'a> {
    pub query: &'a str,
}

/// The epoch start is the backend's "never ingested" marker.
pub fn is_never_ingested(ts: DateTime<Utc>) -> bool {
    ts.timestamp() == 0 && ts.timestamp_subsec_nanos() == 0
}

// uids arrive as strings or integers depending on the backend version
fn de_uid<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Uid {
        Text(String),
        Int(i64),
    }
    Ok(match Uid::deserialize(d)? {
        Uid::Text(s) => s,
        Uid::Int(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_accepts_numeric_uid_and_label_alias() {
        let s: Source = serde_json::from_str(
            r#"{"uid": 7, "label": "Digikey", "last_updated": "2024-03-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(s.uid, "7");
        assert_eq!(s.name, "Digikey");
        assert!(s.is_up());
    }

    #[test]
    fn epoch_source_is_not_up() {
        let s: Source = serde_json::from_str(
            r#"{"uid": "a", "name": "x", "last_ingested": "1970-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert!(!s.is_up());
    }

    #[test]
    fn status_without_next_sources_is_empty() {
        let st: IngestStatus = serde_json::from_str("{}").unwrap();
        assert!(st.next().is_none());
    }

    #[test]
    fn result_title_prefers_name() {
        let r = SearchResult(serde_json::json!({"id": 3, "name": "LM358"}));
        assert_eq!(r.title(), "LM358");
        let r = SearchResult(serde_json::json!({"id": 3}));
        assert_eq!(r.title(), "3");
    }
}
