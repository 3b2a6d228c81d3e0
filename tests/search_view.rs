// tests/search_view.rs
//
// Search page view model against a scripted backend.

mod common;

use std::sync::Arc;

use std::time::Duration;

use common::{HangingBackend, StubBackend};
use kcdb_console::api::FetchError;
use kcdb_console::model::SearchResult;
use kcdb_console::query::QueryError;
use kcdb_console::render::render_search;
use kcdb_console::SearchView;
use serde_json::json;

fn two_hits() -> Vec<SearchResult> {
    vec![
        SearchResult(json!({"id": 1, "name": "LM358 dual opamp"})),
        SearchResult(json!({"id": 2, "name": "LM324 quad opamp"})),
    ]
}

#[tokio::test]
async fn successful_search_replaces_results() {
    let backend = Arc::new(StubBackend::healthy().with_search(Ok(two_hits())));
    let mut view = SearchView::new(backend.clone());

    view.search("foo").await;

    assert_eq!(view.results().len(), 2);
    assert!(!view.is_loading());
    assert!(view.error().is_none());
    assert_eq!(view.error_code(), None);
    assert_eq!(view.error_message(), None);
    assert_eq!(view.query(), "foo");
    assert_eq!(*backend.queries.lock().unwrap(), vec!["foo".to_string()]);
}

#[tokio::test]
async fn network_failure_is_reported_as_offline() {
    let backend = Arc::new(StubBackend::healthy().with_search(Err(FetchError::network("refused"))));
    let mut view = SearchView::new(backend);

    view.search("foo").await;

    assert!(!view.is_loading());
    assert_eq!(view.error().map(FetchError::status), Some(-1));
    assert_eq!(view.error_code().as_deref(), Some("N/A"));
    assert_eq!(
        view.error_message().as_deref(),
        Some("Network Error or server offline")
    );
}

#[tokio::test]
async fn http_error_keeps_previous_results() {
    let backend = Arc::new(StubBackend::healthy().with_search(Ok(two_hits())));
    let mut view = SearchView::new(backend.clone());
    view.search("lm358").await;
    assert_eq!(view.results().len(), 2);

    *backend.search.lock().unwrap() = Err(FetchError::Status {
        status: 500,
        status_text: "Internal Server Error".into(),
    });
    view.search("lm358 pc=x").await;

    assert_eq!(view.results().len(), 2, "no rollback of prior data");
    assert_eq!(view.error_code().as_deref(), Some("500"));
    assert_eq!(view.error_message().as_deref(), Some("Internal Server Error"));
}

#[tokio::test]
async fn empty_body_gets_generic_problem_message() {
    let backend = Arc::new(StubBackend::healthy().with_search(Err(FetchError::EmptyBody { status: 502 })));
    let mut view = SearchView::new(backend);

    view.search("foo").await;

    assert_eq!(view.error_code().as_deref(), Some("502"));
    assert_eq!(
        view.error_message().as_deref(),
        Some("The server encountered a problem handling the request")
    );
}

#[tokio::test]
async fn next_search_clears_previous_error() {
    let backend = Arc::new(StubBackend::healthy().with_search(Err(FetchError::network("down"))));
    let mut view = SearchView::new(backend.clone());
    view.search("foo").await;
    assert!(view.error().is_some());

    *backend.search.lock().unwrap() = Ok(two_hits());
    view.search("foo").await;
    assert!(view.error().is_none());
    assert_eq!(view.results().len(), 2);
}

#[tokio::test]
async fn query_hint_flags_missing_keywords_but_still_sends() {
    let backend = Arc::new(StubBackend::healthy());
    let mut view = SearchView::new(backend.clone());

    view.search("pc=8").await;

    assert_eq!(view.query_hint(), Some(QueryError::NoKeywords));
    assert_eq!(backend.queries.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn begin_search_returns_while_request_is_pending() {
    let mut view = SearchView::new(Arc::new(HangingBackend));

    view.begin_search("lm358");

    assert!(view.is_loading());
    assert!(view.error().is_none());
    assert!(render_search(&view).contains("searching..."));
    let waited = tokio::time::timeout(Duration::from_millis(50), view.process_next()).await;
    assert!(waited.is_err(), "no completion while the backend hangs");
    assert!(view.is_loading());
}

#[tokio::test]
async fn loading_is_visible_until_completion_is_applied() {
    let backend = Arc::new(StubBackend::healthy().with_search(Ok(two_hits())));
    let mut view = SearchView::new(backend);

    view.begin_search("foo");
    assert!(view.is_loading());
    assert!(view.results().is_empty());

    assert!(view.process_next().await);
    assert!(!view.is_loading());
    assert_eq!(view.results().len(), 2);
    assert!(!render_search(&view).contains("searching..."));
}

#[tokio::test]
async fn overlapping_searches_stay_loading_until_the_last_one_lands() {
    let backend = Arc::new(StubBackend::healthy().with_search(Ok(two_hits())));
    let mut view = SearchView::new(backend);

    view.begin_search("lm358");
    view.begin_search("lm324");
    assert!(view.process_next().await);
    assert!(view.is_loading());
    assert!(view.process_next().await);
    assert!(!view.is_loading());
    assert_eq!(view.query(), "lm324");
}
