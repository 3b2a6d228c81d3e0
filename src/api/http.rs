// src/api/http.rs
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use metrics::{counter, histogram};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use super::error::MSG_NO_BODY;
use super::{Backend, FetchError, PATH_INGEST_STATUS, PATH_SEARCH, PATH_SOURCES};
use crate::config::ConsoleConfig;
use crate::model::{IngestStatus, SearchRequest, SearchResult, Source};

const STATUS_TEXT_MAX: usize = 200;

/// reqwest-backed client for the kcdb HTTP API.
#[derive(Clone)]
pub struct HttpBackend {
    http: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(cfg: &ConsoleConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("kcdb-console/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
            .timeout(Duration::from_secs(cfg.request_timeout_secs))
            .build()
            .context("building reqwest client")?;
        Ok(Self::with_client(http, &cfg.base_url))
    }

    pub fn with_client(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &'static str) -> Result<T, FetchError> {
        let t0 = Instant::now();
        let sent = self.http.get(self.url(path)).send().await;
        observe(path, t0, decode(sent).await)
    }

    async fn post_json<B, T>(&self, path: &'static str, body: &B) -> Result<T, FetchError>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let t0 = Instant::now();
        let sent = self.http.post(self.url(path)).json(body).send().await;
        observe(path, t0, decode(sent).await)
    }
}

#[async_trait::async_trait]
impl Backend for HttpBackend {
    async fn fetch_sources(&self) -> Result<Vec<Source>, FetchError> {
        self.get_json(PATH_SOURCES).await
    }

    async fn fetch_ingest_status(&self) -> Result<IngestStatus, FetchError> {
        self.get_json(PATH_INGEST_STATUS).await
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, FetchError> {
        self.post_json(PATH_SEARCH, &SearchRequest { query }).await
    }
}

/// Turn a send outcome into a typed body or a classified error.
async fn decode<T: DeserializeOwned>(
    sent: reqwest::Result<Response>,
) -> Result<T, FetchError> {
    let resp = sent.map_err(|e| FetchError::network(e.to_string()))?;
    let status = resp.status();
    let body = resp
        .bytes()
        .await
        .map_err(|e| FetchError::network(format!("reading body: {e}")))?;
    let empty = body.iter().all(u8::is_ascii_whitespace);

    if !status.is_success() {
        if empty {
            return Err(FetchError::EmptyBody {
                status: status.as_u16(),
            });
        }
        return Err(FetchError::Status {
            status: status.as_u16(),
            status_text: status_text(status, &body),
        });
    }

    if empty {
        return Err(FetchError::EmptyBody {
            status: status.as_u16(),
        });
    }
    serde_json::from_slice(&body).map_err(|e| FetchError::Malformed {
        status: status.as_u16(),
        detail: e.to_string(),
    })
}

/// Reason phrase for well-known codes, otherwise what the server wrote.
fn status_text(status: reqwest::StatusCode, body: &[u8]) -> String {
    if let Some(reason) = status.canonical_reason() {
        return reason.to_string();
    }
    let text = String::from_utf8_lossy(body);
    let text: String = text.trim().chars().take(STATUS_TEXT_MAX).collect();
    if text.is_empty() {
        MSG_NO_BODY.to_string()
    } else {
        text
    }
}

fn observe<T>(
    endpoint: &'static str,
    t0: Instant,
    res: Result<T, FetchError>,
) -> Result<T, FetchError> {
    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    counter!("console_requests_total", "endpoint" => endpoint).increment(1);
    histogram!("console_request_ms", "endpoint" => endpoint).record(ms);
    match &res {
        Ok(_) => tracing::debug!(target: "api", endpoint, ms, "request ok"),
        Err(e) => {
            counter!("console_request_errors_total", "endpoint" => endpoint).increment(1);
            tracing::warn!(target: "api", endpoint, status = e.status(), error = %e, "request failed");
        }
    }
    res
}
