// src/sources/poller.rs
//! Sources page view model and its page-aware status refresh.
//!
//! Fetches run as spawned tasks and report back through a completion channel,
//! so the loop in [`StatusPoller::run`] keeps reacting to page changes while a
//! request is in flight. Completions are applied even if the page has changed
//! since they were issued.

use std::time::Duration;

use metrics::counter;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

use crate::api::{DynBackend, FetchError};
use crate::model::{IngestStatus, Source};
use crate::page::{Page, PageChanged};

pub const DEFAULT_STATUS_INTERVAL: Duration = Duration::from_secs(23);

/// Whether the recurring status refresh is armed.
#[derive(Debug)]
pub enum PollState {
    Idle,
    Polling { interval: Interval },
}

impl PollState {
    pub fn is_polling(&self) -> bool {
        matches!(self, PollState::Polling { .. })
    }
}

/// What a page change did to the poll state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollTransition {
    Started,
    AlreadyPolling,
    Stopped,
    AlreadyIdle,
}

/// Result of a background fetch, applied back on the view's loop.
#[derive(Debug)]
pub enum Completion {
    Sources(Result<Vec<Source>, FetchError>),
    Status(Result<IngestStatus, FetchError>),
}

/// Everything the sources page renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourcesSnapshot {
    pub loading: bool,
    pub sources: Vec<Source>,
    pub ingest_status: Option<IngestStatus>,
    pub error: Option<FetchError>,
    pub polling: bool,
}

impl SourcesSnapshot {
    pub fn is_next_to_ingest(&self, uid: &str) -> bool {
        super::is_next_in(self.ingest_status.as_ref(), uid)
    }
}

pub struct StatusPoller {
    backend: DynBackend,
    period: Duration,
    poll: PollState,
    view: SourcesSnapshot,
    done_tx: mpsc::UnboundedSender<Completion>,
    done_rx: mpsc::UnboundedReceiver<Completion>,
    publish: watch::Sender<SourcesSnapshot>,
}

impl StatusPoller {
    pub fn new(backend: DynBackend, period: Duration) -> Self {
        let (done_tx, done_rx) = mpsc::unbounded_channel();
        let (publish, _) = watch::channel(SourcesSnapshot::default());
        Self {
            backend,
            period,
            poll: PollState::Idle,
            view: SourcesSnapshot::default(),
            done_tx,
            done_rx,
            publish,
        }
    }

    /// Receiver that sees every state change of this view.
    pub fn watch(&self) -> watch::Receiver<SourcesSnapshot> {
        self.publish.subscribe()
    }

    pub fn snapshot(&self) -> &SourcesSnapshot {
        &self.view
    }

    pub fn poll_state(&self) -> &PollState {
        &self.poll
    }

    pub fn is_polling(&self) -> bool {
        self.poll.is_polling()
    }

    pub fn is_next_to_ingest(&self, uid: &str) -> bool {
        self.view.is_next_to_ingest(uid)
    }

    /// Arm the refresh on the sources page, disarm it anywhere else.
    /// Entering the sources page always reloads the source list.
    pub fn on_page_changed(&mut self, page: &Page) -> PollTransition {
        let transition = if *page == Page::Sources {
            let t = if self.poll.is_polling() {
                PollTransition::AlreadyPolling
            } else {
                // First tick one period out; load_sources covers "now".
                let mut interval = time::interval_at(Instant::now() + self.period, self.period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                self.poll = PollState::Polling { interval };
                PollTransition::Started
            };
            self.load_sources();
            t
        } else if self.poll.is_polling() {
            self.poll = PollState::Idle;
            PollTransition::Stopped
        } else {
            PollTransition::AlreadyIdle
        };

        tracing::debug!(target: "poller", %page, ?transition, "page changed");
        self.view.polling = self.poll.is_polling();
        self.publish();
        transition
    }

    pub fn load_sources(&mut self) {
        self.view.loading = true;
        self.publish();
        let backend = self.backend.clone();
        let tx = self.done_tx.clone();
        tokio::spawn(async move {
            let res = backend.fetch_sources().await;
            let _ = tx.send(Completion::Sources(res));
        });
    }

    pub fn refresh_status(&mut self) {
        self.view.loading = true;
        self.publish();
        let backend = self.backend.clone();
        let tx = self.done_tx.clone();
        tokio::spawn(async move {
            let res = backend.fetch_ingest_status().await;
            let _ = tx.send(Completion::Status(res));
        });
    }

    /// Fold a finished fetch into the view. Prior data stays on failure.
    pub fn apply(&mut self, done: Completion) {
        match done {
            Completion::Sources(Ok(sources)) => {
                tracing::debug!(target: "poller", count = sources.len(), "sources loaded");
                self.view.sources = sources;
                self.refresh_status();
            }
            Completion::Status(Ok(status)) => {
                self.view.ingest_status = Some(status);
                self.view.loading = false;
            }
            Completion::Sources(Err(e)) | Completion::Status(Err(e)) => {
                tracing::warn!(target: "poller", error = %e, "sources page fetch failed");
                self.view.error = Some(e);
                self.view.loading = false;
            }
        }
        self.publish();
    }

    /// Wait for the next in-flight fetch and apply it.
    /// Returns `false` if nothing can arrive anymore.
    pub async fn process_next(&mut self) -> bool {
        match self.done_rx.recv().await {
            Some(done) => {
                self.apply(done);
                true
            }
            None => false,
        }
    }

    /// Event loop: page changes, refresh ticks and fetch completions.
    /// Ends when the page bus closes.
    pub async fn run(mut self, mut pages: broadcast::Receiver<PageChanged>) {
        loop {
            tokio::select! {
                ev = pages.recv() => match ev {
                    Ok(PageChanged { page }) => {
                        self.on_page_changed(&page);
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(target: "poller", skipped = n, "page events lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
                _ = next_tick(&mut self.poll) => {
                    counter!("console_status_polls_total").increment(1);
                    self.refresh_status();
                }
                Some(done) = self.done_rx.recv() => self.apply(done),
            }
        }
        tracing::debug!(target: "poller", "page bus closed, poller stopped");
    }

    fn publish(&self) {
        self.publish.send_replace(self.view.clone());
    }
}

async fn next_tick(poll: &mut PollState) {
    match poll {
        PollState::Polling { interval } => {
            interval.tick().await;
        }
        PollState::Idle => std::future::pending::<()>().await,
    }
}
