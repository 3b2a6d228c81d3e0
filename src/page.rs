// src/page.rs
//! Page switching: the console's views share one `PageBus` and react to
//! `PageChanged` events instead of polling a global "current page".

use std::fmt;
use std::str::FromStr;

use tokio::sync::broadcast;

/// Buffered events per subscriber before the slowest one starts lagging.
const BUS_CAPACITY: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Page {
    Search,
    Sources,
    Other(String),
}

impl Page {
    pub fn as_str(&self) -> &str {
        match self {
            Page::Search => "search",
            Page::Sources => "sources",
            Page::Other(s) => s,
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Page {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "search" => Page::Search,
            "sources" => Page::Sources,
            other => Page::Other(other.to_string()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageChanged {
    pub page: Page,
}

/// Cloneable handle to the page-change broadcast.
#[derive(Clone)]
pub struct PageBus {
    tx: broadcast::Sender<PageChanged>,
}

impl Default for PageBus {
    fn default() -> Self {
        Self::new()
    }
}

impl PageBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BUS_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PageChanged> {
        self.tx.subscribe()
    }

    /// Returns how many subscribers saw the event. Zero is not an error.
    pub fn publish(&self, page: Page) -> usize {
        self.tx.send(PageChanged { page }).unwrap_or(0)
    }
}

/// Tracks which page is on screen and announces switches.
pub struct Navigator {
    current: Page,
    bus: PageBus,
}

impl Navigator {
    pub fn new(bus: PageBus) -> Self {
        Self {
            current: Page::Search,
            bus,
        }
    }

    pub fn current(&self) -> &Page {
        &self.current
    }

    pub fn change_page(&mut self, page: Page) {
        tracing::debug!(target: "console", from = %self.current, to = %page, "page change");
        self.current = page.clone();
        self.bus.publish(page);
    }
}
