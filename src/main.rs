//! kcdb console: binary entrypoint.
//! Loads config, wires the backend client into the search and sources views,
//! and renders them on the terminal.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use kcdb_console::api::{DynBackend, HttpBackend};
use kcdb_console::config::ConsoleConfig;
use kcdb_console::page::{Navigator, Page, PageBus};
use kcdb_console::render::{render_search, render_sources, SourcesRedraw};
use kcdb_console::search::SearchView;
use kcdb_console::sources::StatusPoller;
use kcdb_console::telemetry;

#[derive(Debug, Parser)]
#[command(name = "kcdb-console", version, about = "Search kcdb and watch source ingestion")]
struct Cli {
    /// Override the backend base URL from config / KCDB_BASE_URL.
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    cmd: Option<Cmd>,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Run one search and print the results.
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Print sources with their ingestion state once.
    Sources,
    /// Interactive console (default).
    Console,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    telemetry::init_tracing();

    let cli = Cli::parse();
    let mut cfg = ConsoleConfig::load_default().context("loading console config")?;
    if let Some(url) = cli.base_url {
        cfg.base_url = url.trim_end_matches('/').to_string();
    }
    tracing::info!(
        target: "console",
        base_url = %cfg.base_url,
        status_interval_secs = cfg.status_interval_secs,
        "config loaded"
    );

    let backend: DynBackend = Arc::new(HttpBackend::new(&cfg)?);

    match cli.cmd.unwrap_or(Cmd::Console) {
        Cmd::Search { query } => {
            let mut view = SearchView::new(backend);
            view.search(&query.join(" ")).await;
            print!("{}", render_search(&view));
        }
        Cmd::Sources => {
            let mut poller = StatusPoller::new(backend, cfg.status_interval());
            poller.load_sources();
            while poller.snapshot().loading {
                if !poller.process_next().await {
                    break;
                }
            }
            print!("{}", render_sources(poller.snapshot(), Utc::now()));
        }
        Cmd::Console => run_console(backend, &cfg).await?,
    }
    Ok(())
}

const HELP: &str = "commands: :search  :sources  :quit   (on the search page, any other line is a query)";

async fn run_console(backend: DynBackend, cfg: &ConsoleConfig) -> Result<()> {
    let bus = PageBus::new();
    let poller = StatusPoller::new(backend.clone(), cfg.status_interval());
    let mut snaps = poller.watch();
    let poller_task = tokio::spawn(poller.run(bus.subscribe()));

    let mut nav = Navigator::new(bus.clone());
    let mut search = SearchView::new(backend);
    let mut redraw = SourcesRedraw::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    println!("{HELP}");
    println!("[{}]", nav.current());

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("reading stdin")? else { break };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if matches!(line, ":quit" | ":q") {
                    break;
                }
                if let Some(page) = line.strip_prefix(':') {
                    let page: Page = match page.parse() {
                        Ok(p) => p,
                        Err(never) => match never {},
                    };
                    nav.change_page(page);
                    println!("[{}]", nav.current());
                    match nav.current() {
                        Page::Search => print!("{}", render_search(&search)),
                        Page::Sources => redraw.reset(),
                        Page::Other(_) => {}
                    }
                    continue;
                }
                if *nav.current() == Page::Search {
                    search.begin_search(line);
                    print!("{}", render_search(&search));
                } else {
                    println!("{HELP}");
                }
            }
            changed = snaps.changed() => {
                if changed.is_err() {
                    break;
                }
                let snap = snaps.borrow_and_update().clone();
                if *nav.current() == Page::Sources && redraw.should_draw(&snap) {
                    print!("{}", render_sources(&snap, Utc::now()));
                }
            }
            Some(done) = search.next_completion() => {
                search.apply(done);
                if *nav.current() == Page::Search {
                    print!("{}", render_search(&search));
                }
            }
            _ = &mut ctrl_c => break,
        }
    }

    // Dropping every sender closes the bus and ends the poller loop.
    drop(nav);
    drop(bus);
    poller_task.await.context("joining status poller")?;
    Ok(())
}
