// src/telemetry.rs
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const ENV_LOG_FORMAT: &str = "KCDB_LOG_FORMAT";
/// Must name every target the crate logs under (`api`, `poller`, `search`, `console`).
pub const DEFAULT_FILTER: &str = "api=info,poller=info,search=info,console=info,warn";

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. Logs go to stderr; stdout is for the console
/// itself. `RUST_LOG` overrides the default filter, `KCDB_LOG_FORMAT=json`
/// switches to JSON lines.
pub fn init_tracing() {
    let json = std::env::var(ENV_LOG_FORMAT)
        .ok()
        .is_some_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(default_filter());
    let res = if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init()
    };
    if let Err(e) = res {
        eprintln!("tracing already initialized: {e}");
    }
}
