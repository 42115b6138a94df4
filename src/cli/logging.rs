//! stderr logging setup

use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

use crate::cli::GlobalOpts;
use crate::core::Config;

/// Install the global subscriber
///
/// `--verbose`/`--quiet` pin the level. Otherwise `RUST_LOG` directives apply
/// on top of the configured level, which defaults to `warn`.
pub fn init(config: &Config, global: &GlobalOpts) {
    let filter = match forced_level(global) {
        Some(level) => EnvFilter::default().add_directive(level.into()),
        None => {
            let level = config
                .log_level
                .as_deref()
                .and_then(parse_level)
                .unwrap_or(LevelFilter::WARN);
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy()
        }
    };

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter);

    // A subscriber may already be installed when embedded in a test harness
    let _ = tracing_subscriber::registry().with(stderr_layer).try_init();
}

fn forced_level(global: &GlobalOpts) -> Option<LevelFilter> {
    if global.verbose {
        Some(LevelFilter::DEBUG)
    } else if global.quiet {
        Some(LevelFilter::ERROR)
    } else {
        None
    }
}

fn parse_level(s: &str) -> Option<LevelFilter> {
    match s.trim().to_lowercase().as_str() {
        "off" => Some(LevelFilter::OFF),
        "error" => Some(LevelFilter::ERROR),
        "warn" => Some(LevelFilter::WARN),
        "info" => Some(LevelFilter::INFO),
        "debug" => Some(LevelFilter::DEBUG),
        "trace" => Some(LevelFilter::TRACE),
        _ => None,
    }
}
