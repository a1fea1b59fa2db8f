//! Logging setup for the `circbuf` binary.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the binary. Output goes to stderr so stdout stays clean for reports.

use std::sync::Once;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing only when `RUST_LOG` is set, keeping normal runs quiet.
pub fn init_tracing() {
    if let Ok(filter) = std::env::var("RUST_LOG") {
        init_tracing_with_filter(&filter);
    }
}

/// Initialize tracing for `--verbose` runs
pub fn init_tracing_verbose() {
    init_tracing_with_filter("circbuf=debug,info")
}

/// Initialize with custom filter string
pub fn init_tracing_with_filter(filter: &str) {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_file(false)
            .with_line_number(false)
            .with_level(true)
            .compact()
            .with_writer(std::io::stderr);

        let filter_layer = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));

        let _ = tracing_subscriber::registry()
            .with(filter_layer)
            .with(fmt_layer)
            .try_init();
    });
}
