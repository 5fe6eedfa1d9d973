//! Folio CLI Library
//!
//! Backs the `folio` binary: the HTTP server plus the offline commands.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (serve, sitemap, check)
//! - [`server`] - axum router and request handlers

pub mod cmd;
pub mod server;

pub use folio_core::{Config, Mode};
pub use server::{AppState, create_router};

/// Initialize tracing with the specified verbosity level.
///
/// `verbose` maps 0 to WARN, 1 to INFO, 2 to DEBUG and anything higher to TRACE.
/// `RUST_LOG` directives still apply on top.
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
