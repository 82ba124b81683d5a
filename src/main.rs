//! pinsort - parcel scan logging and PIN-code reconciliation.
//!
//! Logs parcels scanned by a postal operator, cross-checks extracted
//! delivery addresses against a PIN-code reference to flag misrouted mail,
//! and compiles verified scans into exportable manifests.

mod cli;
mod config;
mod export;
mod extraction;
mod models;
mod postal;
mod recognition;
mod retry;
mod services;
mod session;
mod storage;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    // Initialize logging based on verbosity
    let default_filter = if cli::is_verbose() {
        "pinsort=info"
    } else {
        "pinsort=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Run CLI
    cli::run().await
}
