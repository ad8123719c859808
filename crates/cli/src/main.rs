//! Tamarind CLI - storefront and admin client from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalogue (works anonymously)
//! tam-cli catalog products --search shirt
//! tam-cli catalog sections
//!
//! # Cart survives between invocations via the local state file
//! tam-cli cart add 42 --qty 2 --size M
//! tam-cli cart list
//!
//! # Login merges the local cart with the account's server-side cart
//! tam-cli auth login -e me@example.com -p secret
//!
//! # Checkout and fetch the receipt
//! tam-cli order create --address 3
//! tam-cli order receipt 17 --out receipt.pdf
//!
//! # Admin surface (credentials from TAMARIND_ADMIN_EMAIL/_PASSWORD)
//! tam-cli admin stats
//! tam-cli admin products upload ./products.csv
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]
// Terminal output is this binary's job.
#![allow(clippy::print_stdout)]

use clap::Parser;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tamarind_storefront::StorefrontConfig;

mod commands;

use commands::Cli;

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Sentry init needs the config, and must precede the subscriber.
    let config = StorefrontConfig::from_env();
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tam_cli=info,tamarind_storefront=warn,tamarind_admin=warn".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if let Err(e) = commands::run(cli, config).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}
