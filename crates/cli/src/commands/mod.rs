//! CLI command definitions and dispatch.

pub mod address;
pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod order;
pub mod wishlist;

use clap::{Parser, Subcommand};

use tamarind_storefront::config::ConfigError;
use tamarind_storefront::{StorefrontConfig, StorefrontSession};

/// Boxed error for command dispatch; each command surfaces its own error
/// type through it.
pub type CliError = Box<dyn std::error::Error>;

#[derive(Parser)]
#[command(name = "tam-cli")]
#[command(author, version, about = "Tamarind commerce CLI")]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse products and sections
    Catalog {
        #[command(subcommand)]
        action: catalog::CatalogAction,
    },
    /// Login, registration, and session info
    Auth {
        #[command(subcommand)]
        action: auth::AuthAction,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: cart::CartAction,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: wishlist::WishlistAction,
    },
    /// Manage delivery addresses
    Address {
        #[command(subcommand)]
        action: address::AddressAction,
    },
    /// View and place orders
    Order {
        #[command(subcommand)]
        action: order::OrderAction,
    },
    /// Back-office operations
    Admin {
        #[command(subcommand)]
        action: admin::AdminAction,
    },
}

/// Build a customer session, restoring persisted local state.
async fn session(config: Result<StorefrontConfig, ConfigError>) -> Result<StorefrontSession, CliError> {
    let config = config?;
    Ok(StorefrontSession::new(&config).await?)
}

/// Dispatch the parsed command.
///
/// # Errors
///
/// Returns the failing command's error; `main` logs it and exits non-zero.
pub async fn run(cli: Cli, config: Result<StorefrontConfig, ConfigError>) -> Result<(), CliError> {
    match cli.command {
        Commands::Catalog { action } => catalog::run(&session(config).await?, action).await,
        Commands::Auth { action } => auth::run(&session(config).await?, action).await,
        Commands::Cart { action } => cart::run(&session(config).await?, action).await,
        Commands::Wishlist { action } => wishlist::run(&session(config).await?, action).await,
        Commands::Address { action } => address::run(&session(config).await?, action).await,
        Commands::Order { action } => order::run(&session(config).await?, action).await,
        Commands::Admin { action } => admin::run(action).await,
    }
}
