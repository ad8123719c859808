//! Authentication commands.

use clap::Subcommand;

use tamarind_core::Email;
use tamarind_storefront::StorefrontSession;
use tamarind_storefront::api::types::NewUser;

use super::CliError;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Log in; the local cart and wishlist merge into the account
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Register a new account
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,

        /// Phone number
        #[arg(long)]
        phone: Option<String>,
    },
    /// Log out and drop local per-account state
    Logout,
    /// Show the logged-in user
    Whoami,
}

pub async fn run(session: &StorefrontSession, action: AuthAction) -> Result<(), CliError> {
    match action {
        AuthAction::Login { email, password } => {
            let email = Email::parse(&email)?;
            let user = session.login(&email, &password).await?;
            println!("Logged in as {} <{}>", user.name, user.email);
            println!(
                "Cart: {} items, wishlist: {} items after merge",
                session.cart().item_count().await,
                session.wishlist().len().await
            );
        }
        AuthAction::Register {
            name,
            email,
            password,
            phone,
        } => {
            let new_user = NewUser {
                name,
                email: Email::parse(&email)?,
                password,
                phone,
            };
            let user = session.register(&new_user).await?;
            println!("Registered {} <{}>", user.name, user.email);
            if !session.is_authenticated().await {
                println!("Check your inbox to verify the account, then login.");
            }
        }
        AuthAction::Logout => {
            session.logout().await?;
            println!("Logged out.");
        }
        AuthAction::Whoami => {
            if session.is_authenticated().await {
                let user = session.resume().await?;
                println!("{} <{}> ({:?})", user.name, user.email, user.role);
            } else {
                println!("Not logged in.");
            }
        }
    }

    Ok(())
}
