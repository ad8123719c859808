//! Wishlist commands.

use clap::Subcommand;

use tamarind_core::ProductId;
use tamarind_storefront::StorefrontSession;

use super::CliError;

#[derive(Subcommand)]
pub enum WishlistAction {
    /// Show the wishlist
    List,
    /// Add a product
    Add {
        /// Product id
        product_id: i32,
    },
    /// Remove a product
    Remove {
        /// Product id
        product_id: i32,
    },
}

pub async fn run(session: &StorefrontSession, action: WishlistAction) -> Result<(), CliError> {
    let wishlist = session.wishlist();

    match action {
        WishlistAction::List => {
            let entries = wishlist.snapshot().await;
            if entries.is_empty() {
                println!("Wishlist is empty.");
                return Ok(());
            }
            for entry in &entries {
                println!(
                    "{:>6}  {:<40}  {:>10}",
                    entry.product.id, entry.product.title, entry.product.price
                );
            }
        }
        WishlistAction::Add { product_id } => {
            let product = session.catalog().product(ProductId::new(product_id)).await?;
            wishlist.add((*product).clone()).await?;
            session.save_state().await?;
            println!("Added to wishlist ({} items).", wishlist.len().await);
        }
        WishlistAction::Remove { product_id } => {
            wishlist.remove(ProductId::new(product_id)).await?;
            session.save_state().await?;
            println!("Removed from wishlist ({} items).", wishlist.len().await);
        }
    }

    Ok(())
}
