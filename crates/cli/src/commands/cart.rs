//! Cart commands.

use clap::Subcommand;

use tamarind_core::{CartLineKey, ProductId};
use tamarind_storefront::StorefrontSession;

use super::CliError;

#[derive(Subcommand)]
pub enum CartAction {
    /// Show the cart
    List,
    /// Add a product (or increase its quantity)
    Add {
        /// Product id
        product_id: i32,

        /// Quantity to add
        #[arg(short, long, default_value_t = 1)]
        qty: u32,

        /// Size variant
        #[arg(short, long)]
        size: Option<String>,

        /// Color variant
        #[arg(short, long)]
        color: Option<String>,
    },
    /// Remove a line
    Remove {
        /// Product id
        product_id: i32,

        /// Size variant of the line
        #[arg(short, long)]
        size: Option<String>,

        /// Color variant of the line
        #[arg(short, long)]
        color: Option<String>,
    },
    /// Set a line's quantity (0 removes it)
    SetQty {
        /// Product id
        product_id: i32,

        /// New quantity
        qty: u32,

        /// Size variant of the line
        #[arg(short, long)]
        size: Option<String>,

        /// Color variant of the line
        #[arg(short, long)]
        color: Option<String>,
    },
    /// Empty the cart
    Clear,
}

pub async fn run(session: &StorefrontSession, action: CartAction) -> Result<(), CliError> {
    let cart = session.cart();

    match action {
        CartAction::List => {
            let lines = cart.snapshot().await;
            if lines.is_empty() {
                println!("Cart is empty.");
                return Ok(());
            }
            for line in &lines {
                let variant = [line.size.as_deref(), line.color.as_deref()]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join("/");
                let variant = if variant.is_empty() {
                    String::new()
                } else {
                    format!(" [{variant}]")
                };
                println!(
                    "{:>3} x {:<40}{variant}  {:>10}",
                    line.quantity,
                    line.product.title,
                    line.total()
                );
            }
            println!("\nSubtotal: {}", cart.subtotal().await);
        }
        CartAction::Add {
            product_id,
            qty,
            size,
            color,
        } => {
            let product = session.catalog().product(ProductId::new(product_id)).await?;
            cart.add_item((*product).clone(), qty, size, color).await?;
            session.save_state().await?;
            println!("Added. Cart now holds {} items.", cart.item_count().await);
        }
        CartAction::Remove {
            product_id,
            size,
            color,
        } => {
            let key = CartLineKey::new(ProductId::new(product_id), size, color);
            cart.remove_item(&key).await?;
            session.save_state().await?;
            println!("Removed. Cart now holds {} items.", cart.item_count().await);
        }
        CartAction::SetQty {
            product_id,
            qty,
            size,
            color,
        } => {
            let key = CartLineKey::new(ProductId::new(product_id), size, color);
            cart.update_quantity(&key, qty).await?;
            session.save_state().await?;
            println!("Updated. Cart now holds {} items.", cart.item_count().await);
        }
        CartAction::Clear => {
            cart.clear().await?;
            session.save_state().await?;
            println!("Cart emptied.");
        }
    }

    Ok(())
}
