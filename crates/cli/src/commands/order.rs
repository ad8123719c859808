//! Order commands.

use clap::Subcommand;

use tamarind_core::{AddressId, OrderId};
use tamarind_storefront::StorefrontSession;
use tamarind_storefront::api::types::{Order, OrderCreate, OrderLineInput};

use super::CliError;

#[derive(Subcommand)]
pub enum OrderAction {
    /// List past orders
    List,
    /// Show one order
    Show {
        /// Order id
        id: i32,
    },
    /// Place an order from the current cart
    Create {
        /// Delivery address id
        #[arg(short, long)]
        address: i32,

        /// Payment method (backend-defined, e.g. `cod`)
        #[arg(long)]
        payment: Option<String>,
    },
    /// Cancel a pending order
    Cancel {
        /// Order id
        id: i32,
    },
    /// Download the PDF receipt
    Receipt {
        /// Order id
        id: i32,

        /// Output file
        #[arg(short, long)]
        out: std::path::PathBuf,
    },
}

fn print_order(order: &Order) {
    println!(
        "{:>6}  {}  {:<10}  {:>10}",
        order.id, order.order_number, order.status, order.total_amount
    );
}

pub async fn run(session: &StorefrontSession, action: OrderAction) -> Result<(), CliError> {
    let orders = session.orders();

    match action {
        OrderAction::List => {
            orders.refresh().await?;
            for order in orders.snapshot().await {
                print_order(&order);
            }
        }
        OrderAction::Show { id } => {
            let order = orders.get(OrderId::new(id)).await?;
            print_order(&order);
            for line in &order.items {
                let title = line
                    .product
                    .as_ref()
                    .map_or("(removed product)", |p| p.title.as_str());
                println!("    {:>3} x {:<40} {:>10}", line.quantity, title, line.price);
            }
        }
        OrderAction::Create { address, payment } => {
            let lines = session.cart().snapshot().await;
            if lines.is_empty() {
                return Err("cart is empty, nothing to order".into());
            }
            let create = OrderCreate {
                address_id: AddressId::new(address),
                items: lines
                    .iter()
                    .map(|line| OrderLineInput {
                        product_id: line.product.id,
                        quantity: line.quantity,
                        size: line.size.clone(),
                        color: line.color.clone(),
                    })
                    .collect(),
                payment_method: payment,
            };
            let order = session.checkout(&create).await?;
            println!("Order {} placed ({}).", order.order_number, order.total_amount);
        }
        OrderAction::Cancel { id } => {
            let order = orders.cancel(OrderId::new(id)).await?;
            println!("Order {} is now {}.", order.order_number, order.status);
        }
        OrderAction::Receipt { id, out } => {
            let bytes = orders.download_receipt(OrderId::new(id)).await?;
            std::fs::write(&out, &bytes)?;
            println!("Receipt written to {} ({} bytes).", out.display(), bytes.len());
        }
    }

    Ok(())
}
