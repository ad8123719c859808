//! Back-office commands.
//!
//! The admin client holds tokens in memory only, so each invocation
//! authenticates from the environment:
//!
//! - `TAMARIND_ADMIN_EMAIL` - admin account email
//! - `TAMARIND_ADMIN_PASSWORD` - admin account password

use clap::Subcommand;
use secrecy::SecretString;

use tamarind_admin::client::types::{AnalyticsCounts, ListQuery, SectionReorder};
use tamarind_admin::{AdminClient, AdminConfig};
use tamarind_core::{OrderId, OrderStatus, ProductId, SectionId, UserId};

use super::CliError;

#[derive(Subcommand)]
pub enum AdminAction {
    /// Verify admin credentials
    Login,
    /// Dashboard counters
    Stats,
    /// Order counts per status
    OrderStats,
    /// List customers
    Users {
        /// Search term
        #[arg(short, long)]
        search: Option<String>,

        /// Page number
        #[arg(short, long)]
        page: Option<u32>,
    },
    /// Flip a customer's active flag
    UserToggle {
        /// User id
        id: i32,
    },
    /// List products (inactive included)
    Products {
        /// Search term
        #[arg(short, long)]
        search: Option<String>,

        /// Page number
        #[arg(short, long)]
        page: Option<u32>,
    },
    /// Flip a product's active flag
    ProductToggle {
        /// Product id
        id: i32,
    },
    /// Bulk-create products from a CSV file
    Upload {
        /// CSV file path
        file: std::path::PathBuf,
    },
    /// Upload a product image
    UploadImage {
        /// Image file path
        file: std::path::PathBuf,
    },
    /// List sections
    Sections,
    /// Reorder sections (first id shown first)
    SectionsReorder {
        /// Section ids in display order
        ids: Vec<i32>,
    },
    /// List orders
    Orders {
        /// Filter by status
        #[arg(long)]
        status: Option<OrderStatus>,

        /// Page number
        #[arg(short, long)]
        page: Option<u32>,
    },
    /// Move an order to a new status
    OrderStatus {
        /// Order id
        id: i32,

        /// New status (pending/confirmed/shipped/delivered/cancelled)
        status: OrderStatus,
    },
    /// Sales report
    Sales {
        /// Period, e.g. `7d` or `30d`
        #[arg(long)]
        period: Option<String>,
    },
    /// Inventory report
    Inventory,
    /// Overwrite the public view/click counters
    Analytics {
        /// Absolute view count
        #[arg(long)]
        views: u64,

        /// Absolute click count
        #[arg(long)]
        clicks: u64,
    },
}

/// Build an admin client and login with credentials from the environment.
async fn client() -> Result<AdminClient, CliError> {
    let config = AdminConfig::from_env()?;
    let client = AdminClient::new(&config)?;

    let email = std::env::var("TAMARIND_ADMIN_EMAIL")
        .map_err(|_| "TAMARIND_ADMIN_EMAIL is not set")?;
    let password = std::env::var("TAMARIND_ADMIN_PASSWORD")
        .map_err(|_| "TAMARIND_ADMIN_PASSWORD is not set")?;

    client.login(&email, &SecretString::from(password)).await?;
    Ok(client)
}

pub async fn run(action: AdminAction) -> Result<(), CliError> {
    let admin = client().await?;

    match action {
        AdminAction::Login => {
            let user = admin.profile().await?;
            println!("Authenticated as {} <{}>", user.name, user.email);
        }
        AdminAction::Stats => {
            let stats = admin.dashboard_stats().await?;
            println!("users:     {}", stats.total_users);
            println!("products:  {}", stats.total_products);
            println!("orders:    {} ({} pending)", stats.total_orders, stats.pending_orders);
            println!("revenue:   {}", stats.total_revenue);
            println!("low stock: {}", stats.low_stock_products);
        }
        AdminAction::OrderStats => {
            let stats = admin.order_stats().await?;
            println!("pending:   {}", stats.pending);
            println!("confirmed: {}", stats.confirmed);
            println!("shipped:   {}", stats.shipped);
            println!("delivered: {}", stats.delivered);
            println!("cancelled: {}", stats.cancelled);
        }
        AdminAction::Users { search, page } => {
            let query = ListQuery {
                search,
                page,
                ..ListQuery::default()
            };
            let listing = admin.list_users(&query).await?;
            for user in &listing.users {
                let active = if user.is_active { "" } else { " [disabled]" };
                println!("{:>6}  {:<30}  {}{active}", user.id, user.name, user.email);
            }
            println!("\n{} users, {} pages", listing.total, listing.pages.max(1));
        }
        AdminAction::UserToggle { id } => {
            let user = admin.toggle_user_status(UserId::new(id)).await?;
            let state = if user.is_active { "active" } else { "disabled" };
            println!("{} is now {state}.", user.email);
        }
        AdminAction::Products { search, page } => {
            let query = ListQuery {
                search,
                page,
                ..ListQuery::default()
            };
            let listing = admin.list_products(&query).await?;
            for product in &listing.products {
                let active = if product.is_active { "" } else { " [inactive]" };
                println!(
                    "{:>6}  {:<40}  {:>10}  stock {}{active}",
                    product.id, product.title, product.price, product.stock
                );
            }
            println!("\n{} products, {} pages", listing.total, listing.pages.max(1));
        }
        AdminAction::ProductToggle { id } => {
            let product = admin.toggle_product_status(ProductId::new(id)).await?;
            let state = if product.is_active { "active" } else { "inactive" };
            println!("{} is now {state}.", product.title);
        }
        AdminAction::Upload { file } => {
            let bytes = std::fs::read(&file)?;
            let name = file
                .file_name()
                .map_or_else(|| "products.csv".to_string(), |n| n.to_string_lossy().into_owned());
            let report = admin.bulk_upload_products(&name, bytes).await?;
            println!(
                "created {}, updated {}, failed {}",
                report.created, report.updated, report.failed
            );
            for error in &report.errors {
                println!("  {error}");
            }
        }
        AdminAction::UploadImage { file } => {
            let bytes = std::fs::read(&file)?;
            let name = file
                .file_name()
                .map_or_else(|| "image".to_string(), |n| n.to_string_lossy().into_owned());
            let uploaded = admin.upload_image(&name, bytes).await?;
            println!("{}", uploaded.url);
        }
        AdminAction::Sections => {
            for section in admin.list_sections().await? {
                let active = if section.is_active { "" } else { " [inactive]" };
                println!(
                    "{:>4}  {:<24}  order {}{active}",
                    section.id, section.name, section.display_order
                );
            }
        }
        AdminAction::SectionsReorder { ids } => {
            let order = SectionReorder {
                section_ids: ids.into_iter().map(SectionId::new).collect(),
            };
            admin.reorder_sections(&order).await?;
            println!("Sections reordered.");
        }
        AdminAction::Orders { status, page } => {
            let query = ListQuery {
                status,
                page,
                ..ListQuery::default()
            };
            let listing = admin.list_orders(&query).await?;
            for order in &listing.orders {
                let customer = order
                    .user
                    .as_ref()
                    .map_or("(unknown)", |u| u.name.as_str());
                println!(
                    "{:>6}  {}  {:<10}  {:>10}  {}",
                    order.id, order.order_number, order.status, order.total_amount, customer
                );
            }
            println!("\n{} orders, {} pages", listing.total, listing.pages.max(1));
        }
        AdminAction::OrderStatus { id, status } => {
            let order = admin.update_order_status(OrderId::new(id), status).await?;
            println!("Order {} is now {}.", order.order_number, order.status);
        }
        AdminAction::Sales { period } => {
            let report = admin.sales_report(period.as_deref()).await?;
            println!("revenue: {}", report.total_revenue);
            println!("orders:  {}", report.order_count);
            if let Some(avg) = report.average_order_value {
                println!("average: {avg}");
            }
        }
        AdminAction::Inventory => {
            let report = admin.inventory_report().await?;
            println!(
                "{} products, {} out of stock, {} low",
                report.total_products, report.out_of_stock, report.low_stock
            );
            for row in &report.products {
                println!("{:>6}  {:<40}  stock {}", row.id, row.title, row.stock);
            }
        }
        AdminAction::Analytics { views, clicks } => {
            let counts = admin
                .override_analytics(AnalyticsCounts { views, clicks })
                .await?;
            println!("views {}, clicks {}", counts.views, counts.clicks);
        }
    }

    Ok(())
}
