//! Catalogue browsing commands.

use clap::Subcommand;

use tamarind_core::ProductId;
use tamarind_storefront::StorefrontSession;
use tamarind_storefront::api::types::{ProductQuery, ProductSummary};

use super::CliError;

#[derive(Subcommand)]
pub enum CatalogAction {
    /// List products with optional search, filter, and sort
    Products {
        /// Full-text search term
        #[arg(short, long)]
        search: Option<String>,

        /// Section slug to filter by
        #[arg(long)]
        section: Option<String>,

        /// Sort order (`price_asc`, `price_desc`, `newest`)
        #[arg(long)]
        sort: Option<String>,

        /// Page number
        #[arg(short, long)]
        page: Option<u32>,
    },
    /// Show one product by id
    Show {
        /// Product id
        id: i32,
    },
    /// Show one product by slug
    Slug {
        /// Product slug
        slug: String,
    },
    /// Featured products
    Featured {
        /// Maximum number of products
        #[arg(short, long, default_value_t = 8)]
        limit: u32,
    },
    /// Newest products
    NewArrivals {
        /// Maximum number of products
        #[arg(short, long, default_value_t = 8)]
        limit: u32,
    },
    /// List sections
    Sections,
}

fn print_product_row(product: &ProductSummary) {
    let stock = if product.stock > 0 {
        format!("{} in stock", product.stock)
    } else {
        "out of stock".to_string()
    };
    println!(
        "{:>6}  {:<40}  {:>10}  {}",
        product.id, product.title, product.price, stock
    );
}

fn print_product(product: &ProductSummary) {
    println!("{} (#{})", product.title, product.id);
    println!("  slug:  {}", product.slug);
    println!("  price: {}", product.price);
    if let Some(original) = product.original_price {
        println!("  was:   {original}");
    }
    println!("  stock: {}", product.stock);
    if !product.sizes.is_empty() {
        println!("  sizes: {}", product.sizes.join(", "));
    }
    if !product.colors.is_empty() {
        println!("  colors: {}", product.colors.join(", "));
    }
    if let Some(description) = &product.description {
        println!("\n{description}");
    }
}

pub async fn run(session: &StorefrontSession, action: CatalogAction) -> Result<(), CliError> {
    let catalog = session.catalog();

    match action {
        CatalogAction::Products {
            search,
            section,
            sort,
            page,
        } => {
            let query = ProductQuery {
                search,
                section,
                sort,
                page,
                per_page: None,
            };
            let listing = catalog.products(&query).await?;
            for product in &listing.products {
                print_product_row(product);
            }
            println!(
                "\n{} products, page {} of {}",
                listing.total,
                listing.current_page.unwrap_or(1),
                listing.pages.max(1)
            );
        }
        CatalogAction::Show { id } => {
            let product = catalog.product(ProductId::new(id)).await?;
            print_product(&product);
        }
        CatalogAction::Slug { slug } => {
            let product = catalog.product_by_slug(&slug).await?;
            print_product(&product);
        }
        CatalogAction::Featured { limit } => {
            let listing = catalog.featured(limit).await?;
            for product in &listing.products {
                print_product_row(product);
            }
        }
        CatalogAction::NewArrivals { limit } => {
            let listing = catalog.new_arrivals(limit).await?;
            for product in &listing.products {
                print_product_row(product);
            }
        }
        CatalogAction::Sections => {
            for section in catalog.sections().await?.iter() {
                let count = section
                    .product_count
                    .map(|n| format!(" ({n} products)"))
                    .unwrap_or_default();
                println!("{:>4}  {:<24}  {}{count}", section.id, section.name, section.slug);
            }
        }
    }

    Ok(())
}
