//! Pocket Shop CLI - browse the catalog and shop from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Second page of beauty products matching "lip", 10 per page
//! pocket-shop catalog --category beauty --search lip --per-page 10 --page 2
//!
//! # List categories
//! pocket-shop categories
//!
//! # Cart (persisted to pocket-shop-cart.json)
//! pocket-shop cart add 1
//! pocket-shop cart increase 1
//! pocket-shop cart show
//!
//! # Confirm the order and clear the cart file
//! pocket-shop checkout --name "Ada Lovelace" --email ada@example.com --address "12 St James's Square"
//! ```
//!
//! # Commands
//!
//! - `catalog` - One page of the filtered catalog
//! - `categories` - Catalog categories
//! - `cart show|add|remove|increase|decrease` - Manage the cart file
//! - `checkout` - Confirm an order

#![cfg_attr(not(test), forbid(unsafe_code))]
// Command output goes to stdout; logs go to stderr.
#![allow(clippy::print_stdout)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pocket_shop_core::{CheckoutForm, ListingQuery, ProductId, QuantityChange};
use url::Url;

mod cart_file;
mod commands;

use cart_file::{CartFile, DEFAULT_CART_FILE};

#[derive(Parser)]
#[command(name = "pocket-shop")]
#[command(author, version, about = "Pocket Shop terminal client")]
struct Cli {
    /// File holding the cart snapshot (overrides `POCKET_SHOP_CART_FILE`)
    #[arg(long, global = true)]
    cart_file: Option<PathBuf>,

    /// Product list endpoint (overrides `CATALOG_URL`)
    #[arg(long, global = true)]
    catalog_url: Option<Url>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show one page of the filtered catalog
    Catalog {
        /// Category to show (`all` for every category)
        #[arg(short, long)]
        category: Option<String>,

        /// Case-insensitive title search
        #[arg(short, long)]
        search: Option<String>,

        /// Items per page (5, 10, 20 or 30)
        #[arg(long)]
        per_page: Option<usize>,

        /// Page number, starting at 1
        #[arg(short, long)]
        page: Option<usize>,
    },
    /// List catalog categories
    Categories,
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Confirm an order for the cart and clear it
    Checkout {
        /// Customer name
        #[arg(short, long)]
        name: String,

        /// Customer email address
        #[arg(short, long)]
        email: String,

        /// Delivery address
        #[arg(short, long)]
        address: String,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart
    Show,
    /// Add one unit of a product
    Add { id: ProductId },
    /// Remove a product's line
    Remove { id: ProductId },
    /// Increase a line's quantity by one
    Increase { id: ProductId },
    /// Decrease a line's quantity by one (never below 1)
    Decrease { id: ProductId },
}

#[tokio::main]
async fn main() {
    // Load .env file if present (ignore errors if not found)
    let _ = dotenvy::dotenv();

    // Log to stderr so command output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pocket_shop_cli=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let path = cli
        .cart_file
        .or_else(|| std::env::var_os("POCKET_SHOP_CART_FILE").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CART_FILE));
    let file = CartFile::new(path);
    tracing::debug!(path = %file.path().display(), "Using cart file");

    match cli.command {
        Commands::Catalog {
            category,
            search,
            per_page,
            page,
        } => {
            let client = commands::catalog_client(cli.catalog_url)?;
            let query =
                ListingQuery::from_params(category.as_deref(), search.as_deref(), per_page, page);
            commands::catalog::list(&client, &query).await?;
        }
        Commands::Categories => {
            let client = commands::catalog_client(cli.catalog_url)?;
            commands::catalog::categories(&client).await?;
        }
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&file).await?,
            CartAction::Add { id } => {
                let client = commands::catalog_client(cli.catalog_url)?;
                commands::cart::add(&file, &client, id).await?;
            }
            CartAction::Remove { id } => commands::cart::remove(&file, id).await?,
            CartAction::Increase { id } => {
                commands::cart::change_quantity(&file, id, QuantityChange::Increase).await?;
            }
            CartAction::Decrease { id } => {
                commands::cart::change_quantity(&file, id, QuantityChange::Decrease).await?;
            }
        },
        Commands::Checkout {
            name,
            email,
            address,
        } => {
            let form = CheckoutForm {
                name,
                email,
                address,
            };
            commands::checkout::run(&file, &form).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_cart_add() {
        let cli = Cli::try_parse_from(["pocket-shop", "cart", "add", "12", "--cart-file", "x.json"])
            .expect("valid arguments");
        assert_eq!(cli.cart_file, Some(PathBuf::from("x.json")));
        assert!(matches!(
            cli.command,
            Commands::Cart {
                action: CartAction::Add { id }
            } if id == ProductId::new(12)
        ));
    }

    #[test]
    fn test_rejects_non_numeric_id() {
        assert!(Cli::try_parse_from(["pocket-shop", "cart", "add", "lipstick"]).is_err());
    }
}
