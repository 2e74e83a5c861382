//! CLI command implementations.

pub mod cart;
pub mod catalog;
pub mod config;
pub mod order;

use clap::{Args, Subcommand};

/// Arguments for the add command.
#[derive(Args)]
pub struct AddArgs {
    /// Product ID.
    pub id: u64,

    /// Product name (required unless --catalog).
    #[arg(long)]
    pub name: Option<String>,

    /// Unit price, e.g. 125000 or 125,000 (required unless --catalog).
    #[arg(long)]
    pub price: Option<String>,

    /// Product image URL.
    #[arg(long)]
    pub image: Option<String>,

    /// Units to add.
    #[arg(short, long, default_value = "1")]
    pub qty: u32,

    /// Units in stock (default: unlimited).
    #[arg(long, allow_negative_numbers = true)]
    pub stock: Option<i64>,

    /// Take name, price, image and stock from the storefront catalog.
    #[arg(long, conflicts_with_all = ["name", "price", "image", "stock"])]
    pub catalog: bool,

    /// Catalog pages to read with --catalog.
    #[arg(long, default_value = "10")]
    pub pages: u32,
}

/// Arguments for the set command.
#[derive(Args)]
pub struct SetArgs {
    /// Product ID.
    pub id: u64,

    /// New quantity; zero or less removes the line.
    #[arg(allow_negative_numbers = true)]
    pub qty: i64,

    /// Units in stock (default: unlimited).
    #[arg(long, allow_negative_numbers = true)]
    pub stock: Option<i64>,
}

/// Arguments for the clear command.
#[derive(Args)]
pub struct ClearArgs {
    /// Skip confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the products command.
#[derive(Args)]
pub struct ProductsArgs {
    /// Case-insensitive name search.
    #[arg(short, long)]
    pub search: Option<String>,

    /// Category slug.
    #[arg(long)]
    pub category: Option<String>,

    /// Brand slug.
    #[arg(long)]
    pub brand: Option<String>,

    /// Minimum price.
    #[arg(long)]
    pub min_price: Option<String>,

    /// Maximum price.
    #[arg(long)]
    pub max_price: Option<String>,

    /// Quick filter: bestseller, discount, new or luxury.
    #[arg(long)]
    pub quick: Option<String>,

    /// Sort: default, price-low, price-high, rating, name, newest, bestseller.
    #[arg(long, default_value = "default")]
    pub sort: String,

    /// Catalog pages to read.
    #[arg(long, default_value = "10")]
    pub pages: u32,
}

/// Arguments for the order command.
#[derive(Args)]
pub struct OrderArgs {
    #[arg(long)]
    pub full_name: String,

    #[arg(long)]
    pub phone: String,

    /// Province ID.
    #[arg(long)]
    pub province: u64,

    /// City ID.
    #[arg(long)]
    pub city: u64,

    #[arg(long)]
    pub address: String,

    /// Ten-digit postal code.
    #[arg(long)]
    pub postal_code: String,

    #[arg(long)]
    pub notes: Option<String>,

    /// Skip confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Write a default cartsync.toml in the working directory.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}
