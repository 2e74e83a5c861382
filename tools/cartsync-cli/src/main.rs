//! cartsync CLI - drive a file-backed storefront cart from the terminal.
//!
//! Commands:
//! - `cartsync show` - List cart lines and totals
//! - `cartsync add` - Add units of a product
//! - `cartsync set` - Set a line's quantity
//! - `cartsync remove` - Remove a line
//! - `cartsync clear` - Empty the cart
//! - `cartsync totals` - Subtotal, shipping and total
//! - `cartsync products` - Filter and sort the storefront catalog
//! - `cartsync cities` - Cities of a province
//! - `cartsync wishlist` - Toggle a product on the wishlist
//! - `cartsync order` - Submit the cart as an order
//! - `cartsync config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{AddArgs, ClearArgs, ConfigArgs, OrderArgs, ProductsArgs, SetArgs};

/// cartsync - Storefront cart state from the command line
#[derive(Parser)]
#[command(name = "cartsync")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the cart
    Show,

    /// Add a product to the cart
    Add(AddArgs),

    /// Set the quantity of a cart line
    Set(SetArgs),

    /// Remove a product from the cart
    Remove {
        /// Product ID.
        id: u64,
    },

    /// Empty the cart
    Clear(ClearArgs),

    /// Show cart totals
    Totals,

    /// List storefront products
    Products(ProductsArgs),

    /// List the cities of a province
    Cities {
        /// Province ID.
        province: u64,
    },

    /// Toggle a product on the wishlist
    Wishlist {
        /// Product ID.
        id: u64,
    },

    /// Submit the cart as an order
    Order(OrderArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "warn,cartsync=debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = match context::Context::load(config_path, output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };
    ctx.output.debug(&format!("data directory: {}", ctx.data_dir().display()));

    // Execute command
    let result = match cli.command {
        Commands::Show => commands::cart::show(&ctx).await,
        Commands::Add(args) => commands::cart::add(args, &ctx).await,
        Commands::Set(args) => commands::cart::set(args, &ctx).await,
        Commands::Remove { id } => commands::cart::remove(id, &ctx).await,
        Commands::Clear(args) => commands::cart::clear(args, &ctx).await,
        Commands::Totals => commands::cart::totals(&ctx).await,
        Commands::Products(args) => commands::catalog::products(args, &ctx).await,
        Commands::Cities { province } => commands::catalog::cities(province, &ctx).await,
        Commands::Wishlist { id } => commands::catalog::wishlist(id, &ctx).await,
        Commands::Order(args) => commands::order::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_set_with_negative_quantity() {
        let cli = Cli::try_parse_from(["cartsync", "set", "4", "-1"]).unwrap();
        match cli.command {
            Commands::Set(args) => assert_eq!((args.id, args.qty), (4, -1)),
            _ => panic!("expected set"),
        }
    }

    #[test]
    fn test_catalog_conflicts_with_manual_fields() {
        assert!(Cli::try_parse_from(["cartsync", "add", "1", "--catalog", "--price", "10"]).is_err());
        assert!(Cli::try_parse_from(["cartsync", "add", "1", "--name", "x", "--price", "10"]).is_ok());
    }
}
