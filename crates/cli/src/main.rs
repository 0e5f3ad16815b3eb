//! Storehouse CLI - Index management, demo data and inspection tools.
//!
//! # Usage
//!
//! ```bash
//! # Create the indexes the composite views rely on
//! sh-cli indexes
//!
//! # Insert a demo customer with an address, a product and an order
//! sh-cli seed
//!
//! # Print a customer with its addresses and orders
//! sh-cli show 65a1f0c2b3d4e5f601234567
//!
//! # Same, with products attached to the order items
//! sh-cli show 65a1f0c2b3d4e5f601234567 --details
//! ```
//!
//! The store is selected with the same environment variables as the API
//! (`STOREHOUSE_STORE`, `STOREHOUSE_MONGODB_URI`, `STOREHOUSE_DATABASE`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "sh-cli")]
#[command(author, version, about = "Storehouse CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the customerId indexes on addresses and orders
    Indexes,
    /// Insert a small demo dataset and print the new ids
    Seed,
    /// Print a composite customer view as JSON
    Show {
        /// Customer id (24 hex characters)
        customer_id: String,

        /// Attach each order item's product
        #[arg(short, long)]
        details: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Indexes => commands::indexes::create().await?,
        Commands::Seed => commands::seed::demo().await?,
        Commands::Show {
            customer_id,
            details,
        } => commands::show::customer(&customer_id, details).await?,
    }
    Ok(())
}
