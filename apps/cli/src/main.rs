//! # rocketshoes: the RocketShoes cart from the terminal
//!
//! ```bash
//! # Show the cart
//! rocketshoes show
//!
//! # Add one unit of product 3
//! rocketshoes add 3
//!
//! # Set product 3 to 2 units, print the result as JSON
//! rocketshoes --json update 3 2
//!
//! # Remove product 3
//! rocketshoes remove 3
//! ```
//!
//! ## Startup Sequence
//! 1. Initialize tracing (stderr, `RUST_LOG`)
//! 2. Load configuration (defaults → config.toml → environment)
//! 3. Open the SQLite database & run migrations
//! 4. Spawn the Cart Store over the HTTP stock/catalog client
//! 5. Run the command, print the cart
//!
//! Exit status is 0 on success, 1 on a startup failure and 2 when the cart
//! command was rejected.

#![cfg_attr(not(test), forbid(unsafe_code))]

mod config;
mod output;

use clap::{Parser, Subcommand};
use rocketshoes_api::HttpStorefrontApi;
use rocketshoes_cart::{CartStore, Outcome};
use rocketshoes_core::ProductId;
use rocketshoes_db::{migrations, Database, DbConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use config::AppConfig;
use output::{render_table, Report, TerminalNotifier};

#[derive(Parser)]
#[command(name = "rocketshoes")]
#[command(author, version, about = "RocketShoes shopping cart")]
struct Cli {
    /// Config file (default: platform config dir, config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the cart
    Show,
    /// Add one unit of a product
    Add {
        /// Product id
        id: u64,
    },
    /// Remove a product from the cart
    Remove {
        /// Product id
        id: u64,
    },
    /// Set the amount of a product already in the cart
    Update {
        /// Product id
        id: u64,

        /// New amount (0 leaves the cart as is)
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(Some(Outcome::Rejected(_))) => ExitCode::from(2),
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Command failed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<Option<Outcome>, Box<dyn std::error::Error>> {
    let config = AppConfig::load(cli.config)?;
    let db_path = config.database_path()?;
    info!(?db_path, api = %config.api.base_url, "Starting RocketShoes cart");

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let (total, applied) = migrations::migration_status(db.pool()).await?;
    debug!(total, applied, "Migration status");

    let api = Arc::new(HttpStorefrontApi::new(&config.api_config())?);

    let store = CartStore::builder(Arc::new(db.storage()), api.clone(), api)
        .notifier(Arc::new(TerminalNotifier))
        .config(config.store_config())
        .spawn()
        .await?;

    let outcome = match cli.command {
        Commands::Show => None,
        Commands::Add { id } => Some(store.add_product(ProductId::new(id)).await),
        Commands::Remove { id } => Some(store.remove_product(ProductId::new(id)).await),
        Commands::Update { id, amount } => Some(
            store
                .update_product_amount(ProductId::new(id), amount)
                .await,
        ),
    };

    let cart = store.snapshot();
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&Report::new(outcome, &cart))?);
    } else {
        print!("{}", render_table(&cart));
    }

    store.shutdown().await?;
    db.close().await;

    Ok(outcome)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,rocketshoes=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
