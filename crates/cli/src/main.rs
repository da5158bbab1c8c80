//! Stockroom CLI - Inventory client for the catalog store.
//!
//! # Usage
//!
//! ```bash
//! # Check who the configured secret key belongs to
//! stockroom login
//!
//! # Browse the catalog
//! stockroom products list --query ban --sort price-desc
//! stockroom products show 42
//!
//! # Move stock
//! stockroom stock adjust 42 1 -- -5
//!
//! # Fleet statistics and barcode lookup
//! stockroom stats
//! stockroom scan 3017620422003
//!
//! # Printable report
//! stockroom export 42 --output apple.html
//! ```
//!
//! # Environment Variables
//!
//! See `stockroom_client::config`. Logs go to stderr; set
//! `STOCKROOM_LOG_FORMAT=json` for structured output.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use stockroom_client::ClientConfig;
use stockroom_core::types::SortKey;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "stockroom")]
#[command(author, version, about = "Stockroom inventory client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Identify the warehouseman behind STOCKROOM_SECRET_KEY
    Login,
    /// Browse and manage products
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Adjust stock quantities
    Stock {
        #[command(subcommand)]
        action: StockAction,
    },
    /// Manage the warehouses a product is held at
    Warehouse {
        #[command(subcommand)]
        action: WarehouseAction,
    },
    /// Show fleet statistics
    Stats,
    /// Look a product up by barcode
    Scan {
        /// Barcode as read by the scanner
        barcode: String,
    },
    /// Write a printable HTML report for a product
    Export {
        /// Product ID
        id: String,

        /// Output file (default: product-<id>.html)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// List products
    List {
        /// Keep products whose name or barcode contains this text
        #[arg(short, long, default_value = "")]
        query: String,

        /// Order (name, price-asc, price-desc, stock-asc, stock-desc)
        #[arg(short, long, default_value = "name")]
        sort: SortKey,
    },
    /// Show one product with its stock and history
    Show {
        /// Product ID
        id: String,
    },
    /// Create a product
    Add {
        #[command(flatten)]
        fields: commands::products::NewProductFields,
    },
    /// Edit a product's fields; omitted fields keep their value
    Edit {
        /// Product ID
        id: String,

        #[command(flatten)]
        fields: commands::products::ProductFields,
    },
    /// Delete a product
    Delete {
        /// Product ID
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum StockAction {
    /// Add (or, with a negative delta, remove) units at one warehouse
    Adjust {
        /// Product ID
        id: String,

        /// Warehouse ID
        warehouse: i64,

        /// Units to add; negative to remove
        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },
}

#[derive(Subcommand)]
enum WarehouseAction {
    /// Start holding a product at a new warehouse
    Add {
        /// Product ID
        id: String,

        /// Warehouse name
        #[arg(short, long)]
        name: String,

        /// City
        #[arg(short, long)]
        city: String,

        /// Latitude
        #[arg(long, allow_negative_numbers = true)]
        latitude: Option<String>,

        /// Longitude
        #[arg(long, allow_negative_numbers = true)]
        longitude: Option<String>,
    },
    /// Stop holding a product at a warehouse
    Remove {
        /// Product ID
        id: String,

        /// Warehouse ID
        warehouse: i64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "stockroom=info".into());

    // stdout carries command output, so logs go to stderr
    let is_json = std::env::var("STOCKROOM_LOG_FORMAT").is_ok_and(|v| v == "json");
    let json_layer = is_json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!is_json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Configuration is needed before tracing so Sentry can hook in
    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing();
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let sentry_guard = init_sentry(&config);
    init_tracing();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, &config).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        drop(sentry_guard);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut out = std::io::stdout();
    let mut input = std::io::stdin().lock();

    match cli.command {
        Commands::Login => commands::login::run(config, &mut out).await?,
        Commands::Products { action } => match action {
            ProductAction::List { query, sort } => {
                commands::products::list(config, &query, sort, &mut out).await?;
            }
            ProductAction::Show { id } => commands::products::show(config, &id, &mut out).await?,
            ProductAction::Add { fields } => {
                commands::products::add(config, &fields, &mut out).await?;
            }
            ProductAction::Edit { id, fields } => {
                commands::products::edit(config, &id, &fields, &mut out).await?;
            }
            ProductAction::Delete { id, yes } => {
                commands::products::delete(config, &id, yes, &mut input, &mut out).await?;
            }
        },
        Commands::Stock { action } => match action {
            StockAction::Adjust {
                id,
                warehouse,
                delta,
            } => commands::stock::adjust(config, &id, warehouse, delta, &mut out).await?,
        },
        Commands::Warehouse { action } => match action {
            WarehouseAction::Add {
                id,
                name,
                city,
                latitude,
                longitude,
            } => {
                commands::warehouse::add(
                    config,
                    &id,
                    &name,
                    &city,
                    latitude.as_deref(),
                    longitude.as_deref(),
                    &mut out,
                )
                .await?;
            }
            WarehouseAction::Remove { id, warehouse, yes } => {
                commands::warehouse::remove(config, &id, warehouse, yes, &mut input, &mut out)
                    .await?;
            }
        },
        Commands::Stats => commands::stats::run(config, &mut out).await?,
        Commands::Scan { barcode } => commands::scan::run(config, &barcode, &mut out).await?,
        Commands::Export { id, output } => {
            commands::export::run(config, &id, output, &mut out).await?;
        }
    }
    Ok(())
}
