//! Catalog Provisioner
//!
//! One-shot tool that prepares the e-commerce MongoDB database: the
//! `products`, `customers` and `orders` collections with their validators and
//! indexes, plus the seed products and customers.

use clap::{Parser, Subcommand};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::mongodb::{check_health_detailed, client_from_config, connect_from_config};
use domain_catalog::{MongoCatalogRepository, Provisioner};
use eyre::{Result, bail};
use tracing::{info, warn};

mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "catalog-provisioner")]
#[command(about = "Provision the e-commerce collections, indexes and seed data in MongoDB")]
struct Cli {
    /// Defaults to `provision`
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Create collections and indexes, then insert the seed data
    Provision,

    /// Check collections, indexes and stored documents
    Verify,

    /// Drop the three collections
    Reset {
        /// Confirm that existing data may be deleted
        #[arg(long)]
        yes: bool,
    },

    /// Ping the server
    Health,
}

impl Commands {
    /// Reject invocations that must not reach the server
    fn ensure_confirmed(&self) -> Result<()> {
        if let Commands::Reset { yes: false } = self {
            bail!("reset drops all catalog data; pass --yes to confirm");
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Provision);
    command.ensure_confirmed()?;

    let database = config.mongodb.database();

    match command {
        Commands::Provision => {
            info!(database, "Starting provisioning");
            let summary = connect_provisioner(&config).await?.provision().await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }

        Commands::Verify => {
            let report = connect_provisioner(&config).await?.verify().await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            if !report.is_clean() {
                bail!("database {database} does not match the catalog definition");
            }
        }

        Commands::Reset { .. } => {
            let provisioner = connect_provisioner(&config).await?;
            warn!(database, "Dropping catalog collections");
            provisioner.reset().await?;
            info!("Reset complete");
        }

        Commands::Health => {
            // An unreachable server is reported, not treated as a startup failure
            let client = client_from_config(&config.mongodb).await?;
            let status = check_health_detailed(&client).await;
            println!("{}", serde_json::to_string_pretty(&status)?);
            status.into_result()?;
        }
    }

    Ok(())
}

async fn connect_provisioner(config: &Config) -> Result<Provisioner<MongoCatalogRepository>> {
    let client = connect_from_config(&config.mongodb).await?;
    let db = client.database(config.mongodb.database());
    Ok(Provisioner::new(MongoCatalogRepository::new(&db), db.name()))
}
