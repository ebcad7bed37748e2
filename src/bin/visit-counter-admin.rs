use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use visit_counter::config::Config;
use visit_counter::counter::{self, CounterClient, CounterKey};
use visit_counter::telemetry;
use visit_counter::visitor::{init_visitor_salt, VisitorDigest};

#[derive(Parser)]
#[command(name = "visit-counter-admin")]
#[command(about = "Inspect visitor digests and counter values", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the salted digest and marker key for a client address
    Digest {
        /// Client address as the proxy would resolve it
        address: String,
    },
    /// Read a counter key without modifying it
    Read {
        /// Key to read (defaults to the aggregate key)
        #[arg(long)]
        key: Option<String>,
    },
    /// Report whether an address has already been counted
    Check {
        /// Client address as the proxy would resolve it
        address: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;
    telemetry::init_tracing(&config.logging);
    init_visitor_salt(config.visitor.salt.as_deref());

    let backend = counter::backend_from_config(&config.counter)?;
    let client = CounterClient::from_config(backend, &config.counter);

    match cli.command {
        Commands::Digest { address } => {
            let digest = VisitorDigest::from_address(&address);
            println!("digest: {}", digest);
            println!("marker: {}", CounterKey::visitor(&digest));
        }
        Commands::Read { key } => {
            let key = key
                .map(CounterKey::named)
                .unwrap_or_else(|| client.aggregate_key().clone());
            let count = client
                .check_count(&key)
                .await
                .with_context(|| format!("failed to read counter key '{}'", key))?;
            println!("{} = {}", key, count);
        }
        Commands::Check { address } => {
            let digest = VisitorDigest::from_address(&address);
            let marker = CounterKey::visitor(&digest);
            match client.check_count(&marker).await {
                Ok(count) if count > 0 => {
                    println!("✓ '{}' already counted ({} = {})", address, marker, count)
                }
                Ok(_) => println!("⚠ '{}' not counted yet ({})", address, marker),
                Err(e) => println!(
                    "⚠ '{}' not counted (check failed: {}); the proxy would count it",
                    address, e
                ),
            }
        }
    }

    Ok(())
}
