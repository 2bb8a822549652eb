//! Main entry point for the price service.
//!
//! This binary loads the configuration, builds the price lookup over the
//! configured store and serves it over HTTP.

use clap::Parser;
use price_config::Config;
use price_core::{PriceService, PriceServiceBuilder};
use price_storage::StorageFactory;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

mod apis;
mod server;

/// Command-line arguments for the price service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config/price-service.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

/// Main entry point for the price service.
///
/// This function:
/// 1. Parses command-line arguments
/// 2. Initializes logging infrastructure
/// 3. Loads configuration from file
/// 4. Builds the price service over the primary store
/// 5. Serves the API until interrupted
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	use tracing_subscriber::{fmt, EnvFilter};

	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.init();

	tracing::info!("Started price service");

	let config = Config::from_file(&args.config.to_string_lossy()).await?;
	tracing::info!("Loaded configuration [{}]", config.service.id);

	let service = Arc::new(build_service(config.clone())?);

	match config.api {
		Some(api_config) if api_config.enabled => {
			server::start_server(api_config, service).await?;
		},
		_ => {
			tracing::warn!("API server is disabled, nothing to serve");
		},
	}

	tracing::info!("Stopped price service");
	Ok(())
}

/// Collects every registered store factory, keyed by name.
fn storage_factories() -> HashMap<String, StorageFactory> {
	price_storage::get_all_implementations()
		.into_iter()
		.map(|(name, factory)| (name.to_string(), factory))
		.collect()
}

/// Builds the price service with the configured primary store.
fn build_service(config: Config) -> Result<PriceService, Box<dyn std::error::Error>> {
	Ok(PriceServiceBuilder::new(config).build(storage_factories())?)
}
