//! Pokedex CLI - Browse the PokeAPI catalog from an interactive prompt
//!
//! Pages through location areas, explores them and catches creatures. Catalog
//! responses are kept in an in-memory cache for a configurable interval.

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tokio::io::BufReader;

use pokedex::app::App;
use pokedex::cache::Cache;
use pokedex::cli::{Cli, StartupConfig};
use pokedex::data::CatalogClient;
use pokedex::logging::init_tracing;
use pokedex::repl;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(2);
        }
    };

    init_tracing(&config.log_filter);

    let cache = Arc::new(Cache::new(config.cache_interval));
    let client = CatalogClient::new(config.base_url, Arc::clone(&cache));
    let mut app = App::new(client);

    let result = repl::run(&mut app, BufReader::new(tokio::io::stdin()), &mut io::stdout()).await;

    cache.shutdown().await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
