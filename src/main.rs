use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};

use nl_viz::config::{AppConfig, CliArgs};
use nl_viz::ingest::csv::CsvLoader;
use nl_viz::llm::LlmManager;
use nl_viz::util::logging::init_tracing;
use nl_viz::web::{self, state::AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    init_tracing();

    // Parse command line arguments
    let args = CliArgs::parse();

    // Load configuration
    let config = match AppConfig::new(&args) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // Loader mode: populate the database from a CSV and exit
    if let Some(csv_path) = &args.load {
        info!(
            "Loading {} into {}",
            csv_path.display(),
            config.database.path
        );
        let loader = CsvLoader::new(config.database.path.as_str());
        let rows = loader.load(csv_path)?;
        info!("Done: {} rows loaded", rows);
        return Ok(());
    }

    // Initialize the LLM backend; a missing API key is fatal here
    info!("Initializing LLM manager with backend: {}", config.llm.backend);
    let llm_manager = match LlmManager::new(&config.llm) {
        Ok(manager) => manager,
        Err(e) => {
            error!("Failed to initialize LLM backend: {}", e);
            return Err(e.into());
        }
    };

    // Create application state
    let state = Arc::new(AppState::new(config.clone(), llm_manager));

    // Start the web server
    info!(
        "Starting nl-viz server on {}:{}",
        config.web.host, config.web.port
    );
    match web::run_server(config.web, state).await {
        Ok(_) => info!("Server stopped gracefully"),
        Err(e) => {
            error!("Server error: {}", e);
            return Err(Box::new(std::io::Error::new(
                std::io::ErrorKind::Other,
                e.to_string(),
            )) as Box<dyn std::error::Error>);
        }
    }

    Ok(())
}
