pub mod api;
pub mod clients;
pub mod config;
pub mod db;
pub mod entities;
pub mod models;
pub mod services;

use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use clients::randomuser::RandomUserClient;
pub use config::Config;
use db::Store;
use services::IngestService;

pub async fn run() -> anyhow::Result<()> {
    let config = Config::load()?;
    config.validate()?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_help();
        return Ok(());
    }

    match args[1].as_str() {
        "serve" | "-s" | "--serve" => run_serve(config).await,

        "ingest" | "i" => {
            let count = args
                .get(2)
                .and_then(|s| s.parse().ok())
                .unwrap_or(config.ingestion.batch_size);
            run_ingest(&config, count).await
        }

        "init" | "--init" => {
            Config::create_default_if_missing()?;
            println!("✓ Config file created. Edit config.toml and run again.");
            Ok(())
        }

        "help" | "-h" | "--help" => {
            print_help();
            Ok(())
        }

        _ => {
            println!("Unknown command: {}", args[1]);
            println!();
            print_help();
            Ok(())
        }
    }
}

fn print_help() {
    println!("Randuser - Random User CRUD Service");
    println!("Imports synthetic users and serves them over a CRUD HTTP API");
    println!();
    println!("USAGE:");
    println!("  randuser <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("  serve             Run the HTTP API server");
    println!("  ingest [count]    Fetch a batch from the generator service and store it");
    println!("  init              Create default config file");
    println!("  help              Show this help message");
    println!();
    println!("EXAMPLES:");
    println!("  randuser serve          # Serve the API on the configured port");
    println!("  randuser ingest         # Import one batch of the configured size");
    println!("  randuser ingest 50      # Import 50 users");
    println!();
    println!("CONFIG:");
    println!("  Edit config.toml to configure the database, server port, etc.");
}

async fn run_serve(config: Config) -> anyhow::Result<()> {
    info!("Randuser v{} starting...", env!("CARGO_PKG_VERSION"));

    let port = config.server.port;
    let state = api::create_app_state(config).await?;
    state.store.ping().await.context("database is not reachable")?;

    let app = api::router(state);
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Web API running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Error listening for shutdown: {}", e),
    }
}

async fn run_ingest(config: &Config, count: u32) -> anyhow::Result<()> {
    println!(
        "Fetching {} users from {}",
        count, config.ingestion.source_url
    );

    let store = Store::new(&config.general.database_path).await?;
    let client = RandomUserClient::new(
        config.ingestion.source_url.clone(),
        Duration::from_secs(config.ingestion.request_timeout_secs),
    )?;
    let ingest = IngestService::new(store, client);

    let stats = ingest.run(count).await?;

    println!();
    println!("Ingestion complete!");
    println!("  Fetched:  {}", stats.fetched);
    println!("  Inserted: {}", stats.inserted);
    if stats.failed > 0 {
        println!("  Failed:   {}", stats.failed);
    }

    Ok(())
}
