pub mod api;
pub mod config;
pub mod credentials;
pub mod db;
pub mod entities;
pub mod ingest;

use anyhow::Context;
use tokio::io::BufReader;
use tokio::signal;

pub use config::Config;
use db::Store;
use ingest::IngestionPipeline;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::load()?;
    config.validate()?;

    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let fmt_layer = tracing_subscriber::fmt::layer();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_help();
        return Ok(());
    }

    match args[1].as_str() {
        "serve" | "daemon" | "-d" | "--daemon" => run_server(config).await,

        "import" => {
            if args.len() < 3 {
                println!("Usage: wordvault import <path> [--book <id>]");
                println!("Example: wordvault import corpus/CET4.jsonl --book CET4_1");
                anyhow::bail!("missing corpus file path");
            }
            let path = &args[2];
            let book_id = args
                .iter()
                .position(|a| a == "--book")
                .and_then(|i| args.get(i + 1))
                .map(String::as_str);
            cmd_import(path, book_id).await
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
    println!("Wordvault - Vocabulary Book Admin Console");
    println!();
    println!("USAGE:");
    println!("  wordvault <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("  serve, daemon     Run the admin API server");
    println!("  import <path>     Bulk-import a line-delimited JSON corpus file");
    println!("  init              Create default config file");
    println!("  help              Show this help message");
    println!();
    println!("IMPORT OPTIONS:");
    println!("  --book <id>       Force every imported word into this book");
    println!();
    println!("EXAMPLES:");
    println!("  wordvault serve                             # Start the API server");
    println!("  wordvault import corpus/CET4.jsonl          # Import a corpus file");
    println!("  wordvault import words.jsonl --book CET4_1  # Import into one book");
    println!();
    println!("CONFIG:");
    println!("  Edit config.toml to set the database URL, port, etc.");
    println!("  DATABASE_URL in the environment overrides the config file.");
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    info!(
        "Wordvault v{} starting in server mode...",
        env!("CARGO_PKG_VERSION")
    );

    let port = config.server.port;
    let state = api::create_app_state(config).await?;
    let app = api::router(state);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Admin API running at http://{addr}");

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

/// Offline counterpart of the upload endpoint. Requires `DATABASE_URL` so an
/// import never lands in an implicitly chosen database.
async fn cmd_import(path: &str, book_id: Option<&str>) -> anyhow::Result<()> {
    let db_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;

    let store = Store::new(&db_url).await?;

    let file = tokio::fs::File::open(path)
        .await
        .with_context(|| format!("Failed to open corpus file: {path}"))?;
    let reader = BufReader::new(file);

    println!("Importing {path}...");

    let pipeline = IngestionPipeline::new(store);
    let summary = pipeline
        .run(reader, book_id)
        .await
        .context("Import failed")?;

    println!("Import done. Total rows: {}", summary.inserted);
    if summary.skipped > 0 {
        println!("Skipped {} invalid lines.", summary.skipped);
    }

    Ok(())
}
