use clap::{Parser, Subcommand};
use mira_core::config::{DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_ID};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod gateway;
mod render;
mod util;

use commands::ask::AskArgs;
use commands::save::SaveArgs;
use commands::search::SearchArgs;

#[derive(Parser)]
#[command(name = "mira", version, about = "Mira: chat with the property discovery assistant")]
struct Cli {
    /// Backend base URL
    #[arg(long, env = "MIRA_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// User the saves are recorded for (placeholder until the backend has auth)
    #[arg(long, env = "MIRA_USER_ID", default_value = DEFAULT_USER_ID)]
    user_id: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "MIRA_API_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat session
    Chat,
    /// Ask one question, or run one quick-filter search, and print the transcript
    Ask(AskArgs),
    /// Search listings directly, without the assistant
    Search(SearchArgs),
    /// Save a listing for the current user
    Save(SaveArgs),
    /// List the current user's saved listings
    Saved,
    /// Check that the backend is reachable
    Health,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "mira_cli=warn,mira_core=warn".into());
    let json = std::env::var("MIRA_LOG_JSON")
        .map(|v| v == "true")
        .unwrap_or(false);

    // Logs go to stderr so stdout stays clean JSON / chat output.
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() {
    // Load .env if present (dev only)
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();
    let conn = util::connect(&cli.api_url, cli.timeout_secs, &cli.user_id);

    let code = match cli.command {
        Commands::Chat => commands::chat::run(conn).await,
        Commands::Ask(args) => commands::ask::run(conn, args).await,
        Commands::Search(args) => commands::search::run(conn, args).await,
        Commands::Save(args) => commands::save::save(conn, args).await,
        Commands::Saved => commands::save::saved(conn).await,
        Commands::Health => commands::health::run(conn).await,
    };

    std::process::exit(code);
}
