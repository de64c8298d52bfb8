use std::sync::Arc;

use clap::Parser;
use dotenv::dotenv;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::Commands;
use shared_api::{ApiClient, MemorySessionStore, SessionStore};
use shared_config::AppConfig;

#[derive(Parser)]
#[command(name = "wecure")]
#[command(version = "0.1.0")]
#[command(about = "Manage doctor availability and look up bookable slots", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// API base URL (overrides WECURE_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Access token (overrides WECURE_ACCESS_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Logs go to stderr so stdout stays pipeable JSON
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::from_env();
    if let Some(api_url) = cli.api_url {
        config.api_base_url = api_url;
    }
    if let Some(token) = cli.token {
        config.access_token = Some(token);
    }

    let session = Arc::new(MemorySessionStore::from_config(&config));
    if let Some(user) = session.user() {
        info!(
            "Signed in as {} ({})",
            user.email.as_deref().unwrap_or(&user.id),
            user.role.as_deref().unwrap_or("unknown role")
        );
    }

    let client = ApiClient::new(&config)?.with_session(session.clone());
    let auth = session.auth_context();

    match commands::run(cli.command, client, &auth).await {
        Ok(()) => Ok(()),
        Err(e) if e.is_unauthorized() => {
            error!("{}", e);
            anyhow::bail!("Session expired, log in again")
        }
        Err(e) => Err(anyhow::anyhow!(e.user_message())),
    }
}
