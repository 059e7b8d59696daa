//! usergate server entry point.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use usergate::api::{AppState, create_router};
use usergate::auth::{AuthState, TokenCodec};
use usergate::config::AppConfig;
use usergate::db::Database;
use usergate::user::{UserRepository, UserService};

#[derive(Debug, Parser)]
#[command(name = "usergate", version, about = "User-management REST API")]
struct Cli {
    /// Override the config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve,
}

fn init_logging(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("usergate={level},tower_http={level}")));

    if cli.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .ok();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Serve => serve(config).await,
    }
}

async fn serve(config: AppConfig) -> Result<()> {
    let secret = config.auth.validated_secret()?;

    let db = Database::new(&config.database.path).await?;
    let users = UserService::new(UserRepository::new(db.pool().clone()));
    let auth = AuthState::new(TokenCodec::new(&secret, config.auth.token_ttl_secs));

    let app = create_router(AppState::new(users, auth));

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("parsing bind address")?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding to {addr}"))?;

    info!("listening on {}", addr);
    axum::serve(listener, app).await.context("serving HTTP")?;

    Ok(())
}
