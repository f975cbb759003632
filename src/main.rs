use anyhow::Context;
use clap::Parser;
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bot_api::config::Settings;
use bot_api::database::{ensure_schema, DatabaseManager};
use bot_api::{app, AppState, Stores};

#[derive(Parser, Debug)]
#[command(name = "bot-api", version, about = "Typed REST API for the community bot")]
struct Cli {
    /// Address to listen on
    #[arg(long, env = "BIND_ADDRESS", default_value = "0.0.0.0:8000")]
    bind: SocketAddr,

    /// Serve from in-process stores instead of Postgres
    #[arg(long)]
    in_memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so DATABASE_URL, AUTH_TOKEN, etc. can live there in development.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bot_api=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    let settings = Settings::from_env().context("failed to load settings")?;
    info!(environment = ?settings.environment, debug = settings.debug, "Starting bot-api");

    let database = if cli.in_memory {
        None
    } else {
        let database = DatabaseManager::connect_lazy(&settings.database_url, &settings.database)
            .context("failed to configure the database pool")?;
        if settings.database.create_schema {
            ensure_schema(database.pool())
                .await
                .context("failed to create database schema")?;
        }
        Some(database)
    };

    let stores = match &database {
        Some(database) => Stores::postgres(database),
        None => Stores::in_memory(),
    };
    let state = AppState::new(settings, stores).context("failed to configure the legacy API proxy")?;

    let listener = tokio::net::TcpListener::bind(cli.bind)
        .await
        .with_context(|| format!("failed to bind {}", cli.bind))?;
    info!(address = %cli.bind, "Listening");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(database) = database {
        database.close().await;
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
