use clap::Parser;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use florist_server::chatbot::openai::OpenAiClient;
use florist_server::db::schema;
use florist_server::server::config::ServerConfig;
use florist_server::services::auth_service;
use florist_server::web::{self, AppState};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<String>,
}

fn init_logging(log_dir: &str) {
    // Log to a file: JSON format, daily rotation
    let file_appender = rolling::daily(log_dir, "server.log");
    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .json();

    // Log to stdout: human-readable format
    let stdout_layer = fmt::layer().with_writer(std::io::stdout);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sea_orm=warn,sqlx::query=warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down."),
        Err(e) => error!(error = %e, "Failed to listen for Ctrl+C."),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    // Logging needs the configured directory, so configuration errors go to stderr.
    let server_config = match ServerConfig::load(args.config.as_deref()) {
        Ok(config) => Arc::new(config),
        Err(e) => {
            eprintln!("Failed to load server configuration: {e}");
            return Err(e.into());
        }
    };

    init_logging(&server_config.log_dir);
    info!(version = env!("CARGO_PKG_VERSION"), "Starting florist server.");
    rust_i18n::set_locale(&server_config.default_locale);

    // --- Database Setup ---
    let mut opt = ConnectOptions::new(server_config.database_url.clone());
    opt.max_connections(10);
    let db_pool: DatabaseConnection = Database::connect(opt).await.map_err(|e| {
        error!(error = %e, "Failed to create database connection.");
        e
    })?;

    schema::create_schema(&db_pool).await?;
    schema::seed_defaults(&db_pool).await?;

    match (
        server_config.admin_username.as_deref(),
        server_config.admin_password.as_deref(),
    ) {
        (Some(username), Some(password)) => {
            auth_service::bootstrap_admin(&db_pool, username, password).await?;
        }
        _ => info!("ADMIN_USERNAME/ADMIN_PASSWORD not set, skipping admin bootstrap."),
    }

    // --- Chat Provider ---
    if server_config.openai_api_key.is_none() {
        warn!("OPENAI_API_KEY is not set, the chatbot will answer with an apology.");
    }
    let chat_provider = Arc::new(OpenAiClient::new(
        server_config.openai_api_key.clone(),
        Some(server_config.openai_base_url.clone()),
        Some(server_config.openai_model.clone()),
    )?);

    let app_state = Arc::new(AppState {
        db_pool,
        chat_provider,
        config: server_config.clone(),
    });
    let app = web::create_axum_router(app_state);

    let listener = TcpListener::bind(&server_config.bind_address).await?;
    info!(address = %server_config.bind_address, "HTTP server listening.");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped.");
    Ok(())
}
