//! Where Is This Class - classroom directions service.
//!
//! This binary loads configuration, connects to PostgreSQL and starts the
//! HTTP server.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use where_is_this_class::{create_router, Config, PgClassroomStore};

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    let config = Config::parse();
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Starting where-is-this-class v{}", env!("CARGO_PKG_VERSION"));
    match config.cors_origins {
        Some(ref origins) => info!("  CORS origins: {}", origins.join(", ")),
        None => info!("  CORS origins: any (credentials disabled)"),
    }
    if config.cookie_insecure {
        warn!("  Session cookies are sent WITHOUT the Secure attribute");
        warn!("        Only use COOKIE_INSECURE for local development");
    }

    info!("Connecting to database...");
    let connect = PgClassroomStore::connect(&config.database_url, config.db_max_connections);
    let store = match connect.await {
        Ok(store) => {
            info!("  Connected (pool size {})", config.db_max_connections);
            store
        }
        Err(e) => {
            error!("  Failed to connect to database: {}", e);
            error!("  Please check that DATABASE_URL is correct and the server is reachable");
            return ExitCode::FAILURE;
        }
    };

    let router = create_router(store, config.router_config());

    let addr = config.bind_address();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    info!("Server listening on: http://{}", addr);
    info!("  curl http://{}/healthcheck", addr);
    info!("  curl 'http://{}/classrooms/A204?language=en'", addr);

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "where_is_this_class=debug,tower_http=debug"
    } else {
        "where_is_this_class=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
