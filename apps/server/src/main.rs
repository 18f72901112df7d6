//! # Khalkhal POS Server
//!
//! HTTP API for the shop screens.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Khalkhal Server                               │
//! │                                                                     │
//! │  Screens ───► HTTP/JSON (8080) ───► routes ───► khalkhal-db ───►    │
//! │                                        │            SQLite          │
//! │                                        ▼                            │
//! │                                  khalkhal-core                      │
//! │                              (cart, money, stats)                   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

mod auth;
mod config;
mod error;
mod routes;
mod state;

use chrono::Utc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use khalkhal_db::repository::user::{generate_user_id, User};
use khalkhal_db::{Database, DbConfig};

use crate::auth::JwtManager;
use crate::config::ServerConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("Starting Khalkhal POS server...");

    let config = ServerConfig::load()?;
    info!(
        port = config.http_port,
        db_path = %config.database_path.display(),
        "Configuration loaded"
    );

    let db = Database::new(DbConfig::new(&config.database_path)).await?;
    info!("Database ready");

    seed_admin_user(&db, &config).await?;

    let jwt = JwtManager::new(config.jwt_secret.clone(), config.jwt_lifetime_secs);
    let state = AppState::new(db.clone(), jwt, config.upload_dir.clone());

    let app = routes::app_router(state);

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Creates the admin account on first run so the shop can log in to an
/// otherwise empty database.
async fn seed_admin_user(
    db: &Database,
    config: &ServerConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    if db.users().count().await? > 0 {
        return Ok(());
    }

    let user = User {
        id: generate_user_id(),
        email: config.admin_email.trim().to_lowercase(),
        password_hash: routes::auth::hash_password(&config.admin_password)?,
        created_at: Utc::now(),
    };
    db.users().insert(&user).await?;

    info!(email = %user.email, "Seeded admin account");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
