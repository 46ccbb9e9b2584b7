use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hotelops_api::auth::bootstrap;
use hotelops_api::config::ServerConfig;
use hotelops_api::notifications::NotificationRouter;
use hotelops_api::router::build_app_router;
use hotelops_api::state::AppState;
use hotelops_db::Stores;
use hotelops_events::EventQueue;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hotelops_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env()?;
    tracing::info!(
        host = %config.host,
        port = config.port,
        transition_policy = ?config.transition_policy,
        "Loaded server configuration"
    );

    // --- Database ---
    let pool = hotelops_db::create_pool(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connection pool created");

    hotelops_db::health_check(&pool)
        .await
        .context("Database health check failed")?;
    tracing::info!("Database health check passed");

    hotelops_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    let stores = Stores::postgres(pool);

    if let Some(admin) = &config.bootstrap_admin {
        bootstrap::ensure_admin(stores.users.as_ref(), admin)
            .await
            .context("Failed to create bootstrap admin")?;
    }

    // --- Notification worker ---
    let (events, receiver) = EventQueue::new(config.notification_queue_capacity);
    let notification_router = NotificationRouter::new(stores.notifications.clone());
    let router_handle = tokio::spawn(notification_router.run(receiver));
    tracing::info!(
        capacity = config.notification_queue_capacity,
        "Notification router started"
    );

    // --- App ---
    let addr = SocketAddr::new(
        config.host.parse().context("Invalid HOST address")?,
        config.port,
    );
    let shutdown_timeout = Duration::from_secs(config.shutdown_timeout_secs);

    let state = AppState::new(stores, config.clone(), events);
    let app = build_app_router(state, &config)?;

    // --- Start server ---
    tracing::info!(%addr, "Starting server");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // --- Post-shutdown cleanup ---
    // The router (and with it every EventQueue handle) was dropped by
    // `serve`, so the worker drains what is left and exits.
    tracing::info!("Server stopped accepting connections, draining notification queue");
    match tokio::time::timeout(shutdown_timeout, router_handle).await {
        Ok(Ok(())) => tracing::info!("Notification router stopped"),
        Ok(Err(e)) => tracing::error!(error = %e, "Notification router task failed"),
        Err(_) => tracing::warn!(
            timeout_secs = shutdown_timeout.as_secs(),
            "Notification queue not drained before shutdown timeout"
        ),
    }

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
