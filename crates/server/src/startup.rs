use std::{future::Future, net::SocketAddr, time::Duration};

use axum::Router;
use configs::AppConfig;
use tokio::{net::TcpListener, sync::watch};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("server address: {}", e)))
}

/// Resolves on Ctrl+C or, on unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };
    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C"),
        _ = terminate => info!("received SIGTERM"),
    }
}

/// Public entry: connect, migrate, build the app and serve until a shutdown signal.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    run_until(cfg, shutdown_signal()).await
}

pub async fn run_until<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let db = models::db::connect_with_config(&cfg.database).await?;
    if cfg.database.run_migrations {
        models::db::migrate(&db).await?;
        info!("database migrations applied");
    }

    let state = AppState::new(db, &cfg);
    let (stop_tx, stop_rx) = watch::channel(false);
    let sweeper = (cfg.reservation.expiry_sweep_secs > 0).then(|| {
        service::reservation::sweeper::spawn(
            state.reservations.clone(),
            Duration::from_secs(cfg.reservation.expiry_sweep_secs),
            stop_rx,
        )
    });

    let app: Router = routes::build_router(state, build_cors());
    let addr = bind_addr(&cfg)?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "library catalog listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;

    let _ = stop_tx.send(true);
    if let Some(handle) = sweeper {
        let _ = handle.await;
    }
    info!("library catalog stopped");
    Ok(())
}
