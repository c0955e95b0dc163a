//! Router assembly and serving

use anyhow::Result;
use axum::Router;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::apartments::handlers::{self, AppState};

/// Build the application router
///
/// Static segments win over parameter segments, so `/apartments/all` and
/// `/apartments/images/...` are matched before `/apartments/{id}`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/apartments",
            post(handlers::create_apartment).get(handlers::list_apartments),
        )
        .route("/apartments/all", get(handlers::list_all_apartments))
        .route(
            "/apartments/images/{apartment_id}/{file}",
            get(handlers::get_image),
        )
        .route("/apartments/{id}", get(handlers::get_apartment))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Serve the application with graceful shutdown
///
/// Binds the provided address and handles SIGTERM and Ctrl+C.
pub async fn serve(state: AppState, addr: &str) -> Result<()> {
    let app = build_router(state);
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
