//! Gallery application entry point.
//!
//! Boots the configured backend stack, establishes the anonymous session,
//! materializes the first gallery page, and serves the HTTP API.

use dotenv::dotenv;
use gallery_app::{Dependencies, GalleryError};
use std::env;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gallery_app=info"));

    if env::var("GALLERY_LOG_JSON").is_ok() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), GalleryError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing();

    info!(
        service_version = env!("CARGO_PKG_VERSION"),
        "Starting gallery"
    );

    let deps = match Dependencies::new().await {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            deps
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    // Materialize the first page before accepting requests. A failure here
    // is logged, not fatal: the view stays empty until the next refresh.
    {
        let mut view = deps.state.view.lock().await;
        if let Err(e) = view.refresh(&deps.state.planner).await {
            error!(error = %e, "Initial gallery load failed");
        }
    }

    let listener = tokio::net::TcpListener::bind(&deps.bind_addr).await?;
    info!(addr = %deps.bind_addr, "Gallery API listening");

    axum::serve(listener, gallery_app::http::router(deps.state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gallery shut down");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
