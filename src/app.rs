use crate::session::{RecommendationSession, RefreshOutcome};
use crate::tmdb::{DiscoveryApi, TmdbClient};
use crate::view::CardView;
use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<RecommendationSession>,
}

impl AppState {
    pub fn new(discovery: Arc<dyn DiscoveryApi>) -> Self {
        Self {
            session: Arc::new(RecommendationSession::new(discovery)),
        }
    }
}

pub async fn run_server() -> Result<()> {
    let tmdb: Arc<dyn DiscoveryApi> = Arc::new(TmdbClient::from_env()?);
    let app = build_router(AppState::new(tmdb));

    let addr = SocketAddr::from(([0, 0, 0, 0], 3146));
    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/movie", get(current_card))
        .route("/refresh", post(refresh))
        .route("/reveal", post(toggle_reveal))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

async fn current_card(State(state): State<AppState>) -> Json<CardView> {
    Json(card(&state))
}

async fn refresh(State(state): State<AppState>) -> (StatusCode, Json<CardView>) {
    let status = match state.session.refresh().await {
        RefreshOutcome::Updated => StatusCode::OK,
        RefreshOutcome::Failed(_) => StatusCode::BAD_GATEWAY,
        RefreshOutcome::Ignored => StatusCode::CONFLICT,
    };
    (status, Json(card(&state)))
}

async fn toggle_reveal(State(state): State<AppState>) -> (StatusCode, Json<CardView>) {
    let status = match state.session.toggle_reveal() {
        Some(revealed) => {
            debug!(revealed, "Card flipped");
            StatusCode::OK
        }
        None => StatusCode::CONFLICT,
    };
    (status, Json(card(&state)))
}

fn card(state: &AppState) -> CardView {
    CardView::from_state(&state.session.snapshot())
}

/// Resolves on Ctrl+C or SIGTERM. A refresh already running is left to finish
/// on its own task.
async fn shutdown_signal() {
    let source = stop_requested().await;
    info!(source, "Stopping recommendation server");
}

#[cfg(unix)]
async fn stop_requested() -> &'static str {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => tokio::select! {
            _ = tokio::signal::ctrl_c() => "ctrl-c",
            _ = sigterm.recv() => "sigterm",
        },
        Err(e) => {
            warn!("SIGTERM listener unavailable ({}), waiting for Ctrl+C only", e);
            ctrl_c_only().await
        }
    }
}

#[cfg(not(unix))]
async fn stop_requested() -> &'static str {
    ctrl_c_only().await
}

async fn ctrl_c_only() -> &'static str {
    match tokio::signal::ctrl_c().await {
        Ok(()) => "ctrl-c",
        Err(e) => {
            warn!("Ctrl+C listener unavailable ({}), running until killed", e);
            std::future::pending().await
        }
    }
}
