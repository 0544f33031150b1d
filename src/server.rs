use std::sync::Arc;
use axum::{routing::{get, post}, Router, Json};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tower_http::cors::{CorsLayer, Any};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::sync::Notify;
use tracing::{info, warn};
use crate::applicator::ApplyReport;
use crate::folders::FolderRegistry;
use crate::interface::PreferencesInterface;
use crate::store::ConfigStore;

pub const API_VERSION: &str = "2.2.0";

#[derive(Serialize)]
pub struct PatchResponse {
    pub status: String,
    pub elapsed_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ApplyReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

struct AppState<S: ConfigStore, R: FolderRegistry> {
    interface: Arc<PreferencesInterface<S, R>>,
    shutdown: Arc<Notify>,
}

impl<S: ConfigStore, R: FolderRegistry> Clone for AppState<S, R> {
    fn clone(&self) -> Self {
        Self { interface: Arc::clone(&self.interface), shutdown: Arc::clone(&self.shutdown) }
    }
}

/// Routes of the application API. `shutdown` is notified when a client asks
/// the server to stop.
pub fn router<S, R>(interface: Arc<PreferencesInterface<S, R>>, shutdown: Arc<Notify>) -> Router
where
    S: ConfigStore + 'static,
    R: FolderRegistry + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers(Any);
    Router::new()
        .route("/api/v2/app/version", get(|| async { env!("CARGO_PKG_VERSION") }))
        .route("/api/v2/app/webapiVersion", get(|| async { API_VERSION }))
        .route("/api/v2/app/buildInfo", get(build_info))
        .route("/api/v2/app/preferences", get(preferences::<S, R>))
        .route("/api/v2/app/setPreferences", post(set_preferences::<S, R>))
        .route("/api/v2/app/defaultSavePath", get(default_save_path::<S, R>))
        .route("/api/v2/app/shutdown", post(request_shutdown::<S, R>))
        .layer(cors)
        .with_state(AppState { interface, shutdown })
}

async fn build_info() -> Json<Value> {
    Json(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "webapi": API_VERSION,
        "bitness": usize::BITS,
    }))
}

fn internal_error(e: impl std::fmt::Display) -> Response {
    warn!(error = %e, "request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
}

async fn preferences<S, R>(State(state): State<AppState<S, R>>) -> Response
where
    S: ConfigStore + 'static,
    R: FolderRegistry + 'static,
{
    let iface = Arc::clone(&state.interface);
    match tokio::task::spawn_blocking(move || iface.snapshot()).await {
        Ok(Ok(snapshot)) => Json(Value::Object(snapshot)).into_response(),
        Ok(Err(e)) => internal_error(e),
        Err(e) => internal_error(e),
    }
}

async fn set_preferences<S, R>(State(state): State<AppState<S, R>>, body: String) -> Response
where
    S: ConfigStore + 'static,
    R: FolderRegistry + 'static,
{
    // The pipeline is synchronous, so it runs on a blocking thread.
    let started = std::time::Instant::now();
    let iface = Arc::clone(&state.interface);
    let result = match tokio::task::spawn_blocking(move || iface.apply(&body)).await {
        Ok(result) => result,
        Err(e) => return internal_error(e),
    };
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    match result {
        Ok(report) => {
            let rejected = report.folders.as_ref().map_or(0, |f| f.rejected.len());
            info!(ms = elapsed_ms, applied = report.applied.len(), rejected, "patch complete");
            let body = PatchResponse { status: "ok".into(), elapsed_ms, report: Some(report), error: None };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            let status = if e.is_rejection() { StatusCode::BAD_REQUEST } else { StatusCode::INTERNAL_SERVER_ERROR };
            let msg = format!("{e}");
            warn!(%msg, code = %status.as_u16(), "patch rejected");
            let body = PatchResponse { status: "error".into(), elapsed_ms, report: None, error: Some(msg) };
            (status, Json(body)).into_response()
        }
    }
}

async fn default_save_path<S, R>(State(state): State<AppState<S, R>>) -> Response
where
    S: ConfigStore + 'static,
    R: FolderRegistry + 'static,
{
    let iface = Arc::clone(&state.interface);
    match tokio::task::spawn_blocking(move || iface.default_save_path()).await {
        Ok(Ok(path)) => path.into_response(),
        Ok(Err(e)) => internal_error(e),
        Err(e) => internal_error(e),
    }
}

async fn request_shutdown<S, R>(State(state): State<AppState<S, R>>) -> StatusCode
where
    S: ConfigStore + 'static,
    R: FolderRegistry + 'static,
{
    info!("shutdown requested through the API");
    state.shutdown.notify_one();
    StatusCode::OK
}
