use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::{
    AgendaGrid, AgendaSettings, ArtifactFormat, Break, ConfigError, Generation, RenderError,
    ScheduleConfig, clock,
};

#[derive(Clone)]
pub struct AppState {
    draft: Arc<RwLock<ScheduleConfig>>,
    settings: Arc<AgendaSettings>,
}

impl AppState {
    pub fn new(draft: ScheduleConfig, settings: AgendaSettings) -> Self {
        Self {
            draft: Arc::new(RwLock::new(draft)),
            settings: Arc::new(settings),
        }
    }

    fn draft(&self) -> Arc<RwLock<ScheduleConfig>> {
        self.draft.clone()
    }

    /// Compose from a snapshot so the lock is not held while rendering.
    fn compose(&self) -> Result<Generation, ApiError> {
        let snapshot = self.draft.read().clone();
        Generation::compose(&snapshot).map_err(ApiError::from)
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Invalid(String),
    Internal(String),
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }
}

impl From<ConfigError> for ApiError {
    fn from(value: ConfigError) -> Self {
        ApiError::Invalid(value.to_string())
    }
}

impl From<RenderError> for ApiError {
    fn from(value: RenderError) -> Self {
        tracing::error!(error = %value, "render failed");
        ApiError::Internal(value.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
            }
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct BreakPayload {
    name: String,
    start: String,
    end: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/config", get(get_config).put(replace_config))
        .route("/breaks", post(add_break))
        .route("/breaks/:id", delete(remove_break))
        .route("/grid", get(get_grid))
        .route("/render/:format", get(render_format))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "agenda-tool HTTP API listening");
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn get_config(State(state): State<AppState>) -> Json<ScheduleConfig> {
    let draft = state.draft();
    let current = draft.read().clone();
    Json(current)
}

async fn replace_config(
    State(state): State<AppState>,
    Json(config): Json<ScheduleConfig>,
) -> Result<Json<ScheduleConfig>, ApiError> {
    if let Err(err) = config.validate() {
        tracing::warn!(error = %err, "draft rejected");
        return Err(err.into());
    }
    let draft = state.draft();
    *draft.write() = config.clone();
    Ok(Json(config))
}

async fn add_break(
    State(state): State<AppState>,
    Json(payload): Json<BreakPayload>,
) -> Result<(StatusCode, Json<Break>), ApiError> {
    let start = clock::parse_clock(&payload.start)?;
    let end = clock::parse_clock(&payload.end)?;
    let draft = state.draft();
    let created = {
        let mut guard = draft.write();
        let id = guard.add_break(payload.name, start, end)?;
        guard
            .breaks
            .iter()
            .find(|b| b.id == id)
            .cloned()
            .ok_or_else(|| ApiError::Internal("break not found after creation".into()))?
    };
    Ok((StatusCode::CREATED, Json(created)))
}

async fn remove_break(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let draft = state.draft();
    let removed = draft.write().remove_break(id);
    match removed {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err(ApiError::not_found(format!("break {id} not found"))),
    }
}

async fn get_grid(State(state): State<AppState>) -> Result<Json<AgendaGrid>, ApiError> {
    let generation = state.compose()?;
    Ok(Json(generation.into_grid()))
}

async fn render_format(
    State(state): State<AppState>,
    Path(format): Path<String>,
) -> Result<Response, ApiError> {
    let format: ArtifactFormat = format
        .parse()
        .map_err(|err: crate::render::UnknownFormat| ApiError::not_found(err.to_string()))?;
    let generation = state.compose()?;
    let artifact = generation.render_format(format, &state.settings)?;
    Ok((
        [(header::CONTENT_TYPE, format.media_type())],
        artifact.encode(),
    )
        .into_response())
}
