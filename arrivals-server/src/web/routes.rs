//! HTTP route handlers.

use std::path::Path as FsPath;
use std::sync::Arc;

use askama::Template;
use axum::{
    Form, Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use tower_http::services::ServeDir;
use tracing::{debug, error, warn};

use crate::domain::{InvalidStationId, StationId, select_display_predictions};
use crate::mbta::MbtaError;
use crate::stations::StationDirectory;
use crate::view::{NO_ARRIVALS_NOTICE, PredictionsView, SessionId, ViewEvent, ViewSession};

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: impl AsRef<FsPath>) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/view/:session/selection", post(change_selection))
        .route("/view/:session/predictions", get(board_fragment))
        .route("/api/stations", get(list_stations))
        .route("/api/predictions", get(station_predictions))
        .nest_service("/static", ServeDir::new(static_dir.as_ref()))
        .fallback(not_found)
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Open a new board view and render it once the station list is in.
async fn index_page(State(state): State<AppState>) -> Result<Response, AppError> {
    let session = state.sessions.create().await;
    debug!(session = %session.id(), live = state.sessions.len(), "opened view");

    if let Some(handle) = session.dispatch(ViewEvent::Activated) {
        if let Err(e) = handle.await {
            error!(session = %session.id(), error = %e, "station fetch task failed");
        }
    }

    let page = IndexTemplate::new(session.id(), &session.snapshot(), &Utc::now());
    render(&page)
}

/// Change the selected station of a view.
///
/// Responds with the board straight away; it shows the spinner until the
/// fetch lands.
async fn change_selection(
    State(state): State<AppState>,
    Path(session): Path<String>,
    headers: HeaderMap,
    Form(form): Form<SelectionForm>,
) -> Result<Response, AppError> {
    let session = find_session(&state, &session).await?;

    let stop = form.stop.trim();
    let selection = if stop.is_empty() {
        None
    } else {
        let id = StationId::parse(stop)?;
        if let Some(directory) = session.snapshot().directory() {
            if directory.get(&id).is_none() {
                return Err(AppError::BadRequest {
                    message: format!("Unknown stop: {}", id),
                });
            }
        }
        Some(id)
    };

    debug!(session = %session.id(), stop, "selection changed");
    // The fetch runs on its own; its result is picked up by polling the board.
    let _fetch = session.dispatch(ViewEvent::SelectionChanged(selection));

    board_response(&session, &headers)
}

/// Current predictions board of a view.
async fn board_fragment(
    State(state): State<AppState>,
    Path(session): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let session = find_session(&state, &session).await?;
    board_response(&session, &headers)
}

/// Rail and subway stations, sorted by name.
async fn list_stations(State(state): State<AppState>) -> Result<Json<StationsResponse>, AppError> {
    let directory = StationDirectory::fetch(state.api.as_ref()).await?;

    let stations = directory
        .stations()
        .iter()
        .map(StationResult::from_station)
        .collect();

    Ok(Json(StationsResponse { stations }))
}

/// Arrivals in the next hour at one stop, without a view.
async fn station_predictions(
    State(state): State<AppState>,
    Query(query): Query<PredictionsQuery>,
) -> Result<Json<BoardResponse>, AppError> {
    let stop = StationId::parse(query.stop.trim())?;
    let raw = state.api.fetch_predictions(&stop).await?;

    let arrivals = select_display_predictions(&raw, &Utc::now());
    let view = if arrivals.is_empty() {
        PredictionsView::Empty {
            notice: NO_ARRIVALS_NOTICE,
        }
    } else {
        PredictionsView::Arrivals(arrivals)
    };

    Ok(Json(BoardResponse::from_view(&view, None)))
}

/// Fallback for unknown paths.
async fn not_found(headers: HeaderMap) -> Response {
    let message = "No such page.".to_string();

    if accepts_html(&headers) {
        let page = ErrorTemplate {
            title: "Not Found".to_string(),
            message,
        };
        match page.render() {
            Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
            Err(e) => AppError::Internal {
                message: format!("Template error: {}", e),
            }
            .into_response(),
        }
    } else {
        AppError::NotFound { message }.into_response()
    }
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

async fn find_session(state: &AppState, raw: &str) -> Result<Arc<ViewSession>, AppError> {
    let not_found = || AppError::NotFound {
        message: format!("View {} not found or expired", raw),
    };

    let id: SessionId = raw.parse().map_err(|_| not_found())?;
    state.sessions.get(&id).await.ok_or_else(not_found)
}

/// Render a view's board as HTML or JSON based on the Accept header.
fn board_response(session: &ViewSession, headers: &HeaderMap) -> Result<Response, AppError> {
    let snapshot = session.snapshot();
    let now = Utc::now();

    if accepts_html(headers) {
        render(&BoardTemplate {
            board: BoardView::from_state(&snapshot, &now),
        })
    } else {
        let view = snapshot.predictions_view(&now);
        Ok(Json(BoardResponse::from_view(&view, snapshot.selected_station())).into_response())
    }
}

fn render(template: &impl Template) -> Result<Response, AppError> {
    let html = template.render().map_err(|e| AppError::Internal {
        message: format!("Template error: {}", e),
    })?;
    Ok(Html(html).into_response())
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Upstream { message: String },
    Internal { message: String },
}

impl From<InvalidStationId> for AppError {
    fn from(e: InvalidStationId) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<MbtaError> for AppError {
    fn from(e: MbtaError) -> Self {
        match e {
            MbtaError::Config(message) => AppError::Internal { message },
            other => AppError::Upstream {
                message: other.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Upstream { message } => (StatusCode::BAD_GATEWAY, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            warn!(%status, %message, "request failed");
        } else {
            debug!(%status, %message, "request rejected");
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
