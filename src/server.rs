//! HTTP transport for game sessions.
//!
//! Every accepted request answers with the full [`Snapshot`]; clients
//! adopt it wholesale.

use crate::session::{Player, PlayerId, Scores, SessionError, SessionId, SessionManager};
use axum::{
    Json, Router,
    body::Body,
    extract::{Path, State},
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use eos_rules::{Action, Snapshot};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tracing::{error, info, instrument, warn};

/// Body of `POST /sessions`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    /// Requested session id; generated when absent.
    #[serde(default)]
    pub session_id: Option<SessionId>,
}

/// Reply to `POST /sessions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionResponse {
    /// Id of the new session.
    pub session_id: SessionId,
}

/// Body of `POST /sessions/{id}/players`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinRequest {
    /// Player's unique ID.
    pub player_id: PlayerId,
    /// Display name.
    pub name: String,
}

/// Body of `POST /sessions/{id}/actions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRequest {
    /// Acting player.
    pub player_id: PlayerId,
    /// The requested action.
    pub action: Action,
}

/// Body of `POST /sessions/{id}/resign`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResignRequest {
    /// Resigning player.
    pub player_id: PlayerId,
}

/// Error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable reason.
    pub error: String,
}

impl SessionError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            SessionError::SessionNotFound { .. } => StatusCode::NOT_FOUND,
            SessionError::SessionExists { .. }
            | SessionError::SeatsTaken
            | SessionError::DuplicatePlayer { .. }
            | SessionError::GameOver => StatusCode::CONFLICT,
            SessionError::UnknownPlayer { .. } | SessionError::NotYourTurn { .. } => {
                StatusCode::FORBIDDEN
            }
            SessionError::Illegal(_) => StatusCode::UNPROCESSABLE_ENTITY,
            SessionError::Engine(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Session request failed");
        }
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Builds the application router over `manager`.
pub fn router(manager: SessionManager) -> Router {
    Router::new()
        .route("/sessions", post(create_session).get(list_sessions))
        .route("/sessions/{id}", get(get_snapshot).delete(remove_session))
        .route("/sessions/{id}/players", post(join_session))
        .route("/sessions/{id}/actions", post(submit_action))
        .route("/sessions/{id}/resign", post(resign))
        .route("/sessions/{id}/score", get(get_scores))
        .layer(ServiceBuilder::new().map_request(|req: Request<Body>| {
            info!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
            req
        }))
        .with_state(manager)
}

/// Binds `address` and serves until the process exits.
#[instrument(skip(manager))]
pub async fn serve(address: &str, manager: SessionManager) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(address).await?;
    info!(address = %listener.local_addr()?, "EOS server listening");
    axum::serve(listener, router(manager)).await?;
    warn!("Server stopped");
    Ok(())
}

async fn create_session(
    State(manager): State<SessionManager>,
    body: Option<Json<CreateSessionRequest>>,
) -> Result<(StatusCode, Json<CreateSessionResponse>), SessionError> {
    let request = body.map(|Json(b)| b).unwrap_or_default();
    let session_id = manager.create_session(request.session_id)?;
    Ok((StatusCode::CREATED, Json(CreateSessionResponse { session_id })))
}

async fn list_sessions(State(manager): State<SessionManager>) -> Json<Vec<SessionId>> {
    Json(manager.list_sessions())
}

async fn get_snapshot(
    State(manager): State<SessionManager>,
    Path(id): Path<SessionId>,
) -> Result<Json<Snapshot>, SessionError> {
    manager.snapshot(&id).map(Json)
}

async fn remove_session(
    State(manager): State<SessionManager>,
    Path(id): Path<SessionId>,
) -> Result<StatusCode, SessionError> {
    manager.remove_session(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn join_session(
    State(manager): State<SessionManager>,
    Path(id): Path<SessionId>,
    Json(request): Json<JoinRequest>,
) -> Result<(StatusCode, Json<Player>), SessionError> {
    let player = manager.register_player(&id, request.player_id, request.name)?;
    Ok((StatusCode::CREATED, Json(player)))
}

async fn submit_action(
    State(manager): State<SessionManager>,
    Path(id): Path<SessionId>,
    Json(request): Json<ActionRequest>,
) -> Result<Json<Snapshot>, SessionError> {
    manager
        .act(&id, &request.player_id, request.action)
        .map(Json)
}

async fn resign(
    State(manager): State<SessionManager>,
    Path(id): Path<SessionId>,
    Json(request): Json<ResignRequest>,
) -> Result<Json<Snapshot>, SessionError> {
    manager.resign(&id, &request.player_id).map(Json)
}

async fn get_scores(
    State(manager): State<SessionManager>,
    Path(id): Path<SessionId>,
) -> Result<Json<Scores>, SessionError> {
    manager.scores(&id).map(Json)
}
