use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::{check_auth, json_body};
use crate::errors::AppError;
use crate::models::{BookingState, SessionSnapshot};
use crate::services::instructions::{agent_instructions, GREETING};
use crate::state::AppState;

#[derive(Deserialize, Default)]
pub struct CreateSession {
    pub session_id: Option<String>,
}

#[derive(Serialize)]
pub struct SessionCreated {
    pub session_id: String,
    pub state: BookingState,
    pub instructions: String,
    pub greeting: &'static str,
}

// POST /api/sessions
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<SessionCreated>), AppError> {
    check_auth(&headers, &state.config.agent_token)?;

    let request: CreateSession = match json_body(&body)? {
        serde_json::Value::Null => CreateSession::default(),
        value => serde_json::from_value(value).map_err(|e| AppError::BadRequest(e.to_string()))?,
    };

    let session_id = state.sessions.create(request.session_id)?;
    let now = chrono::Local::now().naive_local();

    Ok((
        StatusCode::CREATED,
        Json(SessionCreated {
            session_id,
            state: BookingState::Discovery,
            instructions: agent_instructions(now),
            greeting: GREETING,
        }),
    ))
}

// GET /api/sessions/:id
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<SessionSnapshot>, AppError> {
    check_auth(&headers, &state.config.agent_token)?;
    Ok(Json(state.sessions.snapshot(&id).await?))
}

// DELETE /api/sessions/:id
pub async fn end_session(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    check_auth(&headers, &state.config.agent_token)?;
    if state.sessions.end(&id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::SessionNotFound(id))
    }
}
