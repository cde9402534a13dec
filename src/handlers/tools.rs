use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;

use super::{check_auth, json_body};
use crate::errors::AppError;
use crate::models::{Directive, ToolCall};
use crate::services::instructions::{tool_catalogue, ToolDefinition};
use crate::state::AppState;

// GET /api/tools
pub async fn list_tools(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<ToolDefinition>>, AppError> {
    check_auth(&headers, &state.config.agent_token)?;
    Ok(Json(tool_catalogue()))
}

// POST /api/sessions/:id/tools/:tool
pub async fn invoke_tool(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((id, tool)): Path<(String, String)>,
    body: Bytes,
) -> Result<Json<Directive>, AppError> {
    check_auth(&headers, &state.config.agent_token)?;

    let call = ToolCall::parse(&tool, json_body(&body)?)?;
    tracing::info!(session_id = %id, tool = %tool, "tool call");

    match state.sessions.invoke(&id, call).await {
        Ok(directive) => Ok(Json(directive)),
        Err(e) => {
            tracing::warn!(session_id = %id, tool = %tool, error = %e, "tool call rejected");
            Err(e)
        }
    }
}
