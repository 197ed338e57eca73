use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::Value;

use service::messaging::Message;
use service::Actor;

use crate::errors::ApiError;
use crate::extract::{parse_id, JsonBody};
use crate::state::AppState;

#[utoipa::path(post, path = "/api/messages", tag = "messages", request_body = crate::openapi::MessageRequest, responses((status = 201, description = "Sent"), (status = 400, description = "Bad Request"), (status = 404, description = "Receiver or context not found")))]
pub async fn send(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    JsonBody(raw): JsonBody<Value>,
) -> Result<(StatusCode, Json<Message>), ApiError> {
    let message = state.messaging.send(&actor, &raw).await.map_err(|e| state.api_error(e))?;
    Ok((StatusCode::CREATED, Json(message)))
}

#[utoipa::path(get, path = "/api/messages", tag = "messages", responses((status = 200, description = "Unread messages addressed to the caller")))]
pub async fn inbox(State(state): State<AppState>, Extension(actor): Extension<Actor>) -> Result<Json<Vec<Message>>, ApiError> {
    let messages = state.messaging.list_inbox(&actor).await.map_err(|e| state.api_error(e))?;
    Ok(Json(messages))
}

#[utoipa::path(get, path = "/api/messages/{conversationId}", tag = "messages", params(("conversationId" = String, Path, description = "Conversation id")), responses((status = 200, description = "Messages, oldest first"), (status = 403, description = "Not a participant")))]
pub async fn conversation(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(conversation_id): Path<String>,
) -> Result<Json<Vec<Message>>, ApiError> {
    let messages = state.messaging.list_conversation(&actor, &conversation_id).await.map_err(|e| state.api_error(e))?;
    Ok(Json(messages))
}

#[utoipa::path(patch, path = "/api/messages/{id}/read", tag = "messages", params(("id" = String, Path, description = "Message id")), responses((status = 200, description = "Marked read"), (status = 403, description = "Not the receiver"), (status = 404, description = "Not Found")))]
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<Message>, ApiError> {
    let message = state.messaging.mark_read(&actor, parse_id(&id)?).await.map_err(|e| state.api_error(e))?;
    Ok(Json(message))
}
