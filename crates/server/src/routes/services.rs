use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use futures::TryStreamExt;
use serde_json::Value;

use service::catalog::{Service, ServiceFilter};
use service::Actor;

use crate::errors::ApiError;
use crate::extract::{parse_id, JsonBody, QueryParams};
use crate::state::AppState;

#[utoipa::path(get, path = "/api/services", tag = "services", params(crate::openapi::ServiceQuery), responses((status = 200, description = "Matching services")))]
pub async fn list(
    State(state): State<AppState>,
    QueryParams(filter): QueryParams<ServiceFilter>,
) -> Result<Json<Vec<Service>>, ApiError> {
    let services = state.catalog.list_services(filter).try_collect().await.map_err(|e| state.api_error(e))?;
    Ok(Json(services))
}

#[utoipa::path(post, path = "/api/services", tag = "services", request_body = crate::openapi::ServiceRequest, responses((status = 201, description = "Created"), (status = 403, description = "Forbidden")))]
pub async fn create(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    JsonBody(raw): JsonBody<Value>,
) -> Result<(StatusCode, Json<Service>), ApiError> {
    let service = state.catalog.create_service(&actor, &raw).await.map_err(|e| state.api_error(e))?;
    Ok((StatusCode::CREATED, Json(service)))
}

#[utoipa::path(get, path = "/api/services/{id}", tag = "services", params(("id" = String, Path, description = "Service id")), responses((status = 200, description = "Service"), (status = 404, description = "Not Found")))]
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Service>, ApiError> {
    let id = parse_id(&id)?;
    let service = state.catalog.get_service(id).await.map_err(|e| state.api_error(e))?;
    Ok(Json(service))
}
