use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::Value;

use service::trips::{Post, Trip};
use service::Actor;

use crate::errors::ApiError;
use crate::extract::{parse_id, JsonBody};
use crate::state::AppState;

#[utoipa::path(post, path = "/api/trips", tag = "trips", request_body = crate::openapi::TripRequest, responses((status = 201, description = "Created"), (status = 400, description = "Bad Request"), (status = 404, description = "Member not found")))]
pub async fn create(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    JsonBody(raw): JsonBody<Value>,
) -> Result<(StatusCode, Json<Trip>), ApiError> {
    let trip = state.trips.create_trip(&actor, &raw).await.map_err(|e| state.api_error(e))?;
    Ok((StatusCode::CREATED, Json(trip)))
}

#[utoipa::path(get, path = "/api/trips", tag = "trips", responses((status = 200, description = "Trips visible to the caller")))]
pub async fn list(State(state): State<AppState>, Extension(actor): Extension<Actor>) -> Result<Json<Vec<Trip>>, ApiError> {
    let trips = state.trips.list_trips(&actor).await.map_err(|e| state.api_error(e))?;
    Ok(Json(trips))
}

#[utoipa::path(get, path = "/api/trips/{id}", tag = "trips", params(("id" = String, Path, description = "Trip id")), responses((status = 200, description = "Trip"), (status = 403, description = "Private trip"), (status = 404, description = "Not Found")))]
pub async fn get(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<Trip>, ApiError> {
    let trip = state.trips.get_trip(&actor, parse_id(&id)?).await.map_err(|e| state.api_error(e))?;
    Ok(Json(trip))
}

#[utoipa::path(post, path = "/api/trips/{id}/posts", tag = "trips", params(("id" = String, Path, description = "Trip id")), request_body = crate::openapi::PostRequest, responses((status = 201, description = "Created"), (status = 403, description = "Not a participant"), (status = 404, description = "Not Found")))]
pub async fn create_post(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    JsonBody(raw): JsonBody<Value>,
) -> Result<(StatusCode, Json<Post>), ApiError> {
    let post = state.trips.create_post(&actor, parse_id(&id)?, &raw).await.map_err(|e| state.api_error(e))?;
    Ok((StatusCode::CREATED, Json(post)))
}

#[utoipa::path(get, path = "/api/trips/{id}/posts", tag = "trips", params(("id" = String, Path, description = "Trip id")), responses((status = 200, description = "Posts, oldest first"), (status = 403, description = "Private trip"), (status = 404, description = "Not Found")))]
pub async fn list_posts(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Post>>, ApiError> {
    let posts = state.trips.list_posts(&actor, parse_id(&id)?).await.map_err(|e| state.api_error(e))?;
    Ok(Json(posts))
}
