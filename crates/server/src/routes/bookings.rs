use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::Value;

use service::booking::Booking;
use service::Actor;

use crate::errors::ApiError;
use crate::extract::{optional_json, parse_id, JsonBody};
use crate::state::AppState;

/// Optional body of the confirm call.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmInput {
    pub payment_reference: Option<String>,
}

#[utoipa::path(post, path = "/api/bookings", tag = "bookings", request_body = crate::openapi::BookingRequest, responses((status = 201, description = "Created"), (status = 400, description = "Bad Request"), (status = 404, description = "Service not found")))]
pub async fn create(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    JsonBody(raw): JsonBody<Value>,
) -> Result<(StatusCode, Json<Booking>), ApiError> {
    let booking = state.bookings.create(&actor, &raw).await.map_err(|e| state.api_error(e))?;
    Ok((StatusCode::CREATED, Json(booking)))
}

#[utoipa::path(get, path = "/api/bookings", tag = "bookings", responses((status = 200, description = "The caller's bookings")))]
pub async fn list(State(state): State<AppState>, Extension(actor): Extension<Actor>) -> Result<Json<Vec<Booking>>, ApiError> {
    let bookings = state.bookings.list_bookings(&actor).await.map_err(|e| state.api_error(e))?;
    Ok(Json(bookings))
}

#[utoipa::path(get, path = "/api/bookings/{id}", tag = "bookings", params(("id" = String, Path, description = "Booking id")), responses((status = 200, description = "Booking"), (status = 403, description = "Forbidden"), (status = 404, description = "Not Found")))]
pub async fn get(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<Booking>, ApiError> {
    let booking = state.bookings.get_booking(&actor, parse_id(&id)?).await.map_err(|e| state.api_error(e))?;
    Ok(Json(booking))
}

#[utoipa::path(patch, path = "/api/bookings/{id}/confirm", tag = "bookings", params(("id" = String, Path, description = "Booking id")), request_body = crate::openapi::ConfirmRequest, responses((status = 200, description = "Confirmed"), (status = 404, description = "Not Found"), (status = 409, description = "Not pending")))]
pub async fn confirm(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Booking>, ApiError> {
    let id = parse_id(&id)?;
    let input: ConfirmInput = optional_json(&body)?;
    let booking = state
        .bookings
        .confirm(&actor, id, input.payment_reference.as_deref())
        .await
        .map_err(|e| state.api_error(e))?;
    Ok(Json(booking))
}

#[utoipa::path(patch, path = "/api/bookings/{id}/cancel", tag = "bookings", params(("id" = String, Path, description = "Booking id")), responses((status = 200, description = "Cancelled"), (status = 404, description = "Not Found"), (status = 409, description = "Already final")))]
pub async fn cancel(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<Booking>, ApiError> {
    let booking = state.bookings.cancel(&actor, parse_id(&id)?).await.map_err(|e| state.api_error(e))?;
    Ok(Json(booking))
}

#[utoipa::path(patch, path = "/api/bookings/{id}/complete", tag = "bookings", params(("id" = String, Path, description = "Booking id")), responses((status = 200, description = "Completed"), (status = 404, description = "Not Found"), (status = 409, description = "Not confirmed or not yet over")))]
pub async fn complete(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<Booking>, ApiError> {
    let booking = state.bookings.complete(&actor, parse_id(&id)?).await.map_err(|e| state.api_error(e))?;
    Ok(Json(booking))
}
