use axum::{extract::State, http::StatusCode, Extension, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde_json::Value;

use service::auth::{AuthSession, LoginInput, PublicUser};
use service::Actor;

use crate::errors::ApiError;
use crate::extract::JsonBody;
use crate::session::SESSION_COOKIE;
use crate::state::AppState;

#[utoipa::path(post, path = "/api/auth/register", tag = "auth", request_body = crate::openapi::RegisterRequest, responses((status = 201, description = "Registered"), (status = 400, description = "Bad Request"), (status = 409, description = "Conflict")))]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(raw): JsonBody<Value>,
) -> Result<(StatusCode, Json<PublicUser>), ApiError> {
    let user = state.auth.register(&raw).await.map_err(|e| state.api_error(e))?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(post, path = "/api/auth/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged In"), (status = 401, description = "Unauthorized")))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(input): JsonBody<LoginInput>,
) -> Result<(CookieJar, Json<AuthSession>), ApiError> {
    let session = state.auth.login(input).await.map_err(|e| state.api_error(e))?;
    let mut cookie = Cookie::new(SESSION_COOKIE, session.token.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(state.environment.is_production());
    cookie.set_same_site(SameSite::Lax);
    Ok((jar.add(cookie), Json(session)))
}

#[utoipa::path(post, path = "/api/auth/logout", tag = "auth", responses((status = 204, description = "Session cleared")))]
pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    let jar = jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/"));
    (jar, StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/api/auth/me", tag = "auth", responses((status = 200, description = "Current user"), (status = 401, description = "Unauthorized")))]
pub async fn me(State(state): State<AppState>, Extension(actor): Extension<Actor>) -> Result<Json<PublicUser>, ApiError> {
    let user = state.auth.current_user(&actor).await.map_err(|e| state.api_error(e))?;
    Ok(Json(user))
}
