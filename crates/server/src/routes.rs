use axum::{
    extract::State,
    middleware,
    routing::{get, patch, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::errors::ApiError;
use crate::headers::security_headers;
use crate::openapi::ApiDoc;
use crate::session::require_session;
use crate::state::AppState;

pub mod auth;
pub mod bookings;
pub mod messages;
pub mod services;
pub mod trips;

#[utoipa::path(get, path = "/api/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health::ok(state.environment.as_str()))
}

async fn api_not_found() -> ApiError {
    ApiError::not_found("no such endpoint")
}

/// Build the full application router: public and authenticated API routes,
/// the OpenAPI document, and optionally the static client bundle.
pub fn build_router(state: AppState, cors: CorsLayer, static_dir: Option<&str>) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/services", get(services::list))
        .route("/services/:id", get(services::get));

    let protected = Router::new()
        .route("/auth/me", get(auth::me))
        .route("/services", post(services::create))
        .route("/bookings", post(bookings::create).get(bookings::list))
        .route("/bookings/:id", get(bookings::get))
        .route("/bookings/:id/confirm", patch(bookings::confirm))
        .route("/bookings/:id/cancel", patch(bookings::cancel))
        .route("/bookings/:id/complete", patch(bookings::complete))
        .route("/messages", post(messages::send).get(messages::inbox))
        .route("/messages/:id", get(messages::conversation))
        .route("/messages/:id/read", patch(messages::mark_read))
        .route("/trips", post(trips::create).get(trips::list))
        .route("/trips/:id", get(trips::get))
        .route("/trips/:id/posts", post(trips::create_post).get(trips::list_posts))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    let api = public.merge(protected).fallback(api_not_found);

    let mut app = Router::new()
        .nest("/api", api)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    if let Some(dir) = static_dir {
        let index = format!("{}/index.html", dir.trim_end_matches('/'));
        app = app.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)));
    }

    app.with_state(state)
        .layer(middleware::from_fn(security_headers))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
