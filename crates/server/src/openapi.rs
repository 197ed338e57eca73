//! OpenAPI document. Request bodies are validated from untyped JSON, so the
//! schemas here only describe the wire shape.

use serde::Deserialize;
use utoipa::{IntoParams, OpenApi, ToSchema};

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub environment: String,
    pub timestamp: String,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    /// user | expert | provider | admin
    pub role: Option<String>,
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub languages: Option<Vec<String>>,
}

#[derive(ToSchema)]
pub struct LoginRequest {
    /// Username or email.
    pub username: String,
    pub password: String,
}

#[derive(ToSchema)]
pub struct WindowDoc {
    pub start: String,
    pub end: String,
}

#[derive(ToSchema)]
pub struct ServiceRequest {
    pub title: String,
    pub description: Option<String>,
    /// Decimal as number or string, at most two places.
    pub price: String,
    pub location: String,
    pub category: String,
    pub images: Option<Vec<String>>,
    pub availability: Option<Vec<WindowDoc>>,
}

#[derive(IntoParams)]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct ServiceQuery {
    pub category: Option<String>,
    pub location: Option<String>,
    pub provider_id: Option<String>,
    pub max_price: Option<String>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub service_id: String,
    pub start_date: String,
    pub end_date: Option<String>,
    pub notes: Option<String>,
    pub quantity: Option<u32>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmRequest {
    pub payment_reference: Option<String>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageRequest {
    pub receiver_id: String,
    pub message: String,
    /// expert_inquiry | trip_discussion | booking_support | admin_notice
    pub message_type: String,
    pub context_id: Option<String>,
    /// trip | booking | service
    pub context_type: Option<String>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TripRequest {
    pub title: String,
    pub destination: String,
    pub description: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub is_private: Option<bool>,
    pub members: Option<Vec<String>>,
}

#[derive(ToSchema)]
pub struct PostRequest {
    pub content: String,
    pub images: Option<Vec<String>>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::auth::me,
        crate::routes::services::list,
        crate::routes::services::create,
        crate::routes::services::get,
        crate::routes::bookings::create,
        crate::routes::bookings::list,
        crate::routes::bookings::get,
        crate::routes::bookings::confirm,
        crate::routes::bookings::cancel,
        crate::routes::bookings::complete,
        crate::routes::messages::send,
        crate::routes::messages::inbox,
        crate::routes::messages::conversation,
        crate::routes::messages::mark_read,
        crate::routes::trips::create,
        crate::routes::trips::list,
        crate::routes::trips::get,
        crate::routes::trips::create_post,
        crate::routes::trips::list_posts,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            WindowDoc,
            ServiceRequest,
            BookingRequest,
            ConfirmRequest,
            MessageRequest,
            TripRequest,
            PostRequest,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "services"),
        (name = "bookings"),
        (name = "messages"),
        (name = "trips")
    )
)]
pub struct ApiDoc;
