use chrono::{DateTime, Utc};
use models::schema::Role;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Login input. `identifier` may be a username or an email.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginInput {
    #[serde(alias = "username", alias = "email")]
    pub identifier: String,
    pub password: String,
}

/// Public-safe projection of a user: never carries the password.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub languages: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// A user together with the stored hash, for credential checks only.
#[derive(Clone)]
pub struct UserRecord {
    pub user: PublicUser,
    pub password_hash: String,
}

/// The authenticated user a request runs as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
}

impl Actor {
    pub fn is_admin(&self) -> bool { self.role.is_admin() }
}

/// Login result (session)
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub user: PublicUser,
    pub token: String,
}
