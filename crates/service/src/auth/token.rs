use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use models::schema::Role;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::domain::{Actor, PublicUser};
use crate::errors::ServiceError;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    role: String,
    iat: i64,
    exp: i64,
}

/// HS256 signing settings.
#[derive(Clone)]
pub struct TokenSettings {
    pub secret: String,
    pub ttl_hours: i64,
}

impl TokenSettings {
    pub fn new(secret: impl Into<String>, ttl_hours: i64) -> Self {
        Self { secret: secret.into(), ttl_hours }
    }

    pub fn issue(&self, user: &PublicUser) -> Result<String, ServiceError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            role: user.role.as_str().to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.ttl_hours)).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(self.secret.as_bytes()))
            .map_err(|e| ServiceError::Internal(format!("token error: {e}")))
    }

    /// Verify signature and expiry.
    pub fn decode(&self, token: &str) -> Result<Actor, ServiceError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|_| ServiceError::Unauthorized("invalid or expired session".into()))?;
        let id = Uuid::parse_str(&data.claims.sub)
            .map_err(|_| ServiceError::Unauthorized("invalid session subject".into()))?;
        let role = data
            .claims
            .role
            .parse::<Role>()
            .map_err(|_| ServiceError::Unauthorized("invalid session role".into()))?;
        Ok(Actor { id, role })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> PublicUser {
        PublicUser {
            id: Uuid::new_v4(),
            username: "carol".into(),
            email: "carol@example.com".into(),
            role: Role::Expert,
            full_name: None,
            bio: None,
            avatar: None,
            languages: vec![],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn issued_token_decodes_to_actor() {
        let settings = TokenSettings::new("test-secret", 1);
        let u = user();
        let actor = settings.decode(&settings.issue(&u).unwrap()).unwrap();
        assert_eq!(actor, Actor { id: u.id, role: Role::Expert });
    }

    #[test]
    fn wrong_secret_or_expired_token_is_unauthorized() {
        let token = TokenSettings::new("one", 1).issue(&user()).unwrap();
        assert!(matches!(TokenSettings::new("two", 1).decode(&token), Err(ServiceError::Unauthorized(_))));

        let expired = TokenSettings::new("one", -2).issue(&user()).unwrap();
        assert!(matches!(TokenSettings::new("one", 1).decode(&expired), Err(ServiceError::Unauthorized(_))));
    }
}
