use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, instrument};

use models::schema::{NewUser, Schema};

use super::domain::{Actor, AuthSession, LoginInput, PublicUser};
use super::password::{hash_password, verify_password};
use super::repository::UserRepository;
use super::token::TokenSettings;
use crate::errors::ServiceError;

/// Auth business service independent of web framework
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: TokenSettings,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, tokens: TokenSettings) -> Self { Self { users, tokens } }

    /// Register a new user with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, TokenSettings};
    /// use service::storage::memory::InMemoryStore;
    /// use std::sync::Arc;
    /// let store = Arc::new(InMemoryStore::default());
    /// let svc = AuthService::new(store, TokenSettings::new("secret", 12));
    /// let raw = serde_json::json!({"username": "ana", "email": "ana@example.com", "password": "Secret123"});
    /// let user = tokio_test::block_on(svc.register(&raw)).unwrap();
    /// assert_eq!(user.email, "ana@example.com");
    /// ```
    #[instrument(skip_all)]
    pub async fn register(&self, raw: &Value) -> Result<PublicUser, ServiceError> {
        let input = NewUser::parse(raw)?;
        for identifier in [&input.username, &input.email] {
            if self.users.find_by_identifier(identifier).await?.is_some() {
                debug!(identifier = %identifier, "user exists");
                return Err(ServiceError::Conflict("username or email already registered".into()));
            }
        }

        let hash = hash_password(&input.password)?;
        let user = self.users.insert_user(&input, &hash).await?;
        info!(user_id = %user.id, username = %user.username, role = %user.role, "user_registered");
        Ok(user)
    }

    /// Authenticate by username or email and issue a session token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, LoginInput, TokenSettings};
    /// use service::storage::memory::InMemoryStore;
    /// use std::sync::Arc;
    /// let svc = AuthService::new(Arc::new(InMemoryStore::default()), TokenSettings::new("secret", 12));
    /// let raw = serde_json::json!({"username": "ben", "email": "ben@example.com", "password": "Passw0rd"});
    /// let _ = tokio_test::block_on(svc.register(&raw));
    /// let login = LoginInput { identifier: "ben@example.com".into(), password: "Passw0rd".into() };
    /// let session = tokio_test::block_on(svc.login(login)).unwrap();
    /// assert_eq!(session.user.username, "ben");
    /// assert!(!session.token.is_empty());
    /// ```
    #[instrument(skip(self, input), fields(identifier = %input.identifier))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, ServiceError> {
        let invalid = || ServiceError::Unauthorized("invalid credentials".into());
        let record = self.users.find_by_identifier(&input.identifier).await?.ok_or_else(invalid)?;
        if !verify_password(&input.password, &record.password_hash)? {
            return Err(invalid());
        }
        let token = self.tokens.issue(&record.user)?;
        info!(user_id = %record.user.id, "user_logged_in");
        Ok(AuthSession { user: record.user, token })
    }

    #[instrument(skip(self), fields(user_id = %actor.id))]
    pub async fn current_user(&self, actor: &Actor) -> Result<PublicUser, ServiceError> {
        self.users
            .find_user(actor.id)
            .await?
            .ok_or_else(|| ServiceError::Unauthorized("session user no longer exists".into()))
    }

    pub fn decode_token(&self, token: &str) -> Result<Actor, ServiceError> { self.tokens.decode(token) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::InMemoryStore;
    use models::schema::Role;
    use serde_json::json;

    fn service() -> (Arc<InMemoryStore>, AuthService) {
        let store = Arc::new(InMemoryStore::default());
        (store.clone(), AuthService::new(store, TokenSettings::new("test-secret", 12)))
    }

    fn alice() -> Value {
        json!({"username": "alice", "email": "alice@example.com", "password": "secret1", "role": "provider"})
    }

    #[tokio::test]
    async fn duplicate_username_or_email_conflicts_without_new_row() {
        let (store, svc) = service();
        svc.register(&alice()).await.unwrap();

        let same_name = json!({"username": "alice", "email": "other@example.com", "password": "secret1"});
        let same_mail = json!({"username": "alice2", "email": "alice@example.com", "password": "secret1"});
        assert!(matches!(svc.register(&same_name).await, Err(ServiceError::Conflict(_))));
        assert!(matches!(svc.register(&same_mail).await, Err(ServiceError::Conflict(_))));
        assert_eq!(store.user_count().await, 1);
    }

    #[tokio::test]
    async fn projection_never_carries_password() {
        let (_, svc) = service();
        let user = svc.register(&alice()).await.unwrap();
        let v = serde_json::to_value(&user).unwrap();
        assert!(v.get("password").is_none());
        assert_eq!(v["role"], "provider");
        assert!(!v.to_string().contains("secret1"));
    }

    #[tokio::test]
    async fn login_accepts_username_or_email() {
        let (_, svc) = service();
        let user = svc.register(&alice()).await.unwrap();
        for identifier in ["alice", "alice@example.com"] {
            let session = svc
                .login(LoginInput { identifier: identifier.into(), password: "secret1".into() })
                .await
                .unwrap();
            assert_eq!(session.user.id, user.id);
            let actor = svc.decode_token(&session.token).unwrap();
            assert_eq!(actor, Actor { id: user.id, role: Role::Provider });
        }
    }

    #[tokio::test]
    async fn identifier_with_at_sign_matches_email_only() {
        let (store, _) = service();
        let odd = store.seed_user("dana@example.com", Role::User).await;
        let dana = store.seed_user("dana", Role::User).await;

        let by_mail = store.find_by_identifier(" Dana@Example.com ").await.unwrap().unwrap();
        assert_eq!(by_mail.user.id, dana.id);
        let by_name = store.find_by_identifier("dana").await.unwrap().unwrap();
        assert_eq!(by_name.user.id, dana.id);
        assert_ne!(odd.id, dana.id);
        assert!(store.find_by_identifier("dana@example.com@example.com").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn wrong_password_or_unknown_user_is_unauthorized() {
        let (_, svc) = service();
        svc.register(&alice()).await.unwrap();
        let bad = svc.login(LoginInput { identifier: "alice".into(), password: "nope".into() }).await;
        assert!(matches!(bad, Err(ServiceError::Unauthorized(_))));
        let ghost = svc.login(LoginInput { identifier: "ghost".into(), password: "secret1".into() }).await;
        assert!(matches!(ghost, Err(ServiceError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn invalid_registration_is_a_validation_error() {
        let (store, svc) = service();
        let err = svc.register(&json!({"username": "x", "email": "bad", "password": "1"})).await.unwrap_err();
        match err {
            ServiceError::Validation(f) => assert_eq!(f.violations.len(), 3),
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(store.user_count().await, 0);
    }

    #[tokio::test]
    async fn current_user_reads_the_actor() {
        let (_, svc) = service();
        let user = svc.register(&alice()).await.unwrap();
        let me = svc.current_user(&Actor { id: user.id, role: user.role }).await.unwrap();
        assert_eq!(me, user);
    }
}
