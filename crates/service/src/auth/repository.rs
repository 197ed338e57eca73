use async_trait::async_trait;
use models::schema::NewUser;
use uuid::Uuid;

use super::domain::{PublicUser, UserRecord};
use crate::errors::ServiceError;

/// Repository abstraction for user persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert with an already hashed password. A taken username or email
    /// is a `Conflict`.
    async fn insert_user(&self, input: &NewUser, password_hash: &str) -> Result<PublicUser, ServiceError>;

    /// Resolve by username or email.
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<UserRecord>, ServiceError>;

    async fn find_user(&self, id: Uuid) -> Result<Option<PublicUser>, ServiceError>;
}
