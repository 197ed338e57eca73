use sea_orm::EntityTrait;
use uuid::Uuid;

use models::schema::NewUser;
use models::user;

use crate::auth::domain::{PublicUser, UserRecord};
use crate::auth::repository::UserRepository;
use crate::errors::ServiceError;
use crate::storage::SeaOrmStore;

pub(crate) fn public_user(m: &user::Model) -> Result<PublicUser, ServiceError> {
    Ok(PublicUser {
        id: m.id,
        username: m.username.clone(),
        email: m.email.clone(),
        role: m.role()?,
        full_name: m.full_name.clone(),
        bio: m.bio.clone(),
        avatar: m.avatar.clone(),
        languages: m.languages(),
        created_at: m.created_at.into(),
    })
}

#[async_trait::async_trait]
impl UserRepository for SeaOrmStore {
    async fn insert_user(&self, input: &NewUser, password_hash: &str) -> Result<PublicUser, ServiceError> {
        let created = user::create(&self.db, input, password_hash).await?;
        public_user(&created)
    }

    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<UserRecord>, ServiceError> {
        match user::find_by_identifier(&self.db, identifier).await? {
            Some(m) => Ok(Some(UserRecord { user: public_user(&m)?, password_hash: m.password })),
            None => Ok(None),
        }
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<PublicUser>, ServiceError> {
        let found = user::Entity::find_by_id(id).one(&self.db).await?;
        found.as_ref().map(public_user).transpose()
    }
}
