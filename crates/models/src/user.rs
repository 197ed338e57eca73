use chrono::Utc;
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::schema::{NewUser, Role};

/// Stored account. Deliberately not `Serialize`: the password hash must
/// only leave this crate through an explicit projection.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password: String,
    pub role: String,
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub languages: Json,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Services,
    Bookings,
    Trips,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Services => Entity::has_many(crate::service::Entity).into(),
            Relation::Bookings => Entity::has_many(crate::booking::Entity).into(),
            Relation::Trips => Entity::has_many(crate::trip::Entity).into(),
        }
    }
}

impl Related<crate::service::Entity> for Entity {
    fn to() -> RelationDef { Relation::Services.def() }
}

impl Related<crate::booking::Entity> for Entity {
    fn to() -> RelationDef { Relation::Bookings.def() }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn role(&self) -> Result<Role, ModelError> {
        self.role.parse().map_err(|e: crate::schema::types::UnknownVariant| ModelError::Validation(e.to_string()))
    }

    pub fn languages(&self) -> Vec<String> {
        serde_json::from_value(self.languages.clone()).unwrap_or_default()
    }
}

/// Insert a validated registration. `password_hash` replaces the plain
/// password carried by `input`.
pub async fn create<C: ConnectionTrait>(db: &C, input: &NewUser, password_hash: &str) -> Result<Model, ModelError> {
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        username: Set(input.username.clone()),
        email: Set(input.email.clone()),
        password: Set(password_hash.to_string()),
        role: Set(input.role.as_str().to_string()),
        full_name: Set(input.full_name.clone()),
        bio: Set(input.bio.clone()),
        avatar: Set(input.avatar.clone()),
        languages: Set(serde_json::json!(input.languages)),
        created_at: Set(Utc::now().into()),
    };
    Ok(am.insert(db).await?)
}

/// Usernames never contain `@`, so an identifier with one is an email.
pub fn is_email_identifier(identifier: &str) -> bool { identifier.contains('@') }

/// Exact match on email (case-insensitive) or on username, never both.
pub async fn find_by_identifier<C: ConnectionTrait>(db: &C, identifier: &str) -> Result<Option<Model>, ModelError> {
    let identifier = identifier.trim();
    let filter = if is_email_identifier(identifier) {
        Column::Email.eq(identifier.to_lowercase())
    } else {
        Column::Username.eq(identifier)
    };
    Ok(Entity::find().filter(filter).one(db).await?)
}
