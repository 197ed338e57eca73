use chrono::Utc;
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::schema::NewPost;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub trip_id: Uuid,
    pub content: String,
    pub images: Json,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Author,
    Trip,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Author => Entity::belongs_to(crate::user::Entity)
                .from(Column::UserId)
                .to(crate::user::Column::Id)
                .into(),
            Relation::Trip => Entity::belongs_to(crate::trip::Entity)
                .from(Column::TripId)
                .to(crate::trip::Column::Id)
                .into(),
        }
    }
}

impl Related<crate::trip::Entity> for Entity {
    fn to() -> RelationDef { Relation::Trip.def() }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn images(&self) -> Vec<String> {
        serde_json::from_value(self.images.clone()).unwrap_or_default()
    }
}

pub async fn create<C: ConnectionTrait>(db: &C, author: Uuid, trip_id: Uuid, input: &NewPost) -> Result<Model, ModelError> {
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(author),
        trip_id: Set(trip_id),
        content: Set(input.content.clone()),
        images: Set(serde_json::json!(input.images)),
        created_at: Set(Utc::now().into()),
    };
    Ok(am.insert(db).await?)
}
