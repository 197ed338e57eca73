use chrono::{DateTime, Utc};
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::schema::NewTrip;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "trips")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub user_id: Uuid,
    pub destination: String,
    pub start_date: Option<DateTimeWithTimeZone>,
    pub end_date: Option<DateTimeWithTimeZone>,
    pub is_private: bool,
    pub members: Json,
    pub itinerary: Json,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Owner,
    Posts,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Owner => Entity::belongs_to(crate::user::Entity)
                .from(Column::UserId)
                .to(crate::user::Column::Id)
                .into(),
            Relation::Posts => Entity::has_many(crate::post::Entity).into(),
        }
    }
}

impl Related<crate::user::Entity> for Entity {
    fn to() -> RelationDef { Relation::Owner.def() }
}

impl Related<crate::post::Entity> for Entity {
    fn to() -> RelationDef { Relation::Posts.def() }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn members(&self) -> Vec<Uuid> {
        serde_json::from_value(self.members.clone()).unwrap_or_default()
    }

    pub fn itinerary(&self) -> Vec<serde_json::Value> {
        serde_json::from_value(self.itinerary.clone()).unwrap_or_default()
    }
}

pub async fn create<C: ConnectionTrait>(db: &C, owner: Uuid, input: &NewTrip) -> Result<Model, ModelError> {
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(input.title.clone()),
        description: Set(input.description.clone()),
        user_id: Set(owner),
        destination: Set(input.destination.clone()),
        start_date: Set(input.start_date.map(|d: DateTime<Utc>| d.into())),
        end_date: Set(input.end_date.map(|d: DateTime<Utc>| d.into())),
        is_private: Set(input.is_private),
        members: Set(serde_json::json!(input.members)),
        itinerary: Set(serde_json::Value::Array(input.itinerary.clone())),
        created_at: Set(Utc::now().into()),
    };
    Ok(am.insert(db).await?)
}
