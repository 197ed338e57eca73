use chrono::Utc;
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::schema::{AvailabilityWindow, NewService};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "services")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub price: Decimal,
    pub location: String,
    pub provider_id: Uuid,
    pub category: String,
    pub images: Json,
    pub availability: Json,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Provider,
    Bookings,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Provider => Entity::belongs_to(crate::user::Entity)
                .from(Column::ProviderId)
                .to(crate::user::Column::Id)
                .into(),
            Relation::Bookings => Entity::has_many(crate::booking::Entity).into(),
        }
    }
}

impl Related<crate::user::Entity> for Entity {
    fn to() -> RelationDef { Relation::Provider.def() }
}

impl Related<crate::booking::Entity> for Entity {
    fn to() -> RelationDef { Relation::Bookings.def() }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn images(&self) -> Vec<String> {
        serde_json::from_value(self.images.clone()).unwrap_or_default()
    }

    pub fn availability(&self) -> Vec<AvailabilityWindow> {
        serde_json::from_value(self.availability.clone()).unwrap_or_default()
    }
}

pub async fn create<C: ConnectionTrait>(db: &C, provider_id: Uuid, input: &NewService) -> Result<Model, ModelError> {
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(input.title.clone()),
        description: Set(input.description.clone()),
        price: Set(input.price),
        location: Set(input.location.clone()),
        provider_id: Set(provider_id),
        category: Set(input.category.clone()),
        images: Set(serde_json::json!(input.images)),
        availability: Set(serde_json::to_value(&input.availability).map_err(|e| ModelError::Validation(e.to_string()))?),
        created_at: Set(Utc::now().into()),
    };
    Ok(am.insert(db).await?)
}
