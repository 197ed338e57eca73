use chrono::{DateTime, Utc};
use sea_orm::{entity::prelude::*, sea_query::Expr, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::schema::BookingStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub service_id: Uuid,
    pub start_date: DateTimeWithTimeZone,
    pub end_date: Option<DateTimeWithTimeZone>,
    pub status: String,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub total_price: Decimal,
    pub notes: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    User,
    Service,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(crate::user::Entity)
                .from(Column::UserId)
                .to(crate::user::Column::Id)
                .into(),
            Relation::Service => Entity::belongs_to(crate::service::Entity)
                .from(Column::ServiceId)
                .to(crate::service::Column::Id)
                .into(),
        }
    }
}

impl Related<crate::user::Entity> for Entity {
    fn to() -> RelationDef { Relation::User.def() }
}

impl Related<crate::service::Entity> for Entity {
    fn to() -> RelationDef { Relation::Service.def() }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn status(&self) -> Result<BookingStatus, ModelError> {
        self.status.parse().map_err(|e: crate::schema::types::UnknownVariant| ModelError::Validation(e.to_string()))
    }
}

/// Row values for a new booking; price is computed by the caller.
pub struct BookingRow {
    pub user_id: Uuid,
    pub service_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub total_price: Decimal,
    pub notes: Option<String>,
}

pub async fn create<C: ConnectionTrait>(db: &C, row: BookingRow) -> Result<Model, ModelError> {
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(row.user_id),
        service_id: Set(row.service_id),
        start_date: Set(row.start_date.into()),
        end_date: Set(row.end_date.map(Into::into)),
        status: Set(BookingStatus::Pending.as_str().to_string()),
        total_price: Set(row.total_price),
        notes: Set(row.notes),
        created_at: Set(Utc::now().into()),
    };
    Ok(am.insert(db).await?)
}

/// Single conditional `UPDATE ... WHERE id = $1 AND status IN (...)`.
/// Returns the number of rows changed (0 or 1).
pub async fn transition<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    from: &[BookingStatus],
    to: BookingStatus,
) -> Result<u64, ModelError> {
    let res = Entity::update_many()
        .col_expr(Column::Status, Expr::value(to.as_str()))
        .filter(Column::Id.eq(id))
        .filter(Column::Status.is_in(from.iter().map(|s| s.as_str())))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}
