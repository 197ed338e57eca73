use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use models::booking::{self, BookingRow};
use models::schema::BookingStatus;

use crate::booking::domain::Booking;
use crate::booking::repository::BookingRepository;
use crate::errors::ServiceError;
use crate::storage::SeaOrmStore;

fn to_booking(m: booking::Model) -> Result<Booking, ServiceError> {
    Ok(Booking {
        status: m.status()?,
        id: m.id,
        user_id: m.user_id,
        service_id: m.service_id,
        start_date: m.start_date.into(),
        end_date: m.end_date.map(Into::into),
        total_price: m.total_price,
        notes: m.notes,
        created_at: m.created_at.into(),
    })
}

#[async_trait::async_trait]
impl BookingRepository for SeaOrmStore {
    async fn insert_booking(&self, row: BookingRow) -> Result<Booking, ServiceError> {
        to_booking(booking::create(&self.db, row).await?)
    }

    async fn find_booking(&self, id: Uuid) -> Result<Option<Booking>, ServiceError> {
        booking::Entity::find_by_id(id).one(&self.db).await?.map(to_booking).transpose()
    }

    async fn transition_status(&self, id: Uuid, from: &[BookingStatus], to: BookingStatus) -> Result<u64, ServiceError> {
        Ok(booking::transition(&self.db, id, from, to).await?)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Booking>, ServiceError> {
        booking::Entity::find()
            .filter(booking::Column::UserId.eq(user_id))
            .order_by_desc(booking::Column::CreatedAt)
            .all(&self.db)
            .await?
            .into_iter()
            .map(to_booking)
            .collect()
    }
}
