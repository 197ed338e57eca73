use async_trait::async_trait;
use models::booking::BookingRow;
use models::schema::BookingStatus;
use uuid::Uuid;

use super::domain::Booking;
use crate::errors::ServiceError;

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Missing user or service rows surface as `NotFound`.
    async fn insert_booking(&self, row: BookingRow) -> Result<Booking, ServiceError>;

    async fn find_booking(&self, id: Uuid) -> Result<Option<Booking>, ServiceError>;

    /// Move to `to` only if the current status is one of `from`, in a
    /// single atomic write. Returns the number of rows changed.
    async fn transition_status(&self, id: Uuid, from: &[BookingStatus], to: BookingStatus) -> Result<u64, ServiceError>;

    /// Newest first.
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Booking>, ServiceError>;
}
