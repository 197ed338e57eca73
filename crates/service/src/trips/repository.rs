use async_trait::async_trait;
use models::schema::{NewPost, NewTrip};
use uuid::Uuid;

use super::domain::{Post, Trip};
use crate::errors::ServiceError;

#[async_trait]
pub trait TripRepository: Send + Sync {
    async fn insert_trip(&self, owner: Uuid, input: &NewTrip) -> Result<Trip, ServiceError>;

    async fn find_trip(&self, id: Uuid) -> Result<Option<Trip>, ServiceError>;

    /// Public trips plus those `user` owns or belongs to, newest first.
    async fn list_visible_trips(&self, user: Uuid) -> Result<Vec<Trip>, ServiceError>;

    async fn insert_post(&self, author: Uuid, trip_id: Uuid, input: &NewPost) -> Result<Post, ServiceError>;

    /// Oldest first.
    async fn list_posts(&self, trip_id: Uuid) -> Result<Vec<Post>, ServiceError>;
}
