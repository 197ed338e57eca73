use std::sync::Arc;

use serde_json::Value;
use tracing::{info, instrument};
use uuid::Uuid;

use models::schema::{NewPost, NewTrip, Schema};

use super::domain::{Post, Trip};
use super::repository::TripRepository;
use crate::auth::domain::Actor;
use crate::auth::repository::UserRepository;
use crate::errors::ServiceError;

pub struct TripService {
    trips: Arc<dyn TripRepository>,
    users: Arc<dyn UserRepository>,
}

impl TripService {
    pub fn new(trips: Arc<dyn TripRepository>, users: Arc<dyn UserRepository>) -> Self { Self { trips, users } }

    #[instrument(skip(self, raw), fields(user_id = %actor.id))]
    pub async fn create_trip(&self, actor: &Actor, raw: &Value) -> Result<Trip, ServiceError> {
        let input = NewTrip::parse(raw)?;
        for member in &input.members {
            if self.users.find_user(*member).await?.is_none() {
                return Err(ServiceError::NotFound(format!("member {member} not found")));
            }
        }
        let trip = self.trips.insert_trip(actor.id, &input).await?;
        info!(trip_id = %trip.id, private = trip.is_private, members = trip.members.len(), "trip_created");
        Ok(trip)
    }

    pub async fn get_trip(&self, actor: &Actor, id: Uuid) -> Result<Trip, ServiceError> {
        let trip = self.trips.find_trip(id).await?.ok_or_else(|| ServiceError::not_found("trip"))?;
        if !trip.visible_to(actor) {
            return Err(ServiceError::Forbidden("this trip is private".into()));
        }
        Ok(trip)
    }

    pub async fn list_trips(&self, actor: &Actor) -> Result<Vec<Trip>, ServiceError> {
        self.trips.list_visible_trips(actor.id).await
    }

    #[instrument(skip(self, raw), fields(user_id = %actor.id))]
    pub async fn create_post(&self, actor: &Actor, trip_id: Uuid, raw: &Value) -> Result<Post, ServiceError> {
        let trip = self.trips.find_trip(trip_id).await?.ok_or_else(|| ServiceError::not_found("trip"))?;
        if !trip.is_participant(actor.id) {
            return Err(ServiceError::Forbidden("only trip members can post".into()));
        }
        let input = NewPost::parse(raw)?;
        let post = self.trips.insert_post(actor.id, trip.id, &input).await?;
        info!(post_id = %post.id, trip_id = %trip.id, "post_created");
        Ok(post)
    }

    pub async fn list_posts(&self, actor: &Actor, trip_id: Uuid) -> Result<Vec<Post>, ServiceError> {
        let trip = self.get_trip(actor, trip_id).await?;
        self.trips.list_posts(trip.id).await
    }
}
