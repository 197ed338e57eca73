use sea_orm::sea_query::{extension::postgres::PgExpr, Expr};
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder};
use serde_json::json;
use uuid::Uuid;

use models::schema::{NewPost, NewTrip};
use models::{post, trip};

use crate::errors::ServiceError;
use crate::storage::SeaOrmStore;
use crate::trips::domain::{Post, Trip};
use crate::trips::repository::TripRepository;

fn to_trip(m: trip::Model) -> Trip {
    Trip {
        members: m.members(),
        itinerary: m.itinerary(),
        id: m.id,
        title: m.title,
        description: m.description,
        user_id: m.user_id,
        destination: m.destination,
        start_date: m.start_date.map(Into::into),
        end_date: m.end_date.map(Into::into),
        is_private: m.is_private,
        created_at: m.created_at.into(),
    }
}

fn to_post(m: post::Model) -> Post {
    Post {
        images: m.images(),
        id: m.id,
        user_id: m.user_id,
        trip_id: m.trip_id,
        content: m.content,
        created_at: m.created_at.into(),
    }
}

#[async_trait::async_trait]
impl TripRepository for SeaOrmStore {
    async fn insert_trip(&self, owner: Uuid, input: &NewTrip) -> Result<Trip, ServiceError> {
        Ok(to_trip(trip::create(&self.db, owner, input).await?))
    }

    async fn find_trip(&self, id: Uuid) -> Result<Option<Trip>, ServiceError> {
        Ok(trip::Entity::find_by_id(id).one(&self.db).await?.map(to_trip))
    }

    async fn list_visible_trips(&self, user: Uuid) -> Result<Vec<Trip>, ServiceError> {
        // members is jsonb; `@>` matches trips listing the user.
        let rows = trip::Entity::find()
            .filter(
                Condition::any()
                    .add(trip::Column::IsPrivate.eq(false))
                    .add(trip::Column::UserId.eq(user))
                    .add(PgExpr::contains(Expr::col(trip::Column::Members), Expr::val(json!([user.to_string()])))),
            )
            .order_by_desc(trip::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(to_trip).collect())
    }

    async fn insert_post(&self, author: Uuid, trip_id: Uuid, input: &NewPost) -> Result<Post, ServiceError> {
        Ok(to_post(post::create(&self.db, author, trip_id, input).await?))
    }

    async fn list_posts(&self, trip_id: Uuid) -> Result<Vec<Post>, ServiceError> {
        let rows = post::Entity::find()
            .filter(post::Column::TripId.eq(trip_id))
            .order_by_asc(post::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(to_post).collect())
    }
}
