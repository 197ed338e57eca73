use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::auth::domain::Actor;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub user_id: Uuid,
    pub destination: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_private: bool,
    pub members: Vec<Uuid>,
    pub itinerary: Vec<Value>,
    pub created_at: DateTime<Utc>,
}

impl Trip {
    pub fn is_participant(&self, user: Uuid) -> bool { self.user_id == user || self.members.contains(&user) }

    pub fn visible_to(&self, actor: &Actor) -> bool {
        !self.is_private || actor.is_admin() || self.is_participant(actor.id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub trip_id: Uuid,
    pub content: String,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
}
