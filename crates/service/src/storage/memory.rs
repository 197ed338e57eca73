use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use futures::stream::{self, BoxStream, StreamExt};
use tokio::sync::RwLock;
use uuid::Uuid;

use models::booking::BookingRow;
use models::schema::{BookingStatus, MessageStatus, NewMessage, NewPost, NewService, NewTrip, NewUser, Role};

use crate::auth::domain::{Actor, PublicUser, UserRecord};
use crate::auth::repository::UserRepository;
use crate::booking::domain::Booking;
use crate::booking::repository::BookingRepository;
use crate::catalog::domain::{Service, ServiceFilter};
use crate::catalog::repository::CatalogRepository;
use crate::errors::ServiceError;
use crate::messaging::domain::Message;
use crate::messaging::repository::MessageRepository;
use crate::trips::domain::{Post, Trip};
use crate::trips::repository::TripRepository;

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, UserRecord>,
    services: Vec<Service>,
    bookings: HashMap<Uuid, Booking>,
    trips: Vec<Trip>,
    posts: Vec<Post>,
    messages: Vec<Message>,
}

impl Tables {
    fn require_user(&self, id: Uuid) -> Result<(), ServiceError> {
        if self.users.contains_key(&id) {
            Ok(())
        } else {
            Err(ServiceError::NotFound(format!("referenced record not found: user {id}")))
        }
    }
}

/// Process-local store for tests and database-less runs.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub async fn user_count(&self) -> usize { self.tables.read().await.users.len() }

    /// Insert a user without credentials and return it as an actor.
    pub async fn seed_user(&self, username: &str, role: Role) -> Actor {
        let id = Uuid::new_v4();
        let user = PublicUser {
            id,
            username: username.to_string(),
            email: format!("{username}@example.com"),
            role,
            full_name: None,
            bio: None,
            avatar: None,
            languages: Vec::new(),
            created_at: Utc::now(),
        };
        self.tables.write().await.users.insert(id, UserRecord { user, password_hash: String::new() });
        Actor { id, role }
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert_user(&self, input: &NewUser, password_hash: &str) -> Result<PublicUser, ServiceError> {
        let mut tables = self.tables.write().await;
        let taken = tables
            .users
            .values()
            .any(|r| r.user.username == input.username || r.user.email == input.email);
        if taken {
            return Err(ServiceError::Conflict("already exists: username or email".into()));
        }
        let user = PublicUser {
            id: Uuid::new_v4(),
            username: input.username.clone(),
            email: input.email.clone(),
            role: input.role,
            full_name: input.full_name.clone(),
            bio: input.bio.clone(),
            avatar: input.avatar.clone(),
            languages: input.languages.clone(),
            created_at: Utc::now(),
        };
        tables.users.insert(user.id, UserRecord { user: user.clone(), password_hash: password_hash.to_string() });
        Ok(user)
    }

    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<UserRecord>, ServiceError> {
        let identifier = identifier.trim();
        let by_email = models::user::is_email_identifier(identifier);
        let email = identifier.to_lowercase();
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|r| if by_email { r.user.email == email } else { r.user.username == identifier })
            .cloned())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<PublicUser>, ServiceError> {
        Ok(self.tables.read().await.users.get(&id).map(|r| r.user.clone()))
    }
}

#[async_trait]
impl CatalogRepository for InMemoryStore {
    async fn insert_service(&self, provider_id: Uuid, input: &NewService) -> Result<Service, ServiceError> {
        let mut tables = self.tables.write().await;
        tables.require_user(provider_id)?;
        let service = Service {
            id: Uuid::new_v4(),
            title: input.title.clone(),
            description: input.description.clone(),
            price: input.price,
            location: input.location.clone(),
            provider_id,
            category: input.category.clone(),
            images: input.images.clone(),
            availability: input.availability.clone(),
            created_at: Utc::now(),
        };
        tables.services.push(service.clone());
        Ok(service)
    }

    async fn find_service(&self, id: Uuid) -> Result<Option<Service>, ServiceError> {
        Ok(self.tables.read().await.services.iter().find(|s| s.id == id).cloned())
    }

    fn stream_services(&self, filter: ServiceFilter) -> BoxStream<'_, Result<Service, ServiceError>> {
        stream::once(async move {
            let tables = self.tables.read().await;
            let matching: Vec<Result<Service, ServiceError>> =
                tables.services.iter().rev().filter(|s| filter.matches(s)).cloned().map(Ok).collect();
            stream::iter(matching)
        })
        .flatten()
        .boxed()
    }
}

#[async_trait]
impl BookingRepository for InMemoryStore {
    async fn insert_booking(&self, row: BookingRow) -> Result<Booking, ServiceError> {
        let mut tables = self.tables.write().await;
        tables.require_user(row.user_id)?;
        if !tables.services.iter().any(|s| s.id == row.service_id) {
            return Err(ServiceError::NotFound(format!("referenced record not found: service {}", row.service_id)));
        }
        let booking = Booking {
            id: Uuid::new_v4(),
            user_id: row.user_id,
            service_id: row.service_id,
            start_date: row.start_date,
            end_date: row.end_date,
            status: BookingStatus::Pending,
            total_price: row.total_price,
            notes: row.notes,
            created_at: Utc::now(),
        };
        tables.bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn find_booking(&self, id: Uuid) -> Result<Option<Booking>, ServiceError> {
        Ok(self.tables.read().await.bookings.get(&id).cloned())
    }

    async fn transition_status(&self, id: Uuid, from: &[BookingStatus], to: BookingStatus) -> Result<u64, ServiceError> {
        let mut tables = self.tables.write().await;
        match tables.bookings.get_mut(&id) {
            Some(b) if from.contains(&b.status) => {
                b.status = to;
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Booking>, ServiceError> {
        let tables = self.tables.read().await;
        let mut out: Vec<Booking> = tables.bookings.values().filter(|b| b.user_id == user_id).cloned().collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }
}

#[async_trait]
impl MessageRepository for InMemoryStore {
    async fn insert_message(&self, sender_id: Uuid, conversation_id: &str, input: &NewMessage) -> Result<Message, ServiceError> {
        let mut tables = self.tables.write().await;
        tables.require_user(sender_id)?;
        tables.require_user(input.receiver_id)?;
        let message = Message {
            id: Uuid::new_v4(),
            sender_id,
            receiver_id: input.receiver_id,
            conversation_id: conversation_id.to_string(),
            message: input.message.clone(),
            status: MessageStatus::Unread,
            message_type: input.message_type,
            context: input.context,
            created_at: Utc::now(),
        };
        tables.messages.push(message.clone());
        Ok(message)
    }

    async fn find_message(&self, id: Uuid) -> Result<Option<Message>, ServiceError> {
        Ok(self.tables.read().await.messages.iter().find(|m| m.id == id).cloned())
    }

    async fn mark_read(&self, id: Uuid, receiver_id: Uuid) -> Result<u64, ServiceError> {
        let mut tables = self.tables.write().await;
        let found = tables
            .messages
            .iter_mut()
            .find(|m| m.id == id && m.receiver_id == receiver_id && m.status == MessageStatus::Unread);
        match found {
            Some(m) => {
                m.status = MessageStatus::Read;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn list_conversation(&self, conversation_id: &str) -> Result<Vec<Message>, ServiceError> {
        let tables = self.tables.read().await;
        Ok(tables.messages.iter().filter(|m| m.conversation_id == conversation_id).cloned().collect())
    }

    async fn list_unread(&self, receiver_id: Uuid) -> Result<Vec<Message>, ServiceError> {
        let tables = self.tables.read().await;
        Ok(tables
            .messages
            .iter()
            .rev()
            .filter(|m| m.receiver_id == receiver_id && m.status == MessageStatus::Unread)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl TripRepository for InMemoryStore {
    async fn insert_trip(&self, owner: Uuid, input: &NewTrip) -> Result<Trip, ServiceError> {
        let mut tables = self.tables.write().await;
        tables.require_user(owner)?;
        let trip = Trip {
            id: Uuid::new_v4(),
            title: input.title.clone(),
            description: input.description.clone(),
            user_id: owner,
            destination: input.destination.clone(),
            start_date: input.start_date,
            end_date: input.end_date,
            is_private: input.is_private,
            members: input.members.clone(),
            itinerary: input.itinerary.clone(),
            created_at: Utc::now(),
        };
        tables.trips.push(trip.clone());
        Ok(trip)
    }

    async fn find_trip(&self, id: Uuid) -> Result<Option<Trip>, ServiceError> {
        Ok(self.tables.read().await.trips.iter().find(|t| t.id == id).cloned())
    }

    async fn list_visible_trips(&self, user: Uuid) -> Result<Vec<Trip>, ServiceError> {
        let tables = self.tables.read().await;
        Ok(tables
            .trips
            .iter()
            .rev()
            .filter(|t| !t.is_private || t.is_participant(user))
            .cloned()
            .collect())
    }

    async fn insert_post(&self, author: Uuid, trip_id: Uuid, input: &NewPost) -> Result<Post, ServiceError> {
        let mut tables = self.tables.write().await;
        tables.require_user(author)?;
        if !tables.trips.iter().any(|t| t.id == trip_id) {
            return Err(ServiceError::NotFound(format!("referenced record not found: trip {trip_id}")));
        }
        let post = Post {
            id: Uuid::new_v4(),
            user_id: author,
            trip_id,
            content: input.content.clone(),
            images: input.images.clone(),
            created_at: Utc::now(),
        };
        tables.posts.push(post.clone());
        Ok(post)
    }

    async fn list_posts(&self, trip_id: Uuid) -> Result<Vec<Post>, ServiceError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.iter().filter(|p| p.trip_id == trip_id).cloned().collect())
    }
}
