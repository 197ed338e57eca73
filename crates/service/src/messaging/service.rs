use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use models::schema::{MessageContext, MessageStatus, NewMessage, Schema};

use super::domain::{conversation_id, Message};
use super::repository::MessageRepository;
use crate::auth::domain::Actor;
use crate::auth::repository::UserRepository;
use crate::booking::repository::BookingRepository;
use crate::catalog::repository::CatalogRepository;
use crate::errors::ServiceError;
use crate::trips::repository::TripRepository;

pub struct MessagingService {
    messages: Arc<dyn MessageRepository>,
    users: Arc<dyn UserRepository>,
    catalog: Arc<dyn CatalogRepository>,
    bookings: Arc<dyn BookingRepository>,
    trips: Arc<dyn TripRepository>,
}

impl MessagingService {
    pub fn new(
        messages: Arc<dyn MessageRepository>,
        users: Arc<dyn UserRepository>,
        catalog: Arc<dyn CatalogRepository>,
        bookings: Arc<dyn BookingRepository>,
        trips: Arc<dyn TripRepository>,
    ) -> Self {
        Self { messages, users, catalog, bookings, trips }
    }

    #[instrument(skip(self, raw), fields(sender_id = %actor.id))]
    pub async fn send(&self, actor: &Actor, raw: &Value) -> Result<Message, ServiceError> {
        let input = NewMessage::parse(raw)?;
        if input.receiver_id == actor.id {
            return Err(ServiceError::invalid("receiverId", "self", "cannot send a message to yourself"));
        }
        if self.users.find_user(input.receiver_id).await?.is_none() {
            return Err(ServiceError::not_found("receiver"));
        }
        if let Some(ctx) = input.context {
            self.ensure_context(ctx).await?;
        }

        let conversation = conversation_id(actor.id, input.receiver_id, input.context);
        let message = self.messages.insert_message(actor.id, &conversation, &input).await?;
        info!(
            message_id = %message.id,
            receiver_id = %message.receiver_id,
            message_type = %message.message_type,
            "message_sent"
        );
        Ok(message)
    }

    /// Receiver only. Marking an already read message is a no-op.
    #[instrument(skip(self), fields(user_id = %actor.id))]
    pub async fn mark_read(&self, actor: &Actor, id: Uuid) -> Result<Message, ServiceError> {
        let message = self.messages.find_message(id).await?.ok_or_else(|| ServiceError::not_found("message"))?;
        if message.receiver_id != actor.id {
            return Err(ServiceError::Forbidden("only the receiver can mark a message read".into()));
        }
        if message.status == MessageStatus::Read {
            debug!(message_id = %id, "already read");
            return Ok(message);
        }
        self.messages.mark_read(id, actor.id).await?;
        self.messages.find_message(id).await?.ok_or_else(|| ServiceError::not_found("message"))
    }

    /// Participants only; messages come back oldest first.
    pub async fn list_conversation(&self, actor: &Actor, conversation_id: &str) -> Result<Vec<Message>, ServiceError> {
        let messages = self.messages.list_conversation(conversation_id).await?;
        if !messages.iter().any(|m| m.involves(actor.id)) {
            return Err(ServiceError::Forbidden("not a participant in this conversation".into()));
        }
        Ok(messages)
    }

    pub async fn list_inbox(&self, actor: &Actor) -> Result<Vec<Message>, ServiceError> {
        self.messages.list_unread(actor.id).await
    }

    async fn ensure_context(&self, ctx: MessageContext) -> Result<(), ServiceError> {
        let exists = match ctx {
            MessageContext::Trip(id) => self.trips.find_trip(id).await?.is_some(),
            MessageContext::Booking(id) => self.bookings.find_booking(id).await?.is_some(),
            MessageContext::Service(id) => self.catalog.find_service(id).await?.is_some(),
        };
        if !exists {
            return Err(ServiceError::NotFound(format!("{} {} not found", ctx.kind(), ctx.id())));
        }
        Ok(())
    }
}
