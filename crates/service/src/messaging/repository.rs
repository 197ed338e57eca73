use async_trait::async_trait;
use models::schema::NewMessage;
use uuid::Uuid;

use super::domain::Message;
use crate::errors::ServiceError;

#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn insert_message(&self, sender_id: Uuid, conversation_id: &str, input: &NewMessage) -> Result<Message, ServiceError>;

    async fn find_message(&self, id: Uuid) -> Result<Option<Message>, ServiceError>;

    /// `unread -> read` for the given receiver; 0 when already read.
    async fn mark_read(&self, id: Uuid, receiver_id: Uuid) -> Result<u64, ServiceError>;

    /// Oldest first.
    async fn list_conversation(&self, conversation_id: &str) -> Result<Vec<Message>, ServiceError>;

    /// Unread messages addressed to `receiver_id`, newest first.
    async fn list_unread(&self, receiver_id: Uuid) -> Result<Vec<Message>, ServiceError>;
}
