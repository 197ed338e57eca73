use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use models::message;
use models::schema::{MessageStatus, NewMessage};

use crate::errors::ServiceError;
use crate::messaging::domain::Message;
use crate::messaging::repository::MessageRepository;
use crate::storage::SeaOrmStore;

fn to_message(m: message::Model) -> Result<Message, ServiceError> {
    Ok(Message {
        context: m.context()?,
        status: m.status()?,
        message_type: m.message_type()?,
        id: m.id,
        sender_id: m.sender_id,
        receiver_id: m.receiver_id,
        conversation_id: m.conversation_id,
        message: m.message,
        created_at: m.created_at.into(),
    })
}

fn to_messages(rows: Vec<message::Model>) -> Result<Vec<Message>, ServiceError> {
    rows.into_iter().map(to_message).collect()
}

#[async_trait::async_trait]
impl MessageRepository for SeaOrmStore {
    async fn insert_message(&self, sender_id: Uuid, conversation_id: &str, input: &NewMessage) -> Result<Message, ServiceError> {
        to_message(message::create(&self.db, sender_id, conversation_id, input).await?)
    }

    async fn find_message(&self, id: Uuid) -> Result<Option<Message>, ServiceError> {
        message::Entity::find_by_id(id).one(&self.db).await?.map(to_message).transpose()
    }

    async fn mark_read(&self, id: Uuid, receiver_id: Uuid) -> Result<u64, ServiceError> {
        Ok(message::mark_read(&self.db, id, receiver_id).await?)
    }

    async fn list_conversation(&self, conversation_id: &str) -> Result<Vec<Message>, ServiceError> {
        let rows = message::Entity::find()
            .filter(message::Column::ConversationId.eq(conversation_id))
            .order_by_asc(message::Column::CreatedAt)
            .all(&self.db)
            .await?;
        to_messages(rows)
    }

    async fn list_unread(&self, receiver_id: Uuid) -> Result<Vec<Message>, ServiceError> {
        let rows = message::Entity::find()
            .filter(message::Column::ReceiverId.eq(receiver_id))
            .filter(message::Column::Status.eq(MessageStatus::Unread.as_str()))
            .order_by_desc(message::Column::CreatedAt)
            .all(&self.db)
            .await?;
        to_messages(rows)
    }
}
