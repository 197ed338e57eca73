use chrono::Utc;
use sea_orm::{entity::prelude::*, sea_query::Expr, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::schema::types::UnknownVariant;
use crate::schema::{MessageContext, MessageStatus, MessageType, NewMessage};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "messages")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub conversation_id: String,
    pub message: String,
    pub status: String,
    pub message_type: String,
    pub context_id: Option<Uuid>,
    pub context_type: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Sender,
    Receiver,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Sender => Entity::belongs_to(crate::user::Entity)
                .from(Column::SenderId)
                .to(crate::user::Column::Id)
                .into(),
            Relation::Receiver => Entity::belongs_to(crate::user::Entity)
                .from(Column::ReceiverId)
                .to(crate::user::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn status(&self) -> Result<MessageStatus, ModelError> {
        self.status.parse().map_err(|e: UnknownVariant| ModelError::Validation(e.to_string()))
    }

    pub fn message_type(&self) -> Result<MessageType, ModelError> {
        self.message_type.parse().map_err(|e: UnknownVariant| ModelError::Validation(e.to_string()))
    }

    pub fn context(&self) -> Result<Option<MessageContext>, ModelError> {
        MessageContext::from_columns(self.context_id, self.context_type.as_deref()).map_err(ModelError::Validation)
    }
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    sender_id: Uuid,
    conversation_id: &str,
    input: &NewMessage,
) -> Result<Model, ModelError> {
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        sender_id: Set(sender_id),
        receiver_id: Set(input.receiver_id),
        conversation_id: Set(conversation_id.to_string()),
        message: Set(input.message.clone()),
        status: Set(MessageStatus::Unread.as_str().to_string()),
        message_type: Set(input.message_type.as_str().to_string()),
        context_id: Set(input.context.map(|c| c.id())),
        context_type: Set(input.context.map(|c| c.kind().as_str().to_string())),
        created_at: Set(Utc::now().into()),
    };
    Ok(am.insert(db).await?)
}

/// Flip `unread -> read` for the receiver. Already-read rows are left alone.
pub async fn mark_read<C: ConnectionTrait>(db: &C, id: Uuid, receiver_id: Uuid) -> Result<u64, ModelError> {
    let res = Entity::update_many()
        .col_expr(Column::Status, Expr::value(MessageStatus::Read.as_str()))
        .filter(Column::Id.eq(id))
        .filter(Column::ReceiverId.eq(receiver_id))
        .filter(Column::Status.eq(MessageStatus::Unread.as_str()))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}
