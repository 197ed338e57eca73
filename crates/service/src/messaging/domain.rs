use chrono::{DateTime, Utc};
use models::schema::{MessageContext, MessageStatus, MessageType};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub conversation_id: String,
    pub message: String,
    pub status: MessageStatus,
    pub message_type: MessageType,
    #[serde(flatten)]
    pub context: Option<MessageContext>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn involves(&self, user: Uuid) -> bool { self.sender_id == user || self.receiver_id == user }
}

/// Same pair and context give the same id whichever side sends.
pub fn conversation_id(a: Uuid, b: Uuid, context: Option<MessageContext>) -> String {
    let (low, high) = if a <= b { (a, b) } else { (b, a) };
    match context {
        Some(ctx) => format!("{}:{}:{}:{}", low.simple(), high.simple(), ctx.kind(), ctx.id().simple()),
        None => format!("{}:{}", low.simple(), high.simple()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversation_id_is_symmetric_and_context_scoped() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        assert_eq!(conversation_id(a, b, None), conversation_id(b, a, None));
        let trip = Some(MessageContext::Trip(Uuid::new_v4()));
        assert_eq!(conversation_id(a, b, trip), conversation_id(b, a, trip));
        assert_ne!(conversation_id(a, b, trip), conversation_id(a, b, None));
    }

    #[test]
    fn context_is_flattened_into_the_message() {
        let ctx = Uuid::new_v4();
        let msg = Message {
            id: Uuid::new_v4(),
            sender_id: Uuid::new_v4(),
            receiver_id: Uuid::new_v4(),
            conversation_id: "c".into(),
            message: "hi".into(),
            status: MessageStatus::Unread,
            message_type: MessageType::BookingSupport,
            context: Some(MessageContext::Booking(ctx)),
            created_at: Utc::now(),
        };
        let v = serde_json::to_value(&msg).unwrap();
        assert_eq!(v["contextType"], "booking");
        assert_eq!(v["contextId"], ctx.to_string());
        assert_eq!(v["messageType"], "booking_support");
        assert_eq!(v["status"], "unread");
    }
}
