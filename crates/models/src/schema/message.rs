use serde::Deserialize;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::{
    not_blank, parse_uuid, required, uuid_text, ContextType, FieldViolation, MessageContext, MessageType,
    Schema, ValidationFailure,
};

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MessageInput {
    #[validate(required, custom = "uuid_text")]
    pub receiver_id: Option<String>,
    #[validate(required, custom = "not_blank", length(max = 5000))]
    pub message: Option<String>,
    #[validate(required, custom = "message_type_name")]
    pub message_type: Option<String>,
    #[validate(custom = "uuid_text")]
    pub context_id: Option<String>,
    #[validate(custom = "context_type_name")]
    pub context_type: Option<String>,
}

fn message_type_name(value: &str) -> Result<(), ValidationError> {
    value.parse::<MessageType>().map(|_| ()).map_err(|_| {
        let mut err = ValidationError::new("enum");
        err.message =
            Some("messageType must be one of expert_inquiry, trip_discussion, booking_support, admin_notice".into());
        err
    })
}

fn context_type_name(value: &str) -> Result<(), ValidationError> {
    value.parse::<ContextType>().map(|_| ()).map_err(|_| {
        let mut err = ValidationError::new("enum");
        err.message = Some("contextType must be one of trip, booking, service".into());
        err
    })
}

/// Outgoing message. The sender is the acting user; the conversation id is
/// assigned by the messaging service.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMessage {
    pub receiver_id: Uuid,
    pub message: String,
    pub message_type: MessageType,
    pub context: Option<MessageContext>,
}

impl Schema for NewMessage {
    type Input = MessageInput;

    fn cross_field(input: &MessageInput) -> Vec<FieldViolation> {
        match (&input.context_id, &input.context_type) {
            (Some(_), None) => vec![FieldViolation::new(
                "contextType",
                "context_pair",
                "contextType is required when contextId is given",
            )],
            (None, Some(_)) => vec![FieldViolation::new(
                "contextId",
                "context_pair",
                "contextId is required when contextType is given",
            )],
            _ => Vec::new(),
        }
    }

    fn from_input(input: MessageInput) -> Result<Self, ValidationFailure> {
        let receiver_id = parse_uuid("receiverId", &required("receiverId", input.receiver_id)?)?;
        let message_type = required("messageType", input.message_type)?
            .parse::<MessageType>()
            .map_err(|e| ValidationFailure::single("messageType", "enum", e.to_string()))?;
        let context = match (input.context_id, input.context_type) {
            (Some(id), Some(kind)) => {
                let kind = kind
                    .parse::<ContextType>()
                    .map_err(|e| ValidationFailure::single("contextType", "enum", e.to_string()))?;
                Some(MessageContext::new(kind, parse_uuid("contextId", &id)?))
            }
            _ => None,
        };
        Ok(NewMessage { receiver_id, message: required("message", input.message)?, message_type, context })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn context_pair_becomes_tagged_context() {
        let trip = Uuid::new_v4();
        let msg = NewMessage::parse(&json!({
            "receiverId": Uuid::new_v4().to_string(),
            "message": "Is the trip still on?",
            "messageType": "trip_discussion",
            "contextId": trip.to_string(),
            "contextType": "trip"
        }))
        .unwrap();
        assert_eq!(msg.context, Some(MessageContext::Trip(trip)));
        assert_eq!(msg.message_type, MessageType::TripDiscussion);
    }

    #[test]
    fn half_a_context_is_rejected() {
        let err = NewMessage::parse(&json!({
            "receiverId": Uuid::new_v4().to_string(),
            "message": "hello",
            "messageType": "expert_inquiry",
            "contextId": Uuid::new_v4().to_string()
        }))
        .unwrap_err();
        assert_eq!(err.violations[0].field, "contextType");
        assert_eq!(err.violations[0].code, "context_pair");
    }

    #[test]
    fn unknown_message_type_is_rejected() {
        let err = NewMessage::parse(&json!({
            "receiverId": Uuid::new_v4().to_string(),
            "message": "hello",
            "messageType": "gossip"
        }))
        .unwrap_err();
        assert!(err.has_field("messageType"));
    }

    #[test]
    fn context_without_message_fails_on_both() {
        let err = NewMessage::parse(&json!({
            "receiverId": Uuid::new_v4().to_string(),
            "messageType": "booking_support",
            "contextType": "booking"
        }))
        .unwrap_err();
        assert!(err.has_field("message"));
        assert!(err.has_field("contextId"));
    }
}
