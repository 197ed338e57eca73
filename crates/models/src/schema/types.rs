//! Closed value sets shared by the schema layer, the persistence rows
//! (stored as text) and the domain services.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $text)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(UnknownVariant {
                        kind: stringify!($name),
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{value}' is not a valid {kind}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

string_enum!(
    /// Account role. Capabilities are checked per operation, not modelled
    /// as separate user types.
    Role {
        User => "user",
        Expert => "expert",
        Provider => "provider",
        Admin => "admin",
    }
);

impl Role {
    pub fn can_offer_services(&self) -> bool {
        matches!(self, Role::Provider | Role::Admin)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl Default for Role {
    fn default() -> Self { Role::User }
}

string_enum!(
    BookingStatus {
        Pending => "pending",
        Confirmed => "confirmed",
        Cancelled => "cancelled",
        Completed => "completed",
    }
);

impl BookingStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Cancelled | BookingStatus::Completed)
    }
}

string_enum!(
    MessageStatus {
        Read => "read",
        Unread => "unread",
    }
);

string_enum!(
    MessageType {
        ExpertInquiry => "expert_inquiry",
        TripDiscussion => "trip_discussion",
        BookingSupport => "booking_support",
        AdminNotice => "admin_notice",
    }
);

string_enum!(
    ContextType {
        Trip => "trip",
        Booking => "booking",
        Service => "service",
    }
);

/// What a message is about. The id and its kind travel together, so a
/// context id without a type (or the reverse) cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "contextType", content = "contextId", rename_all = "lowercase")]
pub enum MessageContext {
    Trip(Uuid),
    Booking(Uuid),
    Service(Uuid),
}

impl MessageContext {
    pub fn new(kind: ContextType, id: Uuid) -> Self {
        match kind {
            ContextType::Trip => MessageContext::Trip(id),
            ContextType::Booking => MessageContext::Booking(id),
            ContextType::Service => MessageContext::Service(id),
        }
    }

    pub fn kind(&self) -> ContextType {
        match self {
            MessageContext::Trip(_) => ContextType::Trip,
            MessageContext::Booking(_) => ContextType::Booking,
            MessageContext::Service(_) => ContextType::Service,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            MessageContext::Trip(id) | MessageContext::Booking(id) | MessageContext::Service(id) => *id,
        }
    }

    /// Rebuild from the two stored columns. `Err` when exactly one is set
    /// or the type text is unknown.
    pub fn from_columns(id: Option<Uuid>, kind: Option<&str>) -> Result<Option<Self>, String> {
        match (id, kind) {
            (None, None) => Ok(None),
            (Some(id), Some(kind)) => {
                let kind = kind.parse::<ContextType>().map_err(|e| e.to_string())?;
                Ok(Some(MessageContext::new(kind, id)))
            }
            _ => Err("context_id and context_type must be set together".into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enums_round_trip_through_text() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), *role);
        }
        assert_eq!("booking_support".parse::<MessageType>().unwrap(), MessageType::BookingSupport);
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn role_capabilities() {
        assert!(Role::Provider.can_offer_services());
        assert!(Role::Admin.can_offer_services());
        assert!(!Role::Expert.can_offer_services());
        assert!(!Role::User.can_offer_services());
    }

    #[test]
    fn context_requires_both_columns() {
        let id = Uuid::new_v4();
        assert_eq!(MessageContext::from_columns(None, None).unwrap(), None);
        assert_eq!(
            MessageContext::from_columns(Some(id), Some("trip")).unwrap(),
            Some(MessageContext::Trip(id))
        );
        assert!(MessageContext::from_columns(Some(id), None).is_err());
        assert!(MessageContext::from_columns(None, Some("trip")).is_err());
        assert!(MessageContext::from_columns(Some(id), Some("planet")).is_err());
    }

    #[test]
    fn context_serializes_as_id_and_type_pair() {
        let id = Uuid::nil();
        let v = serde_json::to_value(MessageContext::Booking(id)).unwrap();
        assert_eq!(v["contextType"], "booking");
        assert_eq!(v["contextId"], id.to_string());
    }
}
