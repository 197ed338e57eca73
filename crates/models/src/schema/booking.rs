use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use super::{
    date_order, date_text, optional_date_text, parse_optional_date, parse_uuid, required, uuid_text,
    FieldViolation, Schema, ValidationFailure,
};

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BookingInput {
    #[validate(required, custom = "uuid_text")]
    pub service_id: Option<String>,
    #[validate(required, custom = "date_text")]
    pub start_date: Option<String>,
    #[validate(custom = "optional_date_text")]
    pub end_date: Option<String>,
    pub notes: Option<String>,
    #[validate(range(min = 1, max = 365, message = "quantity must be between 1 and 365"))]
    pub quantity: Option<u32>,
}

/// Booking request. Price and status are never taken from the client.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub service_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub quantity: u32,
}

impl Schema for NewBooking {
    type Input = BookingInput;

    fn cross_field(input: &BookingInput) -> Vec<FieldViolation> {
        date_order("startDate", &input.start_date, &input.end_date).into_iter().collect()
    }

    fn from_input(input: BookingInput) -> Result<Self, ValidationFailure> {
        let service_id = parse_uuid("serviceId", &required("serviceId", input.service_id)?)?;
        let start_date = required("startDate", parse_optional_date(&input.start_date).flatten())?;
        let end_date = required("endDate", parse_optional_date(&input.end_date))?;
        Ok(NewBooking {
            service_id,
            start_date,
            end_date,
            notes: input.notes.filter(|n| !n.trim().is_empty()),
            quantity: input.quantity.unwrap_or(1),
        })
    }
}
