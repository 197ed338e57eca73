use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use super::{money, not_blank, parse_date, parse_money, required, FieldViolation, Schema, ValidationFailure};

#[derive(Debug, Clone, Deserialize)]
pub struct WindowInput {
    pub start: String,
    pub end: String,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInput {
    #[validate(required, custom = "not_blank", length(max = 200, message = "title must be at most 200 characters"))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(required, custom = "money")]
    pub price: Option<Value>,
    #[validate(required, custom = "not_blank", length(max = 200, message = "location must be at most 200 characters"))]
    pub location: Option<String>,
    #[validate(required, custom = "not_blank", length(max = 64, message = "category must be at most 64 characters"))]
    pub category: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub availability: Vec<WindowInput>,
}

/// A bookable period. Both ends are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl AvailabilityWindow {
    pub fn covers(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start <= start && end <= self.end
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewService {
    pub title: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub location: String,
    pub category: String,
    pub images: Vec<String>,
    pub availability: Vec<AvailabilityWindow>,
}

fn window(input: &WindowInput) -> Option<AvailabilityWindow> {
    Some(AvailabilityWindow { start: parse_date(&input.start)?, end: parse_date(&input.end)? })
}

impl Schema for NewService {
    type Input = ServiceInput;

    fn cross_field(input: &ServiceInput) -> Vec<FieldViolation> {
        let mut out = Vec::new();
        for (i, w) in input.availability.iter().enumerate() {
            match window(w) {
                None => out.push(FieldViolation::new(
                    "availability",
                    "date",
                    format!("availability[{i}] needs start and end dates"),
                )),
                Some(w) if w.start > w.end => out.push(FieldViolation::new(
                    "availability",
                    "date_order",
                    format!("availability[{i}] starts after it ends"),
                )),
                Some(_) => {}
            }
        }
        out
    }

    fn from_input(input: ServiceInput) -> Result<Self, ValidationFailure> {
        let price = required("price", input.price.as_ref().and_then(parse_money))?;
        Ok(NewService {
            title: required("title", input.title)?.trim().to_string(),
            description: input.description,
            price: price.round_dp(2),
            location: required("location", input.location)?.trim().to_string(),
            category: required("category", input.category)?.trim().to_string(),
            images: input.images,
            availability: input.availability.iter().filter_map(window).collect(),
        })
    }
}
