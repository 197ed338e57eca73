//! Schema & validation layer.
//!
//! Every writable entity has a raw input struct (what a client may send)
//! and a typed record (what the domain layer accepts). [`Schema::parse`]
//! turns an untyped JSON value into the typed record or a
//! [`ValidationFailure`] listing every violated rule. Nothing here touches
//! the database; uniqueness and references are checked by the store.

use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

pub mod types;
pub mod user;
pub mod service;
pub mod booking;
pub mod trip;
pub mod post;
pub mod message;

pub use booking::{BookingInput, NewBooking};
pub use message::{MessageInput, NewMessage};
pub use post::{NewPost, PostInput};
pub use service::{AvailabilityWindow, NewService, ServiceInput};
pub use trip::{NewTrip, TripInput};
pub use types::{BookingStatus, ContextType, MessageContext, MessageStatus, MessageType, Role};
pub use user::{NewUser, UserInput};

/// One broken rule on one field. `field` uses the wire (camelCase) name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: &str, code: &str, message: impl Into<String>) -> Self {
        Self { field: field.to_string(), code: code.to_string(), message: message.into() }
    }
}

/// Every rule an input broke, ordered by field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationFailure {
    pub violations: Vec<FieldViolation>,
}

impl ValidationFailure {
    pub fn single(field: &str, code: &str, message: impl Into<String>) -> Self {
        Self { violations: vec![FieldViolation::new(field, code, message)] }
    }

    pub fn is_empty(&self) -> bool { self.violations.is_empty() }

    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }

    fn sorted(mut self) -> Self {
        self.violations.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.code.cmp(&b.code)));
        self
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.violations.iter().map(|v| format!("{}: {}", v.field, v.message)).collect();
        write!(f, "validation failed: {}", parts.join("; "))
    }
}

impl std::error::Error for ValidationFailure {}

impl From<ValidationErrors> for ValidationFailure {
    fn from(errors: ValidationErrors) -> Self {
        let mut violations = Vec::new();
        for (field, errs) in errors.field_errors() {
            let field = camel_case(field);
            for err in errs.iter() {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{field} is invalid ({})", err.code));
                violations.push(FieldViolation { field: field.clone(), code: err.code.to_string(), message });
            }
        }
        ValidationFailure { violations }.sorted()
    }
}

/// Entity kinds accepted by [`validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    User,
    Service,
    Booking,
    Trip,
    Post,
    Message,
}

/// A validated record of any kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidRecord {
    User(NewUser),
    Service(NewService),
    Booking(NewBooking),
    Trip(NewTrip),
    Post(NewPost),
    Message(NewMessage),
}

/// Validate `raw` against the rules of `kind`.
pub fn validate(kind: EntityKind, raw: &Value) -> Result<ValidRecord, ValidationFailure> {
    Ok(match kind {
        EntityKind::User => ValidRecord::User(NewUser::parse(raw)?),
        EntityKind::Service => ValidRecord::Service(NewService::parse(raw)?),
        EntityKind::Booking => ValidRecord::Booking(NewBooking::parse(raw)?),
        EntityKind::Trip => ValidRecord::Trip(NewTrip::parse(raw)?),
        EntityKind::Post => ValidRecord::Post(NewPost::parse(raw)?),
        EntityKind::Message => ValidRecord::Message(NewMessage::parse(raw)?),
    })
}

/// Declarative rules for one entity kind.
pub trait Schema: Sized {
    type Input: DeserializeOwned + Validate;

    /// Rules spanning several fields. Run even when single-field rules
    /// already failed, so the caller sees everything at once.
    fn cross_field(_input: &Self::Input) -> Vec<FieldViolation> { Vec::new() }

    /// Coerce a fully valid input into the typed record.
    fn from_input(input: Self::Input) -> Result<Self, ValidationFailure>;

    /// Each top-level field is deserialized on its own first, so a wrong
    /// type on one field is reported as `<field>: invalid_type` while the
    /// remaining fields still go through every rule.
    fn parse(raw: &Value) -> Result<Self, ValidationFailure> {
        let Some(fields) = raw.as_object() else {
            return Err(ValidationFailure::single("body", "invalid_type", "request body must be a JSON object"));
        };

        let mut type_errors = Vec::new();
        let mut accepted = Map::new();
        for (key, value) in fields {
            let single = Value::Object(Map::from_iter([(key.clone(), value.clone())]));
            match serde_json::from_value::<Self::Input>(single) {
                Ok(_) => {
                    accepted.insert(key.clone(), value.clone());
                }
                Err(e) => type_errors.push(FieldViolation::new(key, "invalid_type", e.to_string())),
            }
        }
        let input: Self::Input = serde_json::from_value(Value::Object(accepted))
            .map_err(|e| ValidationFailure::single("body", "invalid_type", e.to_string()))?;

        let mut failure = match input.validate() {
            Ok(()) => ValidationFailure { violations: Vec::new() },
            Err(errors) => ValidationFailure::from(errors),
        };
        // A mistyped field was dropped above; its `required` is noise.
        failure.violations.retain(|v| !type_errors.iter().any(|t: &FieldViolation| t.field == v.field));
        failure.violations.extend(type_errors);
        failure.violations.extend(Self::cross_field(&input));
        if !failure.is_empty() {
            return Err(failure.sorted());
        }
        Self::from_input(input)
    }
}

pub(crate) fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for ch in field.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}

fn rule(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(rule("blank", "must not be blank"));
    }
    Ok(())
}

pub(crate) fn uuid_text(value: &str) -> Result<(), ValidationError> {
    Uuid::parse_str(value.trim()).map(|_| ()).map_err(|_| rule("uuid", "must be a valid id"))
}

pub(crate) fn uuid_list(values: &[String]) -> Result<(), ValidationError> {
    if values.iter().any(|v| Uuid::parse_str(v.trim()).is_err()) {
        return Err(rule("uuid", "every entry must be a valid id"));
    }
    Ok(())
}

pub(crate) fn date_text(value: &str) -> Result<(), ValidationError> {
    parse_date(value).map(|_| ()).ok_or_else(|| rule("date", "must be an RFC 3339 timestamp or YYYY-MM-DD date"))
}

pub(crate) fn optional_date_text(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Ok(());
    }
    date_text(value)
}

/// Exclusive upper bound of any stored amount (`numeric(12, 2)`).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_410_065_408, 2, 0, false, 0);

pub(crate) fn money(value: &Value) -> Result<(), ValidationError> {
    match parse_money(value) {
        Some(amount) if amount >= MAX_AMOUNT => Err(rule("range", "must be below 10000000000")),
        Some(amount) if amount > Decimal::ZERO && amount.scale() <= 2 => Ok(()),
        Some(_) => Err(rule("range", "must be a positive amount with at most two decimals")),
        None => Err(rule("decimal", "must be a number or numeric string")),
    }
}

/// `YYYY-MM-DD` is read as midnight UTC. Blank text is "no date".
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

pub(crate) fn parse_optional_date(value: &Option<String>) -> Option<Option<DateTime<Utc>>> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Some(None),
        Some(text) => parse_date(text).map(Some),
    }
}

/// Monetary amount from a JSON number or numeric string.
pub fn parse_money(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => n.to_string().parse::<Decimal>().ok(),
        Value::String(s) => s.trim().parse::<Decimal>().ok(),
        _ => None,
    }
}

pub(crate) fn parse_uuid(field: &str, value: &str) -> Result<Uuid, ValidationFailure> {
    Uuid::parse_str(value.trim()).map_err(|_| ValidationFailure::single(field, "uuid", "must be a valid id"))
}

pub(crate) fn required<T>(field: &str, value: Option<T>) -> Result<T, ValidationFailure> {
    value.ok_or_else(|| ValidationFailure::single(field, "required", format!("{field} is required")))
}

pub(crate) fn date_order(
    start_field: &str,
    start: &Option<String>,
    end: &Option<String>,
) -> Option<FieldViolation> {
    match (parse_optional_date(start), parse_optional_date(end)) {
        (Some(Some(start)), Some(Some(end))) if start > end => Some(FieldViolation::new(
            start_field,
            "date_order",
            "startDate must not be after endDate",
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn camel_case_converts_snake_names() {
        assert_eq!(camel_case("start_date"), "startDate");
        assert_eq!(camel_case("message_type"), "messageType");
        assert_eq!(camel_case("email"), "email");
    }

    #[test]
    fn dates_accept_rfc3339_and_plain_days() {
        let day = parse_date("2024-06-01").unwrap();
        assert_eq!(day.to_rfc3339(), "2024-06-01T00:00:00+00:00");
        let ts = parse_date("2024-06-01T10:30:00+02:00").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-06-01T08:30:00+00:00");
        assert!(parse_date("next tuesday").is_none());
    }

    #[test]
    fn money_accepts_numbers_and_strings() {
        assert_eq!(parse_money(&json!("49.99")).unwrap().to_string(), "49.99");
        assert_eq!(parse_money(&json!(49.99)).unwrap().to_string(), "49.99");
        assert!(parse_money(&json!(true)).is_none());
        assert!(money(&json!("0")).is_err());
        assert!(money(&json!("1.999")).is_err());
        assert!(money(&json!(12)).is_ok());
    }

    #[test]
    fn money_stays_below_the_column_limit() {
        assert_eq!(MAX_AMOUNT.to_string(), "10000000000");
        assert!(money(&json!("9999999999.99")).is_ok());
        assert!(money(&json!("10000000000")).is_err());
        assert!(money(&json!("79228162514264337593543950335")).is_err());
    }

    #[test]
    fn mistyped_fields_are_reported_alongside_rule_violations() {
        let raw = json!({"title": 7, "price": "-3", "location": "Lisbon", "category": ["water"]});
        let err = NewService::parse(&raw).unwrap_err();
        let found: Vec<(&str, &str)> = err.violations.iter().map(|v| (v.field.as_str(), v.code.as_str())).collect();
        assert_eq!(found, vec![("category", "invalid_type"), ("price", "range"), ("title", "invalid_type")]);
    }

    #[test]
    fn non_object_body_is_rejected() {
        let err = validate(EntityKind::User, &json!([1, 2])).unwrap_err();
        assert!(err.has_field("body"));
    }

    #[test]
    fn validate_dispatches_by_kind() {
        let raw = json!({"content": "Great day at the lake"});
        match validate(EntityKind::Post, &raw).unwrap() {
            ValidRecord::Post(post) => assert_eq!(post.content, "Great day at the lake"),
            other => panic!("unexpected record: {other:?}"),
        }
    }
}
