use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use super::{
    date_order, not_blank, optional_date_text, parse_optional_date, parse_uuid, required, uuid_list,
    FieldViolation, Schema, ValidationFailure,
};

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TripInput {
    #[validate(required, custom = "not_blank", length(max = 200, message = "title must be at most 200 characters"))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(required, custom = "not_blank", length(max = 200, message = "destination must be at most 200 characters"))]
    pub destination: Option<String>,
    #[validate(custom = "optional_date_text")]
    pub start_date: Option<String>,
    #[validate(custom = "optional_date_text")]
    pub end_date: Option<String>,
    pub is_private: Option<bool>,
    #[serde(default)]
    #[validate(custom = "uuid_list")]
    pub members: Vec<String>,
    #[serde(default)]
    pub itinerary: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTrip {
    pub title: String,
    pub description: Option<String>,
    pub destination: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_private: bool,
    pub members: Vec<Uuid>,
    pub itinerary: Vec<Value>,
}

impl Schema for NewTrip {
    type Input = TripInput;

    fn cross_field(input: &TripInput) -> Vec<FieldViolation> {
        date_order("startDate", &input.start_date, &input.end_date).into_iter().collect()
    }

    fn from_input(input: TripInput) -> Result<Self, ValidationFailure> {
        let mut members = Vec::with_capacity(input.members.len());
        for m in &input.members {
            let id = parse_uuid("members", m)?;
            if !members.contains(&id) {
                members.push(id);
            }
        }
        Ok(NewTrip {
            title: required("title", input.title)?.trim().to_string(),
            description: input.description,
            destination: required("destination", input.destination)?.trim().to_string(),
            start_date: required("startDate", parse_optional_date(&input.start_date))?,
            end_date: required("endDate", parse_optional_date(&input.end_date))?,
            is_private: input.is_private.unwrap_or(false),
            members,
            itinerary: input.itinerary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_to_public_with_no_members() {
        let trip = NewTrip::parse(&json!({"title": "Alps", "destination": "Chamonix"})).unwrap();
        assert!(!trip.is_private);
        assert!(trip.members.is_empty());
        assert_eq!(trip.start_date, None);
    }

    #[test]
    fn duplicate_members_collapse() {
        let id = Uuid::new_v4().to_string();
        let trip = NewTrip::parse(&json!({
            "title": "Alps",
            "destination": "Chamonix",
            "members": [id, id],
            "itinerary": [{"day": 1, "plan": "arrive"}]
        }))
        .unwrap();
        assert_eq!(trip.members.len(), 1);
        assert_eq!(trip.itinerary.len(), 1);
    }

    #[test]
    fn long_title_and_destination_fail() {
        let err = NewTrip::parse(&json!({"title": "t".repeat(201), "destination": "d".repeat(201)})).unwrap_err();
        assert!(err.has_field("title"));
        assert!(err.has_field("destination"));
        assert!(NewTrip::parse(&json!({"title": "t".repeat(200), "destination": "Chamonix"})).is_ok());
    }

    #[test]
    fn reversed_dates_and_bad_members_fail() {
        let err = NewTrip::parse(&json!({
            "title": "Alps",
            "destination": "Chamonix",
            "startDate": "2024-09-10",
            "endDate": "2024-09-01",
            "members": ["nobody"]
        }))
        .unwrap_err();
        assert!(err.has_field("startDate"));
        assert!(err.has_field("members"));
    }
}
