use chrono::{DateTime, Utc};
use models::schema::AvailabilityWindow;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub location: String,
    pub provider_id: Uuid,
    pub category: String,
    pub images: Vec<String>,
    pub availability: Vec<AvailabilityWindow>,
    pub created_at: DateTime<Utc>,
}

impl Service {
    /// True when no windows are declared or one window covers the range.
    pub fn is_available(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.availability.is_empty() || self.availability.iter().any(|w| w.covers(start, end))
    }
}

/// Listing filter; every field is optional and they combine with AND.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceFilter {
    pub category: Option<String>,
    pub location: Option<String>,
    pub provider_id: Option<Uuid>,
    pub max_price: Option<Decimal>,
}

impl ServiceFilter {
    pub fn matches(&self, s: &Service) -> bool {
        self.category.as_ref().map_or(true, |c| &s.category == c)
            && self.location.as_ref().map_or(true, |l| &s.location == l)
            && self.provider_id.map_or(true, |p| s.provider_id == p)
            && self.max_price.map_or(true, |m| s.price <= m)
    }
}
