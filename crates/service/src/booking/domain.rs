use chrono::{DateTime, Utc};
use models::schema::{BookingStatus, MAX_AMOUNT};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub service_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: BookingStatus,
    pub total_price: Decimal,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// When the booked period is over: the end date, or the start date
    /// for open-ended bookings.
    pub fn ends_at(&self) -> DateTime<Utc> { self.end_date.unwrap_or(self.start_date) }
}

const DAY_SECS: i64 = 86_400;

/// Whole days between the dates, rounded up, at least one. Without an end
/// date the requested quantity is billed.
pub fn billable_units(start: DateTime<Utc>, end: Option<DateTime<Utc>>, quantity: u32) -> u32 {
    match end {
        Some(end) => {
            let secs = (end - start).num_seconds().max(0);
            let days = (secs + DAY_SECS - 1) / DAY_SECS;
            u32::try_from(days).unwrap_or(u32::MAX).max(1)
        }
        None => quantity.max(1),
    }
}

/// `None` when the product overflows or does not fit a stored amount.
pub fn total_price(unit_price: Decimal, units: u32) -> Option<Decimal> {
    unit_price
        .checked_mul(Decimal::from(units))
        .map(|total| total.round_dp(2))
        .filter(|total| *total < MAX_AMOUNT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::schema::parse_date;

    #[test]
    fn three_day_range_at_49_99_costs_149_97() {
        let start = parse_date("2024-06-01").unwrap();
        let end = parse_date("2024-06-04").unwrap();
        let units = billable_units(start, Some(end), 1);
        assert_eq!(units, 3);
        assert_eq!(total_price("49.99".parse().unwrap(), units).unwrap().to_string(), "149.97");
    }

    #[test]
    fn partial_days_round_up_and_same_day_is_one() {
        let start = parse_date("2024-06-01T10:00:00Z").unwrap();
        assert_eq!(billable_units(start, Some(parse_date("2024-06-02T11:00:00Z").unwrap()), 1), 2);
        assert_eq!(billable_units(start, Some(start), 1), 1);
    }

    #[test]
    fn open_ended_bookings_bill_quantity() {
        let start = parse_date("2024-06-01").unwrap();
        assert_eq!(billable_units(start, None, 4), 4);
        assert_eq!(total_price(Decimal::new(1050, 2), 4).unwrap().to_string(), "42.00");
    }

    #[test]
    fn totals_past_the_stored_range_are_refused() {
        let top: Decimal = "9999999999.99".parse().unwrap();
        assert_eq!(total_price(top, 1), Some(top));
        assert_eq!(total_price(top, 2), None);
        assert_eq!(total_price(Decimal::MAX, u32::MAX), None);
        let far = billable_units(parse_date("2024-01-01").unwrap(), Some(parse_date("9999-12-31").unwrap()), 1);
        assert!(far > 0);
        assert_eq!(total_price(Decimal::ONE, far), Some(Decimal::from(far)));
    }
}
