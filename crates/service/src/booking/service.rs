use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use models::booking::BookingRow;
use models::schema::{BookingStatus, NewBooking, Schema};

use super::domain::{billable_units, total_price, Booking};
use super::payment::{PaymentStatus, PaymentVerifier};
use super::repository::BookingRepository;
use crate::auth::domain::Actor;
use crate::catalog::domain::Service;
use crate::catalog::repository::CatalogRepository;
use crate::errors::ServiceError;

pub struct BookingService {
    bookings: Arc<dyn BookingRepository>,
    catalog: Arc<dyn CatalogRepository>,
    payments: Arc<dyn PaymentVerifier>,
}

impl BookingService {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        catalog: Arc<dyn CatalogRepository>,
        payments: Arc<dyn PaymentVerifier>,
    ) -> Self {
        Self { bookings, catalog, payments }
    }

    /// Price is computed here from the stored service price; anything the
    /// client sent for it is ignored.
    #[instrument(skip(self, raw), fields(user_id = %actor.id))]
    pub async fn create(&self, actor: &Actor, raw: &Value) -> Result<Booking, ServiceError> {
        let input = NewBooking::parse(raw)?;
        let service = self.service(input.service_id).await?;

        let end = input.end_date.unwrap_or(input.start_date);
        if !service.is_available(input.start_date, end) {
            return Err(ServiceError::invalid(
                "startDate",
                "unavailable",
                "service is not available for the requested dates",
            ));
        }

        let units = billable_units(input.start_date, input.end_date, input.quantity);
        let Some(total) = total_price(service.price, units) else {
            let field = if input.end_date.is_some() { "endDate" } else { "quantity" };
            warn!(service_id = %service.id, units, "booking_total_out_of_range");
            return Err(ServiceError::invalid(field, "range", "booking total exceeds the maximum amount"));
        };
        let booking = self
            .bookings
            .insert_booking(BookingRow {
                user_id: actor.id,
                service_id: service.id,
                start_date: input.start_date,
                end_date: input.end_date,
                total_price: total,
                notes: input.notes,
            })
            .await?;
        info!(booking_id = %booking.id, service_id = %service.id, units, total = %booking.total_price, "booking_created");
        Ok(booking)
    }

    /// Owner or admin, after the payment collaborator reports the payment
    /// as settled.
    #[instrument(skip(self, payment_reference), fields(user_id = %actor.id))]
    pub async fn confirm(&self, actor: &Actor, id: Uuid, payment_reference: Option<&str>) -> Result<Booking, ServiceError> {
        let booking = self.booking(id).await?;
        if booking.user_id != actor.id && !actor.is_admin() {
            return Err(ServiceError::Forbidden("only the booking owner can confirm it".into()));
        }
        if booking.status != BookingStatus::Pending {
            return Err(conflict(&booking, BookingStatus::Confirmed));
        }
        match self.payments.verify(&booking, payment_reference).await? {
            PaymentStatus::Settled => {}
            other => {
                warn!(booking_id = %id, payment = ?other, "payment_not_settled");
                return Err(ServiceError::invalid("payment", "not_settled", "payment has not been settled"));
            }
        }
        let confirmed = self.advance(id, &[BookingStatus::Pending], BookingStatus::Confirmed).await?;
        info!(booking_id = %id, "booking_confirmed");
        Ok(confirmed)
    }

    /// Owner, the service's provider, or admin.
    #[instrument(skip(self), fields(user_id = %actor.id))]
    pub async fn cancel(&self, actor: &Actor, id: Uuid) -> Result<Booking, ServiceError> {
        let booking = self.booking(id).await?;
        let service = self.service(booking.service_id).await?;
        if booking.user_id != actor.id && service.provider_id != actor.id && !actor.is_admin() {
            return Err(ServiceError::Forbidden("not allowed to cancel this booking".into()));
        }
        let cancelled = self
            .advance(id, &[BookingStatus::Pending, BookingStatus::Confirmed], BookingStatus::Cancelled)
            .await?;
        info!(booking_id = %id, "booking_cancelled");
        Ok(cancelled)
    }

    /// Service provider or admin, once the booked period is over.
    #[instrument(skip(self), fields(user_id = %actor.id))]
    pub async fn complete(&self, actor: &Actor, id: Uuid) -> Result<Booking, ServiceError> {
        let booking = self.booking(id).await?;
        let service = self.service(booking.service_id).await?;
        if service.provider_id != actor.id && !actor.is_admin() {
            return Err(ServiceError::Forbidden("only the provider can complete a booking".into()));
        }
        if booking.status == BookingStatus::Confirmed && booking.ends_at() > Utc::now() {
            return Err(ServiceError::Conflict("booking has not ended yet".into()));
        }
        let completed = self.advance(id, &[BookingStatus::Confirmed], BookingStatus::Completed).await?;
        info!(booking_id = %id, "booking_completed");
        Ok(completed)
    }

    /// Owner, provider or admin.
    pub async fn get_booking(&self, actor: &Actor, id: Uuid) -> Result<Booking, ServiceError> {
        let booking = self.booking(id).await?;
        if booking.user_id == actor.id || actor.is_admin() {
            return Ok(booking);
        }
        let service = self.service(booking.service_id).await?;
        if service.provider_id == actor.id {
            return Ok(booking);
        }
        Err(ServiceError::Forbidden("not allowed to view this booking".into()))
    }

    pub async fn list_bookings(&self, actor: &Actor) -> Result<Vec<Booking>, ServiceError> {
        self.bookings.list_for_user(actor.id).await
    }

    async fn booking(&self, id: Uuid) -> Result<Booking, ServiceError> {
        self.bookings.find_booking(id).await?.ok_or_else(|| ServiceError::not_found("booking"))
    }

    async fn service(&self, id: Uuid) -> Result<Service, ServiceError> {
        self.catalog.find_service(id).await?.ok_or_else(|| ServiceError::not_found("service"))
    }

    /// Conditional write, then re-read. A lost race shows up as zero rows
    /// changed and is reported against the status that won.
    async fn advance(&self, id: Uuid, from: &[BookingStatus], to: BookingStatus) -> Result<Booking, ServiceError> {
        let changed = self.bookings.transition_status(id, from, to).await?;
        let current = self.booking(id).await?;
        if changed == 0 {
            return Err(conflict(&current, to));
        }
        Ok(current)
    }
}

fn conflict(booking: &Booking, to: BookingStatus) -> ServiceError {
    ServiceError::Conflict(format!("cannot move booking from {} to {}", booking.status, to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::ManualPayments;
    use crate::storage::memory::InMemoryStore;
    use async_trait::async_trait;
    use models::schema::Role;
    use serde_json::json;

    struct Harness {
        store: Arc<InMemoryStore>,
        svc: Arc<BookingService>,
        customer: Actor,
        provider: Actor,
        service_id: Uuid,
    }

    async fn harness_with(payments: Arc<dyn PaymentVerifier>, availability: Value) -> Harness {
        let store = Arc::new(InMemoryStore::default());
        let customer = store.seed_user("cust", Role::User).await;
        let provider = store.seed_user("prov", Role::Provider).await;
        let listing = models::schema::NewService::parse(&json!({
            "title": "Sailing", "price": "49.99", "location": "Lisbon", "category": "water",
            "availability": availability
        }))
        .unwrap();
        let service = store.insert_service(provider.id, &listing).await.unwrap();
        let svc = Arc::new(BookingService::new(store.clone(), store.clone(), payments));
        Harness { store, svc, customer, provider, service_id: service.id }
    }

    async fn harness() -> Harness { harness_with(Arc::new(ManualPayments), json!([])).await }

    fn request(service_id: Uuid, start: &str, end: &str) -> Value {
        json!({"serviceId": service_id.to_string(), "startDate": start, "endDate": end, "totalPrice": "1.00"})
    }

    #[tokio::test]
    async fn created_booking_is_pending_with_computed_price() {
        let h = harness().await;
        let b = h.svc.create(&h.customer, &request(h.service_id, "2024-06-01", "2024-06-04")).await.unwrap();
        assert_eq!(b.status, BookingStatus::Pending);
        assert_eq!(b.total_price.to_string(), "149.97");
        assert_eq!(b.user_id, h.customer.id);
    }

    #[tokio::test]
    async fn booking_total_beyond_the_stored_range_fails_validation() {
        let h = harness().await;
        let listing = models::schema::NewService::parse(&json!({
            "title": "Private island", "price": "9999999999.99", "location": "Fiji", "category": "stay"
        }))
        .unwrap();
        let island = h.store.insert_service(h.provider.id, &listing).await.unwrap();

        match h.svc.create(&h.customer, &request(island.id, "2024-06-01", "2024-06-03")).await {
            Err(ServiceError::Validation(failure)) => {
                assert!(failure.has_field("endDate"));
                assert_eq!(failure.violations[0].code, "range");
            }
            other => panic!("expected a validation error, got {other:?}"),
        }

        let open_ended = json!({"serviceId": island.id.to_string(), "startDate": "2024-06-01", "quantity": 3});
        match h.svc.create(&h.customer, &open_ended).await {
            Err(ServiceError::Validation(failure)) => assert!(failure.has_field("quantity")),
            other => panic!("expected a validation error, got {other:?}"),
        }

        let one_night = h.svc.create(&h.customer, &request(island.id, "2024-06-01", "2024-06-02")).await.unwrap();
        assert_eq!(one_night.total_price.to_string(), "9999999999.99");
    }

    #[tokio::test]
    async fn unknown_service_is_not_found() {
        let h = harness().await;
        let err = h.svc.create(&h.customer, &request(Uuid::new_v4(), "2024-06-01", "2024-06-02")).await;
        assert!(matches!(err, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn requests_outside_availability_are_rejected() {
        let h = harness_with(
            Arc::new(ManualPayments),
            json!([{"start": "2024-06-01", "end": "2024-06-30"}]),
        )
        .await;
        let inside = h.svc.create(&h.customer, &request(h.service_id, "2024-06-02", "2024-06-05")).await;
        assert!(inside.is_ok());
        let outside = h.svc.create(&h.customer, &request(h.service_id, "2024-06-28", "2024-07-03")).await;
        assert!(matches!(outside, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn confirm_on_cancelled_conflicts_and_leaves_state() {
        let h = harness().await;
        let b = h.svc.create(&h.customer, &request(h.service_id, "2024-06-01", "2024-06-02")).await.unwrap();
        h.svc.cancel(&h.customer, b.id).await.unwrap();

        let err = h.svc.confirm(&h.customer, b.id, None).await;
        assert!(matches!(err, Err(ServiceError::Conflict(_))));
        let stored = h.store.find_booking(b.id).await.unwrap().unwrap();
        assert_eq!(stored.status, BookingStatus::Cancelled);
        assert_eq!(stored.total_price, b.total_price);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_confirms_have_exactly_one_winner() {
        let h = harness().await;
        let b = h.svc.create(&h.customer, &request(h.service_id, "2024-06-01", "2024-06-02")).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let svc = h.svc.clone();
            let actor = h.customer;
            handles.push(tokio::spawn(async move { svc.confirm(&actor, b.id, None).await }));
        }
        let mut ok = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => ok += 1,
                Err(ServiceError::Conflict(_)) => conflicts += 1,
                Err(other) => panic!("unexpected: {other:?}"),
            }
        }
        assert_eq!(ok, 1);
        assert_eq!(conflicts, 7);
    }

    #[tokio::test]
    async fn lifecycle_permissions() {
        let h = harness().await;
        let b = h.svc.create(&h.customer, &request(h.service_id, "2020-01-01", "2020-01-03")).await.unwrap();

        assert!(matches!(h.svc.confirm(&h.provider, b.id, None).await, Err(ServiceError::Forbidden(_))));
        h.svc.confirm(&h.customer, b.id, Some("pay_123")).await.unwrap();
        assert!(matches!(h.svc.complete(&h.customer, b.id).await, Err(ServiceError::Forbidden(_))));

        let done = h.svc.complete(&h.provider, b.id).await.unwrap();
        assert_eq!(done.status, BookingStatus::Completed);
        assert!(matches!(h.svc.cancel(&h.customer, b.id).await, Err(ServiceError::Conflict(_))));

        assert_eq!(h.svc.get_booking(&h.provider, b.id).await.unwrap().id, b.id);
        let stranger = h.store.seed_user("stranger", Role::User).await;
        assert!(matches!(h.svc.get_booking(&stranger, b.id).await, Err(ServiceError::Forbidden(_))));
        assert_eq!(h.svc.list_bookings(&h.customer).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn future_bookings_cannot_complete() {
        let h = harness().await;
        let b = h.svc.create(&h.customer, &request(h.service_id, "2999-01-01", "2999-01-02")).await.unwrap();
        h.svc.confirm(&h.customer, b.id, None).await.unwrap();
        assert!(matches!(h.svc.complete(&h.provider, b.id).await, Err(ServiceError::Conflict(_))));
    }

    struct Unpaid;

    #[async_trait]
    impl PaymentVerifier for Unpaid {
        async fn verify(&self, _: &Booking, _: Option<&str>) -> Result<PaymentStatus, ServiceError> {
            Ok(PaymentStatus::Pending)
        }
    }

    #[tokio::test]
    async fn unsettled_payment_blocks_confirmation() {
        let h = harness_with(Arc::new(Unpaid), json!([])).await;
        let b = h.svc.create(&h.customer, &request(h.service_id, "2024-06-01", "2024-06-02")).await.unwrap();
        assert!(matches!(h.svc.confirm(&h.customer, b.id, None).await, Err(ServiceError::Validation(_))));
        let stored = h.store.find_booking(b.id).await.unwrap().unwrap();
        assert_eq!(stored.status, BookingStatus::Pending);
    }
}
