use async_trait::async_trait;

use super::domain::Booking;
use crate::errors::ServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Settled,
    Pending,
    Declined,
}

/// External payment collaborator consulted before a booking is confirmed.
#[async_trait]
pub trait PaymentVerifier: Send + Sync {
    async fn verify(&self, booking: &Booking, reference: Option<&str>) -> Result<PaymentStatus, ServiceError>;
}

/// Payments are settled out of band; every confirmation is accepted.
#[derive(Debug, Default, Clone, Copy)]
pub struct ManualPayments;

#[async_trait]
impl PaymentVerifier for ManualPayments {
    async fn verify(&self, _booking: &Booking, _reference: Option<&str>) -> Result<PaymentStatus, ServiceError> {
        Ok(PaymentStatus::Settled)
    }
}
