//! Reservations against services.
//!
//! A booking moves `pending -> confirmed -> completed`, or ends in
//! `cancelled` from either of the first two states. Every move is a single
//! conditional write keyed on the expected prior state, so two racing
//! requests cannot both advance the same booking.

pub mod domain;
pub mod payment;
pub mod repository;
pub mod service;
pub mod repo;

pub use domain::Booking;
pub use payment::{ManualPayments, PaymentStatus, PaymentVerifier};
pub use service::BookingService;
