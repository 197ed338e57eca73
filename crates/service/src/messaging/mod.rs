//! Direct messages between two users, optionally about a trip, booking or
//! service.

pub mod domain;
pub mod repository;
pub mod service;
pub mod repo;

pub use domain::{conversation_id, Message};
pub use service::MessagingService;
