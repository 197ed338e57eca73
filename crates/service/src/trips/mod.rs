//! Trips and the posts members share on them.

pub mod domain;
pub mod repository;
pub mod service;
pub mod repo;

pub use domain::{Post, Trip};
pub use service::TripService;
