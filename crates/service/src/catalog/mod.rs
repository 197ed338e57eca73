//! Service listings offered by providers.

pub mod domain;
pub mod repository;
pub mod service;
pub mod repo;

pub use domain::{Service, ServiceFilter};
pub use service::CatalogService;
