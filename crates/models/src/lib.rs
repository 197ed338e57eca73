pub mod errors;
pub mod db;
pub mod schema;
pub mod user;
pub mod service;
pub mod booking;
pub mod trip;
pub mod post;
pub mod message;
