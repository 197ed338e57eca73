//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Registration, login and session tokens. Password hashing and token
//! signing are kept in their own small modules so the service only deals
//! in domain terms.

pub mod domain;
pub mod password;
pub mod token;
pub mod repository;
pub mod service;
pub mod repo;

pub use domain::{Actor, AuthSession, LoginInput, PublicUser};
pub use service::AuthService;
pub use token::TokenSettings;
