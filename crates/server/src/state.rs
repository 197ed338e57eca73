use std::sync::Arc;

use configs::{AppConfig, Environment};
use sea_orm::DatabaseConnection;
use service::auth::repository::UserRepository;
use service::auth::{AuthService, TokenSettings};
use service::booking::repository::BookingRepository;
use service::booking::{BookingService, ManualPayments, PaymentVerifier};
use service::catalog::repository::CatalogRepository;
use service::catalog::CatalogService;
use service::messaging::repository::MessageRepository;
use service::messaging::MessagingService;
use service::storage::{memory::InMemoryStore, SeaOrmStore};
use service::trips::repository::TripRepository;
use service::trips::TripService;
use service::ServiceError;

use crate::errors::ApiError;

/// Shared handler state: one instance of each domain service.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub catalog: Arc<CatalogService>,
    pub bookings: Arc<BookingService>,
    pub messaging: Arc<MessagingService>,
    pub trips: Arc<TripService>,
    pub environment: Environment,
}

impl AppState {
    /// Wire every service to one store implementing all repositories.
    pub fn with_store<S>(store: Arc<S>, payments: Arc<dyn PaymentVerifier>, config: &AppConfig) -> Self
    where
        S: UserRepository + CatalogRepository + BookingRepository + MessageRepository + TripRepository + 'static,
    {
        let tokens = TokenSettings::new(config.auth.jwt_secret.clone(), config.auth.token_ttl_hours);
        Self {
            auth: Arc::new(AuthService::new(store.clone(), tokens)),
            catalog: Arc::new(CatalogService::new(store.clone(), store.clone())),
            bookings: Arc::new(BookingService::new(store.clone(), store.clone(), payments)),
            messaging: Arc::new(MessagingService::new(
                store.clone(),
                store.clone(),
                store.clone(),
                store.clone(),
                store.clone(),
            )),
            trips: Arc::new(TripService::new(store.clone(), store)),
            environment: config.environment,
        }
    }

    pub fn postgres(db: DatabaseConnection, config: &AppConfig) -> Self {
        Self::with_store(Arc::new(SeaOrmStore::new(db)), Arc::new(ManualPayments), config)
    }

    pub fn in_memory(config: &AppConfig) -> Self {
        Self::with_store(Arc::new(InMemoryStore::default()), Arc::new(ManualPayments), config)
    }

    /// Map a domain failure to the HTTP error for this environment.
    pub fn api_error(&self, err: ServiceError) -> ApiError {
        ApiError::from_service(err, self.environment.is_production())
    }
}
