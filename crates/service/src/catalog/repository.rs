use async_trait::async_trait;
use futures::stream::BoxStream;
use models::schema::NewService;
use uuid::Uuid;

use super::domain::{Service, ServiceFilter};
use crate::errors::ServiceError;

#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn insert_service(&self, provider_id: Uuid, input: &NewService) -> Result<Service, ServiceError>;

    async fn find_service(&self, id: Uuid) -> Result<Option<Service>, ServiceError>;

    /// Newest first. Rows are fetched as the stream is polled, and each
    /// call starts a fresh scan.
    fn stream_services(&self, filter: ServiceFilter) -> BoxStream<'_, Result<Service, ServiceError>>;
}
