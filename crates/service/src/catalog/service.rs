use std::sync::Arc;

use futures::stream::BoxStream;
use serde_json::Value;
use tracing::{info, instrument};
use uuid::Uuid;

use models::schema::{NewService, Schema};

use super::domain::{Service, ServiceFilter};
use super::repository::CatalogRepository;
use crate::auth::domain::Actor;
use crate::auth::repository::UserRepository;
use crate::errors::ServiceError;

pub struct CatalogService {
    services: Arc<dyn CatalogRepository>,
    users: Arc<dyn UserRepository>,
}

impl CatalogService {
    pub fn new(services: Arc<dyn CatalogRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { services, users }
    }

    /// Lazy listing; an empty result is not an error.
    pub fn list_services(&self, filter: ServiceFilter) -> BoxStream<'_, Result<Service, ServiceError>> {
        self.services.stream_services(filter)
    }

    /// The role is read from the store rather than the token, so a
    /// demotion takes effect before the token expires.
    #[instrument(skip(self, raw), fields(provider_id = %actor.id))]
    pub async fn create_service(&self, actor: &Actor, raw: &Value) -> Result<Service, ServiceError> {
        let provider = self.users.find_user(actor.id).await?.ok_or_else(|| ServiceError::not_found("user"))?;
        if !provider.role.can_offer_services() {
            return Err(ServiceError::Forbidden("only providers and admins can create services".into()));
        }
        let input = NewService::parse(raw)?;
        let created = self.services.insert_service(provider.id, &input).await?;
        info!(service_id = %created.id, price = %created.price, "service_created");
        Ok(created)
    }

    pub async fn get_service(&self, id: Uuid) -> Result<Service, ServiceError> {
        self.services.find_service(id).await?.ok_or_else(|| ServiceError::not_found("service"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::InMemoryStore;
    use futures::TryStreamExt;
    use models::schema::Role;
    use rust_decimal::Decimal;
    use serde_json::json;

    async fn setup() -> (Arc<InMemoryStore>, CatalogService) {
        let store = Arc::new(InMemoryStore::default());
        (store.clone(), CatalogService::new(store.clone(), store))
    }

    fn listing(category: &str, price: &str) -> Value {
        json!({"title": "Guided hike", "price": price, "location": "Madeira", "category": category})
    }

    #[tokio::test]
    async fn only_providers_and_admins_create_services() {
        let (store, svc) = setup().await;
        let provider = store.seed_user("prov", Role::Provider).await;
        let expert = store.seed_user("expert", Role::Expert).await;

        let created = svc.create_service(&provider, &listing("outdoors", "49.99")).await.unwrap();
        assert_eq!(created.provider_id, provider.id);
        assert_eq!(created.price, "49.99".parse::<Decimal>().unwrap());

        let denied = svc.create_service(&expert, &listing("outdoors", "10")).await;
        assert!(matches!(denied, Err(ServiceError::Forbidden(_))));
    }

    #[tokio::test]
    async fn listing_filters_and_restarts() {
        let (store, svc) = setup().await;
        let provider = store.seed_user("prov", Role::Provider).await;
        svc.create_service(&provider, &listing("outdoors", "49.99")).await.unwrap();
        svc.create_service(&provider, &listing("food", "15")).await.unwrap();
        svc.create_service(&provider, &listing("outdoors", "120")).await.unwrap();

        let all: Vec<Service> = svc.list_services(ServiceFilter::default()).try_collect().await.unwrap();
        assert_eq!(all.len(), 3);
        let again: Vec<Service> = svc.list_services(ServiceFilter::default()).try_collect().await.unwrap();
        assert_eq!(all, again);

        let filter = ServiceFilter {
            category: Some("outdoors".into()),
            max_price: Some(Decimal::from(100)),
            ..Default::default()
        };
        let cheap: Vec<Service> = svc.list_services(filter).try_collect().await.unwrap();
        assert_eq!(cheap.len(), 1);
        assert_eq!(cheap[0].price.to_string(), "49.99");

        let none = ServiceFilter { category: Some("space".into()), ..Default::default() };
        let empty: Vec<Service> = svc.list_services(none).try_collect().await.unwrap();
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn missing_service_is_not_found() {
        let (_, svc) = setup().await;
        assert!(matches!(svc.get_service(Uuid::new_v4()).await, Err(ServiceError::NotFound(_))));
    }
}
