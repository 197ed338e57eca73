use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use models::schema::NewService;
use models::service;

use crate::catalog::domain::{Service, ServiceFilter};
use crate::catalog::repository::CatalogRepository;
use crate::errors::ServiceError;
use crate::storage::SeaOrmStore;

const PAGE_SIZE: u64 = 50;

pub(crate) fn to_service(m: service::Model) -> Service {
    Service {
        images: m.images(),
        availability: m.availability(),
        id: m.id,
        title: m.title,
        description: m.description,
        price: m.price,
        location: m.location,
        provider_id: m.provider_id,
        category: m.category,
        created_at: m.created_at.into(),
    }
}

#[async_trait::async_trait]
impl CatalogRepository for SeaOrmStore {
    async fn insert_service(&self, provider_id: Uuid, input: &NewService) -> Result<Service, ServiceError> {
        Ok(to_service(service::create(&self.db, provider_id, input).await?))
    }

    async fn find_service(&self, id: Uuid) -> Result<Option<Service>, ServiceError> {
        Ok(service::Entity::find_by_id(id).one(&self.db).await?.map(to_service))
    }

    fn stream_services(&self, filter: ServiceFilter) -> BoxStream<'_, Result<Service, ServiceError>> {
        let mut query = service::Entity::find()
            .order_by_desc(service::Column::CreatedAt)
            .order_by_asc(service::Column::Id);
        if let Some(category) = filter.category {
            query = query.filter(service::Column::Category.eq(category));
        }
        if let Some(location) = filter.location {
            query = query.filter(service::Column::Location.eq(location));
        }
        if let Some(provider_id) = filter.provider_id {
            query = query.filter(service::Column::ProviderId.eq(provider_id));
        }
        if let Some(max_price) = filter.max_price {
            query = query.filter(service::Column::Price.lte(max_price));
        }

        // One page per poll; stop after the first short page.
        stream::unfold(Some(0u64), move |page| {
            let query = query.clone();
            async move {
                let page = page?;
                match query.paginate(&self.db, PAGE_SIZE).fetch_page(page).await {
                    Ok(rows) => {
                        let next = (rows.len() as u64 == PAGE_SIZE).then_some(page + 1);
                        Some((Ok::<_, ServiceError>(rows), next))
                    }
                    Err(e) => Some((Err(e.into()), None)),
                }
            }
        })
        .map_ok(|rows| stream::iter(rows.into_iter().map(|m| Ok::<_, ServiceError>(to_service(m)))))
        .try_flatten()
        .boxed()
    }
}
