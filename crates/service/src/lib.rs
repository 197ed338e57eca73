//! Domain services for the marketplace.
//! - Business rules live here; persistence sits behind repository traits.
//! - Input validation is delegated to `models::schema`.
//! - Every operation fails with the shared `ServiceError` taxonomy.

pub mod errors;
pub mod auth;
pub mod catalog;
pub mod booking;
pub mod messaging;
pub mod trips;
pub mod storage;
#[cfg(test)]
pub mod test_support;

pub use auth::domain::Actor;
pub use errors::ServiceError;

#[cfg(test)]
mod seaorm_tests {
    use std::sync::Arc;

    use serde_json::json;

    use crate::auth::{AuthService, LoginInput, TokenSettings};
    use crate::booking::{BookingService, ManualPayments};
    use crate::catalog::CatalogService;
    use crate::errors::ServiceError;
    use crate::test_support::get_store;
    use models::schema::BookingStatus;

    fn unique(tag: &str) -> String { format!("{tag}{}", &uuid::Uuid::new_v4().simple().to_string()[..10]) }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn postgres_flow_register_book_and_race_confirm() {
        let Some(store) = get_store().await else { return };
        let store = Arc::new(store);
        let auth = AuthService::new(store.clone(), TokenSettings::new("test-secret", 1));
        let catalog = CatalogService::new(store.clone(), store.clone());
        let bookings = Arc::new(BookingService::new(store.clone(), store.clone(), Arc::new(ManualPayments)));

        let provider_name = unique("prov");
        let provider = auth
            .register(&json!({
                "username": provider_name,
                "email": format!("{provider_name}@example.com"),
                "password": "secret1",
                "role": "provider"
            }))
            .await
            .unwrap();
        let dup = auth
            .register(&json!({
                "username": provider_name,
                "email": format!("x{provider_name}@example.com"),
                "password": "secret1"
            }))
            .await;
        assert!(matches!(dup, Err(ServiceError::Conflict(_))));

        let session = auth
            .login(LoginInput { identifier: provider.email.clone(), password: "secret1".into() })
            .await
            .unwrap();
        let actor = auth.decode_token(&session.token).unwrap();

        let service = catalog
            .create_service(&actor, &json!({
                "title": "Tasting menu", "price": "49.99", "location": "Porto", "category": "food"
            }))
            .await
            .unwrap();
        let booking = bookings
            .create(&actor, &json!({
                "serviceId": service.id.to_string(), "startDate": "2024-06-01", "endDate": "2024-06-04"
            }))
            .await
            .unwrap();
        assert_eq!(booking.total_price.to_string(), "149.97");

        let mut handles = Vec::new();
        for _ in 0..4 {
            let bookings = bookings.clone();
            handles.push(tokio::spawn(async move { bookings.confirm(&actor, booking.id, None).await }));
        }
        let mut wins = 0;
        for h in handles {
            match h.await.unwrap() {
                Ok(b) => {
                    assert_eq!(b.status, BookingStatus::Confirmed);
                    wins += 1;
                }
                Err(ServiceError::Conflict(_)) => {}
                Err(other) => panic!("unexpected: {other:?}"),
            }
        }
        assert_eq!(wins, 1);
    }
}
