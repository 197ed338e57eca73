use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use service::auth::{AuthService, LoginInput, TokenSettings};
use service::storage::memory::InMemoryStore;

fn bench_login(c: &mut Criterion) {
    let svc = AuthService::new(Arc::new(InMemoryStore::default()), TokenSettings::new("secret", 12));

    // pre-create user outside of the benchmark using a tokio runtime
    let rt = tokio::runtime::Runtime::new().unwrap();
    let raw = serde_json::json!({"username": "bench", "email": "bench@example.com", "password": "Benchmark1"});
    rt.block_on(svc.register(&raw)).unwrap();

    c.bench_function("auth_login_verify", |b| {
        b.iter(|| {
            let input = LoginInput { identifier: "bench@example.com".into(), password: "Benchmark1".into() };
            rt.block_on(svc.login(input)).unwrap();
        });
    });
}

criterion_group!(benches, bench_login);
criterion_main!(benches);
