use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use service::advertisement::domain::CreateAdvertisementRequest;
use service::advertisement::repository::mock::MockAdvertisementRepository;
use service::advertisement::AdvertisementService;
use service::category::repository::mock::MockCategoryRepository;
use service::context::CallContext;
use service::search::domain::SearchAdvertisementByTitleRequest;
use service::search::repository::mock::MockSearchRepository;
use service::search::SearchService;
use service::user::repository::mock::MockUserRepository;

fn bench_create(c: &mut Criterion) {
    let categories = Arc::new(MockCategoryRepository::default());
    categories.insert_with_id(1, "Bikes", "bikes");
    let users = Arc::new(MockUserRepository::default());
    users.insert_with_id(1, "bench@example.com", "Bench");
    let svc = AdvertisementService::new(Arc::new(MockAdvertisementRepository::default()), categories, users);
    let rt = tokio::runtime::Runtime::new().unwrap();
    let ctx = CallContext::new();

    c.bench_function("advertisement_create_checked", |b| {
        b.iter(|| {
            let req = CreateAdvertisementRequest {
                title: "  Bike ".into(),
                description: "Red bike".into(),
                price: 100,
                currency: " usd ".into(),
                category_id: 1,
                user_id: 1,
            };
            rt.block_on(svc.create(&ctx, req)).unwrap();
        });
    });
}

fn bench_search_blank(c: &mut Criterion) {
    let svc = SearchService::new(Arc::new(MockSearchRepository::default()));
    let rt = tokio::runtime::Runtime::new().unwrap();
    let ctx = CallContext::new();

    c.bench_function("search_blank_short_circuit", |b| {
        b.iter(|| {
            let req = SearchAdvertisementByTitleRequest { title: "    ".into() };
            rt.block_on(svc.search_by_title(&ctx, req)).unwrap();
        });
    });
}

criterion_group!(benches, bench_create, bench_search_blank);
criterion_main!(benches);
