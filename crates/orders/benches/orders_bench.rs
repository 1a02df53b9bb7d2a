use catalog::{CatalogStore, InMemoryCatalogStore, NewProduct};
use common::{Identity, Money, Role};
use criterion::{Criterion, criterion_group, criterion_main};
use orders::{DiscountPolicy, InMemoryOrderStore, LineRequest, OrderService};

fn bench_discount_policy(c: &mut Criterion) {
    let policy = DiscountPolicy::default();

    c.bench_function("orders/discount_premium_high_value", |b| {
        b.iter(|| {
            std::hint::black_box(
                policy.total_discount(Money::from_dollars(600), Role::Premium),
            );
        });
    });

    c.bench_function("orders/discount_customer_baseline", |b| {
        b.iter(|| {
            std::hint::black_box(policy.total_discount(Money::from_dollars(50), Role::Customer));
        });
    });
}

fn bench_place_single_line(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("orders/place_single_line", |b| {
        b.iter(|| {
            rt.block_on(async {
                let catalog = InMemoryCatalogStore::new();
                let product = catalog
                    .insert(NewProduct::new("Widget", "", Money::from_dollars(10), 100))
                    .await
                    .unwrap();
                let service = OrderService::new(
                    catalog,
                    InMemoryOrderStore::new(),
                    DiscountPolicy::default(),
                );
                let identity = Identity::customer();
                service
                    .place_order(Some(&identity), vec![LineRequest::new(product.id, 1)])
                    .await
                    .unwrap();
            });
        });
    });
}

fn bench_place_ten_lines(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("orders/place_ten_lines", |b| {
        b.iter(|| {
            rt.block_on(async {
                let catalog = InMemoryCatalogStore::new();
                let mut lines = Vec::with_capacity(10);
                for i in 0..10 {
                    let product = catalog
                        .insert(NewProduct::new(
                            format!("Product {i}"),
                            "",
                            Money::from_dollars(10),
                            100,
                        ))
                        .await
                        .unwrap();
                    lines.push(LineRequest::new(product.id, 2));
                }
                let service = OrderService::new(
                    catalog,
                    InMemoryOrderStore::new(),
                    DiscountPolicy::default(),
                );
                let identity = Identity::premium();
                service.place_order(Some(&identity), lines).await.unwrap();
            });
        });
    });
}

criterion_group!(
    benches,
    bench_discount_policy,
    bench_place_single_line,
    bench_place_ten_lines
);
criterion_main!(benches);
