//! Postgres adapter checks against a migrated scratch database.
//!
//! Marked `#[ignore]`; run with `DATABASE_URL` pointing at a disposable server:
//! `cargo test --test db_repositories -- --ignored`.

use std::collections::HashSet;

use sqlx::PgPool;
use storefront::application::pagination::PageRequest;
use storefront::application::repos::{
    CreateOrderParams, CreateProductParams, CreateReviewParams, OrdersRepo, ProductsRepo,
    RepoError, ReviewsRepo, SettingsRepo, StoreHealth, UpdateOrderStatusParams,
    ORDER_ID_CONSTRAINT,
};
use storefront::domain::entities::{ColorVariant, SiteSettingsRecord};
use storefront::domain::types::OrderStatus;
use storefront::infra::db::PostgresRepositories;
use time::OffsetDateTime;

fn order_params(order_id: &str, total_price: i64) -> CreateOrderParams {
    CreateOrderParams {
        order_id: order_id.to_string(),
        customer_name: "Rahim".to_string(),
        phone: "01700000000".to_string(),
        address: "House 1, Road 2, Dhaka".to_string(),
        product_id: None,
        product_name: "Cotton Panjabi".to_string(),
        color: "White".to_string(),
        size: "XL".to_string(),
        quantity: 1,
        total_price,
        delivery_charge: 60,
        payment_method: "cash_on_delivery".to_string(),
        notes: None,
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn order_indexes_exist(pool: PgPool) {
    let rows: Vec<String> = sqlx::query_scalar(
        "SELECT indexname FROM pg_indexes WHERE schemaname = 'public' AND tablename = 'orders'",
    )
    .fetch_all(&pool)
    .await
    .expect("fetch order indexes");

    let indexes: HashSet<String> = rows.into_iter().collect();
    assert!(
        indexes.contains(ORDER_ID_CONSTRAINT),
        "missing {ORDER_ID_CONSTRAINT}"
    );
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn ping_succeeds_on_live_pool(pool: PgPool) {
    let repos = PostgresRepositories::new(pool);
    repos.ping().await.expect("ping");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn product_colors_survive_storage(pool: PgPool) {
    let repos = PostgresRepositories::new(pool);
    let colors = vec![ColorVariant {
        name: "Navy".to_string(),
        code: "#001f3f".to_string(),
        image: "products/navy.png".to_string(),
        is_local_image: true,
    }];

    let created = repos
        .create_product(CreateProductParams {
            name: "Cotton Panjabi".to_string(),
            description: String::new(),
            size: "M, L, XL".to_string(),
            regular_price: 2000,
            offer_price: 1600,
            offer_percentage: 20,
            colors: colors.clone(),
            is_active: false,
        })
        .await
        .expect("create product");

    let found = repos
        .find_product(created.id)
        .await
        .expect("find product")
        .expect("product exists");
    assert_eq!(found.colors, colors);
    assert_eq!(found.offer_percentage, 20);

    let active = repos.list_products(true).await.expect("list active");
    assert!(active.is_empty(), "inactive product must be hidden");
    assert_eq!(repos.count_products().await.expect("count"), 1);

    repos.delete_product(created.id).await.expect("delete");
    assert!(matches!(
        repos.delete_product(created.id).await,
        Err(RepoError::NotFound)
    ));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn duplicate_order_id_maps_to_constraint(pool: PgPool) {
    let repos = PostgresRepositories::new(pool);
    repos
        .create_order(order_params("RT4821931234", 1600))
        .await
        .expect("first order");

    let err = repos
        .create_order(order_params("RT4821931234", 900))
        .await
        .expect_err("duplicate order id");
    match err {
        RepoError::Duplicate { constraint } => assert_eq!(constraint, ORDER_ID_CONSTRAINT),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn order_status_filters_and_revenue(pool: PgPool) {
    let repos = PostgresRepositories::new(pool);
    let first = repos
        .create_order(order_params("RT4821931111", 1600))
        .await
        .expect("first order");
    repos
        .create_order(order_params("RT4821942222", 900))
        .await
        .expect("second order");

    let delivered = repos
        .update_order_status(UpdateOrderStatusParams {
            id: first.id,
            status: OrderStatus::Delivered,
            notes: Some("left with guard".to_string()),
            updated_at: OffsetDateTime::now_utc(),
        })
        .await
        .expect("update status");
    assert_eq!(delivered.status, OrderStatus::Delivered);
    assert_eq!(delivered.notes.as_deref(), Some("left with guard"));

    let pending = repos
        .list_orders(Some(OrderStatus::Pending), PageRequest::new(None, None))
        .await
        .expect("list pending");
    assert_eq!(pending.len(), 1);
    assert_eq!(repos.count_orders(None).await.expect("count all"), 2);
    assert_eq!(
        repos
            .sum_total_price(OrderStatus::Delivered)
            .await
            .expect("revenue"),
        1600
    );

    assert_eq!(repos.count_unread_orders().await.expect("unread"), 2);
    repos.mark_order_read(first.id).await.expect("mark read");
    assert_eq!(repos.count_unread_orders().await.expect("unread"), 1);
    assert_eq!(repos.mark_all_orders_read().await.expect("mark all"), 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn review_approval_is_persisted(pool: PgPool) {
    let repos = PostgresRepositories::new(pool);
    let review = repos
        .create_review(CreateReviewParams {
            name: "Karim".to_string(),
            location: "Chattogram".to_string(),
            text: "Fabric is great".to_string(),
            rating: 5,
            is_approved: false,
        })
        .await
        .expect("create review");

    let public = repos
        .list_reviews(Some(true), Some(10))
        .await
        .expect("list approved");
    assert!(public.is_empty());

    let approved = repos.approve_review(review.id).await.expect("approve");
    assert!(approved.is_approved);
    assert_eq!(repos.count_reviews(Some(true)).await.expect("count"), 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn settings_row_is_a_singleton(pool: PgPool) {
    let repos = PostgresRepositories::new(pool);
    assert!(repos.load_site_settings().await.expect("load").is_none());

    let defaults = SiteSettingsRecord::with_defaults(OffsetDateTime::now_utc());
    let stored = repos
        .ensure_site_settings(defaults.clone())
        .await
        .expect("ensure");
    assert_eq!(stored.footer_text, defaults.footer_text);

    let mut changed = stored.clone();
    changed.delivery_charge_inside_dhaka = 80;
    repos
        .upsert_site_settings(changed)
        .await
        .expect("upsert");

    let again = repos
        .ensure_site_settings(defaults)
        .await
        .expect("ensure keeps existing row");
    assert_eq!(again.delivery_charge_inside_dhaka, 80);
}
