//! Integration tests for catalog queries and mutations against a mock API.

use serde_json::{Value, json};
use storefront_core::api::{ApiClient, ApiConfig};
use storefront_core::catalog::{
    CatalogQueryEngine, FetchError, FetchOutcome, MutationCoordinator, MutationKind,
};
use storefront_types::{CatalogResult, Item, ItemFields};
use url::Url;
use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api(server: &MockServer) -> ApiClient {
    ApiClient::new(ApiConfig::new(Url::parse(&server.uri()).unwrap())).unwrap()
}

fn products(titles: &[(u64, &str)], total: u64) -> Value {
    let products: Vec<_> = titles
        .iter()
        .map(|(id, title)| {
            json!({"id": id, "title": title, "price": 9.99, "category": "beauty", "stock": 5})
        })
        .collect();
    let limit = products.len();
    json!({"products": products, "total": total, "skip": 0, "limit": limit})
}

fn titles(result: &CatalogResult) -> Vec<&str> {
    result.items.iter().map(|item| item.title.as_str()).collect()
}

fn item(id: u64, title: &str, price: f64) -> Item {
    serde_json::from_value(json!({"id": id, "title": title, "price": price, "brand": "Acme"}))
        .unwrap()
}

fn seeded() -> CatalogResult {
    CatalogResult::new(vec![item(1, "A", 5.0), item(2, "B", 6.0), item(3, "C", 7.0)], 194)
}

#[tokio::test]
async fn test_plain_listing_uses_limit_and_skip() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("limit", "10"))
        .and(query_param("skip", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(products(&[(21, "Page three")], 194)))
        .expect(1)
        .mount(&server)
        .await;

    let api = api(&server);
    let mut engine = CatalogQueryEngine::new(10);
    let ticket = engine.set_page(3);

    assert_eq!(engine.run(&api, ticket).await.unwrap(), FetchOutcome::Applied);
    assert_eq!(titles(engine.result()), vec!["Page three"]);
    assert_eq!(engine.result().total, 194);
    assert_eq!(engine.page_count(), 20);
    // Unknown fields ride along.
    assert_eq!(engine.result().items[0].extra["stock"], 5);
}

#[tokio::test]
async fn test_rows_with_null_title_or_price_still_load() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": [
                {"id": 1, "title": "Lamp", "price": 20},
                {"id": 2, "title": null, "price": null, "brand": "Acme"}
            ],
            "total": 2, "skip": 0, "limit": 10
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = api(&server);
    let mut engine = CatalogQueryEngine::new(10);

    assert_eq!(engine.refresh(&api).await.unwrap(), FetchOutcome::Applied);
    assert_eq!(titles(engine.result()), vec!["Lamp", ""]);
    assert_eq!(engine.result().items[1].extra["brand"], "Acme");
}

#[tokio::test]
async fn test_term_searches_whole_catalog() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/search"))
        .and(query_param("q", "phone"))
        .respond_with(ResponseTemplate::new(200).set_body_json(products(&[(121, "iPhone 5s")], 1)))
        .expect(1)
        .mount(&server)
        .await;

    let api = api(&server);
    let mut engine = CatalogQueryEngine::new(10);
    let ticket = engine.set_term("  phone ");

    engine.run(&api, ticket).await.unwrap();
    assert_eq!(titles(engine.result()), vec!["iPhone 5s"]);
    assert_eq!(engine.query().page(), 1);
}

#[tokio::test]
async fn test_single_category_with_term() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/category/laptops"))
        .and(query_param("q", "pro"))
        .respond_with(ResponseTemplate::new(200).set_body_json(products(&[(78, "MacBook Pro")], 1)))
        .expect(1)
        .mount(&server)
        .await;

    let api = api(&server);
    let mut engine = CatalogQueryEngine::new(10);
    engine.set_term("pro");
    let ticket = engine.toggle_categories(["laptops"]);

    engine.run(&api, ticket).await.unwrap();
    assert_eq!(titles(engine.result()), vec!["MacBook Pro"]);
}

#[tokio::test]
async fn test_multiple_categories_are_joined_and_unpaged() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("category", "smartphones,laptops"))
        .and(query_param_is_missing("limit"))
        .and(query_param_is_missing("skip"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(products(&[(121, "iPhone 5s"), (78, "MacBook Pro")], 2)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let api = api(&server);
    let mut engine = CatalogQueryEngine::new(10);
    let ticket = engine.set_categories(["smartphones", "laptops"]);

    engine.run(&api, ticket).await.unwrap();
    assert_eq!(engine.result().items.len(), 2);
}

#[tokio::test]
async fn test_failed_fetch_keeps_previous_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(products(&[(1, "Kept")], 1)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let api = api(&server);
    let mut engine = CatalogQueryEngine::new(10);
    engine.refresh(&api).await.unwrap();

    let ticket = engine.set_term("boom");
    assert_eq!(engine.run(&api, ticket).await.unwrap_err(), FetchError);
    assert_eq!(titles(engine.result()), vec!["Kept"]);
    assert_eq!(engine.query().term(), "boom");
}

#[tokio::test]
async fn test_categories_load_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/category-list"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!(["beauty", "fragrances", "laptops"])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let api = api(&server);
    let mut engine = CatalogQueryEngine::new(10);
    engine.load_categories(&api).await.unwrap();
    engine.load_categories(&api).await.unwrap();

    assert_eq!(engine.categories(), ["beauty", "fragrances", "laptops"]);
}

#[tokio::test]
async fn test_create_prepends_returned_item() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/products/add"))
        .and(body_json(json!({"title": "New", "price": 12.5})))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"id": 195, "title": "New", "price": 12.5})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let coordinator = MutationCoordinator::new(api(&server));
    let mut result = seeded();
    let created = coordinator
        .create(&mut result, &ItemFields::new("New", 12.5))
        .await
        .unwrap();

    assert_eq!(created.id, 195);
    assert_eq!(titles(&result), vec!["New", "A", "B", "C"]);
    assert_eq!(result.total, 194);
}

#[tokio::test]
async fn test_invalid_fields_are_rejected_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/products/add"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 195})))
        .expect(0)
        .mount(&server)
        .await;

    let coordinator = MutationCoordinator::new(api(&server));
    let mut result = seeded();

    let err = coordinator
        .create(&mut result, &ItemFields::new("   ", 1.0))
        .await
        .unwrap_err();
    assert_eq!(err.op, MutationKind::Create);
    assert!(coordinator.create(&mut result, &ItemFields::new("X", -1.0)).await.is_err());
    assert_eq!(result, seeded());
}

#[tokio::test]
async fn test_update_merges_partial_response() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/products/2"))
        .and(body_json(json!({"title": "B2", "price": 6.0})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 2, "title": "B2"})))
        .expect(1)
        .mount(&server)
        .await;

    let coordinator = MutationCoordinator::new(api(&server));
    let mut result = seeded();
    let updated = coordinator
        .update(&mut result, 2, &ItemFields::new("B2", 6.0))
        .await
        .unwrap();

    assert_eq!(updated.title, "B2");
    assert!((updated.price - 6.0).abs() < f64::EPSILON);
    assert_eq!(updated.extra["brand"], "Acme");
    assert_eq!(titles(&result), vec!["A", "B2", "C"]);
}

#[tokio::test]
async fn test_update_of_unlisted_item_leaves_list_alone() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/products/50"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"title": "Far away", "price": 1})),
        )
        .mount(&server)
        .await;

    let coordinator = MutationCoordinator::new(api(&server));
    let mut result = seeded();
    let updated = coordinator
        .update(&mut result, 50, &ItemFields::new("Far away", 1.0))
        .await
        .unwrap();

    assert_eq!(updated.id, 50);
    assert_eq!(result, seeded());
}

#[tokio::test]
async fn test_failed_update_leaves_state_unchanged() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/products/1"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "not found"})))
        .mount(&server)
        .await;

    let coordinator = MutationCoordinator::new(api(&server));
    let mut result = seeded();
    let err = coordinator
        .update(&mut result, 1, &ItemFields::new("Z", 1.0))
        .await
        .unwrap_err();

    assert_eq!(err.op, MutationKind::Update);
    assert_eq!(
        err.to_string(),
        "Failed to save product. Please check your input."
    );
    assert_eq!(result, seeded());
}

#[tokio::test]
async fn test_delete_removes_exactly_one_and_keeps_total() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/products/2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": 2, "isDeleted": true})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let coordinator = MutationCoordinator::new(api(&server));
    let mut result = seeded();
    coordinator.delete(&mut result, 2).await.unwrap();

    assert_eq!(titles(&result), vec!["A", "C"]);
    assert_eq!(result.total, 194);
}

#[tokio::test]
async fn test_delete_absent_id_leaves_list_unchanged() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/products/99"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": 99, "isDeleted": true})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let coordinator = MutationCoordinator::new(api(&server));
    let mut result = seeded();
    coordinator.delete(&mut result, 99).await.unwrap();

    assert_eq!(result, seeded());
}

#[tokio::test]
async fn test_delete_requires_explicit_ok() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/products/1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/products/3"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let coordinator = MutationCoordinator::new(api(&server));
    let mut result = seeded();

    let err = coordinator.delete(&mut result, 1).await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to delete product. Please try again.");
    assert!(coordinator.delete(&mut result, 3).await.is_err());
    assert_eq!(result, seeded());
}
