//! Integration tests for the listing action.

use http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_index_uses_configured_default_sort() {
    let app = TestApp::new();
    app.seed();

    let response = app.get("/admin/items/", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["template"], "crud/index.html");
    assert_eq!(response.listed_names(), vec!["anvil", "bolt", "crowbar"]);

    // The view sees the sort that was actually applied.
    let context = response.context();
    assert_eq!(context["sort_by"], "name");
    assert_eq!(context["sort_order"], "asc");
}

#[tokio::test]
async fn test_index_sorts_by_requested_field() {
    let app = TestApp::new();
    app.seed();

    let response = app
        .get("/admin/items/?sort_by=price_cents&sort_order=desc", None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.listed_names(), vec!["anvil", "crowbar", "bolt"]);

    let context = response.context();
    assert_eq!(context["sort_by"], "price_cents");
    assert_eq!(context["sort_order"], "desc");
}

#[tokio::test]
async fn test_index_ascending_prices_are_non_decreasing() {
    let app = TestApp::new();
    app.seed();

    let response = app
        .get("/admin/items/?sort_by=price_cents&sort_order=asc", None)
        .await;

    let context = response.context();
    let prices: Vec<i64> = context["pager"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["price_cents"].as_i64().unwrap())
        .collect();
    assert!(prices.windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test]
async fn test_index_honors_module_search_criteria() {
    let app = TestApp::new();
    app.seed();

    let response = app.get("/admin/items/?q=row", None).await;

    assert_eq!(response.listed_names(), vec!["crowbar"]);
    assert_eq!(response.context()["pager"]["total_items"], 1);
}

#[tokio::test]
async fn test_index_out_of_range_page_is_empty() {
    let app = TestApp::new();
    app.seed();

    let response = app.get("/admin/items/?page=9", None).await;

    assert!(response.listed_names().is_empty());
    assert_eq!(response.context()["pager"]["total_items"], 3);
}

#[tokio::test]
async fn test_index_renders_grid_columns() {
    let app = TestApp::new();
    app.seed();

    let response = app.get("/admin/items/", None).await;

    let context = response.context();
    assert_eq!(context["grid"]["grid_type"], "item_grid");
    let columns = context["grid"]["columns"].as_array().unwrap();
    assert_eq!(columns.len(), 2);
    assert_eq!(columns[0]["field"], "name");
}
