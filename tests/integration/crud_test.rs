//! Integration tests for the add, edit, and delete actions.

use http::StatusCode;
use uuid::Uuid;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_add_form_renders_pristine() {
    let app = TestApp::new();

    let response = app.get("/admin/items/add", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["template"], "crud/add.html");

    let form = response.context()["form"].clone();
    assert_eq!(form["submitted"], false);
    assert!(form["errors"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_add_valid_submission_persists_and_redirects() {
    let app = TestApp::new();

    let response = app
        .post_form("/admin/items/add", "name=drill&price_cents=990", None)
        .await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/admin/items/"));
    assert_eq!(app.store.len(), 1);

    // The success flash is waiting on the next rendered page.
    let cookie = response.session_cookie.expect("session cookie missing");
    let index = app.get("/admin/items/", Some(&cookie)).await;
    let flashes = index.context()["flashes"].clone();
    assert_eq!(flashes[0]["level"], "success");
    assert_eq!(flashes[0]["key"], "flash.item.add.success");

    // Drained after one render.
    let again = app.get("/admin/items/", Some(&cookie)).await;
    assert!(again.context()["flashes"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_add_invalid_submission_rerenders_without_persisting() {
    let app = TestApp::new();

    let response = app
        .post_form("/admin/items/add", "name=&price_cents=-5", None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["template"], "crud/add.html");
    assert_eq!(app.store.len(), 0);

    let form = response.context()["form"].clone();
    assert_eq!(form["submitted"], true);
    let errors = form["errors"].as_array().unwrap().clone();
    assert_eq!(errors.len(), 2);
    assert_eq!(form["values"]["price_cents"], -5);
}

#[tokio::test]
async fn test_add_malformed_body_rerenders_with_form_error() {
    let app = TestApp::new();

    let response = app
        .post_form("/admin/items/add", "name=drill&price_cents=lots", None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(app.store.len(), 0);

    let errors = response.context()["form"]["errors"].clone();
    assert_eq!(errors[0]["field"], "_form");
}

#[tokio::test]
async fn test_edit_form_shows_entity_values() {
    let app = TestApp::new();
    let ids = app.seed();

    let response = app
        .get(&format!("/admin/items/edit/{}", ids[1]), None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["template"], "crud/edit.html");
    assert_eq!(response.context()["form"]["values"]["name"], "crowbar");
}

#[tokio::test]
async fn test_edit_valid_submission_updates_entity() {
    let app = TestApp::new();
    let ids = app.seed();

    let response = app
        .post_form(
            &format!("/admin/items/edit/{}", ids[1]),
            "name=pry+bar&price_cents=1300",
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/admin/items/"));

    let updated = app.store.get(&ids[1]).unwrap();
    assert_eq!(updated.name, "pry bar");
    assert_eq!(updated.price_cents, 1300);
}

#[tokio::test]
async fn test_edit_unknown_id_is_not_found() {
    let app = TestApp::new();
    app.seed();

    let response = app
        .get(&format!("/admin/items/edit/{}", Uuid::new_v4()), None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app.get("/admin/items/edit/not-a-uuid", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_removes_entity_and_redirects() {
    let app = TestApp::new();
    let ids = app.seed();

    let response = app
        .post_form(&format!("/admin/items/delete/{}", ids[0]), "", None)
        .await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/admin/items/"));
    assert!(app.store.get(&ids[0]).is_none());
    assert_eq!(app.store.len(), 2);

    let cookie = response.session_cookie.expect("session cookie missing");
    let index = app.get("/admin/items/", Some(&cookie)).await;
    assert_eq!(
        index.context()["flashes"][0]["key"],
        "flash.item.delete.success"
    );
}

#[tokio::test]
async fn test_delete_unknown_id_is_not_found() {
    let app = TestApp::new();
    app.seed();

    let response = app
        .post_form(&format!("/admin/items/delete/{}", Uuid::new_v4()), "", None)
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(app.store.len(), 3);
}

#[tokio::test]
async fn test_commit_failure_still_redirects_with_error_flash() {
    let app = TestApp::new();
    let ids = app.seed();
    app.store.fail_commits(true);

    let response = app
        .post_form(&format!("/admin/items/delete/{}", ids[0]), "", None)
        .await;

    // Persistence failures are downgraded to a flash, never an error page.
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert!(app.store.get(&ids[0]).is_some());

    app.store.fail_commits(false);
    let cookie = response.session_cookie.expect("session cookie missing");
    let index = app.get("/admin/items/", Some(&cookie)).await;
    let flashes = index.context()["flashes"].clone();
    assert_eq!(flashes[0]["level"], "error");
    assert_eq!(flashes[0]["key"], "flash.item.delete.error");
}

#[tokio::test]
async fn test_add_commit_failure_flashes_error() {
    let app = TestApp::new();
    app.store.fail_commits(true);

    let response = app
        .post_form("/admin/items/add", "name=drill&price_cents=990", None)
        .await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(app.store.len(), 0);

    app.store.fail_commits(false);
    let cookie = response.session_cookie.expect("session cookie missing");
    let index = app.get("/admin/items/", Some(&cookie)).await;
    assert_eq!(
        index.context()["flashes"][0]["key"],
        "flash.item.add.error"
    );
}
