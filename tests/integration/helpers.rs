//! Shared test helpers for integration tests.
//!
//! Builds a full CRUD stack — memory store, grid registry, a view engine
//! that renders the context as JSON so tests can assert on it — and
//! drives it through the router with `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use serde::{Deserialize, Serialize};
use tower::ServiceExt;
use uuid::Uuid;
use validator::Validate;

use adminkit_core::result::AppResult;
use adminkit_core::types::filter::FilterField;
use adminkit_crud::config::CrudConfig;
use adminkit_crud::controller::CrudController;
use adminkit_crud::entity::Entity;
use adminkit_crud::form::EntityForm;
use adminkit_crud::grid::{GridColumn, GridRegistry};
use adminkit_crud::module::CrudModule;
use adminkit_crud::request::ListRequest;
use adminkit_crud::store::memory::MemoryEntityStore;
use adminkit_crud::store::{EntityStore, ListQuery};
use adminkit_crud::view::{ViewContext, ViewEngine};
use adminkit_web::{SessionFlashStore, crud_routes};

/// Entity managed by the test admin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub price_cents: i64,
}

impl Default for Item {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            name: String::new(),
            price_cents: 0,
        }
    }
}

impl Entity for Item {
    type Id = Uuid;

    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ItemForm {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(range(min = 0, message = "Price cannot be negative"))]
    pub price_cents: i64,
}

impl EntityForm<Item> for ItemForm {
    fn from_entity(entity: &Item) -> Self {
        Self {
            name: entity.name.clone(),
            price_cents: entity.price_cents,
        }
    }

    fn apply(self, entity: &mut Item) {
        entity.name = self.name;
        entity.price_cents = self.price_cents;
    }
}

pub struct ItemModule;

impl CrudModule for ItemModule {
    type Entity = Item;
    type Form = ItemForm;

    fn name(&self) -> &str {
        "items"
    }

    fn configure(&self, config: &mut CrudConfig) {
        config.entity_name = Some("item".into());
        config.form_type = Some("item_form".into());
        config.grid_type = Some("item_grid".into());
        config.route_prefix = Some("/admin/items".into());
        config.default_sort_field = Some("name".into());
    }

    fn list_criteria(&self, request: &ListRequest, query: &mut ListQuery) {
        if let Some(q) = request.query.get("q").filter(|q| !q.is_empty()) {
            query.add_filter(FilterField::ilike("name", format!("%{q}%")));
        }
    }
}

/// View engine that renders every template as a JSON dump of its context.
pub struct JsonViews;

impl ViewEngine for JsonViews {
    fn exists(&self, template: &str) -> bool {
        template.starts_with("crud/")
    }

    fn render(&self, template: &str, context: &ViewContext) -> AppResult<String> {
        let body = serde_json::json!({
            "template": template,
            "context": context,
        });
        Ok(body.to_string())
    }
}

/// Test application context
pub struct TestApp {
    router: Router,
    pub store: MemoryEntityStore<Item>,
}

impl TestApp {
    /// Create a new test application
    pub fn new() -> Self {
        let store = MemoryEntityStore::new();

        let mut grids = GridRegistry::new();
        grids.register(
            "item_grid",
            vec![
                GridColumn::sortable("name", "Name"),
                GridColumn::sortable("price_cents", "Price"),
            ],
        );

        let controller = Arc::new(CrudController::new(
            ItemModule,
            Arc::new(store.clone()) as Arc<dyn EntityStore<Item>>,
            Arc::new(grids),
            Arc::new(JsonViews),
        ));

        let router = Router::new().nest(
            "/admin/items",
            crud_routes(controller, Arc::new(SessionFlashStore::new())),
        );

        Self { router, store }
    }

    /// Seed three items with distinct names and prices.
    pub fn seed(&self) -> Vec<Uuid> {
        let mut ids = Vec::new();
        for (name, price_cents) in [("anvil", 2500), ("crowbar", 1200), ("bolt", 40)] {
            let item = Item {
                id: Uuid::new_v4(),
                name: name.into(),
                price_cents,
            };
            ids.push(item.id);
            self.store.seed(item);
        }
        ids
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).expect("request build failed"))
            .await
    }

    pub async fn post_form(&self, uri: &str, body: &str, cookie: Option<&str>) -> TestResponse {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(
            builder
                .body(Body::from(body.to_string()))
                .expect("request build failed"),
        )
        .await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("request failed");

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().expect("invalid location header").to_string());
        let session_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .map(|v| v.to_str().expect("invalid set-cookie header"))
            .map(|v| v.split(';').next().unwrap_or_default().to_string());

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read body");

        TestResponse {
            status,
            location,
            session_cookie,
            body: String::from_utf8(body.to_vec()).expect("non-utf8 body"),
        }
    }
}

/// A captured HTTP response.
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub session_cookie: Option<String>,
    pub body: String,
}

impl TestResponse {
    /// The rendered body as JSON.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("body is not JSON")
    }

    /// The render context of the JSON view.
    pub fn context(&self) -> serde_json::Value {
        self.json()["context"].clone()
    }

    /// Names of the listed items, in page order.
    pub fn listed_names(&self) -> Vec<String> {
        self.context()["pager"]["items"]
            .as_array()
            .expect("pager.items missing")
            .iter()
            .map(|item| item["name"].as_str().expect("item.name missing").to_string())
            .collect()
    }
}
