//! Product catalog entity managed by the demo admin.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use adminkit_core::types::filter::FilterField;
use adminkit_crud::config::CrudConfig;
use adminkit_crud::entity::Entity;
use adminkit_crud::form::EntityForm;
use adminkit_crud::module::CrudModule;
use adminkit_crud::request::ListRequest;
use adminkit_crud::store::ListQuery;
use adminkit_database::entity::{PgEntity, SqlValue};

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    /// Primary key.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Stock-keeping unit code.
    pub sku: String,
    /// Price in cents.
    pub price_cents: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Default for Product {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: String::new(),
            sku: String::new(),
            price_cents: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Entity for Product {
    type Id = Uuid;

    fn id(&self) -> Uuid {
        self.id
    }
}

impl PgEntity for Product {
    fn table() -> &'static str {
        "products"
    }

    fn columns() -> &'static [&'static str] {
        &["id", "name", "sku", "price_cents", "created_at", "updated_at"]
    }

    fn id_param(id: &Uuid) -> SqlValue {
        SqlValue::Uuid(*id)
    }

    fn row_values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Uuid(self.id),
            SqlValue::Text(self.name.clone()),
            SqlValue::Text(self.sku.clone()),
            SqlValue::BigInt(self.price_cents),
            SqlValue::Timestamp(self.created_at),
            SqlValue::Timestamp(self.updated_at),
        ]
    }
}

/// Form backing product creation and editing.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProductForm {
    /// Display name.
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
    /// Stock-keeping unit code.
    #[validate(length(min = 1, max = 64, message = "SKU is required"))]
    pub sku: String,
    /// Price in cents.
    #[validate(range(min = 0, message = "Price cannot be negative"))]
    pub price_cents: i64,
}

impl EntityForm<Product> for ProductForm {
    fn from_entity(entity: &Product) -> Self {
        Self {
            name: entity.name.clone(),
            sku: entity.sku.clone(),
            price_cents: entity.price_cents,
        }
    }

    fn apply(self, entity: &mut Product) {
        entity.name = self.name;
        entity.sku = self.sku;
        entity.price_cents = self.price_cents;
        entity.updated_at = Utc::now();
    }
}

/// CRUD module definition for products.
pub struct ProductModule;

impl CrudModule for ProductModule {
    type Entity = Product;
    type Form = ProductForm;

    fn name(&self) -> &str {
        "products"
    }

    fn configure(&self, config: &mut CrudConfig) {
        config.entity_name = Some("product".into());
        config.form_type = Some("product_form".into());
        config.grid_type = Some("product_grid".into());
        config.route_prefix = Some("/admin/products".into());
        config.default_sort_field = Some("name".into());
    }

    fn list_criteria(&self, request: &ListRequest, query: &mut ListQuery) {
        // ?q= narrows the listing by name or SKU prefix.
        if let Some(q) = request.query.get("q").filter(|q| !q.is_empty()) {
            query.add_filter(FilterField::ilike("name", format!("%{q}%")));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_form_round_trip() {
        let mut product = Product::default();
        let form = ProductForm {
            name: "Anvil".into(),
            sku: "AN-100".into(),
            price_cents: 2500,
        };

        form.apply(&mut product);
        assert_eq!(product.name, "Anvil");

        let form = ProductForm::from_entity(&product);
        assert_eq!(form.sku, "AN-100");
        assert_eq!(form.price_cents, 2500);
    }

    #[test]
    fn test_form_validation_rules() {
        let form = ProductForm {
            name: String::new(),
            sku: "AN-100".into(),
            price_cents: -1,
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
        assert!(errors.field_errors().contains_key("price_cents"));
    }
}
