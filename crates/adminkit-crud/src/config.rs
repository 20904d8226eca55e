//! Per-controller CRUD configuration.

use adminkit_core::error::AppError;
use adminkit_core::result::AppResult;
use adminkit_core::types::sorting::{SortDirection, SortField};
use serde::Serialize;

use crate::form::FormOptions;
use crate::grid::GridOptions;

/// Default number of entities per listing page.
const DEFAULT_PAGE_SIZE: u64 = 25;

/// Configuration for one CRUD controller.
///
/// Populated by [`crate::module::CrudModule::configure`] and validated
/// exactly once before first use. `entity_name`, `form_type`, `grid_type`
/// and `route_prefix` are required; everything else has defaults.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CrudConfig {
    /// Short identifier for the managed entity; namespaces flash keys
    /// and template paths.
    pub entity_name: Option<String>,
    /// Named form type handled by the view layer.
    pub form_type: Option<String>,
    /// Options passed through to form construction.
    pub form_options: FormOptions,
    /// Named grid type used to build the listing widget.
    pub grid_type: Option<String>,
    /// Options passed through to grid construction.
    pub grid_options: GridOptions,
    /// Base URL path of this controller's routes; redirect target after
    /// mutations.
    pub route_prefix: Option<String>,
    /// Sort field applied when the request specifies none.
    pub default_sort_field: Option<String>,
    /// Sort direction applied when the request specifies none.
    pub default_sort_order: SortDirection,
    /// Listing page size.
    pub page_size: Option<u64>,
}

impl CrudConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate that all required fields are set.
    ///
    /// `module` names the owning controller in diagnostics. A missing
    /// field is a fatal configuration error.
    pub fn validate(&self, module: &str) -> AppResult<()> {
        for (field, value) in [
            ("entity_name", &self.entity_name),
            ("form_type", &self.form_type),
            ("grid_type", &self.grid_type),
            ("route_prefix", &self.route_prefix),
        ] {
            if value.as_deref().is_none_or(|v| v.is_empty()) {
                return Err(AppError::configuration(format!(
                    "Required field '{field}' is not set on crud module '{module}'"
                )));
            }
        }

        Ok(())
    }

    /// The validated entity name.
    pub fn entity_name(&self) -> &str {
        self.entity_name.as_deref().unwrap_or_default()
    }

    /// The validated form type.
    pub fn form_type(&self) -> &str {
        self.form_type.as_deref().unwrap_or_default()
    }

    /// The validated grid type.
    pub fn grid_type(&self) -> &str {
        self.grid_type.as_deref().unwrap_or_default()
    }

    /// The validated route prefix.
    pub fn route_prefix(&self) -> &str {
        self.route_prefix.as_deref().unwrap_or_default()
    }

    /// URL of the listing page, used as the post-mutation redirect target.
    pub fn index_url(&self) -> String {
        let prefix = self.route_prefix();
        if prefix.ends_with('/') {
            prefix.to_string()
        } else {
            format!("{prefix}/")
        }
    }

    /// The sort specification applied when the request carries none.
    pub fn default_sort(&self) -> SortField {
        SortField::new(
            self.default_sort_field.as_deref().unwrap_or("id"),
            self.default_sort_order,
        )
    }

    /// The listing page size.
    pub fn page_size(&self) -> u64 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> CrudConfig {
        CrudConfig {
            entity_name: Some("product".into()),
            form_type: Some("product_form".into()),
            grid_type: Some("product_grid".into()),
            route_prefix: Some("/admin/products".into()),
            ..CrudConfig::default()
        }
    }

    #[test]
    fn test_complete_config_validates() {
        assert!(complete().validate("products").is_ok());
    }

    #[test]
    fn test_each_required_field_is_checked() {
        for strip in ["entity_name", "form_type", "grid_type", "route_prefix"] {
            let mut config = complete();
            match strip {
                "entity_name" => config.entity_name = None,
                "form_type" => config.form_type = None,
                "grid_type" => config.grid_type = None,
                _ => config.route_prefix = None,
            }
            let err = config.validate("products").unwrap_err();
            assert!(err.message.contains(strip), "{}: {}", strip, err.message);
            assert!(err.message.contains("products"));
        }
    }

    #[test]
    fn test_index_url_has_trailing_slash() {
        let config = complete();
        assert_eq!(config.index_url(), "/admin/products/");
    }

    #[test]
    fn test_default_sort_falls_back_to_id() {
        let config = complete();
        let sort = config.default_sort();
        assert_eq!(sort.field, "id");
        assert_eq!(sort.direction, SortDirection::Asc);
    }
}
