//! Listing grids — the renderable column model for an entity list.
//!
//! Grids describe *how* a collection is displayed; pagination describes
//! which slice of it is loaded. The two are independent.

use std::collections::BTreeMap;
use std::collections::HashMap;

use adminkit_core::error::AppError;
use adminkit_core::result::AppResult;
use serde::{Deserialize, Serialize};

/// Free-form options passed through to grid construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GridOptions(pub BTreeMap<String, serde_json::Value>);

impl GridOptions {
    /// Set an option value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Read an option value.
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }
}

/// One column of a listing grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridColumn {
    /// Entity field backing the column.
    pub field: String,
    /// Header label.
    pub label: String,
    /// Whether list sorting on this column is offered.
    pub sortable: bool,
}

impl GridColumn {
    /// A sortable column.
    pub fn sortable(field: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            label: label.into(),
            sortable: true,
        }
    }

    /// A display-only column.
    pub fn plain(field: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            label: label.into(),
            sortable: false,
        }
    }
}

/// The renderable grid produced for a listing page.
#[derive(Debug, Clone, Serialize)]
pub struct GridView {
    /// The named grid type this view was built from.
    pub grid_type: String,
    /// Ordered column model.
    pub columns: Vec<GridColumn>,
    /// Options the grid was built with.
    pub options: GridOptions,
}

/// Builds listing grids from a named grid type and options.
pub trait GridFactory: Send + Sync {
    /// Create the grid view for `grid_type`.
    fn create_grid(&self, grid_type: &str, options: &GridOptions) -> AppResult<GridView>;
}

/// Grid factory backed by an in-process registry of column models.
#[derive(Debug, Default)]
pub struct GridRegistry {
    grids: HashMap<String, Vec<GridColumn>>,
}

impl GridRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a grid type under a name.
    pub fn register(&mut self, grid_type: impl Into<String>, columns: Vec<GridColumn>) {
        self.grids.insert(grid_type.into(), columns);
    }
}

impl GridFactory for GridRegistry {
    fn create_grid(&self, grid_type: &str, options: &GridOptions) -> AppResult<GridView> {
        let columns = self.grids.get(grid_type).ok_or_else(|| {
            AppError::configuration(format!("Unknown grid type '{grid_type}'"))
        })?;

        Ok(GridView {
            grid_type: grid_type.to_string(),
            columns: columns.clone(),
            options: options.clone(),
        })
    }
}
