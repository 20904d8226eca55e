//! The per-entity CRUD module definition.

use crate::config::CrudConfig;
use crate::entity::Entity;
use crate::form::EntityForm;
use crate::request::{ListRequest, QueryParams};
use crate::store::ListQuery;

/// Describes one managed entity type: its configuration and the
/// customization hooks the controller calls into.
///
/// Only [`configure`] must be written; the remaining hooks have no-op
/// defaults mirroring the base behavior.
///
/// [`configure`]: CrudModule::configure
pub trait CrudModule: Send + Sync + 'static {
    /// The managed entity type.
    type Entity: Entity;
    /// The form DTO bound to submissions for this entity.
    type Form: EntityForm<Self::Entity>;

    /// Short module name used in diagnostics.
    fn name(&self) -> &str;

    /// Populate the controller configuration.
    fn configure(&self, config: &mut CrudConfig);

    /// Narrow or extend the listing query, e.g. scope it to a parent
    /// object or honor extra request parameters.
    fn list_criteria(&self, request: &ListRequest, query: &mut ListQuery) {
        let _ = (request, query);
    }

    /// Produce the entity instance the add action starts from.
    fn new_instance(&self, request: &QueryParams) -> Self::Entity {
        let _ = request;
        Self::Entity::default()
    }
}
