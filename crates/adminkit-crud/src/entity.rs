//! The entity abstraction managed by CRUD controllers.

use std::fmt;
use std::hash::Hash;

use serde::Serialize;

/// A persisted domain object with a unique identifier.
///
/// The orchestrator treats entities as opaque: it never inspects domain
/// fields. `Serialize` is required so stores and views can work with a
/// generic representation, and `Default` supplies the blank instance used
/// by the add action when a module does not override
/// [`crate::module::CrudModule::new_instance`].
pub trait Entity: Clone + Default + Serialize + Send + Sync + 'static {
    /// Primary key type.
    type Id: Clone + Eq + Hash + fmt::Display + Send + Sync + 'static;

    /// Return this entity's identifier.
    fn id(&self) -> Self::Id;
}
