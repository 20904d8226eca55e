//! # adminkit-crud
//!
//! Generic CRUD orchestration. A [`module::CrudModule`] describes one
//! managed entity type (configuration plus a few overridable hooks); the
//! [`controller::CrudController`] composes it with an entity store, a grid
//! factory, and a view engine to provide list/add/edit/delete actions.
//!
//! The controller never touches HTTP directly — actions return an
//! [`controller::ActionOutcome`] that the web layer turns into a rendered
//! page or a redirect.

pub mod config;
pub mod controller;
pub mod entity;
pub mod flash;
pub mod form;
pub mod grid;
pub mod module;
pub mod request;
pub mod store;
pub mod view;

pub use config::CrudConfig;
pub use controller::{ActionOutcome, CrudController};
pub use entity::Entity;
pub use module::CrudModule;
