//! # adminkit-database
//!
//! PostgreSQL persistence for AdminKit. Provides the connection pool,
//! the migration runner, and a generic [`store::PgEntityStore`] that
//! implements the crud store seam for any [`entity::PgEntity`].

pub mod connection;
pub mod entity;
pub mod migration;
pub mod store;

pub use entity::{PgEntity, SqlValue};
pub use store::PgEntityStore;
