//! Mapping between crud entities and PostgreSQL tables.

use chrono::{DateTime, Utc};
use sqlx::Postgres;
use sqlx::postgres::PgRow;
use sqlx::query_builder::Separated;
use uuid::Uuid;

use adminkit_crud::entity::Entity;

/// A dynamically typed SQL parameter.
///
/// Entities describe their column values with this enum so the generic
/// store can bind them without knowing the concrete field types.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// A UUID value.
    Uuid(Uuid),
    /// A text value.
    Text(String),
    /// A 64-bit integer value.
    BigInt(i64),
    /// A double-precision float value.
    Double(f64),
    /// A boolean value.
    Bool(bool),
    /// A UTC timestamp value.
    Timestamp(DateTime<Utc>),
    /// SQL NULL (bound as a null text parameter).
    Null,
}

impl SqlValue {
    /// Bind this value onto a separated query-builder position.
    pub fn bind_separated(self, builder: &mut Separated<'_, '_, Postgres, &'static str>) {
        match self {
            Self::Uuid(v) => {
                builder.push_bind(v);
            }
            Self::Text(v) => {
                builder.push_bind(v);
            }
            Self::BigInt(v) => {
                builder.push_bind(v);
            }
            Self::Double(v) => {
                builder.push_bind(v);
            }
            Self::Bool(v) => {
                builder.push_bind(v);
            }
            Self::Timestamp(v) => {
                builder.push_bind(v);
            }
            Self::Null => {
                builder.push_bind(Option::<String>::None);
            }
        }
    }

    /// Bind this value onto a query builder.
    pub fn bind(self, builder: &mut sqlx::QueryBuilder<'_, Postgres>) {
        match self {
            Self::Uuid(v) => {
                builder.push_bind(v);
            }
            Self::Text(v) => {
                builder.push_bind(v);
            }
            Self::BigInt(v) => {
                builder.push_bind(v);
            }
            Self::Double(v) => {
                builder.push_bind(v);
            }
            Self::Bool(v) => {
                builder.push_bind(v);
            }
            Self::Timestamp(v) => {
                builder.push_bind(v);
            }
            Self::Null => {
                builder.push_bind(Option::<String>::None);
            }
        }
    }
}

/// An [`Entity`] persisted in a PostgreSQL table.
///
/// `columns` lists every persisted column including the id column; it
/// doubles as the whitelist for sort and filter fields, so nothing a
/// request supplies is ever interpolated into SQL unchecked.
pub trait PgEntity: Entity + for<'r> sqlx::FromRow<'r, PgRow> + Unpin {
    /// Table name.
    fn table() -> &'static str;

    /// Primary key column.
    fn id_column() -> &'static str {
        "id"
    }

    /// All persisted columns, in insert order.
    fn columns() -> &'static [&'static str];

    /// The id as a bindable parameter.
    fn id_param(id: &Self::Id) -> SqlValue;

    /// This entity's column values, parallel to [`columns`].
    ///
    /// [`columns`]: PgEntity::columns
    fn row_values(&self) -> Vec<SqlValue>;
}
