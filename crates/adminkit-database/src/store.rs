//! Generic PostgreSQL entity store.
//!
//! Implements the crud store seam for any [`PgEntity`]. Listing queries
//! are assembled with `sqlx::QueryBuilder`; sort and filter fields are
//! checked against the entity's column whitelist before they reach SQL.
//! Writes are staged on a unit of work and flushed in one transaction.

use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use adminkit_core::error::{AppError, ErrorKind};
use adminkit_core::result::AppResult;
use adminkit_core::types::filter::{FilterField, FilterOp, FilterValue};
use adminkit_core::types::pagination::PageResponse;
use adminkit_crud::entity::Entity;
use adminkit_crud::store::{EntityStore, ListQuery, UnitOfWork};

use crate::entity::{PgEntity, SqlValue};

/// PostgreSQL-backed store for one entity type.
#[derive(Debug)]
pub struct PgEntityStore<E: PgEntity> {
    pool: PgPool,
    _marker: PhantomData<fn() -> E>,
}

impl<E: PgEntity> Clone for PgEntityStore<E> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _marker: PhantomData,
        }
    }
}

impl<E: PgEntity> PgEntityStore<E> {
    /// Create a store on the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<E: PgEntity> EntityStore<E> for PgEntityStore<E> {
    async fn find(&self, id: &E::Id) -> AppResult<Option<E>> {
        let mut query = QueryBuilder::new(format!(
            "SELECT * FROM {} WHERE {} = ",
            E::table(),
            E::id_column()
        ));
        E::id_param(id).bind(&mut query);

        query
            .build_query_as::<E>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Failed to find {} by id", E::table()),
                    e,
                )
            })
    }

    async fn list(&self, query: &ListQuery) -> AppResult<PageResponse<E>> {
        let total: i64 = build_count_query::<E>(query)?
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Failed to count {}", E::table()),
                    e,
                )
            })?;

        let items = build_select_query::<E>(query)?
            .build_query_as::<E>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Failed to list {}", E::table()),
                    e,
                )
            })?;

        Ok(PageResponse::new(
            items,
            query.page.page,
            query.page.page_size,
            total as u64,
        ))
    }

    fn begin(&self) -> Box<dyn UnitOfWork<E>> {
        Box::new(PgUnitOfWork {
            pool: self.pool.clone(),
            ops: Vec::new(),
        })
    }
}

enum Op<E: PgEntity> {
    Persist(E),
    Remove(E::Id),
}

struct PgUnitOfWork<E: PgEntity> {
    pool: PgPool,
    ops: Vec<Op<E>>,
}

#[async_trait]
impl<E: PgEntity> UnitOfWork<E> for PgUnitOfWork<E> {
    fn persist(&mut self, entity: E) {
        self.ops.push(Op::Persist(entity));
    }

    fn remove(&mut self, entity: E) {
        self.ops.push(Op::Remove(entity.id()));
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let map_err = |e: sqlx::Error| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Commit failed for {}", E::table()),
                e,
            )
        };

        let mut tx = self.pool.begin().await.map_err(map_err)?;

        for op in self.ops {
            match op {
                Op::Persist(entity) => {
                    build_upsert_query(&entity)
                        .build()
                        .execute(&mut *tx)
                        .await
                        .map_err(map_err)?;
                }
                Op::Remove(id) => {
                    let mut query = QueryBuilder::new(format!(
                        "DELETE FROM {} WHERE {} = ",
                        E::table(),
                        E::id_column()
                    ));
                    E::id_param(&id).bind(&mut query);
                    query.build().execute(&mut *tx).await.map_err(map_err)?;
                }
            }
        }

        tx.commit().await.map_err(map_err)
    }
}

/// Check a request-supplied field against the entity's column whitelist.
fn check_column<E: PgEntity>(field: &str) -> AppResult<()> {
    if field == E::id_column() || E::columns().iter().any(|column| *column == field) {
        Ok(())
    } else {
        Err(AppError::validation(format!(
            "Unknown column '{}' for table {}",
            field,
            E::table()
        )))
    }
}

fn build_count_query<'q, E: PgEntity>(query: &ListQuery) -> AppResult<QueryBuilder<'q, Postgres>> {
    let mut builder = QueryBuilder::new(format!("SELECT COUNT(*) FROM {}", E::table()));
    push_filters::<E>(&mut builder, &query.filters)?;
    Ok(builder)
}

fn build_select_query<'q, E: PgEntity>(query: &ListQuery) -> AppResult<QueryBuilder<'q, Postgres>> {
    check_column::<E>(&query.sort.field)?;

    let mut builder = QueryBuilder::new(format!("SELECT * FROM {}", E::table()));
    push_filters::<E>(&mut builder, &query.filters)?;
    builder.push(format!(
        " ORDER BY {} {}",
        query.sort.field,
        query.sort.direction.as_sql()
    ));
    builder.push(" LIMIT ");
    builder.push_bind(query.page.limit() as i64);
    builder.push(" OFFSET ");
    builder.push_bind(query.page.offset() as i64);

    Ok(builder)
}

fn build_upsert_query<'q, E: PgEntity>(entity: &E) -> QueryBuilder<'q, Postgres> {
    let mut builder = QueryBuilder::new(format!(
        "INSERT INTO {} ({}) ",
        E::table(),
        E::columns().join(", ")
    ));

    builder.push_values([entity], |mut row, entity| {
        for value in entity.row_values() {
            value.bind_separated(&mut row);
        }
    });

    let updates = E::columns()
        .iter()
        .filter(|column| **column != E::id_column())
        .map(|column| format!("{column} = EXCLUDED.{column}"))
        .collect::<Vec<_>>()
        .join(", ");
    builder.push(format!(
        " ON CONFLICT ({}) DO UPDATE SET {}",
        E::id_column(),
        updates
    ));

    builder
}

fn push_filters<E: PgEntity>(
    builder: &mut QueryBuilder<'_, Postgres>,
    filters: &[FilterField],
) -> AppResult<()> {
    for (i, filter) in filters.iter().enumerate() {
        check_column::<E>(&filter.field)?;

        builder.push(if i == 0 { " WHERE " } else { " AND " });
        builder.push(&filter.field);

        match filter.op {
            FilterOp::IsNull => {
                builder.push(" IS NULL");
            }
            FilterOp::IsNotNull => {
                builder.push(" IS NOT NULL");
            }
            op => {
                builder.push(comparison_sql(op));
                filter_param(&filter.value).bind(builder);
            }
        }
    }

    Ok(())
}

fn comparison_sql(op: FilterOp) -> &'static str {
    match op {
        FilterOp::Eq => " = ",
        FilterOp::Ne => " <> ",
        FilterOp::Gt => " > ",
        FilterOp::Gte => " >= ",
        FilterOp::Lt => " < ",
        FilterOp::Lte => " <= ",
        FilterOp::Like => " LIKE ",
        FilterOp::ILike => " ILIKE ",
        FilterOp::IsNull | FilterOp::IsNotNull => unreachable!("null checks take no parameter"),
    }
}

fn filter_param(value: &FilterValue) -> SqlValue {
    match value {
        FilterValue::String(v) => SqlValue::Text(v.clone()),
        FilterValue::Integer(v) => SqlValue::BigInt(*v),
        FilterValue::Float(v) => SqlValue::Double(*v),
        FilterValue::Boolean(v) => SqlValue::Bool(*v),
        FilterValue::Null => SqlValue::Null,
    }
}
