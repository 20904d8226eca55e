//! Entity persistence seam.
//!
//! The orchestrator talks to storage through [`EntityStore`]: reads go
//! through `find`/`list`, writes are staged on a [`UnitOfWork`] and
//! flushed by `commit`. A commit failure is the persistence error the
//! actions downgrade to an error flash.

pub mod memory;

use adminkit_core::result::AppResult;
use adminkit_core::types::filter::FilterField;
use adminkit_core::types::pagination::{PageRequest, PageResponse};
use adminkit_core::types::sorting::SortField;
use async_trait::async_trait;

use crate::entity::Entity;

/// A fully specified listing query: sort, extra criteria, and page.
#[derive(Debug, Clone)]
pub struct ListQuery {
    /// Applied sort.
    pub sort: SortField,
    /// Extra filter criteria contributed by module hooks.
    pub filters: Vec<FilterField>,
    /// Requested page.
    pub page: PageRequest,
}

impl ListQuery {
    /// Create a query with the given sort and page, no filters.
    pub fn new(sort: SortField, page: PageRequest) -> Self {
        Self {
            sort,
            filters: Vec::new(),
            page,
        }
    }

    /// Append a filter criterion.
    pub fn add_filter(&mut self, filter: FilterField) {
        self.filters.push(filter);
    }
}

/// Storage backend for one entity type.
#[async_trait]
pub trait EntityStore<E: Entity>: Send + Sync {
    /// Find an entity by its primary key.
    async fn find(&self, id: &E::Id) -> AppResult<Option<E>>;

    /// Execute a listing query.
    async fn list(&self, query: &ListQuery) -> AppResult<PageResponse<E>>;

    /// Start a unit of work for staging writes.
    fn begin(&self) -> Box<dyn UnitOfWork<E>>;
}

/// Writes staged against a store, flushed atomically by [`commit`].
///
/// [`commit`]: UnitOfWork::commit
#[async_trait]
pub trait UnitOfWork<E: Entity>: Send {
    /// Stage an insert-or-update of this entity.
    fn persist(&mut self, entity: E);

    /// Stage removal of this entity.
    fn remove(&mut self, entity: E);

    /// Flush all staged writes.
    async fn commit(self: Box<Self>) -> AppResult<()>;
}
