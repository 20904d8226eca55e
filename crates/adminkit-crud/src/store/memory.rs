//! In-memory entity store.
//!
//! Used by tests and as a database-free fallback. Sorting and filtering
//! are evaluated over the serialized representation of the entity, so the
//! store works for any [`Entity`] without knowing its fields.

use std::cmp::Ordering;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};

use adminkit_core::error::AppError;
use adminkit_core::result::AppResult;
use adminkit_core::types::filter::{FilterField, FilterOp, FilterValue};
use adminkit_core::types::pagination::PageResponse;
use adminkit_core::types::sorting::SortDirection;
use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;

use crate::entity::Entity;
use crate::store::{EntityStore, ListQuery, UnitOfWork};

/// DashMap-backed entity store.
pub struct MemoryEntityStore<E: Entity> {
    items: Arc<DashMap<E::Id, E>>,
    fail_commits: Arc<AtomicBool>,
}

impl<E: Entity> Default for MemoryEntityStore<E> {
    fn default() -> Self {
        Self {
            items: Arc::new(DashMap::new()),
            fail_commits: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl<E: Entity> Clone for MemoryEntityStore<E> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
            fail_commits: Arc::clone(&self.fail_commits),
        }
    }
}

impl<E: Entity> MemoryEntityStore<E> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entity directly, bypassing unit-of-work staging.
    pub fn seed(&self, entity: E) {
        self.items.insert(entity.id(), entity);
    }

    /// Read an entity directly.
    pub fn get(&self, id: &E::Id) -> Option<E> {
        self.items.get(id).map(|entry| entry.clone())
    }

    /// Number of stored entities.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Make every subsequent commit fail with a database error.
    pub fn fail_commits(&self, fail: bool) {
        self.fail_commits.store(fail, AtomicOrdering::SeqCst);
    }
}

#[async_trait]
impl<E: Entity> EntityStore<E> for MemoryEntityStore<E> {
    async fn find(&self, id: &E::Id) -> AppResult<Option<E>> {
        Ok(self.get(id))
    }

    async fn list(&self, query: &ListQuery) -> AppResult<PageResponse<E>> {
        let mut matched: Vec<(Value, E)> = Vec::new();
        for entry in self.items.iter() {
            let json = serde_json::to_value(entry.value())?;
            if query.filters.iter().all(|f| matches_filter(&json, f)) {
                matched.push((json, entry.value().clone()));
            }
        }

        matched.sort_by(|(a, _), (b, _)| {
            let ordering = compare_fields(a, b, &query.sort.field);
            match query.sort.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });

        let total = matched.len() as u64;
        let items = matched
            .into_iter()
            .map(|(_, entity)| entity)
            .skip(query.page.offset() as usize)
            .take(query.page.limit() as usize)
            .collect();

        Ok(PageResponse::new(
            items,
            query.page.page,
            query.page.page_size,
            total,
        ))
    }

    fn begin(&self) -> Box<dyn UnitOfWork<E>> {
        Box::new(MemoryUnitOfWork {
            items: Arc::clone(&self.items),
            fail: self.fail_commits.load(AtomicOrdering::SeqCst),
            ops: Vec::new(),
        })
    }
}

enum Op<E: Entity> {
    Persist(E),
    Remove(E::Id),
}

struct MemoryUnitOfWork<E: Entity> {
    items: Arc<DashMap<E::Id, E>>,
    fail: bool,
    ops: Vec<Op<E>>,
}

#[async_trait]
impl<E: Entity> UnitOfWork<E> for MemoryUnitOfWork<E> {
    fn persist(&mut self, entity: E) {
        self.ops.push(Op::Persist(entity));
    }

    fn remove(&mut self, entity: E) {
        self.ops.push(Op::Remove(entity.id()));
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        if self.fail {
            return Err(AppError::database("Commit failed"));
        }

        for op in self.ops {
            match op {
                Op::Persist(entity) => {
                    self.items.insert(entity.id(), entity);
                }
                Op::Remove(id) => {
                    self.items.remove(&id);
                }
            }
        }

        Ok(())
    }
}

/// Compare the named field of two serialized entities.
fn compare_fields(a: &Value, b: &Value, field: &str) -> Ordering {
    compare_values(
        a.get(field).unwrap_or(&Value::Null),
        b.get(field).unwrap_or(&Value::Null),
    )
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        // Mixed types: order by type tag so the sort stays total.
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

fn matches_filter(entity: &Value, filter: &FilterField) -> bool {
    let field = entity.get(&filter.field).unwrap_or(&Value::Null);

    match filter.op {
        FilterOp::IsNull => field.is_null(),
        FilterOp::IsNotNull => !field.is_null(),
        FilterOp::Like => like_match(field, &filter.value, false),
        FilterOp::ILike => like_match(field, &filter.value, true),
        op => {
            let ordering = compare_values(field, &filter_value_to_json(&filter.value));
            match op {
                FilterOp::Eq => ordering == Ordering::Equal,
                FilterOp::Ne => ordering != Ordering::Equal,
                FilterOp::Gt => ordering == Ordering::Greater,
                FilterOp::Gte => ordering != Ordering::Less,
                FilterOp::Lt => ordering == Ordering::Less,
                FilterOp::Lte => ordering != Ordering::Greater,
                _ => unreachable!("pattern and null ops handled above"),
            }
        }
    }
}

fn filter_value_to_json(value: &FilterValue) -> Value {
    match value {
        FilterValue::String(s) => Value::String(s.clone()),
        FilterValue::Integer(i) => Value::from(*i),
        FilterValue::Float(f) => Value::from(*f),
        FilterValue::Boolean(b) => Value::Bool(*b),
        FilterValue::Null => Value::Null,
    }
}

/// SQL-style `LIKE` with `%` wildcards, evaluated on string fields.
fn like_match(field: &Value, pattern: &FilterValue, case_insensitive: bool) -> bool {
    let (Value::String(text), FilterValue::String(pattern)) = (field, pattern) else {
        return false;
    };

    let (text, pattern) = if case_insensitive {
        (text.to_lowercase(), pattern.to_lowercase())
    } else {
        (text.clone(), pattern.clone())
    };

    let segments: Vec<&str> = pattern.split('%').collect();
    let mut rest = text.as_str();

    for (i, segment) in segments.iter().enumerate() {
        if segment.is_empty() {
            continue;
        }
        if i == 0 {
            let Some(stripped) = rest.strip_prefix(segment) else {
                return false;
            };
            rest = stripped;
        } else if i == segments.len() - 1 {
            return rest.ends_with(segment);
        } else {
            let Some(pos) = rest.find(segment) else {
                return false;
            };
            rest = &rest[pos + segment.len()..];
        }
    }

    // Pattern without a trailing wildcard must consume the whole text.
    if pattern.ends_with('%') { true } else { rest.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adminkit_core::types::pagination::PageRequest;
    use adminkit_core::types::sorting::SortField;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    struct Widget {
        id: u64,
        name: String,
        stock: i64,
    }

    impl Entity for Widget {
        type Id = u64;

        fn id(&self) -> u64 {
            self.id
        }
    }

    fn widget(id: u64, name: &str, stock: i64) -> Widget {
        Widget {
            id,
            name: name.into(),
            stock,
        }
    }

    fn seeded() -> MemoryEntityStore<Widget> {
        let store = MemoryEntityStore::new();
        store.seed(widget(1, "anvil", 3));
        store.seed(widget(2, "crowbar", 12));
        store.seed(widget(3, "bolt", 7));
        store
    }

    #[tokio::test]
    async fn test_list_sorts_ascending_and_descending() {
        let store = seeded();

        let asc = ListQuery::new(SortField::asc("name"), PageRequest::default());
        let names: Vec<String> = store
            .list(&asc)
            .await
            .unwrap()
            .items
            .into_iter()
            .map(|w| w.name)
            .collect();
        assert_eq!(names, vec!["anvil", "bolt", "crowbar"]);

        let desc = ListQuery::new(SortField::desc("stock"), PageRequest::default());
        let stocks: Vec<i64> = store
            .list(&desc)
            .await
            .unwrap()
            .items
            .into_iter()
            .map(|w| w.stock)
            .collect();
        assert_eq!(stocks, vec![12, 7, 3]);
    }

    #[tokio::test]
    async fn test_list_applies_filters() {
        let store = seeded();

        let mut query = ListQuery::new(SortField::asc("name"), PageRequest::default());
        query.add_filter(FilterField::new(
            "stock",
            FilterOp::Gte,
            FilterValue::Integer(7),
        ));

        let page = store.list(&query).await.unwrap();
        assert_eq!(page.total_items, 2);

        let mut query = ListQuery::new(SortField::asc("name"), PageRequest::default());
        query.add_filter(FilterField::ilike("name", "%ROW%"));
        let page = store.list(&query).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name, "crowbar");
    }

    #[tokio::test]
    async fn test_out_of_range_page_is_empty() {
        let store = seeded();

        let query = ListQuery::new(SortField::asc("name"), PageRequest::new(9, 25));
        let page = store.list(&query).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_items, 3);
    }

    #[tokio::test]
    async fn test_unit_of_work_commits_staged_ops() {
        let store = seeded();

        let mut uow = store.begin();
        uow.persist(widget(4, "drill", 1));
        uow.remove(widget(1, "anvil", 3));
        uow.commit().await.unwrap();

        assert!(store.get(&4).is_some());
        assert!(store.get(&1).is_none());
    }

    #[tokio::test]
    async fn test_failed_commit_leaves_store_untouched() {
        let store = seeded();
        store.fail_commits(true);

        let mut uow = store.begin();
        uow.persist(widget(4, "drill", 1));
        assert!(uow.commit().await.is_err());

        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_like_match_anchoring() {
        let field = Value::String("crowbar".into());
        assert!(like_match(
            &field,
            &FilterValue::String("crow%".into()),
            false
        ));
        assert!(!like_match(
            &field,
            &FilterValue::String("crow".into()),
            false
        ));
        assert!(like_match(
            &field,
            &FilterValue::String("%bar".into()),
            false
        ));
        assert!(like_match(
            &field,
            &FilterValue::String("%OWB%".into()),
            true
        ));
    }
}
