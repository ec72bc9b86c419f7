//! Store interface.
//!
//! The engine only constructs predicates and orderings; executing them is
//! the store's job. [`MemoryStore`] is the reference implementation.

mod memory;


pub use memory::MemoryStore;

use crate::{
    error::Error,
    model::FieldPath,
    query::{OrderDirection, Predicate},
    record::Record,
};
use std::ops::Range;

///
/// NativeQuery
///
/// The store-executable part of one request.
///
/// predicate → search filter, `None` for no filtering
/// order     → leading ordering tiers the store can apply
/// distinct  → collapse duplicate rows produced by to-many joins
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct NativeQuery {
    pub predicate: Option<Predicate>,
    pub order: Vec<(FieldPath, OrderDirection)>,
    pub distinct: bool,
}

impl NativeQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn filter(mut self, predicate: Option<Predicate>) -> Self {
        self.predicate = predicate;
        self
    }

    #[must_use]
    pub fn order_by(mut self, path: FieldPath, direction: OrderDirection) -> Self {
        self.order.push((path, direction));
        self
    }

    #[must_use]
    pub const fn distinct(mut self, distinct: bool) -> Self {
        self.distinct = distinct;
        self
    }
}

///
/// RecordSet
///
/// A queryable collection of records.
/// `fetch` with a window must only materialize that window.
///

pub trait RecordSet: Send + Sync {
    /// Record count before any filtering.
    fn count_all(&self) -> Result<usize, Error>;

    /// Record count matching the query's predicate.
    fn count(&self, query: &NativeQuery) -> Result<usize, Error>;

    /// Records matching the query in its order, optionally sliced.
    fn fetch(
        &self,
        query: &NativeQuery,
        window: Option<Range<usize>>,
    ) -> Result<Vec<Record>, Error>;

    /// Schema the records belong to; `None` makes every field manual.
    fn schema(&self) -> Option<&str>;
}
