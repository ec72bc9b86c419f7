//! Row materialization.
//!
//! Runs the store-executable part of a request through the store, then, if
//! any manual sort or search remains, materializes the full filtered list
//! and finishes it in memory before paging.

mod manual;

#[cfg(test)]
mod tests;

use crate::{
    cache::{CacheBackend, CachedRecords},
    column::{ColumnRegistry, ColumnSpec, Source},
    error::Error,
    model::FieldPath,
    options::RequestConfig,
    query::{
        FieldResolver, OrderTerm, SearchPlanner, SearchTarget, SortKey, TermSearch,
        filter_real_fields, split_real_fields,
    },
    record::Record,
    store::{NativeQuery, RecordSet},
};
use log::debug;
use std::sync::Arc;

///
/// Materialized
///
/// records  → the current page, before serialization
/// total    → record count before filtering
/// filtered → record count after filtering, before paging
///

#[derive(Clone, Debug)]
pub struct Materialized {
    pub records: Vec<Record>,
    pub total: usize,
    pub filtered: usize,
}

///
/// CacheSlot
/// Backend plus the key this request reads and writes.
///

pub(crate) struct CacheSlot<'a> {
    pub backend: &'a dyn CacheBackend,
    pub key: String,
}

///
/// LoadExecutor
///

pub(crate) struct LoadExecutor<'a> {
    pub store: &'a dyn RecordSet,
    pub columns: &'a [ColumnSpec],
    pub config: &'a RequestConfig,
    pub resolver: FieldResolver<'a>,
    pub kinds: &'a ColumnRegistry,
    pub cache: Option<CacheSlot<'a>>,
}

// Native/manual partition of one request.
struct Split<'a> {
    query: NativeQuery,
    manual_order: &'a [OrderTerm],
    manual_searches: Vec<TermSearch>,
}

impl Split<'_> {
    fn is_native(&self) -> bool {
        self.manual_order.is_empty() && self.manual_searches.is_empty()
    }
}

impl LoadExecutor<'_> {
    pub fn execute(&self) -> Result<Materialized, Error> {
        let split = self.split()?;

        if let Some(slot) = &self.cache {
            return self.execute_cached(&split, slot);
        }

        if split.is_native() {
            debug!("fast path: store handles filtering, ordering and paging");
            let total = self.store.count_all()?;
            let filtered = self.store.count(&split.query)?;
            let window = self.config.window(filtered);
            let records = self.store.fetch(&split.query, Some(window))?;

            return Ok(Materialized {
                records,
                total,
                filtered,
            });
        }

        debug!(
            "slow path: {} manual sort term(s), {} manual search term(s)",
            split.manual_order.len(),
            split.manual_searches.len()
        );
        let total = self.store.count_all()?;
        let records = self.materialize(&split)?;

        Ok(self.page(records, total))
    }

    fn execute_cached(
        &self,
        split: &Split<'_>,
        slot: &CacheSlot<'_>,
    ) -> Result<Materialized, Error> {
        let cached = if let Some(hit) = slot.backend.get(&slot.key) {
            debug!("cache hit for {}", slot.key);
            hit
        } else {
            debug!("cache miss for {}", slot.key);
            let entry = Arc::new(CachedRecords {
                total: self.store.count_all()?,
                records: self.materialize(split)?,
            });
            slot.backend.set(&slot.key, Arc::clone(&entry));
            entry
        };

        Ok(self.page(cached.records.clone(), cached.total))
    }

    // Full filtered and sorted list, manual remainder applied.
    fn materialize(&self, split: &Split<'_>) -> Result<Vec<Record>, Error> {
        let mut records = self.store.fetch(&split.query, None)?;

        if !split.manual_searches.is_empty() {
            records.retain(|record| {
                manual::matches_all(record, self.columns, &split.manual_searches)
            });
        }
        for term in split.manual_order.iter().rev() {
            manual::sort_pass(&mut records, self.columns, term)?;
        }

        Ok(records)
    }

    fn page(&self, mut records: Vec<Record>, total: usize) -> Materialized {
        let filtered = records.len();
        let window = self.config.window(filtered);
        records.truncate(window.end);
        records.drain(..window.start);

        Materialized {
            records,
            total,
            filtered,
        }
    }

    fn split(&self) -> Result<Split<'_>, Error> {
        let (native_order, manual_order) = split_real_fields(&self.config.ordering, &self.resolver);
        debug!(
            "ordering split: native [{}], manual [{}]",
            join(native_order),
            join(manual_order)
        );

        let searches = self.config.searches(self.columns);
        let candidates = self.search_candidates(&searches);
        let (native_fields, manual_fields) = filter_real_fields(&candidates.paths, &self.resolver);
        let any_manual = !manual_fields.is_empty() || candidates.computed;

        let (predicate, manual_searches) = if self.config.manual_search && any_manual {
            debug!("manual search over {} term(s)", searches.len());
            (None, searches)
        } else {
            let planner = SearchPlanner {
                columns: self.columns,
                resolver: self.resolver,
                kinds: self.kinds,
            };
            (planner.build(&searches)?, Vec::new())
        };

        let order: Vec<(FieldPath, _)> = native_order
            .iter()
            .filter_map(|term| match &term.key {
                SortKey::Field(path) => Some((path.clone(), term.direction)),
                SortKey::Column(_) => None,
            })
            .collect();

        let plural = |path: &FieldPath| {
            self.resolver
                .resolve(path)
                .is_some_and(|resolved| resolved.contains_plural_relation())
        };
        let distinct = self.config.force_distinct
            && (order.iter().any(|(path, _)| plural(path))
                || (predicate.is_some() && native_fields.iter().any(plural)));
        if distinct {
            debug!("query crosses a to-many relation; requesting distinct rows");
        }

        Ok(Split {
            query: NativeQuery {
                predicate,
                order,
                distinct,
            },
            manual_order,
            manual_searches,
        })
    }

    fn search_candidates(&self, searches: &[TermSearch]) -> Candidates {
        let mut candidates = Candidates::default();

        for target in searches.iter().flat_map(|search| &search.targets) {
            match target {
                SearchTarget::Column(index) => {
                    let Some(column) = self.columns.get(*index) else {
                        continue;
                    };
                    for source in &column.sources {
                        match source {
                            Source::Path(path) => candidates.push(path),
                            Source::Computed { .. } => candidates.computed = true,
                        }
                    }
                }
                SearchTarget::Field(path) => candidates.push(path),
            }
        }

        candidates
    }
}

///
/// Candidates
/// Every source a request's search terms touch.
///

#[derive(Default)]
struct Candidates {
    paths: Vec<FieldPath>,
    computed: bool,
}

impl Candidates {
    fn push(&mut self, path: &FieldPath) {
        if !self.paths.contains(path) {
            self.paths.push(path.clone());
        }
    }
}

fn join(terms: &[OrderTerm]) -> String {
    terms
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
