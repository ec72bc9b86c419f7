use crate::{
    cache::{CacheBackend, MemoryCache},
    column::{ColumnRegistry, ColumnSpec, Source},
    error::Error,
    executor::{CacheSlot, LoadExecutor, Materialized},
    model::{FieldDef, Schema, SchemaRegistry},
    options::{Normalizer, RequestParams, TableOptions},
    query::FieldResolver,
    record::{Object, Record},
    store::{MemoryStore, NativeQuery, RecordSet},
    value::Value,
};
use std::{ops::Range, sync::Mutex};

///
/// SpyStore
/// Records every query and window the executor sends.
///

struct SpyStore {
    inner: MemoryStore,
    fetches: Mutex<Vec<(NativeQuery, Option<Range<usize>>)>>,
}

impl SpyStore {
    fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            fetches: Mutex::new(Vec::new()),
        }
    }

    fn fetches(&self) -> Vec<(NativeQuery, Option<Range<usize>>)> {
        self.fetches.lock().unwrap().clone()
    }
}

impl RecordSet for SpyStore {
    fn count_all(&self) -> Result<usize, Error> {
        self.inner.count_all()
    }

    fn count(&self, query: &NativeQuery) -> Result<usize, Error> {
        self.inner.count(query)
    }

    fn fetch(
        &self,
        query: &NativeQuery,
        window: Option<Range<usize>>,
    ) -> Result<Vec<Record>, Error> {
        self.fetches
            .lock()
            .unwrap()
            .push((query.clone(), window.clone()));
        self.inner.fetch(query, window)
    }

    fn schema(&self) -> Option<&str> {
        self.inner.schema()
    }
}

fn registry() -> SchemaRegistry {
    SchemaRegistry::new().with(
        Schema::new("entry", "id")
            .field(FieldDef::integer("id"))
            .field(FieldDef::text("headline"))
            .field(FieldDef::integer("rank"))
            .with_ordering(["id"]),
    )
}

fn entries() -> MemoryStore {
    MemoryStore::new(
        "entry",
        [
            (1, "test name 1", 3),
            (2, "test name 2", 1),
            (3, "test name 12", 2),
        ]
        .map(|(id, headline, rank)| {
            Object::new(id)
                .with("id", id)
                .with("headline", headline)
                .with("rank", rank)
        }),
    )
}

fn columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::new("id"),
        ColumnSpec::new("headline"),
        ColumnSpec::display("score").source(Source::computed("score", |record| {
            match record.value_at(&"rank".into()) {
                Value::Int(rank) => Value::Int(10 - rank),
                _ => Value::Null,
            }
        })),
    ]
}

fn run(
    store: &dyn RecordSet,
    options: &TableOptions,
    params: &RequestParams,
    cache: Option<CacheSlot<'_>>,
) -> Materialized {
    let registry = registry();
    let kinds = ColumnRegistry::with_builtins();
    let resolver = FieldResolver::new(&registry, store.schema());
    let mut columns = columns();
    let config = Normalizer {
        columns: &mut columns,
        resolver,
        options,
        fallback_ordering: &["id".to_string()],
    }
    .normalize(params);

    LoadExecutor {
        store,
        columns: &columns,
        config: &config,
        resolver,
        kinds: &kinds,
        cache,
    }
    .execute()
    .unwrap()
}

fn pks(page: &Materialized) -> Vec<Value> {
    page.records.iter().map(Record::pk).collect()
}

#[test]
fn native_request_fetches_only_the_page() {
    let store = SpyStore::new(entries());
    let params = RequestParams::new().with("start", "1").with("length", "1");
    let page = run(&store, &TableOptions::new(), &params, None);

    assert_eq!(pks(&page), vec![Value::Int(2)]);
    assert_eq!((page.total, page.filtered), (3, 3));

    let fetches = store.fetches();
    assert_eq!(fetches.len(), 1);
    assert_eq!(fetches[0].1, Some(1..2));
}

#[test]
fn search_terms_are_anded() {
    let store = SpyStore::new(entries());
    let params = RequestParams::new().with("search[value]", "test 1");
    let page = run(&store, &TableOptions::new(), &params, None);

    assert_eq!(pks(&page), vec![Value::Int(1), Value::Int(3)]);
    assert_eq!((page.total, page.filtered), (3, 2));

    let params = RequestParams::new().with("search[value]", "name 5");
    let page = run(&store, &TableOptions::new(), &params, None);
    assert!(page.records.is_empty());
    assert_eq!(page.filtered, 0);
}

#[test]
fn manual_sort_materializes_then_pages() {
    let store = SpyStore::new(entries());
    let params = RequestParams::new()
        .with("order[0][column]", "2")
        .with("order[0][dir]", "desc")
        .with("length", "2");
    let page = run(&store, &TableOptions::new(), &params, None);

    // score = 10 - rank: pk 2 → 9, pk 3 → 8, pk 1 → 7
    assert_eq!(pks(&page), vec![Value::Int(2), Value::Int(3)]);
    assert_eq!(page.filtered, 3);

    let fetches = store.fetches();
    assert_eq!(fetches.len(), 1);
    assert_eq!(fetches[0].1, None);
    assert!(fetches[0].0.order.is_empty());
}

#[test]
fn native_prefix_goes_to_store_and_rest_is_manual() {
    let store = SpyStore::new(entries());
    let options = TableOptions::new().with_ordering(["headline", "!2", "id"]);
    let page = run(&store, &options, &RequestParams::new(), None);

    let fetches = store.fetches();
    assert_eq!(fetches[0].0.order.len(), 1);
    assert_eq!(fetches[0].0.order[0].0.to_string(), "headline");
    assert_eq!(page.records.len(), 3);
}

#[test]
fn empty_cells_sort_with_filled_ones() {
    let store = MemoryStore::new(
        "entry",
        [
            Object::new(1).with("id", 1).with("headline", "b").with("rank", 5),
            Object::new(2).with("id", 2).with("headline", "a").with("rank", "x"),
        ],
    );
    let options = TableOptions::new().with_ordering(["!2"]);
    let page = run(&store, &options, &RequestParams::new(), None);

    // the text rank leaves score empty, which sorts before "5"
    assert_eq!(pks(&page), vec![Value::Int(2), Value::Int(1)]);
}

#[test]
fn uncomparable_sort_pass_is_skipped() {
    let mixed = MemoryStore::unschemed([
        Object::new(1).with("id", "one"),
        Object::new(2).with("id", 2),
    ]);
    let options = TableOptions::new().with_ordering(["-id"]);
    let page = run(&mixed, &options, &RequestParams::new(), None);

    assert_eq!(pks(&page), vec![Value::Int(1), Value::Int(2)]);
}

#[test]
fn manual_search_tests_extracted_text() {
    let store = SpyStore::new(entries());
    let options = TableOptions::new().with_manual_search(true);
    let params = RequestParams::new().with("search[value]", "8");
    let page = run(&store, &options, &params, None);

    assert_eq!(pks(&page), vec![Value::Int(3)]);
    assert!(store.fetches()[0].0.predicate.is_none());
}

#[test]
fn cached_list_is_reused() {
    let store = SpyStore::new(entries());
    let cache = MemoryCache::new();
    let slot = || CacheSlot {
        backend: &cache as &dyn CacheBackend,
        key: "k".to_string(),
    };
    let params = RequestParams::new().with("length", "2");

    let first = run(&store, &TableOptions::new(), &params, Some(slot()));
    let second = run(&store, &TableOptions::new(), &params, Some(slot()));

    assert_eq!(pks(&first), pks(&second));
    assert_eq!(second.filtered, 3);
    assert_eq!(store.fetches().len(), 1);
    assert_eq!(cache.len(), 1);
}
