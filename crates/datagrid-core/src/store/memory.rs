use crate::{
    error::Error,
    model::FieldPath,
    query::{OrderDirection, eval},
    record::{Record, fan_out},
    store::{NativeQuery, RecordSet},
    value::{Value, sort_cmp},
};
use std::{cmp::Ordering, collections::HashSet, ops::Range, ptr};

///
/// MemoryStore
///
/// Records held in memory, queried with store semantics: field reads fan
/// out across to-many relations, and ordering by a to-many path yields one
/// row per related value unless the query is distinct.
///

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    records: Vec<Record>,
    schema: Option<String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new<I, R>(schema: impl Into<String>, records: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Record>,
    {
        Self {
            records: records.into_iter().map(Into::into).collect(),
            schema: Some(schema.into()),
        }
    }

    /// Plain record list with no schema; nothing is store-resolvable.
    #[must_use]
    pub fn unschemed<I, R>(records: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Record>,
    {
        Self {
            records: records.into_iter().map(Into::into).collect(),
            schema: None,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn filtered<'a>(&'a self, query: &'a NativeQuery) -> impl Iterator<Item = &'a Record> {
        self.records
            .iter()
            .filter(move |record| query.predicate.as_ref().is_none_or(|p| eval(record, p)))
    }

    // Joined rows for ordering: one per combination of ordering key values.
    fn ordered(&self, query: &NativeQuery) -> Vec<Record> {
        if query.order.is_empty() {
            return self.filtered(query).cloned().collect();
        }

        let mut rows: Vec<(Vec<Value>, &Record)> = Vec::new();
        for record in self.filtered(query) {
            let mut keys: Vec<Vec<Value>> = vec![Vec::with_capacity(query.order.len())];
            for (path, _) in &query.order {
                keys = expand(keys, order_values(record, path));
            }
            rows.extend(keys.into_iter().map(|key| (key, record)));
        }

        rows.sort_by(|(a, _), (b, _)| compare_keys(a, b, &query.order));

        // distinct keys on the stored record itself; mapping rows may carry no pk
        let mut seen = HashSet::new();
        rows.into_iter()
            .filter(|(_, record)| !query.distinct || seen.insert(ptr::from_ref::<Record>(*record)))
            .map(|(_, record)| record.clone())
            .collect()
    }
}

impl RecordSet for MemoryStore {
    fn count_all(&self) -> Result<usize, Error> {
        Ok(self.records.len())
    }

    fn count(&self, query: &NativeQuery) -> Result<usize, Error> {
        Ok(self.filtered(query).count())
    }

    fn fetch(
        &self,
        query: &NativeQuery,
        window: Option<Range<usize>>,
    ) -> Result<Vec<Record>, Error> {
        let mut rows = self.ordered(query);

        if let Some(window) = window {
            let end = window.end.min(rows.len());
            let start = window.start.min(end);
            rows.truncate(end);
            rows.drain(..start);
        }

        Ok(rows)
    }

    fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }
}

// A path with no reachable value still orders, as null.
fn order_values(record: &Record, path: &FieldPath) -> Vec<Value> {
    let values = fan_out(record, path);
    if values.is_empty() {
        vec![Value::Null]
    } else {
        values
    }
}

fn expand(prefixes: Vec<Vec<Value>>, values: Vec<Value>) -> Vec<Vec<Value>> {
    let mut out = Vec::with_capacity(prefixes.len() * values.len());
    for prefix in prefixes {
        for value in &values {
            let mut key = prefix.clone();
            key.push(value.clone());
            out.push(key);
        }
    }

    out
}

// Uncomparable pairs tie; the sort is stable so they keep store order.
fn compare_keys(a: &[Value], b: &[Value], order: &[(FieldPath, OrderDirection)]) -> Ordering {
    for ((left, right), (_, direction)) in a.iter().zip(b).zip(order) {
        let ord = sort_cmp(left, right).unwrap_or(Ordering::Equal);
        let ord = if direction.is_desc() { ord.reverse() } else { ord };
        if ord != Ordering::Equal {
            return ord;
        }
    }

    Ordering::Equal
}
