use crate::{
    column::ColumnSpec,
    error::Error,
    query::{OrderTerm, SearchTarget, SortKey, TermSearch},
    record::Record,
    value::{Value, sort_cmp},
};
use log::error;
use std::cmp::Ordering;

///
/// Whether `record` satisfies every term: each term must be a
/// case-insensitive substring of the plain text of at least one target.
///
pub(super) fn matches_all(
    record: &Record,
    columns: &[ColumnSpec],
    searches: &[TermSearch],
) -> bool {
    searches.iter().all(|search| {
        let needle = search.term.to_lowercase();

        search.targets.iter().any(|target| {
            let haystack = match target {
                SearchTarget::Column(index) => match columns.get(*index) {
                    Some(column) => column.extract(record).text,
                    None => return false,
                },
                SearchTarget::Field(path) => record.value_at(path).to_string(),
            };

            haystack.to_lowercase().contains(&needle)
        })
    })
}

///
/// Apply one stable sort pass for `term`.
///
/// Field terms sort by the stored value; column terms sort by the
/// column's plain text, so empty cells and compound cells always compare.
/// A pass that meets an uncomparable pair of keys is abandoned and the
/// previous order kept; that is logged, never returned.
///
pub(super) fn sort_pass(
    records: &mut Vec<Record>,
    columns: &[ColumnSpec],
    term: &OrderTerm,
) -> Result<(), Error> {
    let keys: Vec<Value> = match &term.key {
        SortKey::Field(path) => records.iter().map(|record| record.value_at(path)).collect(),
        SortKey::Column(index) => {
            let column = columns.get(*index).ok_or_else(|| {
                Error::query_invariant(format!("sort column index {index} out of range"))
            })?;
            records
                .iter()
                .map(|record| Value::Text(column.extract(record).text))
                .collect()
        }
    };

    let mut uncomparable = false;
    let mut order: Vec<usize> = (0..records.len()).collect();
    order.sort_by(|&a, &b| {
        let ord = sort_cmp(&keys[a], &keys[b]).unwrap_or_else(|| {
            uncomparable = true;
            Ordering::Equal
        });
        if term.direction.is_desc() { ord.reverse() } else { ord }
    });

    if uncomparable {
        error!("manual sort by '{term}' skipped: values are not mutually comparable");
        return Ok(());
    }

    let mut slots: Vec<Option<Record>> = records.drain(..).map(Some).collect();
    records.extend(order.into_iter().filter_map(|i| slots[i].take()));

    Ok(())
}
