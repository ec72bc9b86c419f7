use crate::{
    column::{ColumnSpec, Source},
    record::{Attribute, Record},
    value::Value,
};

///
/// CellValue
///
/// Extracted value of one column for one record.
///
/// raw  → the rich value handed to processors (a list for multi-source
///        cells; related entities contribute their primary key)
/// text → the plain rendering, used for search and in-memory sorting
///

#[derive(Clone, Debug, PartialEq)]
pub struct CellValue {
    pub raw: Value,
    pub text: String,
}

impl CellValue {
    #[must_use]
    pub fn new(raw: Value, text: impl Into<String>) -> Self {
        Self {
            raw,
            text: text.into(),
        }
    }

    /// Cell whose raw and text sides are the same value.
    #[must_use]
    pub fn plain(value: Value) -> Self {
        let text = value.to_string();
        Self { raw: value, text }
    }
}

impl ColumnSpec {
    ///
    /// Extract this column's value from `record`.
    ///
    /// Sources that fail to resolve or resolve to null are dropped. One
    /// surviving value is returned as-is; several become a list on the raw
    /// side and a separator-joined string on the text side; none yield the
    /// column's empty value.
    ///
    #[must_use]
    pub fn extract(&self, record: &Record) -> CellValue {
        let mut values: Vec<CellValue> = self
            .sources
            .iter()
            .filter_map(|source| read_source(record, source))
            .collect();

        match values.len() {
            0 => CellValue::plain(Value::Text(self.empty_value.clone())),
            1 => values.swap_remove(0),
            _ => {
                let text = values
                    .iter()
                    .map(|cell| cell.text.as_str())
                    .collect::<Vec<_>>()
                    .join(&self.separator);
                let raw = Value::List(values.into_iter().map(|cell| cell.raw).collect());

                CellValue { raw, text }
            }
        }
    }
}

fn read_source(record: &Record, source: &Source) -> Option<CellValue> {
    let cell = match source {
        Source::Path(path) => match record.lookup(path)? {
            Attribute::Value(value) => CellValue::plain(value),
            Attribute::Entity(entity) => CellValue::new(entity.pk(), entity.display()),
            Attribute::Entities(entities) => CellValue::new(
                Value::List(entities.iter().map(|e| e.pk()).collect()),
                entities
                    .iter()
                    .map(|e| e.display())
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            Attribute::Method(_) => return None,
        },
        Source::Computed { f, .. } => CellValue::plain(f(record)),
    };

    (!cell.raw.is_null()).then_some(cell)
}
