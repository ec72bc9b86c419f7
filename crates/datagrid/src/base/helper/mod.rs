//! Ready-made column processors.
//!
//! Each helper returns a [`Processor`] that can be attached to a column
//! directly or registered under a name on the table.

#[cfg(test)]
mod tests;

use crate::core::{
    model::FieldPath,
    processor::Processor,
    record::{Attribute, Entity},
    value::Value,
};
use std::ops::{Range, RangeFrom, RangeTo};
use time::{error::InvalidFormatDescription, format_description};

///
/// CONSTANTS
///

pub const CHECK_MARK: &str = "&#10004;";
pub const CROSS_MARK: &str = "&#10008;";

///
/// Link to the record's own URL.
///
/// The cell text is the link text; an empty cell falls back to the
/// record's display text. Records without a URL pass their text through.
///
#[must_use]
pub fn link_to_model() -> Processor {
    Processor::infallible(|record, cell, _| match record.as_entity() {
        Some(entity) => anchor(entity.as_ref(), &cell.text),
        None => Value::Text(cell.text.clone()),
    })
}

/// Link to the entity reached through `path` instead of the record itself.
#[must_use]
pub fn link_to_related(path: &str) -> Processor {
    let path = FieldPath::parse(path);

    Processor::infallible(move |record, cell, _| match record.lookup(&path) {
        Some(Attribute::Entity(entity)) => anchor(entity.as_ref(), &cell.text),
        _ => Value::Text(cell.text.clone()),
    })
}

fn anchor(entity: &dyn Entity, text: &str) -> Value {
    let text = if text.is_empty() {
        entity.display()
    } else {
        text.to_string()
    };

    match entity.absolute_url() {
        Some(url) => Value::Text(format!(r#"<a href="{url}">{text}</a>"#)),
        None => Value::Text(text),
    }
}

/// Check mark for truthy cells, cross otherwise.
#[must_use]
pub fn boolean_checkmark() -> Processor {
    boolean_checkmark_with(CHECK_MARK, CROSS_MARK)
}

#[must_use]
pub fn boolean_checkmark_with(true_value: &str, false_value: &str) -> Processor {
    let (true_value, false_value) = (true_value.to_string(), false_value.to_string());

    Processor::infallible(move |_, cell, _| {
        if cell.raw.is_truthy() {
            Value::Text(true_value.clone())
        } else {
            Value::Text(false_value.clone())
        }
    })
}

///
/// ItemKey
///
/// Index  → one list item, or one character of a text value
/// Slice  → sub-list, or a character range of a text value
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ItemKey {
    Index(usize),
    Slice { start: usize, end: Option<usize> },
}

impl From<usize> for ItemKey {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<Range<usize>> for ItemKey {
    fn from(range: Range<usize>) -> Self {
        Self::Slice {
            start: range.start,
            end: Some(range.end),
        }
    }
}

impl From<RangeTo<usize>> for ItemKey {
    fn from(range: RangeTo<usize>) -> Self {
        Self::Slice {
            start: 0,
            end: Some(range.end),
        }
    }
}

impl From<RangeFrom<usize>> for ItemKey {
    fn from(range: RangeFrom<usize>) -> Self {
        Self::Slice {
            start: range.start,
            end: None,
        }
    }
}

///
/// Pick an item or slice out of the cell's raw value.
///
/// `ellipsis` is appended when a text slice cut something off. Indexes past
/// the end yield an empty cell; values that are neither text nor lists pass
/// through unchanged.
///
#[must_use]
pub fn item_getter(key: impl Into<ItemKey>, ellipsis: Option<&str>) -> Processor {
    let key = key.into();
    let ellipsis = ellipsis.map(str::to_string);

    Processor::infallible(move |_, cell, _| pick(&cell.raw, key, ellipsis.as_deref()))
}

fn pick(value: &Value, key: ItemKey, ellipsis: Option<&str>) -> Value {
    match (value, key) {
        (Value::Text(text), ItemKey::Index(index)) => text
            .chars()
            .nth(index)
            .map_or(Value::Null, |c| Value::Text(c.to_string())),
        (Value::List(items), ItemKey::Index(index)) => {
            items.get(index).cloned().unwrap_or(Value::Null)
        }
        (Value::Text(text), ItemKey::Slice { start, end }) => {
            let count = text.chars().count();
            let (start, end) = bounds(start, end, count);
            let mut out: String = text.chars().skip(start).take(end - start).collect();
            if let Some(ellipsis) = ellipsis
                && end - start < count
            {
                out.push_str(ellipsis);
            }

            Value::Text(out)
        }
        (Value::List(items), ItemKey::Slice { start, end }) => {
            let (start, end) = bounds(start, end, items.len());
            Value::List(items[start..end].to_vec())
        }
        _ => value.clone(),
    }
}

const fn bounds(start: usize, end: Option<usize>, len: usize) -> (usize, usize) {
    let end = match end {
        Some(end) if end < len => end,
        _ => len,
    };
    let start = if start < end { start } else { end };

    (start, end)
}

///
/// Read a dotted attribute path from the record, ignoring the cell.
///
/// Zero-argument methods along the way are invoked; related entities
/// render as their display text.
///
#[must_use]
pub fn attr_getter(path: &str) -> Processor {
    let path = FieldPath::parse(path);

    Processor::infallible(move |record, _, _| match record.lookup(&path) {
        Some(Attribute::Value(value)) => value,
        Some(Attribute::Entity(entity)) => Value::Text(entity.display()),
        Some(Attribute::Entities(entities)) => {
            Value::List(entities.iter().map(|e| Value::Text(e.display())).collect())
        }
        Some(Attribute::Method(_)) | None => Value::Null,
    })
}

///
/// Format date and datetime cells with a `time` format description
/// (`[year]-[month]-[day]` syntax).
///
/// Null cells render empty. Other values, and dates lacking components
/// the description asks for, pass through unchanged.
///
pub fn format_date(format: &str) -> Result<Processor, InvalidFormatDescription> {
    let format = format_description::parse_owned::<1>(format)?;

    Ok(Processor::infallible(move |_, cell, _| {
        let formatted = match &cell.raw {
            Value::Date(date) => date.format(&format).ok(),
            Value::DateTime(datetime) => datetime.format(&format).ok(),
            Value::Null => Some(String::new()),
            _ => None,
        };

        formatted.map_or_else(|| cell.raw.clone(), Value::Text)
    }))
}

/// Substitute the cell's raw value into every `{}` of `template`.
#[must_use]
pub fn format_value(template: &str) -> Processor {
    let template = template.to_string();

    Processor::infallible(move |_, cell, _| {
        Value::Text(template.replace("{}", &cell.raw.to_string()))
    })
}

/// Wrap a plain value mapping so it only ever sees the cell's raw value.
#[must_use]
pub fn through_filter<F>(f: F) -> Processor
where
    F: Fn(&Value) -> Value + Send + Sync + 'static,
{
    Processor::infallible(move |_, cell, _| f(&cell.raw))
}
