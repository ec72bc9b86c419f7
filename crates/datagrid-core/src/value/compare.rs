use crate::value::Value;
use std::cmp::Ordering;

///
/// Sort comparison between two values.
///
/// Null sorts before every other value. Integers and floats compare
/// numerically; lists compare element-wise. Any other mixed pairing is
/// uncomparable and yields `None`, which callers treat as a failed sort pass.
///
#[must_use]
pub fn sort_cmp(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        (Value::Null, _) => Some(Ordering::Less),
        (_, Value::Null) => Some(Ordering::Greater),

        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
        #[allow(clippy::cast_precision_loss)]
        (Value::Int(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
        #[allow(clippy::cast_precision_loss)]
        (Value::Float(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)),
        (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
        (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
        (Value::DateTime(a), Value::DateTime(b)) => Some(a.cmp(b)),

        (Value::List(a), Value::List(b)) => {
            for (x, y) in a.iter().zip(b) {
                match sort_cmp(x, y)? {
                    Ordering::Equal => {}
                    other => return Some(other),
                }
            }
            Some(a.len().cmp(&b.len()))
        }

        _ => None,
    }
}

///
/// Loose equality used by store-side comparisons.
///
/// Numeric variants compare by value, and a date matches a datetime on the
/// same calendar day.
///
#[must_use]
pub(crate) fn loose_eq(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::DateTime(dt), Value::Date(d)) | (Value::Date(d), Value::DateTime(dt)) => {
            dt.date() == *d
        }
        _ => sort_cmp(actual, expected) == Some(Ordering::Equal),
    }
}
