use crate::{
    query::{CompareOp, ComparePredicate, DatePart, Predicate},
    record::{Record, fan_out},
    value::{Value, loose_eq, sort_cmp},
};
use std::cmp::Ordering;

///
/// Evaluate a predicate against a single record with store semantics.
///
/// Field reads fan out across to-many relations; a comparison holds when
/// any reached value satisfies it. Null values never satisfy a comparison,
/// and uncomparable pairs evaluate to `false`.
///
#[must_use]
pub(crate) fn eval(record: &Record, predicate: &Predicate) -> bool {
    match predicate {
        Predicate::True => true,
        Predicate::False => false,

        Predicate::And(children) => children.iter().all(|child| eval(record, child)),
        Predicate::Or(children) => children.iter().any(|child| eval(record, child)),
        Predicate::Not(inner) => !eval(record, inner),

        Predicate::Compare(cmp) => eval_compare(record, cmp),

        Predicate::TextContainsCi { field, value } => fan_out(record, field)
            .iter()
            .any(|actual| !actual.is_null() && actual.text_contains_ci(value)),

        Predicate::DatePart { field, part, value } => fan_out(record, field)
            .iter()
            .filter_map(Value::as_date)
            .any(|date| {
                let actual = match part {
                    DatePart::Year => date.year(),
                    DatePart::Month => i32::from(u8::from(date.month())),
                    DatePart::Day => i32::from(date.day()),
                };
                actual == *value
            }),
    }
}

fn eval_compare(record: &Record, cmp: &ComparePredicate) -> bool {
    let ComparePredicate { field, op, value } = cmp;

    fan_out(record, field)
        .iter()
        .filter(|actual| !actual.is_null())
        .any(|actual| match op {
            CompareOp::Eq => loose_eq(actual, value),
            CompareOp::Ne => !loose_eq(actual, value),
            CompareOp::Lt => sort_cmp(actual, value).is_some_and(Ordering::is_lt),
            CompareOp::Lte => sort_cmp(actual, value).is_some_and(Ordering::is_le),
            CompareOp::Gt => sort_cmp(actual, value).is_some_and(Ordering::is_gt),
            CompareOp::Gte => sort_cmp(actual, value).is_some_and(Ordering::is_ge),
        })
}
