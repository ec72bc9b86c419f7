use crate::{model::FieldPath, value::Value};
use std::ops::{BitAnd, BitOr};

///
/// Predicate AST
///
/// Store-facing search predicates. The planner only constructs these; how a
/// store executes them is up to the store. The in-memory store evaluates
/// them directly.
///

///
/// CompareOp
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
}

///
/// ComparePredicate
///

#[derive(Clone, Debug, PartialEq)]
pub struct ComparePredicate {
    pub field: FieldPath,
    pub op: CompareOp,
    pub value: Value,
}

impl ComparePredicate {
    #[must_use]
    pub const fn new(field: FieldPath, op: CompareOp, value: Value) -> Self {
        Self { field, op, value }
    }
}

///
/// DatePart
/// Calendar component matched by a date-part lookup.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DatePart {
    Year,
    Month,
    Day,
}

///
/// Predicate
///

#[derive(Clone, Debug, PartialEq)]
pub enum Predicate {
    True,
    False,
    And(Vec<Self>),
    Or(Vec<Self>),
    Not(Box<Self>),
    Compare(ComparePredicate),
    TextContainsCi {
        field: FieldPath,
        value: String,
    },
    DatePart {
        field: FieldPath,
        part: DatePart,
        value: i32,
    },
}

impl Predicate {
    #[must_use]
    pub fn not(pred: Self) -> Self {
        Self::Not(Box::new(pred))
    }

    #[must_use]
    pub const fn eq(field: FieldPath, value: Value) -> Self {
        Self::Compare(ComparePredicate::new(field, CompareOp::Eq, value))
    }

    #[must_use]
    pub const fn compare(field: FieldPath, op: CompareOp, value: Value) -> Self {
        Self::Compare(ComparePredicate::new(field, op, value))
    }

    #[must_use]
    pub fn text_contains_ci(field: FieldPath, value: impl Into<String>) -> Self {
        Self::TextContainsCi {
            field,
            value: value.into(),
        }
    }

    #[must_use]
    pub const fn date_part(field: FieldPath, part: DatePart, value: i32) -> Self {
        Self::DatePart { field, part, value }
    }

    /// OR of `preds`, collapsing the trivial cases. `None` when empty.
    #[must_use]
    pub fn any(mut preds: Vec<Self>) -> Option<Self> {
        match preds.len() {
            0 => None,
            1 => preds.pop(),
            _ => Some(Self::Or(preds)),
        }
    }

    /// AND of `preds`, collapsing the trivial cases. `None` when empty.
    #[must_use]
    pub fn all(mut preds: Vec<Self>) -> Option<Self> {
        match preds.len() {
            0 => None,
            1 => preds.pop(),
            _ => Some(Self::And(preds)),
        }
    }
}

impl BitAnd for Predicate {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self::And(vec![self, rhs])
    }
}

impl BitAnd for &Predicate {
    type Output = Predicate;

    fn bitand(self, rhs: Self) -> Self::Output {
        Predicate::And(vec![self.clone(), rhs.clone()])
    }
}

impl BitOr for Predicate {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self::Or(vec![self, rhs])
    }
}

impl BitOr for &Predicate {
    type Output = Predicate;

    fn bitor(self, rhs: Self) -> Self::Output {
        Predicate::Or(vec![self.clone(), rhs.clone()])
    }
}
