use crate::{model::FieldPath, query::FieldResolver};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

///
/// OrderDirection
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

impl OrderDirection {
    /// Exact client spelling only: `asc` or `desc`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    #[must_use]
    pub const fn is_desc(self) -> bool {
        matches!(self, Self::Desc)
    }

    const fn sign(self) -> &'static str {
        match self {
            Self::Asc => "",
            Self::Desc => "-",
        }
    }
}

impl Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

///
/// SortKey
///
/// Field → a store-side field path.
/// Column → synthetic key for a column with no store-backed source; the
///          column's plain text is sorted in memory.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum SortKey {
    Field(FieldPath),
    Column(usize),
}

///
/// OrderTerm
///
/// One entry of the resolved ordering list. Renders as the signed token
/// form: `-blog__name`, `!3`.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct OrderTerm {
    pub key: SortKey,
    pub direction: OrderDirection,
}

impl OrderTerm {
    #[must_use]
    pub const fn field(path: FieldPath, direction: OrderDirection) -> Self {
        Self {
            key: SortKey::Field(path),
            direction,
        }
    }

    #[must_use]
    pub const fn column(index: usize, direction: OrderDirection) -> Self {
        Self {
            key: SortKey::Column(index),
            direction,
        }
    }

    /// Whether the store can apply this term itself.
    #[must_use]
    pub fn is_native(&self, resolver: &FieldResolver<'_>) -> bool {
        match &self.key {
            SortKey::Field(path) => resolver.is_native(path),
            SortKey::Column(_) => false,
        }
    }
}

impl Display for OrderTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.key {
            SortKey::Field(path) => write!(f, "{}{path}", self.direction.sign()),
            SortKey::Column(index) => write!(f, "{}!{index}", self.direction.sign()),
        }
    }
}

///
/// Split an ordering list into its store-executable prefix and the manual
/// remainder.
///
/// This is a prefix split, not a filter: the first term the store cannot
/// apply demotes every later term to manual handling, because the store can
/// only produce the leading tiers of a composite ordering.
///
#[must_use]
pub fn split_real_fields<'a>(
    ordering: &'a [OrderTerm],
    resolver: &FieldResolver<'_>,
) -> (&'a [OrderTerm], &'a [OrderTerm]) {
    let cut = ordering
        .iter()
        .position(|term| !term.is_native(resolver))
        .unwrap_or(ordering.len());

    ordering.split_at(cut)
}
