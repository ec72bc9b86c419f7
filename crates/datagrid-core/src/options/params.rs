use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

///
/// WireFormat
///
/// Parameter and response naming of the client widget.
///
/// Modern → draw, search[value], start, length, order[i][column], order[i][dir]
/// Legacy → sEcho, sSearch, iDisplayStart, iDisplayLength, iSortingCols,
///          iSortCol_i, sSortDir_i
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WireFormat {
    #[default]
    Modern,
    Legacy,
}

impl WireFormat {
    #[must_use]
    pub const fn echo_param(self) -> &'static str {
        match self {
            Self::Modern => "draw",
            Self::Legacy => "sEcho",
        }
    }

    #[must_use]
    pub const fn search_param(self) -> &'static str {
        match self {
            Self::Modern => "search[value]",
            Self::Legacy => "sSearch",
        }
    }

    #[must_use]
    pub const fn start_param(self) -> &'static str {
        match self {
            Self::Modern => "start",
            Self::Legacy => "iDisplayStart",
        }
    }

    #[must_use]
    pub const fn length_param(self) -> &'static str {
        match self {
            Self::Modern => "length",
            Self::Legacy => "iDisplayLength",
        }
    }

    /// Count of active sort directives; only the legacy dialect sends one.
    #[must_use]
    pub const fn sorting_count_param(self) -> Option<&'static str> {
        match self {
            Self::Modern => None,
            Self::Legacy => Some("iSortingCols"),
        }
    }

    #[must_use]
    pub fn sort_column_param(self, i: usize) -> String {
        match self {
            Self::Modern => format!("order[{i}][column]"),
            Self::Legacy => format!("iSortCol_{i}"),
        }
    }

    #[must_use]
    pub fn sort_direction_param(self, i: usize) -> String {
        match self {
            Self::Modern => format!("order[{i}][dir]"),
            Self::Legacy => format!("sSortDir_{i}"),
        }
    }

    #[must_use]
    pub fn column_search_param(self, i: usize) -> String {
        match self {
            Self::Modern => format!("columns[{i}][search][value]"),
            Self::Legacy => format!("sSearch_{i}"),
        }
    }

    #[must_use]
    pub const fn echo_key(self) -> &'static str {
        self.echo_param()
    }

    #[must_use]
    pub const fn total_key(self) -> &'static str {
        match self {
            Self::Modern => "recordsTotal",
            Self::Legacy => "iTotalRecords",
        }
    }

    #[must_use]
    pub const fn filtered_key(self) -> &'static str {
        match self {
            Self::Modern => "recordsFiltered",
            Self::Legacy => "iTotalDisplayRecords",
        }
    }

    #[must_use]
    pub const fn data_key(self) -> &'static str {
        match self {
            Self::Modern => "data",
            Self::Legacy => "aaData",
        }
    }
}

///
/// RequestParams
///
/// Raw client parameters as received. Untrusted: the normalizer parses every
/// read leniently.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RequestParams(BTreeMap<String, String>);

impl RequestParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RequestParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
