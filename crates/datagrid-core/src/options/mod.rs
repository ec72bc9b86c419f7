//! Table options and request normalization.
//!
//! Configuration is layered: built-in defaults < declared table options <
//! per-call overrides < client request parameters. The client layer only
//! ever touches search, paging and ordering; everything else is server-side.

mod normalize;
mod params;


pub use normalize::{PageLength, RequestConfig};
pub use params::{RequestParams, WireFormat};

pub(crate) use normalize::{Normalizer, split_token};

use crate::{cache::CacheType, column::ColumnDeclaration};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

///
/// CONSTANTS
///

pub const DEFAULT_PAGE_LENGTH: i64 = 25;
pub const MINIMUM_PAGE_LENGTH: i64 = 1;

///
/// ConfigError
///
/// Table-definition problems. These surface when a table is built or a
/// request is configured, never because of client input.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ConfigError {
    #[error("invalid column declaration: {0}")]
    InvalidColumnDeclaration(String),

    #[error("unknown column name(s): {0:?}")]
    UnknownColumnName(Vec<String>),

    #[error("column '{column}' references unknown processor '{name}'")]
    UnknownProcessor { column: String, name: String },

    #[error("column '{0}' is declared more than once")]
    DuplicateColumn(String),

    #[error("invalid ordering token '{0}'")]
    InvalidOrderingToken(String),

    #[error("invalid table options: {0}")]
    InvalidOptions(String),
}

///
/// TableOptions
///
/// One configuration layer. Every field is optional so layers can be
/// merged; accessors apply the built-in defaults.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<ColumnDeclaration>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ordering: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_length: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_fields: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unsortable_columns: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden_columns: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processors: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_search: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_distinct: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wire_format: Option<WireFormat>,
}

impl TableOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(|err| ConfigError::InvalidOptions(err.to_string()))
    }

    /// Overlay `other` on top of `self`; every `Some` in `other` wins.
    #[must_use]
    pub fn merged_with(&self, other: &Self) -> Self {
        Self {
            columns: other.columns.clone().or_else(|| self.columns.clone()),
            exclude: other.exclude.clone().or_else(|| self.exclude.clone()),
            ordering: other.ordering.clone().or_else(|| self.ordering.clone()),
            page_length: other.page_length.or(self.page_length),
            search_fields: other
                .search_fields
                .clone()
                .or_else(|| self.search_fields.clone()),
            unsortable_columns: other
                .unsortable_columns
                .clone()
                .or_else(|| self.unsortable_columns.clone()),
            hidden_columns: other
                .hidden_columns
                .clone()
                .or_else(|| self.hidden_columns.clone()),
            labels: other.labels.clone().or_else(|| self.labels.clone()),
            processors: other.processors.clone().or_else(|| self.processors.clone()),
            manual_search: other.manual_search.or(self.manual_search),
            force_distinct: other.force_distinct.or(self.force_distinct),
            cache: other.cache.or(self.cache),
            wire_format: other.wire_format.or(self.wire_format),
        }
    }

    #[must_use]
    pub fn page_length(&self) -> i64 {
        self.page_length.unwrap_or(DEFAULT_PAGE_LENGTH)
    }

    #[must_use]
    pub fn manual_search(&self) -> bool {
        self.manual_search.unwrap_or(false)
    }

    #[must_use]
    pub fn force_distinct(&self) -> bool {
        self.force_distinct.unwrap_or(true)
    }

    #[must_use]
    pub fn cache(&self) -> CacheType {
        self.cache.unwrap_or_default()
    }

    #[must_use]
    pub fn wire_format(&self) -> WireFormat {
        self.wire_format.unwrap_or_default()
    }

    #[must_use]
    pub fn unsortable_columns(&self) -> &[String] {
        self.unsortable_columns.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn hidden_columns(&self) -> &[String] {
        self.hidden_columns.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn search_fields(&self) -> &[String] {
        self.search_fields.as_deref().unwrap_or_default()
    }

    // Builder helpers for code-declared layers.

    #[must_use]
    pub fn with_columns<I, D>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<ColumnDeclaration>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_ordering<I, S>(mut self, ordering: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ordering = Some(ordering.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub const fn with_page_length(mut self, page_length: i64) -> Self {
        self.page_length = Some(page_length);
        self
    }

    #[must_use]
    pub fn with_search_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_unsortable<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unsortable_columns = Some(names.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_hidden<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hidden_columns = Some(names.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_exclude<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = Some(names.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_label(mut self, column: impl Into<String>, label: impl Into<String>) -> Self {
        self.labels
            .get_or_insert_with(BTreeMap::new)
            .insert(column.into(), label.into());
        self
    }

    #[must_use]
    pub fn with_processor(mut self, column: impl Into<String>, processor: impl Into<String>) -> Self {
        self.processors
            .get_or_insert_with(BTreeMap::new)
            .insert(column.into(), processor.into());
        self
    }

    #[must_use]
    pub const fn with_manual_search(mut self, enabled: bool) -> Self {
        self.manual_search = Some(enabled);
        self
    }

    #[must_use]
    pub const fn with_force_distinct(mut self, enabled: bool) -> Self {
        self.force_distinct = Some(enabled);
        self
    }

    #[must_use]
    pub const fn with_cache(mut self, cache: CacheType) -> Self {
        self.cache = Some(cache);
        self
    }

    #[must_use]
    pub const fn with_wire_format(mut self, wire_format: WireFormat) -> Self {
        self.wire_format = Some(wire_format);
        self
    }
}
