//! Column specifications and value extraction.

mod declaration;
mod extract;
mod registry;


pub use declaration::{ColumnDeclaration, NormalizedColumn};
pub use extract::CellValue;
pub use registry::{ColumnRegistry, ValueType};

use crate::{
    model::FieldPath,
    processor::ProcessorRef,
    query::OrderDirection,
    record::Record,
    value::Value,
};
use convert_case::{Case, Casing};
use std::{fmt, sync::Arc};

///
/// CONSTANTS
///

pub const DEFAULT_SEPARATOR: &str = " ";
pub const DEFAULT_EMPTY_VALUE: &str = "";

///
/// Source
///
/// Where a column reads its value from.
/// Computed sources are callables over the record and are never
/// store-resolvable.
///

#[derive(Clone)]
pub enum Source {
    Path(FieldPath),
    Computed {
        name: String,
        f: Arc<dyn Fn(&Record) -> Value + Send + Sync>,
    },
}

impl Source {
    pub fn computed<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Record) -> Value + Send + Sync + 'static,
    {
        Self::Computed {
            name: name.into(),
            f: Arc::new(f),
        }
    }

    #[must_use]
    pub const fn as_path(&self) -> Option<&FieldPath> {
        match self {
            Self::Path(path) => Some(path),
            Self::Computed { .. } => None,
        }
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "Path({path})"),
            Self::Computed { name, .. } => write!(f, "Computed({name})"),
        }
    }
}

impl From<&str> for Source {
    fn from(raw: &str) -> Self {
        Self::Path(FieldPath::parse(raw))
    }
}

impl From<FieldPath> for Source {
    fn from(path: FieldPath) -> Self {
        Self::Path(path)
    }
}

///
/// ColumnSpec
///
/// One declared column. Built once per table and treated as a read-only
/// template; the sort annotations at the bottom are only ever written on a
/// per-request copy.
///

#[derive(Clone, Debug)]
pub struct ColumnSpec {
    pub name: String,
    pub label: String,
    pub sources: Vec<Source>,

    /// Explicit classification applied to every source; when absent each
    /// source path is classified by its own field kind.
    pub value_type: Option<ValueType>,
    pub processor: Option<ProcessorRef>,
    pub sortable: bool,
    pub visible: bool,
    pub separator: String,
    pub empty_value: String,
    pub localize: bool,

    pub sort_priority: Option<usize>,
    pub sort_direction: Option<OrderDirection>,
    pub index: Option<usize>,
}

impl ColumnSpec {
    /// Column reading the field of the same name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let source = Source::Path(FieldPath::parse(&name));

        Self::blank(name).with_sources(vec![source])
    }

    /// Column with no sources; its content comes entirely from a processor.
    #[must_use]
    pub fn display(name: impl Into<String>) -> Self {
        Self::blank(name.into())
    }

    fn blank(name: String) -> Self {
        Self {
            label: pretty_name(&name),
            name,
            sources: Vec::new(),
            value_type: None,
            processor: None,
            sortable: false,
            visible: true,
            separator: DEFAULT_SEPARATOR.to_string(),
            empty_value: DEFAULT_EMPTY_VALUE.to_string(),
            localize: false,
            sort_priority: None,
            sort_direction: None,
            index: None,
        }
    }

    /// Replace the sources. A column without sources can never be sortable.
    #[must_use]
    pub fn with_sources(mut self, sources: Vec<Source>) -> Self {
        self.sortable = !sources.is_empty();
        self.sources = sources;
        self
    }

    #[must_use]
    pub fn source(self, source: impl Into<Source>) -> Self {
        self.with_sources(vec![source.into()])
    }

    #[must_use]
    pub fn sources<I, S>(self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Source>,
    {
        self.with_sources(sources.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    #[must_use]
    pub const fn value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = Some(value_type);
        self
    }

    #[must_use]
    pub fn processor(mut self, processor: impl Into<ProcessorRef>) -> Self {
        self.processor = Some(processor.into());
        self
    }

    #[must_use]
    pub const fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    #[must_use]
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    #[must_use]
    pub fn empty_value(mut self, empty_value: impl Into<String>) -> Self {
        self.empty_value = empty_value.into();
        self
    }

    #[must_use]
    pub const fn localize(mut self, localize: bool) -> Self {
        self.localize = localize;
        self
    }

    /// Field-path sources, in declaration order.
    pub fn paths(&self) -> impl Iterator<Item = &FieldPath> {
        self.sources.iter().filter_map(Source::as_path)
    }

    #[must_use]
    pub const fn is_compound(&self) -> bool {
        self.sources.len() > 1
    }

    pub(crate) fn clear_sort_state(&mut self) {
        self.sort_priority = None;
        self.sort_direction = None;
        self.index = None;
    }
}

/// Human label for a field or column name (`pub_date` → `Pub date`).
#[must_use]
pub fn pretty_name(name: &str) -> String {
    name.to_case(Case::Sentence)
}
