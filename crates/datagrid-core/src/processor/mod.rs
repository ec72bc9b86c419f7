//! Column processors and per-record callbacks.
//!
//! A processor turns an extracted [`CellValue`] into the value sent to the
//! client. Processors are registered explicitly, either on the table's
//! [`ProcessorRegistry`] or on an external [`CallbackTarget`], and are
//! resolved once per request before any record is serialized.

mod hooks;
mod registry;


pub use hooks::RecordHooks;
pub use registry::{ColumnKey, ProcessorRegistry};

pub(crate) use registry::resolve_processor;

use crate::{column::CellValue, record::Record, value::Value};
use serde_json::Value as JsonValue;
use std::{collections::BTreeMap, fmt, sync::Arc};

///
/// Preloaded
/// Per-record data shared between all processors of one row.
///

pub type Preloaded = BTreeMap<String, Value>;

///
/// RowData
/// Free-form row metadata sent alongside the cells.
///

pub type RowData = serde_json::Map<String, JsonValue>;

///
/// SkipRecord
///
/// Control-flow signal: drop the current record from the page.
/// Not an error; it never converts into one.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SkipRecord;

///
/// ProcessorContext
///

#[derive(Clone, Copy, Debug)]
pub struct ProcessorContext<'a> {
    pub field_name: &'a str,
    pub index: usize,
    pub localize: bool,
    pub view: Option<&'a str>,
    pub preloaded: &'a Preloaded,
}

impl ProcessorContext<'_> {
    #[must_use]
    pub fn preloaded(&self, key: &str) -> Option<&Value> {
        self.preloaded.get(key)
    }
}

type ProcessorFn =
    dyn Fn(&Record, &CellValue, &ProcessorContext<'_>) -> Result<Value, SkipRecord> + Send + Sync;

///
/// Processor
///

#[derive(Clone)]
pub struct Processor(Arc<ProcessorFn>);

impl Processor {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Record, &CellValue, &ProcessorContext<'_>) -> Result<Value, SkipRecord>
            + Send
            + Sync
            + 'static,
    {
        Self(Arc::new(f))
    }

    /// Processor that never skips.
    pub fn infallible<F>(f: F) -> Self
    where
        F: Fn(&Record, &CellValue, &ProcessorContext<'_>) -> Value + Send + Sync + 'static,
    {
        Self::new(move |record, cell, context| Ok(f(record, cell, context)))
    }

    pub fn call(
        &self,
        record: &Record,
        cell: &CellValue,
        context: &ProcessorContext<'_>,
    ) -> Result<Value, SkipRecord> {
        (self.0)(record, cell, context)
    }
}

impl fmt::Debug for Processor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Processor(..)")
    }
}

///
/// ProcessorRef
///
/// Column-level processor reference: a direct callable, or a name looked up
/// on the callback target first and the table second.
///

#[derive(Clone, Debug)]
pub enum ProcessorRef {
    Direct(Processor),
    Named(String),
}

impl ProcessorRef {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Direct(_) => None,
            Self::Named(name) => Some(name.as_str()),
        }
    }
}

impl From<Processor> for ProcessorRef {
    fn from(processor: Processor) -> Self {
        Self::Direct(processor)
    }
}

impl From<&str> for ProcessorRef {
    fn from(name: &str) -> Self {
        Self::named(name)
    }
}

impl From<String> for ProcessorRef {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

///
/// CallbackTarget
///
/// External collaborator (typically the view serving the table) that may
/// contribute processors and per-record hooks. Its answers take precedence
/// over the table's own registrations.
///

pub trait CallbackTarget: Send + Sync {
    /// Processor registered under an explicit name.
    fn processor(&self, _name: &str) -> Option<Processor> {
        None
    }

    /// Implicit per-column processor, by column name or index.
    fn column_processor(&self, _key: ColumnKey<'_>) -> Option<Processor> {
        None
    }

    fn preload_record_data(&self, _record: &Record) -> Result<Preloaded, SkipRecord> {
        Ok(Preloaded::new())
    }

    fn extra_record_data(&self, _record: &Record) -> RowData {
        RowData::new()
    }

    /// Identifier forwarded to processors and cache keys.
    fn view_name(&self) -> Option<&str> {
        None
    }
}
