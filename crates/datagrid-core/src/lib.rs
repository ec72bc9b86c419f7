//! Core engine for datagrid: column model, request normalization, search
//! planning, record stores, serialization, and the ergonomics exported via
//! the `prelude`.

// public exports are one module level down
pub mod cache;
pub mod column;
pub mod error;
pub mod model;
pub mod options;
pub mod processor;
pub mod query;
pub mod record;
pub mod response;
pub mod store;
pub mod structure;
pub mod table;
pub mod value;

pub(crate) mod executor;

pub use error::{Error, ErrorClass, ErrorDetail, ErrorOrigin};

///
/// Prelude
///
/// Everything needed to declare a table and serve requests against it.
/// Errors, planners and cache internals stay one module level down.
///

pub mod prelude {
    pub use crate::{
        cache::{CacheType, MemoryCache},
        column::{ColumnDeclaration, ColumnRegistry, ColumnSpec, Source, ValueType},
        model::{FieldDef, FieldKind, Schema, SchemaRegistry},
        options::{RequestParams, TableOptions, WireFormat},
        processor::{CallbackTarget, Processor, ProcessorRef, RecordHooks, SkipRecord},
        record::{Entity, Object, Record, Row},
        response::TableResponse,
        store::{MemoryStore, RecordSet},
        structure::ColumnInfo,
        table::{Table, TableBuilder, TableRequest},
        value::Value,
    };
}
