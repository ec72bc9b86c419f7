use crate::{
    processor::{Preloaded, RowData, SkipRecord},
    record::Record,
    value::Value,
};
use std::{fmt, sync::Arc};

type PreloadFn = dyn Fn(&Record) -> Result<Preloaded, SkipRecord> + Send + Sync;
type ExtraDataFn = dyn Fn(&Record) -> RowData + Send + Sync;
type PkFn = dyn Fn(&Record) -> Value + Send + Sync;

///
/// RecordHooks
///
/// Table-level per-record callbacks.
///
/// preload → shared data for every processor of the row; may skip the row
/// extra   → row metadata sent as `DT_RowData`
/// pk      → row identity sent as `DT_RowId`; defaults to the record pk
///

#[derive(Clone, Default)]
pub struct RecordHooks {
    preload: Option<Arc<PreloadFn>>,
    extra: Option<Arc<ExtraDataFn>>,
    pk: Option<Arc<PkFn>>,
}

impl RecordHooks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_preload<F>(mut self, f: F) -> Self
    where
        F: Fn(&Record) -> Result<Preloaded, SkipRecord> + Send + Sync + 'static,
    {
        self.preload = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn with_extra_data<F>(mut self, f: F) -> Self
    where
        F: Fn(&Record) -> RowData + Send + Sync + 'static,
    {
        self.extra = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn with_pk<F>(mut self, f: F) -> Self
    where
        F: Fn(&Record) -> Value + Send + Sync + 'static,
    {
        self.pk = Some(Arc::new(f));
        self
    }

    pub fn preload(&self, record: &Record) -> Result<Preloaded, SkipRecord> {
        self.preload
            .as_ref()
            .map_or_else(|| Ok(Preloaded::new()), |f| f(record))
    }

    #[must_use]
    pub fn extra_data(&self, record: &Record) -> RowData {
        self.extra.as_ref().map(|f| f(record)).unwrap_or_default()
    }

    #[must_use]
    pub fn pk(&self, record: &Record) -> Value {
        self.pk.as_ref().map_or_else(|| record.pk(), |f| f(record))
    }
}

impl fmt::Debug for RecordHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordHooks")
            .field("preload", &self.preload.is_some())
            .field("extra", &self.extra.is_some())
            .field("pk", &self.pk.is_some())
            .finish()
    }
}
