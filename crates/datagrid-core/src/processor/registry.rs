use crate::{
    column::ColumnSpec,
    options::ConfigError,
    processor::{CallbackTarget, Processor, ProcessorRef},
};
use std::collections::HashMap;

///
/// ColumnKey
/// How an implicit per-column processor is addressed.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ColumnKey<'a> {
    Name(&'a str),
    Index(usize),
}

///
/// ProcessorRegistry
///
/// Table-owned processors: by explicit name, and implicit per-column
/// entries keyed by column name or column index.
///

#[derive(Clone, Debug, Default)]
pub struct ProcessorRegistry {
    named: HashMap<String, Processor>,
    by_column: HashMap<String, Processor>,
    by_index: HashMap<usize, Processor>,
}

impl ProcessorRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, processor: Processor) -> &mut Self {
        self.named.insert(name.into(), processor);
        self
    }

    pub fn register_column(&mut self, column: impl Into<String>, processor: Processor) -> &mut Self {
        self.by_column.insert(column.into(), processor);
        self
    }

    pub fn register_index(&mut self, index: usize, processor: Processor) -> &mut Self {
        self.by_index.insert(index, processor);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Processor> {
        self.named.get(name)
    }

    #[must_use]
    pub fn column(&self, key: ColumnKey<'_>) -> Option<&Processor> {
        match key {
            ColumnKey::Name(name) => self.by_column.get(name),
            ColumnKey::Index(index) => self.by_index.get(&index),
        }
    }
}

///
/// Resolve the processor for one column.
///
/// Explicit references win; named references check the callback target
/// before the table. Without one, implicit entries are tried in order:
/// target by name, target by index, table by name, table by index.
///
pub(crate) fn resolve_processor(
    column: &ColumnSpec,
    index: usize,
    target: Option<&dyn CallbackTarget>,
    table: &ProcessorRegistry,
) -> Result<Option<Processor>, ConfigError> {
    match &column.processor {
        Some(ProcessorRef::Direct(processor)) => return Ok(Some(processor.clone())),
        Some(ProcessorRef::Named(name)) => {
            return target
                .and_then(|t| t.processor(name))
                .or_else(|| table.get(name).cloned())
                .map(Some)
                .ok_or_else(|| ConfigError::UnknownProcessor {
                    column: column.name.clone(),
                    name: name.clone(),
                });
        }
        None => {}
    }

    let by_name = ColumnKey::Name(&column.name);
    let by_index = ColumnKey::Index(index);

    Ok(target
        .and_then(|t| t.column_processor(by_name).or_else(|| t.column_processor(by_index)))
        .or_else(|| table.column(by_name).or_else(|| table.column(by_index)).cloned()))
}
