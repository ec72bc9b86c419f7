//! Table definitions.
//!
//! A [`Table`] is the read-only template built once per grid: columns,
//! options, processors and hooks. Every request works on its own deep copy
//! of the columns, so one table may serve concurrent requests.

mod introspect;
mod request;

#[cfg(test)]
mod tests;

pub use introspect::columns_for_schema;
pub use request::{ConfiguredRequest, TableRequest};

use crate::{
    cache::CacheBackend,
    column::{ColumnDeclaration, ColumnRegistry, ColumnSpec},
    error::Error,
    model::{FieldPath, SchemaRegistry},
    options::{ConfigError, RequestParams, TableOptions, split_token},
    processor::{Processor, ProcessorRegistry, RecordHooks},
    store::RecordSet,
};
use std::{collections::BTreeSet, fmt, sync::Arc};

///
/// Table
///

pub struct Table {
    id: String,
    schema: Option<String>,
    registry: Arc<SchemaRegistry>,
    kinds: ColumnRegistry,
    processors: ProcessorRegistry,
    columns: Vec<ColumnSpec>,
    options: TableOptions,
    hooks: RecordHooks,
    cache: Option<Arc<dyn CacheBackend>>,
}

impl Table {
    #[must_use]
    pub fn builder(id: impl Into<String>) -> TableBuilder {
        TableBuilder::new(id)
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// Column templates. Never annotated with request state.
    #[must_use]
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    #[must_use]
    pub const fn options(&self) -> &TableOptions {
        &self.options
    }

    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|column| column.name.as_str()).collect()
    }

    /// Start a request against `store`.
    #[must_use]
    pub fn request<'t>(
        &'t self,
        store: &'t dyn RecordSet,
        params: RequestParams,
    ) -> TableRequest<'t> {
        TableRequest::new(self, store, params)
    }

    // Declared ordering of the table's schema, used when nothing else applies.
    fn schema_ordering(&self) -> Vec<String> {
        self.schema
            .as_deref()
            .and_then(|name| self.registry.try_get(name).ok())
            .map(|schema| schema.ordering.clone())
            .unwrap_or_default()
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("id", &self.id)
            .field("schema", &self.schema)
            .field("columns", &self.column_names())
            .field("options", &self.options)
            .field("cache", &self.cache.is_some())
            .finish_non_exhaustive()
    }
}

///
/// TableBuilder
///

pub struct TableBuilder {
    id: String,
    schema: Option<String>,
    registry: Arc<SchemaRegistry>,
    kinds: ColumnRegistry,
    processors: ProcessorRegistry,
    declared: Vec<ColumnSpec>,
    options: TableOptions,
    hooks: RecordHooks,
    cache: Option<Arc<dyn CacheBackend>>,
}

impl TableBuilder {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            schema: None,
            registry: Arc::new(SchemaRegistry::new()),
            kinds: ColumnRegistry::with_builtins(),
            processors: ProcessorRegistry::new(),
            declared: Vec::new(),
            options: TableOptions::new(),
            hooks: RecordHooks::new(),
            cache: None,
        }
    }

    /// Schema whose fields are introspected into columns.
    #[must_use]
    pub fn schema(mut self, registry: Arc<SchemaRegistry>, name: impl Into<String>) -> Self {
        self.registry = registry;
        self.schema = Some(name.into());
        self
    }

    /// Field registry used without introspection (unschemed tables).
    #[must_use]
    pub fn registry(mut self, registry: Arc<SchemaRegistry>) -> Self {
        self.registry = registry;
        self
    }

    #[must_use]
    pub fn kinds(mut self, kinds: ColumnRegistry) -> Self {
        self.kinds = kinds;
        self
    }

    #[must_use]
    pub fn column(mut self, column: ColumnSpec) -> Self {
        self.declared.push(column);
        self
    }

    /// Declared column from any accepted declaration shape.
    pub fn declare(self, declaration: impl Into<ColumnDeclaration>) -> Result<Self, Error> {
        let column = declaration.into().normalize()?.into_column();
        Ok(self.column(column))
    }

    #[must_use]
    pub fn options(mut self, options: TableOptions) -> Self {
        self.options = self.options.merged_with(&options);
        self
    }

    #[must_use]
    pub fn processor(mut self, name: impl Into<String>, processor: Processor) -> Self {
        self.processors.register(name, processor);
        self
    }

    #[must_use]
    pub fn column_processor(mut self, column: impl Into<String>, processor: Processor) -> Self {
        self.processors.register_column(column, processor);
        self
    }

    #[must_use]
    pub fn index_processor(mut self, index: usize, processor: Processor) -> Self {
        self.processors.register_index(index, processor);
        self
    }

    #[must_use]
    pub fn hooks(mut self, hooks: RecordHooks) -> Self {
        self.hooks = hooks;
        self
    }

    #[must_use]
    pub fn cache_backend(mut self, backend: Arc<dyn CacheBackend>) -> Self {
        self.cache = Some(backend);
        self
    }

    ///
    /// Validate and assemble the table.
    ///
    /// Introspected columns come first, in schema or selection order;
    /// declared columns replace introspected ones of the same name and are
    /// otherwise appended.
    ///
    pub fn build(self) -> Result<Table, Error> {
        let declared = self.declared_columns()?;
        let mut columns = match &self.schema {
            Some(name) => columns_for_schema(&*self.registry.try_get(name)?, &self.options),
            None => Vec::new(),
        };

        for column in declared {
            match columns.iter_mut().find(|c| c.name == column.name) {
                Some(slot) => *slot = column,
                None => columns.push(column),
            }
        }

        self.check_selection(&columns)?;
        let columns = self.order_by_selection(columns);
        self.check_ordering(&columns)?;
        self.check_search_fields()?;

        Ok(Table {
            id: self.id,
            schema: self.schema,
            registry: self.registry,
            kinds: self.kinds,
            processors: self.processors,
            columns,
            options: self.options,
            hooks: self.hooks,
            cache: self.cache,
        })
    }

    // Code-declared columns plus structured declarations from the options.
    fn declared_columns(&self) -> Result<Vec<ColumnSpec>, Error> {
        let mut declared = self.declared.clone();
        for declaration in self.options.columns.iter().flatten() {
            if !matches!(declaration, ColumnDeclaration::Name(_)) {
                declared.push(declaration.clone().normalize()?.into_column());
            }
        }

        let mut seen = BTreeSet::new();
        for column in &declared {
            if !seen.insert(column.name.as_str()) {
                return Err(ConfigError::DuplicateColumn(column.name.clone()).into());
            }
        }

        Ok(declared)
    }

    fn check_selection(&self, columns: &[ColumnSpec]) -> Result<(), Error> {
        let missing: Vec<String> = self
            .selected_names()
            .into_iter()
            .filter(|name| !columns.iter().any(|c| c.name == *name))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::UnknownColumnName(missing).into())
        }
    }

    // A `columns` selection fixes the order of the columns it names.
    fn order_by_selection(&self, mut columns: Vec<ColumnSpec>) -> Vec<ColumnSpec> {
        let names = self.selected_names();
        if names.is_empty() {
            return columns;
        }

        let mut ordered = Vec::with_capacity(columns.len());
        for name in &names {
            if let Some(pos) = columns.iter().position(|c| c.name == *name) {
                ordered.push(columns.remove(pos));
            }
        }
        ordered.append(&mut columns);

        ordered
    }

    fn selected_names(&self) -> Vec<String> {
        self.options
            .columns
            .iter()
            .flatten()
            .filter_map(|declaration| match declaration {
                ColumnDeclaration::Name(name) => Some(name.trim().to_string()),
                _ => None,
            })
            .filter(|name| !self.options.exclude.iter().flatten().any(|e| e == name))
            .collect()
    }

    // Malformed tokens are configuration errors; well-formed names that
    // match nothing are only warned about per request.
    fn check_ordering(&self, columns: &[ColumnSpec]) -> Result<(), Error> {
        for token in self.options.ordering.iter().flatten() {
            let (_, name) = split_token(token);
            let valid = match name.strip_prefix('!') {
                Some(index) => index.parse::<usize>().is_ok_and(|i| i < columns.len()),
                None => !FieldPath::parse(name).is_empty(),
            };
            if !valid {
                return Err(ConfigError::InvalidOrderingToken(token.clone()).into());
            }
        }

        Ok(())
    }

    // Extra search fields must exist on the schema.
    fn check_search_fields(&self) -> Result<(), Error> {
        let Some(schema) = &self.schema else {
            return Ok(());
        };
        for raw in self.options.search_fields() {
            self.registry.resolve(schema, &FieldPath::parse(raw))?;
        }

        Ok(())
    }
}
