use crate::model::{FieldPath, ResolvedPath, SchemaRegistry};

///
/// FieldResolver
///
/// Answers "can the store handle this path?" for one request. Without a
/// schema every path is manual.
///

#[derive(Clone, Copy, Debug)]
pub struct FieldResolver<'a> {
    registry: &'a SchemaRegistry,
    schema: Option<&'a str>,
}

impl<'a> FieldResolver<'a> {
    #[must_use]
    pub const fn new(registry: &'a SchemaRegistry, schema: Option<&'a str>) -> Self {
        Self { registry, schema }
    }

    #[must_use]
    pub const fn schema(&self) -> Option<&'a str> {
        self.schema
    }

    #[must_use]
    pub const fn registry(&self) -> &'a SchemaRegistry {
        self.registry
    }

    /// Resolve `path`; unresolvable paths are simply not store-backed.
    #[must_use]
    pub fn resolve(&self, path: &FieldPath) -> Option<ResolvedPath> {
        self.schema
            .and_then(|schema| self.registry.resolve(schema, path).ok())
    }

    #[must_use]
    pub fn is_native(&self, path: &FieldPath) -> bool {
        self.resolve(path).is_some()
    }
}
