use crate::model::{FieldPath, PathError, ResolvedPath, Schema};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

///
/// SchemaRegistry
///
/// Named schemas plus a memo of resolved paths.
/// Resolution is a pure function of (schema, path), so successful results
/// are cached for the lifetime of the registry.
///

#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, Arc<Schema>>,
    resolved: Mutex<HashMap<(String, FieldPath), ResolvedPath>>,
}

impl SchemaRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style registration.
    #[must_use]
    pub fn with(mut self, schema: Schema) -> Self {
        self.register(schema);
        self
    }

    /// Register a schema, replacing any previous schema of the same name.
    pub fn register(&mut self, schema: Schema) {
        if let Ok(memo) = self.resolved.get_mut() {
            memo.clear();
        }
        self.schemas.insert(schema.name.clone(), Arc::new(schema));
    }

    pub fn try_get(&self, name: &str) -> Result<Arc<Schema>, PathError> {
        self.schemas
            .get(name)
            .cloned()
            .ok_or_else(|| PathError::UnknownSchema(name.to_string()))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Walk `path` from `schema`, following relations on every non-terminal
    /// segment.
    pub fn resolve(&self, schema: &str, path: &FieldPath) -> Result<ResolvedPath, PathError> {
        let key = (schema.to_string(), path.clone());
        if let Some(hit) = self.resolved.lock().ok().and_then(|memo| memo.get(&key).cloned()) {
            return Ok(hit);
        }

        let resolved = self.walk(schema, path)?;
        if let Ok(mut memo) = self.resolved.lock() {
            memo.insert(key, resolved.clone());
        }

        Ok(resolved)
    }

    fn walk(&self, root: &str, path: &FieldPath) -> Result<ResolvedPath, PathError> {
        let segments = path.segments();
        let Some((last, walk)) = segments.split_last() else {
            return Err(PathError::EmptyPath {
                schema: root.to_string(),
            });
        };

        let mut node = self.try_get(root)?;
        let mut hops = Vec::with_capacity(walk.len());

        for segment in walk {
            let field = node
                .get_field(segment)
                .ok_or_else(|| not_found(&node, path, segment))?;
            let Some(target) = field.kind.relation_target() else {
                return Err(PathError::NotARelation {
                    schema: node.name.clone(),
                    path: path.to_string(),
                    segment: segment.clone(),
                });
            };
            hops.push(field.kind.clone());
            node = self.try_get(target)?;
        }

        let leaf = node
            .get_field(last)
            .ok_or_else(|| not_found(&node, path, last))?
            .clone();

        Ok(ResolvedPath {
            path: path.clone(),
            leaf,
            hops,
        })
    }
}

fn not_found(schema: &Schema, path: &FieldPath, segment: &str) -> PathError {
    PathError::PathNotFound {
        schema: schema.name.clone(),
        path: path.to_string(),
        segment: segment.to_string(),
    }
}
