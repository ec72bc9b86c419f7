use crate::{model::FieldKind, query::PlanError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

///
/// ValueType
///
/// Search/sort classification of a column source.
/// `Ignored` sources never contribute search predicates.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Text,
    Date,
    Boolean,
    Integer,
    Float,
    Ignored,
}

///
/// ColumnRegistry
///
/// Explicit mapping from storage kind to value type.
/// Nothing is registered implicitly: hosts start from `with_builtins` and
/// add their custom kinds.
///

#[derive(Clone, Debug, Default)]
pub struct ColumnRegistry {
    kinds: HashMap<String, ValueType>,
}

impl ColumnRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry covering every built-in `FieldKind`.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for (kind, value_type) in [
            ("text", ValueType::Text),
            ("date", ValueType::Date),
            ("datetime", ValueType::Date),
            ("boolean", ValueType::Boolean),
            ("integer", ValueType::Integer),
            ("float", ValueType::Float),
            ("decimal", ValueType::Float),
            ("foreign_key", ValueType::Ignored),
            ("reverse", ValueType::Ignored),
            ("many_to_many", ValueType::Ignored),
        ] {
            registry.register(kind, value_type);
        }

        registry
    }

    /// Register (or replace) the value type for a kind name.
    pub fn register(&mut self, kind: impl Into<String>, value_type: ValueType) -> &mut Self {
        self.kinds.insert(kind.into(), value_type);
        self
    }

    #[must_use]
    pub fn get(&self, kind: &FieldKind) -> Option<ValueType> {
        self.kinds.get(kind_name(kind)).copied()
    }

    /// Classify a storage kind; unregistered kinds are a configuration gap.
    pub fn classify(&self, kind: &FieldKind) -> Result<ValueType, PlanError> {
        self.get(kind)
            .ok_or_else(|| PlanError::UnsupportedFieldType {
                kind: kind_name(kind).to_string(),
            })
    }
}

// Registry key of a storage kind.
fn kind_name(kind: &FieldKind) -> &str {
    match kind {
        FieldKind::Text => "text",
        FieldKind::Date => "date",
        FieldKind::DateTime => "datetime",
        FieldKind::Boolean => "boolean",
        FieldKind::Integer => "integer",
        FieldKind::Float => "float",
        FieldKind::Decimal => "decimal",
        FieldKind::Custom(name) => name.as_str(),
        FieldKind::ForeignKey { .. } => "foreign_key",
        FieldKind::Reverse { .. } => "reverse",
        FieldKind::ManyToMany { .. } => "many_to_many",
    }
}
