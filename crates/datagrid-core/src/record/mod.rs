//! Record representations.
//!
//! A record is either an object with attribute-style lookup or a flat
//! key/value mapping. Everything downstream (extraction, processors, the
//! in-memory store) works over both through [`Record`].

mod entity;
mod lookup;


pub use entity::{Attribute, Entity, Method, Object};
pub use lookup::{AttributeChain, KeyLookup, ValueLookup};

pub(crate) use lookup::fan_out;

use crate::{model::FieldPath, value::Value};
use derive_more::Deref;
use std::{collections::BTreeMap, sync::Arc};

///
/// Row
///
/// Mapping record body. Keys are canonical field paths (`blog__name`);
/// the primary key lives under `pk`.
///

#[derive(Clone, Debug, Default, Deref, PartialEq)]
pub struct Row(BTreeMap<String, Value>);

impl Row {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert; the key is normalized to its canonical path form.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.0
            .insert(FieldPath::parse(key).to_string(), value.into());
    }
}

impl<K: AsRef<str>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Self::new();
        for (key, value) in iter {
            row.set(key.as_ref(), value);
        }
        row
    }
}

///
/// Record
///

#[derive(Clone, Debug)]
pub enum Record {
    Object(Arc<dyn Entity>),
    Mapping(Arc<Row>),
}

impl Record {
    pub fn object(entity: impl Entity + 'static) -> Self {
        Self::Object(Arc::new(entity))
    }

    #[must_use]
    pub fn mapping(row: Row) -> Self {
        Self::Mapping(Arc::new(row))
    }

    #[must_use]
    pub fn pk(&self) -> Value {
        match self {
            Self::Object(entity) => entity.pk(),
            Self::Mapping(row) => row.get("pk").cloned().unwrap_or(Value::Null),
        }
    }

    #[must_use]
    pub fn as_entity(&self) -> Option<&Arc<dyn Entity>> {
        match self {
            Self::Object(entity) => Some(entity),
            Self::Mapping(_) => None,
        }
    }

    #[must_use]
    pub fn as_row(&self) -> Option<&Row> {
        match self {
            Self::Object(_) => None,
            Self::Mapping(row) => Some(row),
        }
    }

    /// Lookup strategy matching this record's representation.
    #[must_use]
    pub fn strategy(&self) -> &'static dyn ValueLookup {
        match self {
            Self::Object(_) => &AttributeChain,
            Self::Mapping(_) => &KeyLookup,
        }
    }

    /// Read one source path; failures collapse to `None`.
    #[must_use]
    pub fn lookup(&self, path: &FieldPath) -> Option<Attribute> {
        self.strategy().lookup(self, path)
    }

    /// Read one source path as a plain value.
    /// Related entities yield their primary key.
    #[must_use]
    pub fn value_at(&self, path: &FieldPath) -> Value {
        match self.lookup(path) {
            Some(Attribute::Value(value)) => value,
            Some(Attribute::Entity(entity)) => entity.pk(),
            Some(Attribute::Entities(entities)) => {
                Value::List(entities.iter().map(|e| e.pk()).collect())
            }
            Some(Attribute::Method(_)) | None => Value::Null,
        }
    }
}

impl From<Object> for Record {
    fn from(object: Object) -> Self {
        Self::object(object)
    }
}

impl From<Row> for Record {
    fn from(row: Row) -> Self {
        Self::mapping(row)
    }
}
