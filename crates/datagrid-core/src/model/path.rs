use crate::model::{FieldDef, FieldKind};
use std::fmt::{self, Display};
use thiserror::Error as ThisError;

///
/// PathError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum PathError {
    #[error("schema '{schema}' has no field '{segment}' (path '{path}')")]
    PathNotFound {
        schema: String,
        path: String,
        segment: String,
    },

    #[error("field '{segment}' on schema '{schema}' is not a relation (path '{path}')")]
    NotARelation {
        schema: String,
        path: String,
        segment: String,
    },

    #[error("empty field path on schema '{schema}'")]
    EmptyPath { schema: String },

    #[error("schema '{0}' is not registered")]
    UnknownSchema(String),
}

///
/// FieldPath
///
/// Chain of traversal segments through the schema graph.
/// Accepts both `author__name` and `author.name` spellings; renders with the
/// double-underscore form.
///

#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let segments = raw
            .replace('.', "__")
            .split("__")
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(ToString::to_string)
            .collect();

        Self { segments }
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn leaf(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("__"))
    }
}

impl From<&str> for FieldPath {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<String> for FieldPath {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

///
/// ResolvedPath
///
/// Outcome of walking a field path: the leaf field plus every relation hop
/// taken to reach it.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResolvedPath {
    pub path: FieldPath,
    pub leaf: FieldDef,
    pub hops: Vec<FieldKind>,
}

impl ResolvedPath {
    /// True when any hop (or the leaf itself) can fan out to several rows.
    #[must_use]
    pub fn contains_plural_relation(&self) -> bool {
        self.leaf.kind.is_plural_relation() || self.hops.iter().any(FieldKind::is_plural_relation)
    }

    #[must_use]
    pub const fn leaf_kind(&self) -> &FieldKind {
        &self.leaf.kind
    }
}
