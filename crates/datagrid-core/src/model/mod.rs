//! Runtime schema graph.
//!
//! Schemas describe which fields a record type exposes to the store and how
//! relations link one schema to another. The planner consults this graph to
//! decide whether a column source can be handed to the store (native) or has
//! to be resolved in memory (manual).

mod field;
mod path;
mod registry;
mod schema;

#[cfg(test)]
mod tests;

pub use field::{FieldDef, FieldKind};
pub use path::{FieldPath, PathError, ResolvedPath};
pub use registry::SchemaRegistry;
pub use schema::Schema;
