use crate::{
    model::FieldPath,
    record::{Attribute, Entity, Record},
    value::Value,
};
use std::sync::Arc;

///
/// ValueLookup
///
/// Strategy for reading one source path off a record.
/// Each strategy understands a single record representation and returns
/// `None` for anything it cannot read.
///

pub trait ValueLookup: Send + Sync {
    fn lookup(&self, record: &Record, path: &FieldPath) -> Option<Attribute>;
}

///
/// AttributeChain
///
/// Walks object records one attribute at a time, invoking zero-argument
/// methods along the way. Does not fan out across to-many relations.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct AttributeChain;

impl ValueLookup for AttributeChain {
    fn lookup(&self, record: &Record, path: &FieldPath) -> Option<Attribute> {
        let Record::Object(root) = record else {
            return None;
        };
        let (last, walk) = path.segments().split_last()?;

        let mut node = Arc::clone(root);
        for segment in walk {
            match attribute_of(node.as_ref(), segment)? {
                Attribute::Entity(next) => node = next,
                _ => return None,
            }
        }

        attribute_of(node.as_ref(), last)
    }
}

///
/// KeyLookup
///
/// Reads mapping records by the full source path (`blog__name`).
///

#[derive(Clone, Copy, Debug, Default)]
pub struct KeyLookup;

impl ValueLookup for KeyLookup {
    fn lookup(&self, record: &Record, path: &FieldPath) -> Option<Attribute> {
        let Record::Mapping(row) = record else {
            return None;
        };

        row.get(&path.to_string()).cloned().map(Attribute::Value)
    }
}

// Attribute read with `pk` aliasing and method settlement.
fn attribute_of(entity: &dyn Entity, name: &str) -> Option<Attribute> {
    match entity.attribute(name) {
        Some(attribute) => attribute.settle(),
        None if name == "pk" => Some(Attribute::Value(entity.pk())),
        None => None,
    }
}

///
/// Collect every leaf value reachable through `path`, fanning out across
/// to-many relations the way a store join would. Related entities at the
/// leaf contribute their primary keys.
///
#[must_use]
pub(crate) fn fan_out(record: &Record, path: &FieldPath) -> Vec<Value> {
    let mut out = Vec::new();

    match record {
        Record::Mapping(_) => {
            if let Some(Attribute::Value(value)) = KeyLookup.lookup(record, path) {
                out.push(value);
            }
        }
        Record::Object(root) => collect(root.as_ref(), path.segments(), &mut out),
    }

    out
}

fn collect(node: &dyn Entity, segments: &[String], out: &mut Vec<Value>) {
    let Some((head, rest)) = segments.split_first() else {
        return;
    };
    let Some(attribute) = attribute_of(node, head) else {
        return;
    };

    match (attribute, rest.is_empty()) {
        (Attribute::Value(value), true) => out.push(value),
        (Attribute::Entity(entity), true) => out.push(entity.pk()),
        (Attribute::Entities(entities), true) => out.extend(entities.iter().map(|e| e.pk())),
        (Attribute::Entity(entity), false) => collect(entity.as_ref(), rest, out),
        (Attribute::Entities(entities), false) => {
            for entity in &entities {
                collect(entity.as_ref(), rest, out);
            }
        }
        // settled attributes are never methods; scalars cannot be traversed
        (Attribute::Method(_) | Attribute::Value(_), _) => {}
    }
}
