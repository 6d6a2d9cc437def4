//! Compiled schema nodes
//!
//! [`compile_node`] turns a schema value into a tree of handlers once; the
//! tree is then reused for any number of [`Node::validate`] calls. Handlers
//! never store per-call state: every call returns either the canonical value
//! or the errors it found, so one compiled tree may serve many threads.
//!
//! Copyright (c) 2025 Dataval Team
//! Licensed under the Apache-2.0 license

pub mod array;
pub mod leaf;
pub mod object;

pub use array::ArrayHandler;
pub use leaf::LeafHandler;
pub use object::ObjectHandler;

use crate::error::{ErrorRecord, ErrorReport};
use crate::registry::{coerce, Registry};
use crate::schema::SchemaNode;
use serde_json::Value;

/// A compiled schema node
#[derive(Debug)]
pub enum Node {
    Leaf(LeafHandler),
    Object(ObjectHandler),
    Array(ArrayHandler),
}

impl Node {
    /// Check `value` against this node, returning its canonical form
    pub fn validate(&self, value: &Value) -> Result<Value, ErrorReport> {
        match self {
            Node::Leaf(handler) => handler.validate(value),
            Node::Object(handler) => handler.validate(value),
            Node::Array(handler) => handler.validate(value),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Node::Leaf(_) => "leaf",
            Node::Object(_) => "object",
            Node::Array(_) => "array",
        }
    }
}

/// Compile any schema value into a node
///
/// Errors carry paths relative to `schema`; a parent prefixes them with the
/// key or index under which it found `schema`.
pub fn compile_node(schema: &Value, registry: &Registry) -> Result<Node, ErrorReport> {
    match SchemaNode::classify(schema) {
        Some(SchemaNode::Leaf(spec)) => LeafHandler::compile(spec, registry).map(Node::Leaf),
        Some(SchemaNode::Object(fields)) => {
            ObjectHandler::compile(fields, registry).map(Node::Object)
        }
        Some(SchemaNode::Array(items)) => ArrayHandler::compile(items, registry).map(Node::Array),
        None => Err(ErrorRecord::new(format!(
            "Invalid value; {{{}}}",
            coerce::to_loose_string(schema)
        ))
        .into()),
    }
}
