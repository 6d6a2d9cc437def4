//! Abstract syntax for schema nodes and leaf expressions
//!
//! Copyright (c) 2025 Dataval Team
//! Licensed under the Apache-2.0 license

use crate::registry::NULL_TYPE;
use serde_json::{Map, Value};
use std::fmt;

/// Shape of one schema value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SchemaNode<'a> {
    /// `"type|type@transform(args)"`
    Leaf(&'a str),
    /// Key to child schema; a `?` key prefix marks the key optional
    Object(&'a Map<String, Value>),
    /// One element: homogeneous list, several: fixed-length tuple
    Array(&'a [Value]),
}

impl<'a> SchemaNode<'a> {
    /// Classify a schema value, `None` for shapes that are not schemas
    pub fn classify(value: &'a Value) -> Option<Self> {
        match value {
            Value::String(spec) => Some(SchemaNode::Leaf(spec)),
            Value::Object(map) => Some(SchemaNode::Object(map)),
            Value::Array(items) => Some(SchemaNode::Array(items)),
            Value::Null | Value::Bool(_) | Value::Number(_) => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SchemaNode::Leaf(_) => "leaf",
            SchemaNode::Object(_) => "object",
            SchemaNode::Array(_) => "array",
        }
    }
}

/// One `name(arg,arg)` invocation in a leaf's transform chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformCall {
    /// Registered transform name
    pub name: String,
    /// Raw argument substrings; `name()` has one empty argument, `name` none
    pub args: Vec<String>,
    /// The expression as written
    pub raw: String,
}

impl TransformCall {
    pub fn new<N: Into<String>>(name: N) -> Self {
        let name = name.into();
        Self {
            raw: name.clone(),
            name,
            args: Vec::new(),
        }
    }
}

impl fmt::Display for TransformCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Parsed leaf expression
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeafSpec {
    /// Alternative type names in declaration order, without duplicates or `null`
    pub alternatives: Vec<String>,
    /// Whether `null` was among the alternatives
    pub nullable: bool,
    /// Transforms applied in order to the coerced value
    pub transforms: Vec<TransformCall>,
}

impl LeafSpec {
    /// Types tried during validation; a bare `null` leaf tries the null type itself
    pub fn candidates(&self) -> Vec<&str> {
        if self.alternatives.is_empty() && self.nullable {
            vec![NULL_TYPE]
        } else {
            self.alternatives.iter().map(String::as_str).collect()
        }
    }

    /// Alternatives as listed in type-mismatch messages, `null` last
    pub fn expected(&self) -> String {
        let mut names: Vec<&str> = self.alternatives.iter().map(String::as_str).collect();
        if self.nullable {
            names.push(NULL_TYPE);
        }
        names.join("|")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify() {
        assert_eq!(SchemaNode::classify(&json!("int")), Some(SchemaNode::Leaf("int")));
        assert_eq!(SchemaNode::classify(&json!({})).map(|n| n.kind()), Some("object"));
        assert_eq!(SchemaNode::classify(&json!([])).map(|n| n.kind()), Some("array"));
        assert_eq!(SchemaNode::classify(&json!(5)), None);
        assert_eq!(SchemaNode::classify(&json!(null)), None);
    }

    #[test]
    fn test_expected_lists_null_last() {
        let spec = LeafSpec {
            alternatives: vec!["int".to_string(), "string".to_string()],
            nullable: true,
            transforms: vec![],
        };
        assert_eq!(spec.expected(), "int|string|null");
        assert_eq!(spec.candidates(), vec!["int", "string"]);
    }

    #[test]
    fn test_null_only_leaf_candidates() {
        let spec = LeafSpec {
            alternatives: vec![],
            nullable: true,
            transforms: vec![],
        };
        assert_eq!(spec.candidates(), vec!["null"]);
        assert_eq!(spec.expected(), "null");
    }
}
