//! Object handler: a fixed set of keys, each with its own schema
//!
//! A key written as `?name` is optional. Input keys the schema does not
//! declare are reported as `Out of bound`.
//!
//! Copyright (c) 2025 Dataval Team
//! Licensed under the Apache-2.0 license

use super::{compile_node, Node};
use crate::error::{ErrorRecord, ErrorReport};
use crate::registry::{coerce, Registry};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Marks an optional key
const OPTIONAL_PREFIX: char = '?';

/// One declared key
#[derive(Debug)]
struct Field {
    /// Key with the optional marker stripped
    key: String,
    optional: bool,
    node: Node,
}

/// Compiled object schema
#[derive(Debug)]
pub struct ObjectHandler {
    /// Declared keys in schema order
    fields: Vec<Field>,
    declared: HashSet<String>,
}

impl ObjectHandler {
    pub fn compile(schema: &Map<String, Value>, registry: &Registry) -> Result<Self, ErrorReport> {
        let mut errors = ErrorReport::new();
        let mut fields = Vec::with_capacity(schema.len());
        let mut declared = HashSet::with_capacity(schema.len());

        for (raw_key, child) in schema {
            let (key, optional) = match raw_key.strip_prefix(OPTIONAL_PREFIX) {
                Some(stripped) => (stripped, true),
                None => (raw_key.as_str(), false),
            };

            if !declared.insert(key.to_string()) {
                errors.push(ErrorRecord::at(raw_key.as_str(), "Duplicate key"));
                continue;
            }

            match compile_node(child, registry) {
                Ok(node) => fields.push(Field {
                    key: key.to_string(),
                    optional,
                    node,
                }),
                Err(mut child_errors) => errors.inherit(&mut child_errors, raw_key.as_str()),
            }
        }

        errors.into_result(Self { fields, declared })
    }

    /// Declared keys in schema order, with their optionality
    pub fn keys(&self) -> impl Iterator<Item = (&str, bool)> {
        self.fields.iter().map(|field| (field.key.as_str(), field.optional))
    }

    pub fn validate(&self, value: &Value) -> Result<Value, ErrorReport> {
        let input = match value {
            Value::Object(input) => input,
            other => {
                return Err(ErrorRecord::new(format!(
                    "Expected: object; Received: {}",
                    coerce::serialize(other)
                ))
                .into());
            }
        };

        let mut errors = ErrorReport::new();
        let mut output = Map::new();

        for field in &self.fields {
            match input.get(&field.key) {
                Some(item) => match field.node.validate(item) {
                    Ok(canonical) => {
                        output.insert(field.key.clone(), canonical);
                    }
                    Err(mut child_errors) => errors.inherit(&mut child_errors, field.key.as_str()),
                },
                None if field.optional => {}
                None => errors.push(ErrorRecord::at(field.key.as_str(), "Missing")),
            }
        }

        for key in input.keys().filter(|key| !self.declared.contains(*key)) {
            errors.push(ErrorRecord::at(key.as_str(), "Out of bound"));
        }

        errors.into_result(Value::Object(output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Path, PathSegment};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn compile(schema: Value) -> Result<ObjectHandler, ErrorReport> {
        match schema {
            Value::Object(map) => ObjectHandler::compile(&map, &Registry::new()),
            _ => unreachable!("test schemas are objects"),
        }
    }

    #[test]
    fn test_validates_declared_keys() {
        let handler = compile(json!({"id": "unsigned", "name": "string@str_title"})).unwrap();
        assert_eq!(
            handler.validate(&json!({"id": "42", "name": "ada lovelace"})),
            Ok(json!({"id": 42, "name": "Ada Lovelace"}))
        );
    }

    #[test]
    fn test_missing_and_out_of_bound() {
        let handler = compile(json!({"a": "int", "b": "int"})).unwrap();
        let err = handler.validate(&json!({"a": 1, "x": 2})).unwrap_err();
        let records = err.errors().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], ErrorRecord::at("b", "Missing"));
        assert_eq!(records[1], ErrorRecord::at("x", "Out of bound"));
    }

    #[test]
    fn test_optional_keys() {
        let handler = compile(json!({"a": "int", "?b": "int"})).unwrap();
        assert_eq!(
            handler.keys().collect::<Vec<_>>(),
            vec![("a", false), ("b", true)]
        );
        assert_eq!(handler.validate(&json!({"a": 1})), Ok(json!({"a": 1})));
        assert_eq!(handler.validate(&json!({"a": 1, "b": "2"})), Ok(json!({"a": 1, "b": 2})));
        // The marker is not part of the input key
        assert!(handler.validate(&json!({"a": 1, "?b": 2})).is_err());
    }

    #[test]
    fn test_collects_every_error() {
        let handler = compile(json!({"a": "int", "b": {"c": "bool", "d": "float"}})).unwrap();
        let err = handler
            .validate(&json!({"a": "x", "b": {"d": "y"}}))
            .unwrap_err();
        let paths: Vec<Path> = err.iter().map(|record| record.path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                Path::from("a"),
                Path::from(vec![PathSegment::from("b"), PathSegment::from("c")]),
                Path::from(vec![PathSegment::from("b"), PathSegment::from("d")]),
            ]
        );
    }

    #[test]
    fn test_rejects_non_objects() {
        let handler = compile(json!({})).unwrap();
        assert_eq!(
            handler.validate(&json!([1])).unwrap_err().error_string(),
            "Expected: object; Received: [1]"
        );
        assert_eq!(handler.validate(&json!({})), Ok(json!({})));
    }

    #[test]
    fn test_construction_errors_use_written_key() {
        let err = compile(json!({"?a": "nope", "b": 3, "c": {"d": ""}})).unwrap_err();
        assert_eq!(
            err.error_string(),
            "[?a]: Unknown type 'nope'\n[b]: Invalid value; {3}\n[c][d]: Type is missing"
        );
    }

    #[test]
    fn test_duplicate_stripped_key() {
        let err = compile(json!({"a": "int", "?a": "int"})).unwrap_err();
        assert_eq!(err.error_string(), "[?a]: Duplicate key");
    }
}
