//! Array handler
//!
//! A one-element schema such as `["int"]` describes a list of any length
//! whose elements all match that element. A longer schema is a tuple: element
//! `i` of the input matches schema element `i`, and extra input elements are
//! `Out of bound`. The empty schema `[]` is read as `["any"]`.
//!
//! Copyright (c) 2025 Dataval Team
//! Licensed under the Apache-2.0 license

use super::{compile_node, Node};
use crate::error::{ErrorRecord, ErrorReport};
use crate::registry::{coerce, Registry};
use serde_json::Value;

#[derive(Debug)]
pub struct ArrayHandler {
    items: Vec<Node>,
    /// `true` for a homogeneous list, `false` for a tuple
    single: bool,
}

impl ArrayHandler {
    pub fn compile(schema: &[Value], registry: &Registry) -> Result<Self, ErrorReport> {
        let any = [Value::String("any".to_string())];
        let schema = if schema.is_empty() { &any[..] } else { schema };

        let mut errors = ErrorReport::new();
        let mut items = Vec::with_capacity(schema.len());
        for (index, item) in schema.iter().enumerate() {
            match compile_node(item, registry) {
                Ok(node) => items.push(node),
                Err(mut child_errors) => errors.inherit(&mut child_errors, index),
            }
        }

        errors.into_result(Self {
            items,
            single: schema.len() == 1,
        })
    }

    pub fn is_tuple(&self) -> bool {
        !self.single
    }

    pub fn validate(&self, value: &Value) -> Result<Value, ErrorReport> {
        let input = match value {
            Value::Array(input) => input,
            other => {
                return Err(ErrorRecord::new(format!(
                    "Expected: array; Received: {}",
                    coerce::serialize(other)
                ))
                .into());
            }
        };

        let mut errors = ErrorReport::new();
        let mut output = Vec::with_capacity(input.len());

        for (index, item) in input.iter().enumerate() {
            let node = if self.single {
                self.items.first()
            } else {
                self.items.get(index)
            };
            let Some(node) = node else {
                errors.push(ErrorRecord::at(index, "Out of bound"));
                continue;
            };
            match node.validate(item) {
                Ok(canonical) => output.push(canonical),
                Err(mut child_errors) => errors.inherit(&mut child_errors, index),
            }
        }

        errors.into_result(Value::Array(output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn compile(schema: Value) -> Result<ArrayHandler, ErrorReport> {
        let items = schema.as_array().cloned().unwrap_or_default();
        ArrayHandler::compile(&items, &Registry::new())
    }

    #[test]
    fn test_homogeneous_list() {
        let handler = compile(json!(["int"])).unwrap();
        assert!(!handler.is_tuple());
        assert_eq!(handler.validate(&json!(["1", 2, 3.0])), Ok(json!([1, 2, 3])));
        assert_eq!(handler.validate(&json!([])), Ok(json!([])));
    }

    #[test]
    fn test_empty_schema_accepts_anything() {
        let handler = compile(json!([])).unwrap();
        assert_eq!(
            handler.validate(&json!([1, "a", null, {"b": []}])),
            Ok(json!([1, "a", null, {"b": []}]))
        );
    }

    #[test]
    fn test_tuple_out_of_bound() {
        let handler = compile(json!(["int", "string"])).unwrap();
        assert!(handler.is_tuple());
        assert_eq!(handler.validate(&json!(["1", 2])), Ok(json!([1, "2"])));

        let err = handler.validate(&json!([1, "a", true])).unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err.error_string(), "[2]: Out of bound");
    }

    #[test]
    fn test_tuple_elements_fail_independently() {
        let handler = compile(json!(["int", "int"])).unwrap();
        let err = handler.validate(&json!(["x", 1, 2])).unwrap_err();
        assert_eq!(
            err.error_string(),
            "[0]: Expected type: int; Received: \"x\"\n[2]: Out of bound"
        );
    }

    #[test]
    fn test_shorter_tuple_input_is_accepted() {
        let handler = compile(json!(["int", "string"])).unwrap();
        assert_eq!(handler.validate(&json!([7])), Ok(json!([7])));
    }

    #[test]
    fn test_rejects_non_arrays() {
        let handler = compile(json!(["int"])).unwrap();
        assert_eq!(
            handler.validate(&json!({"a": 1})).unwrap_err().error_string(),
            "Expected: array; Received: {\"a\":1}"
        );
    }

    #[test]
    fn test_nested_construction_errors_are_indexed() {
        let err = compile(json!(["int", ["bogus"], true])).unwrap_err();
        assert_eq!(
            err.error_string(),
            "[1][0]: Unknown type 'bogus'\n[2]: Invalid value; {true}"
        );
    }
}
