//! Leaf handler: `"type|type|null@transform@transform(args)"`
//!
//! Copyright (c) 2025 Dataval Team
//! Licensed under the Apache-2.0 license

use crate::error::{ErrorRecord, ErrorReport};
use crate::registry::{coerce, CheckError, Registry, Transform, TypeEntry};
use crate::schema::LeafParser;
use serde_json::Value;
use std::sync::Arc;

/// Outcome of trying the candidate types
enum TypeMatch {
    /// Nullable leaf short-circuited on a null-equivalent input
    Null,
    /// A type accepted the input and produced this value
    Coerced(Value),
    /// Nothing accepted the input
    Rejected,
}

/// Compiled leaf schema
///
/// Type entries are resolved while compiling, so later registry changes do
/// not affect an already compiled leaf.
#[derive(Debug)]
pub struct LeafHandler {
    /// Candidate types in declaration order
    types: Vec<(String, TypeEntry)>,
    nullable: bool,
    /// Decides null-equivalence for nullable leaves
    null_entry: TypeEntry,
    transforms: Vec<Arc<dyn Transform>>,
    /// `Expected type: a|b|null`
    expected: String,
}

impl LeafHandler {
    pub fn compile(spec: &str, registry: &Registry) -> Result<Self, ErrorReport> {
        let (leaf, parse_error) = LeafParser::new(spec).parse_partial();

        let candidates = leaf.candidates();
        if candidates.is_empty() {
            return Err(ErrorRecord::new("Type is missing").into());
        }

        let mut errors = ErrorReport::new();

        let mut transforms = Vec::with_capacity(leaf.transforms.len());
        for call in &leaf.transforms {
            match registry.transforms.instantiate(call) {
                Ok(transform) => transforms.push(transform),
                Err(message) => errors.push(message),
            }
        }
        if let Some(err) = parse_error {
            errors.push(err.to_string());
        }

        let mut types = Vec::with_capacity(candidates.len());
        for name in candidates {
            match registry.types.get(name) {
                Some(entry) => types.push((name.to_string(), entry.clone())),
                None => errors.push(
                    CheckError::UnknownType {
                        name: name.to_string(),
                    }
                    .to_string(),
                ),
            }
        }

        errors.into_result(Self {
            types,
            nullable: leaf.nullable,
            null_entry: registry.types.null_entry(),
            transforms,
            expected: format!("Expected type: {}", leaf.expected()),
        })
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Candidate type names in the order they are tried
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.iter().map(|(name, _)| name.as_str())
    }

    /// Coerce `value` and run the transform chain; exactly one error on failure
    pub fn validate(&self, value: &Value) -> Result<Value, ErrorReport> {
        let coerced = match self.match_type(value) {
            TypeMatch::Null => return Ok(Value::Null),
            TypeMatch::Coerced(coerced) => coerced,
            TypeMatch::Rejected => {
                return Err(ErrorRecord::new(format!(
                    "{}; Received: {}",
                    self.expected,
                    coerce::serialize(value)
                ))
                .into());
            }
        };

        self.transforms
            .iter()
            .try_fold(coerced, |current, transform| transform.exec(current))
            .map_err(|message| ErrorRecord::new(message).into())
    }

    fn match_type(&self, value: &Value) -> TypeMatch {
        for (_, entry) in &self.types {
            if self.nullable && !entry.null_check_post && self.is_null(value) {
                return TypeMatch::Null;
            }
            if let Some(coerced) = entry.coerce(value) {
                return TypeMatch::Coerced(coerced);
            }
            // Types checking null afterwards end the search on a null input
            if self.nullable && entry.null_check_post && self.is_null(value) {
                return TypeMatch::Rejected;
            }
        }
        TypeMatch::Rejected
    }

    fn is_null(&self, value: &Value) -> bool {
        self.null_entry.coerce(value).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::type_handler;
    use serde_json::json;

    fn leaf(spec: &str) -> LeafHandler {
        LeafHandler::compile(spec, &Registry::new()).unwrap()
    }

    fn compile_error(spec: &str) -> String {
        LeafHandler::compile(spec, &Registry::new())
            .unwrap_err()
            .error_string()
    }

    #[test]
    fn test_coerces_to_canonical_value() {
        assert_eq!(leaf("int").validate(&json!("5")), Ok(json!(5)));
        assert_eq!(leaf("int").validate(&json!(5)), Ok(json!(5)));
        assert_eq!(leaf("bool").validate(&json!(0)), Ok(json!(false)));
    }

    #[test]
    fn test_nullable_leaf() {
        let handler = leaf("int|null");
        assert!(handler.is_nullable());
        assert_eq!(handler.validate(&json!(null)), Ok(json!(null)));
        assert_eq!(handler.validate(&json!("")), Ok(json!(null)));
        assert_eq!(
            handler.validate(&json!("abc")).unwrap_err().error_string(),
            "Expected type: int|null; Received: \"abc\""
        );
    }

    #[test]
    fn test_null_only_leaf() {
        let handler = leaf("null");
        assert_eq!(handler.validate(&json!("NULL")), Ok(json!(null)));
        assert_eq!(
            handler.validate(&json!(1)).unwrap_err().error_string(),
            "Expected type: null; Received: 1"
        );
    }

    #[test]
    fn test_alternatives_tried_in_order() {
        let handler = leaf("int|string");
        assert_eq!(handler.type_names().collect::<Vec<_>>(), vec!["int", "string"]);
        assert_eq!(handler.validate(&json!("7")), Ok(json!(7)));
        assert_eq!(handler.validate(&json!("seven")), Ok(json!("seven")));
    }

    #[test]
    fn test_transform_chain() {
        let handler = leaf("string@str_lower@str_range(1,5)");
        assert_eq!(handler.validate(&json!("ABC")), Ok(json!("abc")));
        assert_eq!(
            handler.validate(&json!("ABCDEF")).unwrap_err().error_string(),
            "Expected strlen [1, 5]"
        );
    }

    #[test]
    fn test_transforms_skipped_for_null_short_circuit() {
        let handler = leaf("string|null@str_range(1,5)");
        assert_eq!(handler.validate(&json!(null)), Ok(json!(null)));
    }

    #[test]
    fn test_num_range_after_int() {
        let handler = leaf("int@num_range(0,10)");
        assert_eq!(handler.validate(&json!(10)), Ok(json!(10)));
        let err = handler.validate(&json!(11)).unwrap_err();
        assert_eq!(err.len(), 1);
        assert!(err.error_string().contains("[0, 10]"));
    }

    #[test]
    fn test_compile_errors() {
        assert_eq!(compile_error(""), "Type is missing");
        assert_eq!(compile_error("|@str_lower"), "Type is missing");
        assert_eq!(compile_error("integer"), "Unknown type 'integer'");
        assert_eq!(
            compile_error("integer|word@nope"),
            "Unknown transform: nope\nUnknown type 'integer'\nUnknown type 'word'"
        );
        assert_eq!(compile_error("int@num_range(,)"), "Invalid NumRange range values");
        assert!(compile_error("int@num_range(1").starts_with("Invalid transform expression;"));
    }

    #[test]
    fn test_malformed_transform_still_resolves_types() {
        assert_eq!(
            compile_error("bogus@nope@num_range(1"),
            [
                "Unknown transform: nope",
                "Invalid transform expression; num_range(1 \
                 (unterminated argument list starting at position 20)",
                "Unknown type 'bogus'",
            ]
            .join("\n")
        );
    }

    #[test]
    fn test_post_null_check_type_stops_on_null() {
        let mut registry = Registry::new();
        registry.types.add(
            "strict",
            type_handler(|v| v.as_str().filter(|s| s.len() > 3).map(Value::from)),
            true,
        );

        let handler = LeafHandler::compile("strict|string|null", &registry).unwrap();
        // `string` would accept "", but the null check after `strict` ends the search
        assert!(handler.validate(&json!("")).is_err());
        assert_eq!(handler.validate(&json!("long enough")), Ok(json!("long enough")));
    }

    #[test]
    fn test_registration_after_compile_does_not_leak() {
        let mut registry = Registry::new();
        let handler = LeafHandler::compile("int", &registry).unwrap();
        registry.types.add("int", type_handler(|_| Some(json!(0))), false);

        assert_eq!(handler.validate(&json!("5")), Ok(json!(5)));
        let recompiled = LeafHandler::compile("int", &registry).unwrap();
        assert_eq!(recompiled.validate(&json!("5")), Ok(json!(0)));
    }
}
