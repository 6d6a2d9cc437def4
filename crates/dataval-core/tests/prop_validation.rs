//! Property-based tests for the validation engine
//!
//! These tests verify invariants that should hold for all inputs: canonical
//! values validate to themselves, and error paths point at the exact node
//! that failed.

use dataval_core::{parse_leaf, ErrorRecord, Validator};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

/// Strategy for scalar JSON values
fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        (-(1i64 << 53)..=(1i64 << 53)).prop_map(Value::from),
        (-1.0e9f64..1.0e9).prop_map(Value::from),
        "[a-zA-Z0-9 .,_-]{0,24}".prop_map(Value::from),
    ]
}

/// Strategy for leaf schemas built from built-in types
fn leaf_strategy() -> impl Strategy<Value = String> {
    let types = prop::sample::select(vec!["any", "float", "num", "int", "unsigned", "string"]);
    let transforms = prop::sample::select(vec![
        "",
        "@to_str",
        "@to_str@str_upper",
        "@num_range(-100,100)",
    ]);
    let chained = (types, any::<bool>(), transforms).prop_map(|(ty, nullable, transform)| {
        let nullable = if nullable { "|null" } else { "" };
        format!("{}{}{}", ty, nullable, transform)
    });
    let bare = prop::sample::select(vec!["bool", "bool|null", "timestamp", "timestamp|null"])
        .prop_map(String::from);
    prop_oneof![chained, bare]
}

proptest! {
    #[test]
    fn prop_canonical_values_are_fixed_points(
        leaf in leaf_strategy(),
        values in prop::collection::vec(scalar_strategy(), 0..8),
    ) {
        let validator = Validator::new(&json!([leaf]));
        prop_assume!(validator.is_initialized());

        if let Ok(canonical) = validator.validate(&Value::Array(values)) {
            prop_assert_eq!(validator.validate(&canonical), Ok(canonical.clone()));
        }
    }

    #[test]
    fn prop_integer_strings_coerce_to_integers(n in any::<i32>()) {
        let validator = Validator::new(&json!({"n": "int"}));
        prop_assert_eq!(validator.validate(&json!({"n": n.to_string()})), Ok(json!({"n": n})));
        prop_assert_eq!(validator.validate(&json!({"n": n})), Ok(json!({"n": n})));
    }

    #[test]
    fn prop_missing_keys_are_reported_by_name(
        keys in prop::collection::btree_set("[a-z]{1,8}", 1..6),
        present in prop::collection::vec(any::<bool>(), 6),
    ) {
        let schema: Map<String, Value> = keys.iter().map(|k| (k.clone(), json!("any"))).collect();
        let validator = Validator::new(&Value::Object(schema));

        let mut input = Map::new();
        let mut missing = Vec::new();
        for (key, is_present) in keys.iter().zip(present) {
            if is_present {
                input.insert(key.clone(), json!(1));
            } else {
                missing.push(ErrorRecord::at(key.as_str(), "Missing"));
            }
        }

        match validator.validate(&Value::Object(input)) {
            Ok(_) => prop_assert!(missing.is_empty()),
            Err(errors) => prop_assert_eq!(errors.errors().unwrap(), &missing[..]),
        }
    }

    #[test]
    fn prop_tuple_overflow_is_reported_at_its_index(len in 2usize..8) {
        let validator = Validator::new(&Value::Array(vec![json!("int"); len]));
        let input: Vec<Value> = (0..=len).map(|i| json!(i)).collect();
        let errors = validator.validate(&Value::Array(input)).unwrap_err();
        prop_assert_eq!(errors.errors().unwrap(), &[ErrorRecord::at(len, "Out of bound")][..]);
    }

    #[test]
    fn prop_leaf_parser_never_panics(input in ".{0,40}") {
        let _ = parse_leaf(&input);
        let _ = Validator::new(&json!([input]));
    }
}
