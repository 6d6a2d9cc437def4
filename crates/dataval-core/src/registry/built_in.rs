//! Built-in transforms
//!
//! Range checks take optional bounds (`num_range(,10)` has no lower bound)
//! and are configured per invocation. Case transforms and `to_str` carry no
//! state and are shared.
//!
//! Copyright (c) 2025 Dataval Team
//! Licensed under the Apache-2.0 license

use super::coerce;
use super::transforms::{Transform, TransformFactory};
use super::types::TypeRegistry;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// Name and factory of every built-in transform
pub fn built_in_transforms() -> Vec<(&'static str, TransformFactory)> {
    vec![
        ("num_range", TransformFactory::configurable::<NumRange>()),
        ("str_range", TransformFactory::configurable::<StrRange>()),
        ("str_lower", TransformFactory::shared(StrLower)),
        ("str_upper", TransformFactory::shared(StrUpper)),
        ("str_title", TransformFactory::shared(StrTitle)),
        ("to_str", TransformFactory::shared(ToStr)),
    ]
}

/// Bounds are always coerced with the built-in types, whatever is registered globally
fn bound_types() -> &'static TypeRegistry {
    static TYPES: OnceLock<TypeRegistry> = OnceLock::new();
    TYPES.get_or_init(TypeRegistry::new)
}

/// Coerce argument `index` with `types`; a missing argument is unbounded
fn bound(args: &[String], index: usize, types: &[&str]) -> Option<Option<f64>> {
    let raw = args
        .get(index)
        .map(|arg| Value::String(arg.trim().to_string()))
        .unwrap_or(Value::Null);
    match bound_types().multi_check(&raw, types).ok()? {
        Value::Null => Some(None),
        value => value.as_f64().map(Some),
    }
}

fn format_bound<T: ToString>(bound: Option<T>) -> String {
    bound.map_or_else(|| "null".to_string(), |b| b.to_string())
}

/// `num_range(min, max)`: inclusive numeric bounds
#[derive(Debug, Default, Clone, PartialEq)]
pub struct NumRange {
    min: Option<f64>,
    max: Option<f64>,
}

impl Transform for NumRange {
    fn setup(&mut self, args: &[String]) -> Result<(), String> {
        const INVALID: &str = "Invalid NumRange range values";
        let min = bound(args, 0, &["null", "float"]).ok_or(INVALID)?;
        let max = bound(args, 1, &["null", "float"]).ok_or(INVALID)?;
        match (min, max) {
            (None, None) => return Err(INVALID.to_string()),
            (Some(lo), Some(hi)) if lo > hi => return Err(INVALID.to_string()),
            _ => {}
        }
        self.min = min;
        self.max = max;
        Ok(())
    }

    fn exec(&self, value: Value) -> Result<Value, String> {
        let n = match value.as_f64() {
            Some(n) if value.is_number() => n,
            _ => return Err("NumRange expects a numeric value".to_string()),
        };
        let below = self.min.is_some_and(|min| n < min);
        let above = self.max.is_some_and(|max| n > max);
        if below || above {
            return Err(format!(
                "Expected range [{}, {}]",
                format_bound(self.min.map(coerce::format_f64)),
                format_bound(self.max.map(coerce::format_f64)),
            ));
        }
        Ok(value)
    }
}

/// `str_range(min, max)`: inclusive bounds on the character count
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StrRange {
    min: Option<usize>,
    max: Option<usize>,
}

impl Transform for StrRange {
    fn setup(&mut self, args: &[String]) -> Result<(), String> {
        const INVALID: &str = "Invalid StrRange range values";
        let min = bound(args, 0, &["null", "unsigned"]).ok_or(INVALID)?;
        let max = bound(args, 1, &["null", "unsigned"]).ok_or(INVALID)?;
        let (min, max) = (min.map(|b| b as usize), max.map(|b| b as usize));
        match (min, max) {
            (None, None) => return Err(INVALID.to_string()),
            (Some(lo), Some(hi)) if lo > hi => return Err(INVALID.to_string()),
            _ => {}
        }
        self.min = min;
        self.max = max;
        Ok(())
    }

    fn exec(&self, value: Value) -> Result<Value, String> {
        let len = match &value {
            Value::String(s) => s.chars().count(),
            _ => return Err("StrRange expects a string value".to_string()),
        };
        let below = self.min.is_some_and(|min| len < min);
        let above = self.max.is_some_and(|max| len > max);
        if below || above {
            return Err(format!(
                "Expected strlen [{}, {}]",
                format_bound(self.min),
                format_bound(self.max),
            ));
        }
        Ok(value)
    }
}

/// Apply `f` to a string value, or fail with `"<name> expects a string value"`
fn map_string<F>(name: &str, value: Value, f: F) -> Result<Value, String>
where
    F: FnOnce(&str) -> String,
{
    match value {
        Value::String(s) => Ok(Value::String(f(&s))),
        _ => Err(format!("{} expects a string value", name)),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StrLower;

impl Transform for StrLower {
    fn exec(&self, value: Value) -> Result<Value, String> {
        map_string("StrLower", value, str::to_lowercase)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StrUpper;

impl Transform for StrUpper {
    fn exec(&self, value: Value) -> Result<Value, String> {
        map_string("StrUpper", value, str::to_uppercase)
    }
}

/// Capitalise every word: first character upper case, the rest lower case
#[derive(Debug, Clone, Copy)]
pub struct StrTitle;

fn word_pattern() -> &'static Regex {
    static WORD_REGEX: OnceLock<Regex> = OnceLock::new();
    WORD_REGEX
        .get_or_init(|| Regex::new(r"[A-Za-z0-9_]\S*").expect("word pattern is a valid regex"))
}

fn title_case_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

impl Transform for StrTitle {
    fn exec(&self, value: Value) -> Result<Value, String> {
        map_string("StrTitle", value, |s| {
            word_pattern()
                .replace_all(s, |caps: &regex::Captures<'_>| title_case_word(&caps[0]))
                .into_owned()
        })
    }
}

/// Loose string conversion of any value
#[derive(Debug, Clone, Copy)]
pub struct ToStr;

impl Transform for ToStr {
    fn exec(&self, value: Value) -> Result<Value, String> {
        Ok(Value::String(coerce::to_loose_string(&value)))
    }
}
