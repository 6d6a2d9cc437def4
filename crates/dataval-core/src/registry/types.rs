//! Primitive type registry
//!
//! A type is a named coercion: it either accepts a value and returns its
//! canonical form, or rejects it. Leaf schemas such as `"int|null"` name the
//! types they accept; the registry resolves those names.
//!
//! Copyright (c) 2025 Dataval Team
//! Licensed under the Apache-2.0 license

use super::coerce;
use super::{validate_name, RegistryError};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};
use thiserror::Error;

/// Coercion function: `Some(canonical)` on success, `None` on rejection
pub type TypeHandler = Arc<dyn Fn(&Value) -> Option<Value> + Send + Sync>;

/// Wrap a closure or function as a [`TypeHandler`]
pub fn type_handler<F>(f: F) -> TypeHandler
where
    F: Fn(&Value) -> Option<Value> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Name of the type matched by null-equivalent values
pub const NULL_TYPE: &str = "null";

/// A registered type
#[derive(Clone)]
pub struct TypeEntry {
    /// When the leaf is nullable, check for null after (true) or before (false) this type
    pub null_check_post: bool,
    /// The coercion itself
    pub handler: TypeHandler,
}

impl TypeEntry {
    pub fn new(handler: TypeHandler, null_check_post: bool) -> Self {
        Self {
            null_check_post,
            handler,
        }
    }

    /// Run the coercion
    pub fn coerce(&self, value: &Value) -> Option<Value> {
        (self.handler)(value)
    }
}

impl fmt::Debug for TypeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeEntry")
            .field("null_check_post", &self.null_check_post)
            .finish_non_exhaustive()
    }
}

/// Failure of a type check
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckError {
    /// No type is registered under this name
    #[error("Unknown type '{name}'")]
    UnknownType { name: String },

    /// The type refused the value
    #[error("Value rejected by type '{name}'")]
    Rejected { name: String },

    /// None of several alternatives accepted the value
    #[error("Expected: {expected}; Received: {received}")]
    NoMatch { expected: String, received: String },
}

/// Named, pluggable value coercions
#[derive(Clone)]
pub struct TypeRegistry {
    entries: HashMap<String, TypeEntry>,
}

impl TypeRegistry {
    /// Registry holding every built-in type
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for (name, handler, null_check_post) in built_in_types() {
            registry
                .entries
                .insert(name.to_string(), TypeEntry::new(handler, null_check_post));
        }
        registry
    }

    /// Registry without any types
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn has(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&TypeEntry> {
        self.entries.get(name)
    }

    /// The null-check ordering of a type, `None` for unknown names
    pub fn null_check_post(&self, name: &str) -> Option<bool> {
        self.entries.get(name).map(|entry| entry.null_check_post)
    }

    /// Registered names in sorted order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Coerce `value` with the named type
    pub fn check(&self, name: &str, value: &Value) -> Result<Value, CheckError> {
        let entry = self.entries.get(name).ok_or_else(|| CheckError::UnknownType {
            name: name.to_string(),
        })?;
        entry.coerce(value).ok_or_else(|| CheckError::Rejected {
            name: name.to_string(),
        })
    }

    /// Try each named type in order and return the first success
    pub fn multi_check(&self, value: &Value, names: &[&str]) -> Result<Value, CheckError> {
        names
            .iter()
            .find_map(|name| self.check(name, value).ok())
            .ok_or_else(|| CheckError::NoMatch {
                expected: names.join("|"),
                received: coerce::serialize(value),
            })
    }

    /// Whether `value` is null-equivalent according to the registered `null` type
    pub fn check_null(&self, value: &Value) -> bool {
        match self.entries.get(NULL_TYPE) {
            Some(entry) => entry.coerce(value).is_some(),
            None => is_null_equivalent(value).is_some(),
        }
    }

    /// The entry deciding null-equivalence, the built-in one when `null` is unregistered
    pub fn null_entry(&self) -> TypeEntry {
        self.entries
            .get(NULL_TYPE)
            .cloned()
            .unwrap_or_else(|| TypeEntry::new(type_handler(is_null_equivalent), true))
    }

    /// Register or overwrite a type
    pub fn try_add(
        &mut self,
        name: &str,
        handler: TypeHandler,
        null_check_post: bool,
    ) -> Result<(), RegistryError> {
        validate_name(name)?;
        if self.entries.contains_key(name) {
            tracing::debug!(type_name = name, "Overwriting registered type");
        }
        self.entries
            .insert(name.to_string(), TypeEntry::new(handler, null_check_post));
        Ok(())
    }

    /// Register or overwrite a type, reporting a rejected name through the log
    pub fn add(&mut self, name: &str, handler: TypeHandler, null_check_post: bool) -> bool {
        match self.try_add(name, handler, null_check_post) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(type_name = name, error = %e, "Type registration rejected");
                false
            }
        }
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.names())
            .finish()
    }
}

fn built_in_types() -> Vec<(&'static str, TypeHandler, bool)> {
    vec![
        (NULL_TYPE, type_handler(is_null_equivalent), true),
        ("any", type_handler(|v| Some(v.clone())), false),
        ("float", type_handler(coerce_float), false),
        ("num", type_handler(coerce_float), false),
        ("int", type_handler(coerce_int), false),
        ("unsigned", type_handler(coerce_unsigned), false),
        ("bool", type_handler(|v| Some(Value::Bool(coerce::truthy(v)))), false),
        ("string", type_handler(|v| Some(Value::String(coerce::to_loose_string(v)))), false),
        ("email", type_handler(coerce_email), false),
        ("hex", type_handler(coerce_hex), false),
        ("object", type_handler(coerce_object), false),
        ("timestamp", type_handler(coerce_timestamp), false),
        ("url", type_handler(coerce_url), false),
    ]
}

fn is_null_equivalent(value: &Value) -> Option<Value> {
    if value.is_null() {
        return Some(Value::Null);
    }
    let lowered = coerce::to_loose_string(value).to_lowercase();
    if lowered.is_empty() || lowered == "null" {
        Some(Value::Null)
    } else {
        None
    }
}

fn coerce_float(value: &Value) -> Option<Value> {
    match value {
        Value::Number(_) => Some(value.clone()),
        other => coerce::to_number(other).map(coerce::number_value),
    }
}

fn coerce_int(value: &Value) -> Option<Value> {
    match coerce_float(value)? {
        Value::Number(n) if coerce::is_integral(&n) => match n.as_f64() {
            Some(f) if !n.is_i64() && !n.is_u64() => Some(coerce::number_value(f)),
            _ => Some(Value::Number(n)),
        },
        _ => None,
    }
}

fn coerce_unsigned(value: &Value) -> Option<Value> {
    coerce_int(value).filter(|v| v.as_f64().is_some_and(|f| f >= 0.0))
}

fn email_pattern() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(
            r#"(?i)^(([^<>()\[\]\.,;:\s@"]+(\.[^<>()\[\]\.,;:\s@"]+)*)|(".+"))@(([^<>()\[\]\.,;:\s@"]+\.)+[^<>()\[\]\.,;:\s@"]{2,})$"#,
        )
        .expect("email pattern is a valid regex")
    })
}

fn coerce_email(value: &Value) -> Option<Value> {
    let text = coerce::to_loose_string(value);
    email_pattern()
        .is_match(&text)
        .then_some(Value::String(text))
}

fn coerce_hex(value: &Value) -> Option<Value> {
    let text = coerce::to_loose_string(value);
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    coerce::parse_radix(&text, 16).map(coerce::number_value)
}

fn coerce_object(value: &Value) -> Option<Value> {
    match value {
        Value::Object(_) | Value::Array(_) => Some(value.clone()),
        Value::Null => None,
        other => serde_json::from_str::<Value>(&coerce::to_loose_string(other))
            .ok()
            .filter(|parsed| parsed.is_object() || parsed.is_array()),
    }
}

fn coerce_timestamp(value: &Value) -> Option<Value> {
    if let Value::Number(n) = value {
        return n
            .as_f64()
            .filter(|ms| ms.is_finite())
            .map(|ms| coerce::number_value(ms.trunc()));
    }
    let text = coerce::to_loose_string(value);
    parse_timestamp_millis(text.trim()).map(Value::from)
}

/// Epoch milliseconds for the date formats the `timestamp` type understands
pub fn parse_timestamp_millis(text: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.timestamp_millis());
    }
    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

fn coerce_url(value: &Value) -> Option<Value> {
    let text = coerce::to_loose_string(value);
    url::Url::parse(&text)
        .ok()
        .map(|parsed| Value::String(parsed.to_string()))
}
