//! The top-level validator
//!
//! A [`Validator`] is built once from an object or array schema and then
//! validates any number of inputs. Construction never panics: a schema that
//! fails to compile yields a *poisoned* validator which keeps the
//! construction errors and refuses every input.
//!
//! Copyright (c) 2025 Dataval Team
//! Licensed under the Apache-2.0 license

use crate::error::{ErrorRecord, ErrorReport};
use crate::handler::{compile_node, Node};
use crate::registry::{Registry, Transform, TransformFactory, TypeHandler};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Reported by [`Validator::validate`] on a poisoned validator
pub const NOT_INITIALISED: &str = "Validator has not been initialised";

/// Compiled schema plus the outcome of compiling it
#[derive(Debug)]
pub struct Validator {
    /// `None` when construction failed
    root: Option<Node>,
    construction_errors: ErrorReport,
}

impl Validator {
    /// Compile `schema` against the global registry
    pub fn new(schema: &Value) -> Self {
        let registry = Registry::read_global();
        Self::with_registry(schema, &registry)
    }

    /// Compile `schema` against an explicit registry
    pub fn with_registry(schema: &Value, registry: &Registry) -> Self {
        match compile_root(schema, registry) {
            Ok(root) => Self {
                root: Some(root),
                construction_errors: ErrorReport::new(),
            },
            Err(construction_errors) => {
                debug!(errors = construction_errors.len(), "Schema failed to compile");
                Self {
                    root: None,
                    construction_errors,
                }
            }
        }
    }

    /// Like [`new`](Self::new), but construction failure is an `Err`
    pub fn compile(schema: &Value) -> Result<Self, ErrorReport> {
        let registry = Registry::read_global();
        Self::compile_with(schema, &registry)
    }

    /// Like [`with_registry`](Self::with_registry), but construction failure is an `Err`
    pub fn compile_with(schema: &Value, registry: &Registry) -> Result<Self, ErrorReport> {
        compile_root(schema, registry).map(|root| Self {
            root: Some(root),
            construction_errors: ErrorReport::new(),
        })
    }

    pub fn is_initialized(&self) -> bool {
        self.root.is_some()
    }

    /// Whether construction failed
    pub fn has_errors(&self) -> bool {
        self.construction_errors.has_errors()
    }

    pub fn construction_errors(&self) -> &ErrorReport {
        &self.construction_errors
    }

    /// Construction errors rendered one per line, `null` when there are none
    pub fn error_string(&self) -> String {
        self.construction_errors.error_string()
    }

    /// Validate `value`, returning its canonical form or every error found
    ///
    /// Each call is independent; one validator may be shared across threads.
    pub fn validate(&self, value: &Value) -> Result<Value, ErrorReport> {
        let Some(root) = &self.root else {
            return Err(ErrorRecord::new(NOT_INITIALISED).into());
        };
        let result = root.validate(value);
        if let Err(errors) = &result {
            debug!(errors = errors.len(), "Validation failed");
        }
        result
    }

    /// Register a type in the global registry
    ///
    /// Only validators compiled after this call see the new type.
    pub fn add_type(name: &str, handler: TypeHandler, null_check_post: bool) -> bool {
        Registry::write_global().types.add(name, handler, null_check_post)
    }

    /// Register a configurable transform in the global registry
    pub fn add_transform(name: &str, factory: TransformFactory) -> bool {
        Registry::write_global().transforms.add(name, factory)
    }

    /// Register a stateless transform in the global registry
    pub fn add_shared_transform(name: &str, transform: Arc<dyn Transform>) -> bool {
        Registry::write_global().transforms.add_shared(name, transform)
    }
}

/// Only objects and arrays may form the root of a schema
fn compile_root(schema: &Value, registry: &Registry) -> Result<Node, ErrorReport> {
    match schema {
        Value::Object(_) | Value::Array(_) => {
            debug!("Compiling schema");
            compile_node(schema, registry)
        }
        _ => Err(ErrorRecord::new("Invalid structure").into()),
    }
}
