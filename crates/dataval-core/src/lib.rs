//! Dataval Core - Declarative validation and coercion of structured data
//!
//! A schema is plain JSON: objects describe keyed records, arrays describe
//! lists or tuples, and strings name the primitive types a value may have,
//! optionally followed by a chain of transforms. Validating an input either
//! returns its canonical form, with every primitive coerced, or a report of
//! every failure annotated with the path to the failing node.
//!
//! # Main Components
//!
//! - **Validator**: compiles a schema once and validates many inputs
//! - **Registry**: pluggable primitive types and transforms
//! - **Schema**: leaf expression grammar and its parser
//! - **Error Handling**: path-annotated [`ErrorReport`]
//!
//! # Example
//!
//! ```
//! use dataval_core::Validator;
//! use serde_json::json;
//!
//! let validator = Validator::new(&json!({
//!     "name": "string@str_title",
//!     "age": "unsigned@num_range(0,150)",
//!     "?email": "email|null",
//!     "tags": ["string@str_lower"],
//! }));
//! assert!(validator.is_initialized());
//!
//! let value = validator
//!     .validate(&json!({"name": "ada lovelace", "age": "36", "tags": ["Math"]}))
//!     .unwrap();
//! assert_eq!(value, json!({"name": "Ada Lovelace", "age": 36, "tags": ["math"]}));
//!
//! let errors = validator.validate(&json!({"name": "x", "age": -1})).unwrap_err();
//! assert_eq!(
//!     errors.error_string(),
//!     "[age]: Expected type: unsigned; Received: -1\n[tags]: Missing"
//! );
//! ```
//!
//! Copyright (c) 2025 Dataval Team
//! Licensed under the Apache-2.0 license

pub mod error;
pub mod handler;
pub mod registry;
pub mod schema;
pub mod validator;

pub use error::{ErrorRecord, ErrorReport, Path, PathSegment};
pub use handler::{compile_node, Node};
pub use registry::{
    type_handler, CheckError, Registry, RegistryError, Transform, TransformFactory,
    TransformRegistry, TypeEntry, TypeHandler, TypeRegistry,
};
pub use schema::{parse_leaf, LeafSpec, ParseError, SchemaNode, TransformCall};
pub use validator::{Validator, NOT_INITIALISED};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
