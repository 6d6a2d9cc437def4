//! Schema grammar
//!
//! A schema is a tree of JSON values: strings are leaves, objects map keys to
//! child schemas and arrays describe lists or tuples. Leaf strings carry a
//! small expression language (`"int|null@num_range(0,10)"`) which is parsed
//! into a [`LeafSpec`] before compilation.
//!
//! Copyright (c) 2025 Dataval Team
//! Licensed under the Apache-2.0 license

pub mod ast;
pub mod error;
pub mod parser;

pub use ast::{LeafSpec, SchemaNode, TransformCall};
pub use error::ParseError;
pub use parser::{parse_leaf, parse_transform_call, LeafParser};
