//! Registries of the named building blocks a leaf schema refers to
//!
//! A leaf such as `"string@str_lower@str_range(1,32)"` names a primitive
//! type and a chain of transforms. Both are looked up here while a schema is
//! compiled. Registries are plain values so that tests and embedders can
//! build isolated ones; [`Registry::global`] is the process-wide default used
//! by [`Validator::new`](crate::Validator::new).
//!
//! # Module Organization
//!
//! - [`types`] - Primitive type registry and the built-in coercions
//! - [`transforms`] - Transform trait, registry and expression instantiation
//! - [`built_in`] - Built-in range checks and case transforms
//! - [`coerce`] - Loose conversion rules shared by the built-ins
//!
//! Copyright (c) 2025 Dataval Team
//! Licensed under the Apache-2.0 license

pub mod built_in;
pub mod coerce;
pub mod transforms;
pub mod types;

pub use transforms::{Transform, TransformFactory, TransformRegistry};
pub use types::{type_handler, CheckError, TypeEntry, TypeHandler, TypeRegistry, NULL_TYPE};

use std::sync::{OnceLock, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;

/// Characters with a meaning in the leaf grammar
const RESERVED_CHARS: [char; 5] = ['|', '@', '(', ')', ','];

/// Errors raised when extending a registry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Name is empty
    #[error("Registry name must not be empty")]
    EmptyName,

    /// Name has leading or trailing whitespace
    #[error("Registry name '{name}' must not have surrounding whitespace")]
    SurroundingWhitespace { name: String },

    /// Name contains a character of the leaf grammar
    #[error("Registry name '{name}' contains reserved character '{character}'")]
    ReservedCharacter { name: String, character: char },
}

/// Check that `name` can be written inside a leaf schema
pub(crate) fn validate_name(name: &str) -> Result<(), RegistryError> {
    if name.is_empty() {
        return Err(RegistryError::EmptyName);
    }
    if name.trim() != name {
        return Err(RegistryError::SurroundingWhitespace {
            name: name.to_string(),
        });
    }
    if let Some(character) = name.chars().find(|c| RESERVED_CHARS.contains(c)) {
        return Err(RegistryError::ReservedCharacter {
            name: name.to_string(),
            character,
        });
    }
    Ok(())
}

/// Type and transform lookup tables used to compile schemas
#[derive(Debug, Clone, Default)]
pub struct Registry {
    pub types: TypeRegistry,
    pub transforms: TransformRegistry,
}

impl Registry {
    /// Registry holding every built-in type and transform
    pub fn new() -> Self {
        Self {
            types: TypeRegistry::new(),
            transforms: TransformRegistry::new(),
        }
    }

    /// Registry holding nothing
    pub fn empty() -> Self {
        Self {
            types: TypeRegistry::empty(),
            transforms: TransformRegistry::empty(),
        }
    }

    /// The process-wide registry, initialised with the built-ins on first use
    pub fn global() -> &'static RwLock<Registry> {
        static GLOBAL: OnceLock<RwLock<Registry>> = OnceLock::new();
        GLOBAL.get_or_init(|| RwLock::new(Registry::new()))
    }

    /// Shared access to the global registry
    pub fn read_global() -> RwLockReadGuard<'static, Registry> {
        // Writers only ever perform single inserts
        Self::global().read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Exclusive access to the global registry
    pub fn write_global() -> RwLockWriteGuard<'static, Registry> {
        Self::global().write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
