//! Transform registry
//!
//! A transform runs after a leaf's type check and either rewrites the
//! coerced value or rejects it. Transforms are written in a leaf schema as
//! `name` or `name(arg,arg)`. Stateless transforms are registered once and
//! shared by every leaf; configurable ones are built fresh for each
//! invocation and receive the raw argument strings through
//! [`Transform::setup`].
//!
//! Copyright (c) 2025 Dataval Team
//! Licensed under the Apache-2.0 license

use super::built_in;
use super::{validate_name, RegistryError};
use crate::schema::{parse_transform_call, TransformCall};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A post-type-check step of a leaf
pub trait Transform: fmt::Debug + Send + Sync {
    /// Configure the instance from the raw arguments of its invocation
    fn setup(&mut self, _args: &[String]) -> Result<(), String> {
        Ok(())
    }

    /// Check or rewrite an already coerced value
    fn exec(&self, value: Value) -> Result<Value, String>;
}

/// Constructor of fresh, not yet configured transform instances
pub type TransformConstructor = Arc<dyn Fn() -> Box<dyn Transform> + Send + Sync>;

/// How a registered transform is turned into an instance
#[derive(Clone)]
pub enum TransformFactory {
    /// One instance serves every invocation; arguments are ignored
    Shared(Arc<dyn Transform>),
    /// Every invocation builds and configures its own instance
    Configurable(TransformConstructor),
}

impl TransformFactory {
    pub fn shared<T: Transform + 'static>(transform: T) -> Self {
        TransformFactory::Shared(Arc::new(transform))
    }

    /// Factory building `T::default()` and configuring it per invocation
    pub fn configurable<T: Transform + Default + 'static>() -> Self {
        TransformFactory::Configurable(Arc::new(|| Box::new(T::default())))
    }

    pub fn from_fn<F>(constructor: F) -> Self
    where
        F: Fn() -> Box<dyn Transform> + Send + Sync + 'static,
    {
        TransformFactory::Configurable(Arc::new(constructor))
    }

    /// Whether invocations take arguments
    pub fn is_configurable(&self) -> bool {
        matches!(self, TransformFactory::Configurable(_))
    }

    /// Produce a ready-to-run instance for the given arguments
    pub fn build(&self, args: &[String]) -> Result<Arc<dyn Transform>, String> {
        match self {
            TransformFactory::Shared(transform) => Ok(Arc::clone(transform)),
            TransformFactory::Configurable(constructor) => {
                let mut transform = constructor();
                transform.setup(args)?;
                Ok(Arc::from(transform))
            }
        }
    }
}

impl fmt::Debug for TransformFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformFactory::Shared(transform) => {
                f.debug_tuple("Shared").field(transform).finish()
            }
            TransformFactory::Configurable(_) => f.write_str("Configurable"),
        }
    }
}

/// Named transforms available to leaf schemas
#[derive(Clone)]
pub struct TransformRegistry {
    factories: HashMap<String, TransformFactory>,
}

impl TransformRegistry {
    /// Registry holding every built-in transform
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for (name, factory) in built_in::built_in_transforms() {
            registry.factories.insert(name.to_string(), factory);
        }
        registry
    }

    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    pub fn has(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&TransformFactory> {
        self.factories.get(name)
    }

    /// Registered names in sorted order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Parse and instantiate a single expression such as `"num_range(0,10)"`
    pub fn gen(&self, expr: &str) -> Result<Arc<dyn Transform>, String> {
        let call = parse_transform_call(expr).map_err(|e| e.to_string())?;
        self.instantiate(&call)
    }

    /// Instantiate an already parsed invocation
    pub fn instantiate(&self, call: &TransformCall) -> Result<Arc<dyn Transform>, String> {
        let factory = self
            .factories
            .get(&call.name)
            .ok_or_else(|| format!("Unknown transform: {}", call.name))?;
        factory.build(&call.args)
    }

    /// Register or overwrite a transform
    pub fn try_add(&mut self, name: &str, factory: TransformFactory) -> Result<(), RegistryError> {
        validate_name(name)?;
        if self.factories.contains_key(name) {
            tracing::debug!(transform = name, "Overwriting registered transform");
        }
        self.factories.insert(name.to_string(), factory);
        Ok(())
    }

    /// Register or overwrite a stateless transform shared by every leaf
    pub fn try_add_shared(
        &mut self,
        name: &str,
        transform: Arc<dyn Transform>,
    ) -> Result<(), RegistryError> {
        self.try_add(name, TransformFactory::Shared(transform))
    }

    /// Like [`try_add`](Self::try_add), reporting a rejected name through the log
    pub fn add(&mut self, name: &str, factory: TransformFactory) -> bool {
        match self.try_add(name, factory) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(transform = name, error = %e, "Transform registration rejected");
                false
            }
        }
    }

    pub fn add_shared(&mut self, name: &str, transform: Arc<dyn Transform>) -> bool {
        self.add(name, TransformFactory::Shared(transform))
    }
}

impl Default for TransformRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TransformRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformRegistry")
            .field("transforms", &self.names())
            .finish()
    }
}
