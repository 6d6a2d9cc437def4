//! Registry listing command handler

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::output::OutputWriter;
use dataval_core::Registry;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct TypeInfo {
    name: String,
    null_check_post: bool,
}

#[derive(Debug, Serialize)]
struct TransformInfo {
    name: String,
    configurable: bool,
}

#[derive(Debug, Serialize)]
struct RegistryListing {
    types: Vec<TypeInfo>,
    transforms: Vec<TransformInfo>,
}

fn listing(registry: &Registry) -> RegistryListing {
    let types = registry
        .types
        .names()
        .into_iter()
        .map(|name| TypeInfo {
            name: name.to_string(),
            null_check_post: registry.types.null_check_post(name).unwrap_or(false),
        })
        .collect();
    let transforms = registry
        .transforms
        .names()
        .into_iter()
        .map(|name| TransformInfo {
            name: name.to_string(),
            configurable: registry
                .transforms
                .get(name)
                .is_some_and(|factory| factory.is_configurable()),
        })
        .collect();

    RegistryListing { types, transforms }
}

/// List every registered type and transform
pub fn handle_types(output: &mut OutputWriter) -> Result<()> {
    let listing = listing(&Registry::read_global());

    if output.format() != OutputFormat::Human {
        return output.data(&listing);
    }

    output.section("Types")?;
    output.table(
        &["Name", "Null check"],
        listing
            .types
            .iter()
            .map(|t| {
                let order = if t.null_check_post { "after" } else { "before" };
                vec![t.name.clone(), order.to_string()]
            })
            .collect(),
    )?;

    output.section("Transforms")?;
    output.table(
        &["Name", "Arguments"],
        listing
            .transforms
            .iter()
            .map(|t| {
                let args = if t.configurable { "yes" } else { "no" };
                vec![t.name.clone(), args.to_string()]
            })
            .collect(),
    )
}
