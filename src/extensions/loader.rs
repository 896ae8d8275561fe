#![cfg(feature = "extensions")]
//! Extension auto-discovery and loading via inventory pattern
//!
//! Extensions self-register by implementing ExtensionLoader and using
//! inventory::submit! macro. No cfg attributes needed.

use crate::error::Result;
use crate::extensions::registry::{
    AggregateRegistry, FunctionRegistry, OperatorClassRegistry, OperatorRegistry, TypeRegistry,
};

/// Trait for self-registering extensions
pub trait ExtensionLoader: Send + Sync {
    /// Extension name (e.g., "complex", "vector", "jsonb")
    fn name(&self) -> &str;

    /// Load types into registry
    fn load_types(&self, _registry: &mut TypeRegistry) {}

    /// Load operators into registry
    fn load_operators(&self, _registry: &mut OperatorRegistry) {}

    /// Load functions into registry
    fn load_functions(&self, _registry: &mut FunctionRegistry) {}

    /// Load aggregates into registry
    fn load_aggregates(&self, _registry: &mut AggregateRegistry) {}

    /// Load operator classes into registry. Runs after every extension's
    /// operators are loaded, so class validation can resolve operators
    /// across extensions.
    fn load_operator_classes(
        &self,
        _registry: &mut OperatorClassRegistry,
        _types: &TypeRegistry,
        _operators: &OperatorRegistry,
    ) -> Result<()> {
        Ok(())
    }
}

inventory::collect!(&'static dyn ExtensionLoader);

/// Load all registered extensions into registries
///
/// If `enabled_names` is provided, only load extensions matching those names.
/// If `enabled_names` is None, load all registered extensions.
pub fn load_all_extensions(
    type_registry: &mut TypeRegistry,
    operator_registry: &mut OperatorRegistry,
    function_registry: &mut FunctionRegistry,
    aggregate_registry: &mut AggregateRegistry,
    operator_class_registry: &mut OperatorClassRegistry,
    enabled_names: Option<&[String]>,
) -> Result<()> {
    for loader in inventory::iter::<&'static dyn ExtensionLoader>() {
        if !is_enabled(*loader, enabled_names) {
            tracing::debug!("Skipping disabled extension: {}", loader.name());
            continue;
        }

        tracing::info!("Loading extension: {}", loader.name());
        loader.load_types(type_registry);
        loader.load_operators(operator_registry);
        loader.load_functions(function_registry);
        loader.load_aggregates(aggregate_registry);
    }

    // Second pass: every extension's operators are registered by now, so
    // operator class validation can see all of them
    for loader in inventory::iter::<&'static dyn ExtensionLoader>() {
        if !is_enabled(*loader, enabled_names) {
            continue;
        }
        loader.load_operator_classes(operator_class_registry, type_registry, operator_registry)?;
    }

    Ok(())
}

fn is_enabled(loader: &dyn ExtensionLoader, enabled_names: Option<&[String]>) -> bool {
    match enabled_names {
        Some(enabled) => enabled.iter().any(|name| name == loader.name()),
        None => true,
    }
}
