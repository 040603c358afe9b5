//! The sealed, read-only model handed to the emitter.
//!
//! [`ModelBuilder::seal`] orders every definition so that each comes after
//! the definitions it extends or implements, resolves every full method set
//! once more, and freezes the result. Nothing in a [`Model`] can be mutated.

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;

use std::collections::BTreeSet;

use capa_ir::ast::Modifier;
use capa_ir::DependencySort;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::builder::ModelBuilder;
use crate::config::ModelConfig;
use crate::conversion::ImplicitConversion;
use crate::definition::{all_methods, is_effectively_abstract, DefinitionLookup, TypeDefinition};
use crate::error::ModelError;
use crate::method::MethodTable;

/// Immutable snapshot of every definition, in emission order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Model {
    config: ModelConfig,
    /// Definitions in registration order.
    definitions: Vec<TypeDefinition>,
    /// Full method set of each definition, parallel to `definitions`.
    resolved: Vec<MethodTable>,
    by_name: FxHashMap<String, usize>,
    /// Emission order, as indices into `definitions`.
    order: Vec<usize>,
    conversions: Vec<ImplicitConversion>,
    factory: usize,
}

impl ModelBuilder {
    /// Order, validate, and freeze the registry.
    ///
    /// A definition depends on every definition it names in its `extends`
    /// or `implements` clauses. A cycle among them is a structural error.
    #[tracing::instrument(level = "debug", skip_all, fields(definitions = self.len()))]
    pub fn seal(self) -> Result<Model, ModelError> {
        let mut sort = DependencySort::new();
        for definition in &self.definitions {
            let dependencies: Vec<String> = definition
                .ancestors()
                .into_iter()
                .map(|(reference, _)| reference.qualified_name())
                .filter(|name| self.by_name.contains_key(name))
                .collect();
            sort.add(definition.name.clone(), dependencies);
        }
        let names = sort.sort()?;
        let order: Vec<usize> = names
            .iter()
            .filter_map(|name| self.by_name.get(name).copied())
            .collect();

        let resolved = self
            .definitions
            .iter()
            .map(|definition| all_methods(&self, definition))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(definitions = order.len(), "model sealed");
        Ok(Model {
            config: self.config,
            definitions: self.definitions,
            resolved,
            by_name: self.by_name,
            order,
            conversions: self.conversions,
            factory: self.factory,
        })
    }
}

impl Model {
    #[inline]
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Definitions in emission order: every definition after the ones it
    /// extends or implements, ties in registration order.
    pub fn definitions(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.order.iter().map(|&index| &self.definitions[index])
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// The entry-point class holding every factory method.
    pub fn factory(&self) -> &TypeDefinition {
        &self.definitions[self.factory]
    }

    pub fn conversions(&self) -> &[ImplicitConversion] {
        &self.conversions
    }

    /// Full method set of the named definition.
    pub fn all_methods(&self, name: &str) -> Option<&MethodTable> {
        self.by_name.get(name).map(|&index| &self.resolved[index])
    }

    /// Whether the named definition must be emitted abstract: declared so,
    /// or left with an abstract method after resolution.
    pub fn is_abstract(&self, name: &str) -> bool {
        let Some(&index) = self.by_name.get(name) else {
            return false;
        };
        let definition = &self.definitions[index];
        definition.has_modifier(Modifier::Abstract)
            || is_effectively_abstract(&self.resolved[index])
    }

    /// Import lines of the named definition: its own, plus those of every
    /// definition it extends or implements, transitively. Inherited and
    /// synthesized methods mention the same types their origin does.
    pub fn imports(&self, name: &str) -> BTreeSet<&str> {
        let mut out = BTreeSet::new();
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let mut pending = vec![name.to_string()];
        while let Some(current) = pending.pop() {
            let Some(definition) = self.definition(&current) else {
                continue;
            };
            if !seen.insert(definition.name.as_str()) {
                continue;
            }
            out.extend(definition.imports.iter().map(String::as_str));
            pending.extend(
                definition
                    .ancestors()
                    .into_iter()
                    .map(|(reference, _)| reference.qualified_name()),
            );
        }
        out
    }
}

impl DefinitionLookup for Model {
    fn definition(&self, name: &str) -> Option<&TypeDefinition> {
        self.by_name.get(name).map(|&index| &self.definitions[index])
    }
}
