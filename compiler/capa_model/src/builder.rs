//! The mutable registry used while the passes run.
//!
//! Definitions are created once, mutated in place by later passes, and never
//! removed. Conversions are append-only. [`ModelBuilder::seal`] turns the
//! registry into an immutable [`Model`](crate::Model).

use capa_ir::ast::Modifier;
use capa_ir::Location;
use rustc_hash::FxHashMap;

use crate::config::ModelConfig;
use crate::conversion::ImplicitConversion;
use crate::definition::{all_methods, DefinitionLookup, TypeDefinition};
use crate::error::{DeclarationError, DeclarationErrorKind, ResolutionError};
use crate::method::{MethodDefinition, MethodTable, ReducedSignature, Signature};

/// Registry of definitions, conversions, and factory bookkeeping.
#[derive(Clone, Debug)]
pub struct ModelBuilder {
    pub(crate) config: ModelConfig,

    /// All definitions, in registration order.
    pub(crate) definitions: Vec<TypeDefinition>,

    /// Name → definition index.
    pub(crate) by_name: FxHashMap<String, usize>,

    /// Lower-cased name → definition index, for case collisions.
    by_folded_name: FxHashMap<String, usize>,

    /// Index of the entry-point class holding factory methods.
    pub(crate) factory: usize,

    pub(crate) conversions: Vec<ImplicitConversion>,

    /// Source capability name → conversion indices, in registration order.
    conversions_by_source: FxHashMap<String, Vec<usize>>,

    /// How many factory methods share each reduced signature.
    reduced_signatures: FxHashMap<ReducedSignature, usize>,
}

impl ModelBuilder {
    /// An empty registry holding only the entry-point class.
    pub fn new(config: ModelConfig) -> Self {
        let mut factory = TypeDefinition::carrier(config.factory_name.clone(), Vec::new())
            .at(Some(Location::generated("factory")));
        factory.modifiers = vec![Modifier::Public, Modifier::Final];

        let mut builder = ModelBuilder {
            config,
            definitions: Vec::new(),
            by_name: FxHashMap::default(),
            by_folded_name: FxHashMap::default(),
            factory: 0,
            conversions: Vec::new(),
            conversions_by_source: FxHashMap::default(),
            reduced_signatures: FxHashMap::default(),
        };
        builder.index(factory);
        builder
    }

    #[inline]
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    // === Definitions ===

    /// Register a definition.
    ///
    /// Names are unique, and also unique ignoring case: `Select` and
    /// `select` cannot coexist.
    pub fn define(&mut self, definition: TypeDefinition) -> Result<usize, DeclarationError> {
        if self.by_name.contains_key(&definition.name) {
            return Err(DeclarationError::new(
                DeclarationErrorKind::DuplicateName {
                    name: definition.name,
                },
                definition.location,
            ));
        }
        if let Some(&existing) = self.by_folded_name.get(&definition.name.to_lowercase()) {
            return Err(DeclarationError::new(
                DeclarationErrorKind::CaseCollision {
                    name: definition.name,
                    existing: self.definitions[existing].name.clone(),
                },
                definition.location,
            ));
        }
        tracing::trace!(name = %definition.name, kind = ?definition.kind(), "define");
        Ok(self.index(definition))
    }

    fn index(&mut self, definition: TypeDefinition) -> usize {
        let index = self.definitions.len();
        self.by_name.insert(definition.name.clone(), index);
        self.by_folded_name
            .insert(definition.name.to_lowercase(), index);
        self.definitions.push(definition);
        index
    }

    /// Whether `name` could be defined without a duplicate or case
    /// collision.
    pub fn is_available(&self, name: &str) -> bool {
        !self.by_folded_name.contains_key(&name.to_lowercase())
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    #[inline]
    pub fn get(&self, index: usize) -> &TypeDefinition {
        &self.definitions[index]
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> &mut TypeDefinition {
        &mut self.definitions[index]
    }

    /// Definitions in registration order.
    pub fn definitions(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// The entry-point class.
    pub fn factory(&self) -> &TypeDefinition {
        &self.definitions[self.factory]
    }

    /// Full method set of the named definition, or `None` if absent.
    pub fn all_methods(&self, name: &str) -> Option<Result<MethodTable, ResolutionError>> {
        let definition = self.definition(name)?;
        Some(all_methods(self, definition))
    }

    // === Factory methods ===

    /// Add a static factory method to the entry-point class and record its
    /// reduced signature.
    pub fn add_factory_method(&mut self, method: MethodDefinition) -> Result<(), DeclarationError> {
        let reduced = method.signature().reduced();
        self.definitions[self.factory].add_method(method)?;
        *self.reduced_signatures.entry(reduced).or_insert(0) += 1;
        Ok(())
    }

    /// Whether a call to the factory method with `signature` needs an
    /// explicit receiver cast, i.e. another factory method shares its
    /// reduced signature.
    pub fn needs_cast(&self, signature: &Signature) -> bool {
        self.reduced_signatures
            .get(&signature.reduced())
            .is_some_and(|&count| count > 1)
    }

    // === Conversions ===

    pub fn add_conversion(&mut self, conversion: ImplicitConversion) -> usize {
        let index = self.conversions.len();
        self.conversions_by_source
            .entry(conversion.source.qualified_name())
            .or_default()
            .push(index);
        self.conversions.push(conversion);
        index
    }

    #[inline]
    pub fn conversion(&self, index: usize) -> &ImplicitConversion {
        &self.conversions[index]
    }

    pub fn conversions(&self) -> &[ImplicitConversion] {
        &self.conversions
    }

    /// Conversions whose source is the named capability, in registration
    /// order.
    pub fn conversions_from(&self, source: &str) -> &[usize] {
        self.conversions_by_source
            .get(source)
            .map_or(&[], Vec::as_slice)
    }
}

impl DefinitionLookup for ModelBuilder {
    fn definition(&self, name: &str) -> Option<&TypeDefinition> {
        self.index_of(name).map(|index| &self.definitions[index])
    }
}
