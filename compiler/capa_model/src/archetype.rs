//! Archetype contracts.
//!
//! An archetype marks a capability as producing a runtime value: `sql`
//! capabilities render to a `Sql` fragment, `query` capabilities to a
//! `Query<T>` carrying one value type. Each archetype contributes exactly one
//! abstract method whose name starts with the reserved prefix `$`, so it can
//! never collide with a user method.

use capa_ir::{Location, TypeParameter, TypeReference};

use crate::builder::ModelBuilder;
use crate::config::ModelConfig;
use crate::error::{DeclarationError, DeclarationErrorKind};
use crate::method::{MethodBuilder, MethodDefinition};

/// Prefix reserved for synthesized method names.
pub const RESERVED_PREFIX: &str = "$";

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ArchetypeKind {
    Sql,
    Query,
}

impl ArchetypeKind {
    /// Every kind, in declaration order.
    pub const ALL: [ArchetypeKind; 2] = [ArchetypeKind::Sql, ArchetypeKind::Query];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }

    pub fn name(self) -> &'static str {
        match self {
            ArchetypeKind::Sql => "sql",
            ArchetypeKind::Query => "query",
        }
    }

    /// Required number of type parameters on the capability.
    pub fn arity(self) -> usize {
        match self {
            ArchetypeKind::Sql => 0,
            ArchetypeKind::Query => 1,
        }
    }

    /// Name of the synthesized contract method.
    pub fn method_name(self) -> &'static str {
        match self {
            ArchetypeKind::Sql => "$sql",
            ArchetypeKind::Query => "$query",
        }
    }

    /// Simple name of the runtime type the contract method returns.
    pub fn runtime_type(self) -> &'static str {
        match self {
            ArchetypeKind::Sql => "Sql",
            ArchetypeKind::Query => "Query",
        }
    }
}

/// A validated archetype on a capability.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Archetype {
    pub kind: ArchetypeKind,
    /// The carried value type of a `query` archetype.
    pub value_type: Option<TypeParameter>,
}

impl Archetype {
    /// Validate `kind_name` against the capability's type parameters.
    pub fn new(
        capability: &str,
        kind_name: &str,
        type_params: &[TypeParameter],
        location: Option<&Location>,
    ) -> Result<Self, DeclarationError> {
        let Some(kind) = ArchetypeKind::from_name(kind_name) else {
            return Err(DeclarationError::new(
                DeclarationErrorKind::UnknownArchetype {
                    capability: capability.to_string(),
                    kind: kind_name.to_string(),
                },
                location.cloned(),
            ));
        };
        if type_params.len() != kind.arity() {
            return Err(DeclarationError::new(
                DeclarationErrorKind::ArchetypeArity {
                    capability: capability.to_string(),
                    kind: kind.name(),
                    expected: kind.arity(),
                    found: type_params.len(),
                },
                location.cloned(),
            ));
        }
        Ok(Archetype {
            kind,
            value_type: type_params.first().cloned(),
        })
    }

    /// Result type of the contract method, e.g. `Query<T>`.
    pub fn result_type(&self) -> TypeReference {
        let args = self
            .value_type
            .iter()
            .map(TypeParameter::as_argument)
            .collect();
        TypeReference::generic(self.kind.runtime_type(), args)
    }

    /// The abstract contract method for `capability`.
    pub fn synthesize(&self, capability: &str, owner_params: &[TypeParameter]) -> MethodDefinition {
        MethodBuilder::new(self.kind.method_name())
            .result(Some(self.result_type()))
            .build(capability, owner_params)
    }

    /// Import line for the runtime type.
    pub fn import(&self, config: &ModelConfig) -> String {
        format!("{}.{}", config.runtime_package, self.kind.runtime_type())
    }
}

/// Reject a user method name that uses the reserved prefix.
pub fn check_method_name(
    owner: &str,
    method: &str,
    location: Option<&Location>,
) -> Result<(), DeclarationError> {
    if method.starts_with(RESERVED_PREFIX) {
        return Err(DeclarationError::new(
            DeclarationErrorKind::ReservedPrefix {
                owner: owner.to_string(),
                method: method.to_string(),
            },
            location.cloned(),
        ));
    }
    Ok(())
}

/// Add each archetype's contract method and runtime import to its
/// capability.
///
/// Runs before any inheritance resolution so that contract methods take part
/// in conflict checks.
#[tracing::instrument(level = "debug", skip_all, fields(definitions = builder.len()))]
pub fn resolve_archetypes(builder: &mut ModelBuilder) -> Result<(), DeclarationError> {
    let config = builder.config().clone();
    let mut count = 0usize;
    for index in 0..builder.len() {
        let definition = builder.get_mut(index);
        let Some(archetype) = definition
            .as_capability()
            .and_then(|detail| detail.archetype.clone())
        else {
            continue;
        };
        let method = archetype.synthesize(&definition.name, &definition.type_params);
        definition.add_method(method)?;
        definition.add_imports([archetype.import(&config)]);
        count += 1;
    }
    tracing::debug!(count, "archetypes resolved");
    Ok(())
}
