//! Capability and carrier definitions.
//!
//! Both kinds share one [`TypeDefinition`] shape; what differs is the
//! kind-specific [`TypeDetail`] and the [`KindPolicy`] applied to methods a
//! definition inherits. The policy is a table lookup on [`DefinitionKind`],
//! not an overridden hook.
//!
//! # Method resolution
//!
//! [`all_methods`] computes the full method set of a definition: its own
//! methods, then every ancestor's full set with the ancestor's type
//! parameters replaced by the arguments written at the extension site.

mod inherit;

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;

use std::collections::BTreeSet;

use capa_ir::ast::Modifier;
use capa_ir::{Location, TypeArgument, TypeParameter, TypeReference};

use crate::archetype::Archetype;
use crate::error::{DeclarationError, DeclarationErrorKind};
use crate::method::{Access, MethodBody, MethodDefinition, MethodFlags, MethodTable, Signature};

pub use inherit::{all_methods, is_effectively_abstract, resolve_reference};

/// Read access to definitions by name, shared by the builder and the sealed
/// model.
pub trait DefinitionLookup {
    fn definition(&self, name: &str) -> Option<&TypeDefinition>;
}

// === Kind policy ===

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum DefinitionKind {
    Capability,
    Carrier,
}

/// Access given to an inherited method.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum AccessRule {
    AlwaysPublic,
    /// Package access becomes public; other levels are kept.
    PromotePackage,
}

/// Abstractness given to an inherited method.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum AbstractRule {
    Always,
    Preserve,
}

/// How a kind of definition treats what it inherits.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct KindPolicy {
    pub keyword: &'static str,
    pub access: AccessRule,
    pub abstractness: AbstractRule,
}

static CAPABILITY_POLICY: KindPolicy = KindPolicy {
    keyword: "interface",
    access: AccessRule::AlwaysPublic,
    abstractness: AbstractRule::Always,
};

static CARRIER_POLICY: KindPolicy = KindPolicy {
    keyword: "class",
    access: AccessRule::PromotePackage,
    abstractness: AbstractRule::Preserve,
};

impl DefinitionKind {
    pub fn policy(self) -> &'static KindPolicy {
        match self {
            DefinitionKind::Capability => &CAPABILITY_POLICY,
            DefinitionKind::Carrier => &CARRIER_POLICY,
        }
    }

    /// Noun used in messages.
    pub fn describe(self) -> &'static str {
        match self {
            DefinitionKind::Capability => "capability",
            DefinitionKind::Carrier => "carrier",
        }
    }
}

impl KindPolicy {
    /// Apply the policy to a method just derived from an ancestor and tag it
    /// not-yet-narrowed if it ends up abstract.
    pub fn apply(&self, method: &mut MethodDefinition) {
        match self.access {
            AccessRule::AlwaysPublic => method.set_access(Access::Public),
            AccessRule::PromotePackage => {
                if method.access() == Access::Package {
                    method.set_access(Access::Public);
                }
            }
        }
        if self.abstractness == AbstractRule::Always && !method.is_abstract() {
            method.set_body(MethodBody::Abstract);
        }
        if method.is_abstract() {
            method.insert_flags(MethodFlags::NOT_YET_NARROWED);
        }
    }
}

// === Kind details ===

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CapabilityDetail {
    pub extends: Vec<TypeReference>,
    pub archetype: Option<Archetype>,
    /// Signatures (in this capability's own terms) a conversion may delegate.
    pub delegable: BTreeSet<Signature>,
}

/// A capability a carrier implements.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImplementedCapability {
    pub reference: TypeReference,
    /// Lower wins when conversion paths compete.
    pub priority: u32,
    /// Index of the conversion that reached it; `None` if declared directly.
    pub via: Option<usize>,
}

/// A field of a composite carrier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Component {
    pub name: String,
    pub ty: TypeReference,
}

/// What a composite carrier was synthesized from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Composite {
    /// Factory method building it.
    pub factory: String,
    pub components: Vec<Component>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CarrierDetail {
    pub superclass: Option<TypeReference>,
    pub implements: Vec<ImplementedCapability>,
    pub composite: Option<Composite>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeDetail {
    Capability(CapabilityDetail),
    Carrier(CarrierDetail),
}

// === Type definition ===

/// A capability or carrier in the registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeDefinition {
    pub name: String,
    pub modifiers: Vec<Modifier>,
    pub type_params: Vec<TypeParameter>,
    /// Directly declared (and later synthesized) methods.
    pub methods: MethodTable,
    /// Import lines; merge-only.
    pub imports: BTreeSet<String>,
    /// Declarations copied verbatim into the output.
    pub passthrough: Vec<String>,
    pub doc: Option<String>,
    pub location: Option<Location>,
    pub detail: TypeDetail,
}

impl TypeDefinition {
    pub fn capability(name: impl Into<String>, type_params: Vec<TypeParameter>) -> Self {
        Self::with_detail(name, type_params, TypeDetail::Capability(CapabilityDetail::default()))
    }

    pub fn carrier(name: impl Into<String>, type_params: Vec<TypeParameter>) -> Self {
        Self::with_detail(name, type_params, TypeDetail::Carrier(CarrierDetail::default()))
    }

    fn with_detail(name: impl Into<String>, type_params: Vec<TypeParameter>, detail: TypeDetail) -> Self {
        TypeDefinition {
            name: name.into(),
            modifiers: Vec::new(),
            type_params,
            methods: MethodTable::new(),
            imports: BTreeSet::new(),
            passthrough: Vec::new(),
            doc: None,
            location: None,
            detail,
        }
    }

    #[must_use]
    pub fn at(mut self, location: Option<Location>) -> Self {
        self.location = location;
        self
    }

    pub fn kind(&self) -> DefinitionKind {
        match self.detail {
            TypeDetail::Capability(_) => DefinitionKind::Capability,
            TypeDetail::Carrier(_) => DefinitionKind::Carrier,
        }
    }

    #[inline]
    pub fn policy(&self) -> &'static KindPolicy {
        self.kind().policy()
    }

    pub fn as_capability(&self) -> Option<&CapabilityDetail> {
        match &self.detail {
            TypeDetail::Capability(detail) => Some(detail),
            TypeDetail::Carrier(_) => None,
        }
    }

    pub fn as_capability_mut(&mut self) -> Option<&mut CapabilityDetail> {
        match &mut self.detail {
            TypeDetail::Capability(detail) => Some(detail),
            TypeDetail::Carrier(_) => None,
        }
    }

    pub fn as_carrier(&self) -> Option<&CarrierDetail> {
        match &self.detail {
            TypeDetail::Carrier(detail) => Some(detail),
            TypeDetail::Capability(_) => None,
        }
    }

    pub fn as_carrier_mut(&mut self) -> Option<&mut CarrierDetail> {
        match &mut self.detail {
            TypeDetail::Carrier(detail) => Some(detail),
            TypeDetail::Capability(_) => None,
        }
    }

    /// This definition referenced with its own type parameters as
    /// arguments, e.g. `Field<T>`.
    pub fn self_reference(&self) -> TypeReference {
        let args: Vec<TypeArgument> = self
            .type_params
            .iter()
            .map(TypeParameter::as_argument)
            .collect();
        TypeReference::generic(&self.name, args)
    }

    /// Add a method; a second method with the same signature is an error.
    pub fn add_method(&mut self, method: MethodDefinition) -> Result<(), DeclarationError> {
        self.methods.insert(method).map_err(|rejected| {
            DeclarationError::new(
                DeclarationErrorKind::DuplicateSignature {
                    owner: self.name.clone(),
                    signature: rejected.signature().to_string(),
                },
                rejected.location().cloned().or_else(|| self.location.clone()),
            )
        })
    }

    pub fn add_imports<I, S>(&mut self, imports: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.imports.extend(imports.into_iter().map(Into::into));
    }

    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    /// Every supertype reference in resolution order: for a carrier the
    /// superclass first, then implemented capabilities; for a capability
    /// the extended capabilities.
    pub fn ancestors(&self) -> Vec<(&TypeReference, DefinitionKind)> {
        match &self.detail {
            TypeDetail::Capability(detail) => detail
                .extends
                .iter()
                .map(|r| (r, DefinitionKind::Capability))
                .collect(),
            TypeDetail::Carrier(detail) => detail
                .superclass
                .iter()
                .map(|r| (r, DefinitionKind::Carrier))
                .chain(
                    detail
                        .implements
                        .iter()
                        .map(|i| (&i.reference, DefinitionKind::Capability)),
                )
                .collect(),
        }
    }

    /// References for the header's `extends` clause.
    pub fn extends_clause(&self) -> Vec<&TypeReference> {
        match &self.detail {
            TypeDetail::Capability(detail) => detail.extends.iter().collect(),
            TypeDetail::Carrier(detail) => detail.superclass.iter().collect(),
        }
    }

    /// References for the header's `implements` clause (carriers only).
    pub fn implements_clause(&self) -> Vec<&TypeReference> {
        match &self.detail {
            TypeDetail::Capability(_) => Vec::new(),
            TypeDetail::Carrier(detail) => detail.implements.iter().map(|i| &i.reference).collect(),
        }
    }
}
