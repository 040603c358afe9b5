//! Declaration units handed over by the grammar parser.
//!
//! The parser collaborator produces one [`DeclUnit`] per source file. The
//! engine only walks these nodes; it never re-parses text. The set of
//! declaration kinds is closed, and each kind maps to one constructor in
//! `capa_model`.

use crate::{Location, TypeParameter, TypeReference};

/// A declaration modifier keyword.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Abstract,
    Static,
    Final,
}

impl Modifier {
    pub fn keyword(self) -> &'static str {
        match self {
            Modifier::Public => "public",
            Modifier::Protected => "protected",
            Modifier::Private => "private",
            Modifier::Abstract => "abstract",
            Modifier::Static => "static",
            Modifier::Final => "final",
        }
    }

    /// Whether this modifier selects an access level.
    #[inline]
    pub fn is_access(self) -> bool {
        matches!(
            self,
            Modifier::Public | Modifier::Protected | Modifier::Private
        )
    }
}

/// All declarations parsed from one source file.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeclUnit {
    pub file: String,
    pub declarations: Vec<Declaration>,
}

/// One top-level declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "kind", rename_all = "lowercase")
)]
pub enum Declaration {
    Capability(CapabilityDecl),
    Carrier(CarrierDecl),
    Production(ProductionDecl),
}

impl Declaration {
    pub fn location(&self) -> &Location {
        match self {
            Declaration::Capability(decl) => &decl.location,
            Declaration::Carrier(decl) => &decl.location,
            Declaration::Production(decl) => &decl.location,
        }
    }
}

/// An abstract capability contract.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CapabilityDecl {
    #[cfg_attr(feature = "serde", serde(default))]
    pub modifiers: Vec<Modifier>,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub type_params: Vec<TypeParameter>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub extends: Vec<TypeReference>,
    /// Archetype kind name (`sql` or `query`), if the capability has one.
    #[cfg_attr(feature = "serde", serde(default))]
    pub archetype: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub methods: Vec<MethodDecl>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub imports: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub doc: Option<String>,
    pub location: Location,
}

/// A capability named in a carrier's `implements` clause.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImplementsDecl {
    pub capability: TypeReference,
    /// Explicit tie-break priority (lower wins); defaults to the position in
    /// the clause.
    #[cfg_attr(feature = "serde", serde(default))]
    pub priority: Option<u32>,
}

/// A concrete carrier type.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CarrierDecl {
    #[cfg_attr(feature = "serde", serde(default))]
    pub modifiers: Vec<Modifier>,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub type_params: Vec<TypeParameter>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub superclass: Option<TypeReference>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub implements: Vec<ImplementsDecl>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub methods: Vec<MethodDecl>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub imports: Vec<String>,
    /// Declarations copied verbatim into the output (fields, constructors).
    #[cfg_attr(feature = "serde", serde(default))]
    pub passthrough: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub doc: Option<String>,
    pub location: Location,
}

/// A named component of a production rule.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComponentDecl {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub ty: TypeReference,
}

/// A production rule: how the target capability is built from components.
///
/// Implicit productions have exactly one component and register an implicit
/// conversion from it; explicit productions synthesize a composite carrier.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProductionDecl {
    #[cfg_attr(feature = "serde", serde(default))]
    pub implicit: bool,
    /// Factory method name; defaults to the target's name in lower camel case.
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub type_params: Vec<TypeParameter>,
    pub target: TypeReference,
    pub components: Vec<ComponentDecl>,
    pub location: Location,
}

/// A formal parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParamDecl {
    #[cfg_attr(feature = "serde", serde(default))]
    pub modifiers: Vec<Modifier>,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub ty: TypeReference,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub variadic: bool,
}

/// A method declaration inside a capability or carrier.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MethodDecl {
    #[cfg_attr(feature = "serde", serde(default))]
    pub modifiers: Vec<Modifier>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub type_params: Vec<TypeParameter>,
    pub name: String,
    /// `None` is `void`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub result: Option<TypeReference>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub params: Vec<ParamDecl>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub throws: Vec<TypeReference>,
    /// Literal body text including braces; `None` for abstract methods.
    #[cfg_attr(feature = "serde", serde(default))]
    pub body: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub doc: Option<String>,
    pub location: Location,
}
