//! Method definitions.
//!
//! A [`MethodDefinition`] is built once through [`MethodBuilder`], which
//! computes its erased [`Signature`] against the owner's type parameters.
//! The signature never changes afterwards: later passes may replace the body
//! or the documentation in place, but not the name or the parameter shape.
//! Inherited copies are new definitions made by [`MethodDefinition::instantiate`].

mod signature;
mod table;

#[cfg(test)]
mod tests;

use bitflags::bitflags;
use capa_ir::ast::Modifier;
use capa_ir::{substitute, Location, TypeArgument, TypeParameter, TypeReference};
use rustc_hash::FxHashSet;

pub use signature::{ErasedType, ReducedSignature, Signature};
pub use table::MethodTable;

/// Access level. Exactly one applies to every method.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Access {
    Public,
    Protected,
    Private,
    /// No modifier written.
    Package,
}

impl Access {
    /// The keyword, or `None` for package access.
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            Access::Public => Some("public"),
            Access::Protected => Some("protected"),
            Access::Private => Some("private"),
            Access::Package => None,
        }
    }

    /// Access selected by a modifier list.
    ///
    /// Returns the first two access modifiers when more than one is present.
    pub fn from_modifiers(modifiers: &[Modifier]) -> Result<Access, (Modifier, Modifier)> {
        let mut found: Option<Modifier> = None;
        for &modifier in modifiers.iter().filter(|m| m.is_access()) {
            if let Some(first) = found {
                return Err((first, modifier));
            }
            found = Some(modifier);
        }
        Ok(match found {
            Some(Modifier::Public) => Access::Public,
            Some(Modifier::Protected) => Access::Protected,
            Some(Modifier::Private) => Access::Private,
            _ => Access::Package,
        })
    }
}

bitflags! {
    /// Non-access modifiers of a method, including the engine's own markers.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct MethodFlags: u8 {
        const ABSTRACT = 1 << 0;
        const STATIC = 1 << 1;
        const FINAL = 1 << 2;
        /// Inherited abstract method the owner has not implemented yet.
        const NOT_YET_NARROWED = 1 << 3;
        /// Delegating implementation synthesized by the conversion closure.
        const PLACEHOLDER = 1 << 4;
    }
}

impl MethodFlags {
    /// Flags written as source modifiers.
    pub fn from_modifiers(modifiers: &[Modifier]) -> Self {
        let mut flags = MethodFlags::empty();
        for modifier in modifiers {
            match modifier {
                Modifier::Abstract => flags |= MethodFlags::ABSTRACT,
                Modifier::Static => flags |= MethodFlags::STATIC,
                Modifier::Final => flags |= MethodFlags::FINAL,
                Modifier::Public | Modifier::Protected | Modifier::Private => {}
            }
        }
        flags
    }
}

/// A formal parameter.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Param {
    pub modifiers: Vec<Modifier>,
    pub ty: TypeReference,
    pub name: String,
    /// `T... name`; `ty` is the element type.
    pub variadic: bool,
}

impl Param {
    pub fn new(ty: TypeReference, name: impl Into<String>) -> Self {
        Param {
            modifiers: Vec::new(),
            ty,
            name: name.into(),
            variadic: false,
        }
    }

    /// The type the parameter has inside the body (`T[]` for `T...`).
    pub fn effective_type(&self) -> TypeReference {
        if self.variadic {
            self.ty.clone().array_of(1)
        } else {
            self.ty.clone()
        }
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum MethodBody {
    Abstract,
    /// Body text including its braces.
    Literal(String),
}

/// A method of a capability or carrier.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct MethodDefinition {
    access: Access,
    flags: MethodFlags,
    type_params: Vec<TypeParameter>,
    name: String,
    result: Option<TypeReference>,
    params: Vec<Param>,
    throws: Vec<TypeReference>,
    body: MethodBody,
    owner: String,
    location: Option<Location>,
    doc: Option<String>,
    signature: Signature,
}

impl MethodDefinition {
    #[inline]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn access(&self) -> Access {
        self.access
    }

    #[inline]
    pub fn flags(&self) -> MethodFlags {
        self.flags
    }

    pub fn type_params(&self) -> &[TypeParameter] {
        &self.type_params
    }

    /// Result type; `None` is `void`.
    pub fn result(&self) -> Option<&TypeReference> {
        self.result.as_ref()
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn throws(&self) -> &[TypeReference] {
        &self.throws
    }

    pub fn body(&self) -> &MethodBody {
        &self.body
    }

    /// Name of the definition this method was declared in or derived into.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// Abstract, either explicitly or as an inherited unimplemented method.
    #[inline]
    pub fn is_abstract(&self) -> bool {
        self.flags
            .intersects(MethodFlags::ABSTRACT | MethodFlags::NOT_YET_NARROWED)
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.flags.contains(MethodFlags::STATIC)
    }

    /// Replace the body. A literal body makes the method concrete.
    pub fn set_body(&mut self, body: MethodBody) {
        match body {
            MethodBody::Abstract => self.flags.insert(MethodFlags::ABSTRACT),
            MethodBody::Literal(_) => self
                .flags
                .remove(MethodFlags::ABSTRACT | MethodFlags::NOT_YET_NARROWED),
        }
        self.body = body;
    }

    pub fn set_doc(&mut self, doc: Option<String>) {
        self.doc = doc;
    }

    pub(crate) fn set_access(&mut self, access: Access) {
        self.access = access;
    }

    pub(crate) fn insert_flags(&mut self, flags: MethodFlags) {
        self.flags.insert(flags);
    }

    pub(crate) fn remove_flags(&mut self, flags: MethodFlags) {
        self.flags.remove(flags);
    }

    /// A copy of this method with `params` replaced by `args` in every type
    /// it mentions, re-owned by `owner` and re-keyed against `owner_params`.
    ///
    /// The method's own type parameters shadow same-named `params`.
    pub fn instantiate(
        &self,
        params: &[TypeParameter],
        args: &[TypeArgument],
        owner: &str,
        owner_params: &[TypeParameter],
    ) -> MethodDefinition {
        let (params, args): (Vec<TypeParameter>, Vec<TypeArgument>) = params
            .iter()
            .zip(args)
            .filter(|(param, _)| !self.type_params.iter().any(|own| own.name == param.name))
            .map(|(param, arg)| (param.clone(), arg.clone()))
            .unzip();
        let subst = |reference: &TypeReference| substitute(reference, &params, &args);

        MethodBuilder {
            name: self.name.clone(),
            access: self.access,
            flags: self.flags,
            type_params: self
                .type_params
                .iter()
                .map(|tp| {
                    TypeParameter::bounded(tp.name.clone(), tp.bounds.iter().map(subst).collect())
                })
                .collect(),
            result: self.result.as_ref().map(subst),
            params: self
                .params
                .iter()
                .map(|p| Param {
                    modifiers: p.modifiers.clone(),
                    ty: subst(&p.ty),
                    name: p.name.clone(),
                    variadic: p.variadic,
                })
                .collect(),
            throws: self.throws.iter().map(subst).collect(),
            body: self.body.clone(),
            doc: self.doc.clone(),
            location: self.location.clone(),
        }
        .build(owner, owner_params)
    }

    /// Structural match: after renaming `other`'s type parameters onto this
    /// method's by position, result type, parameter types, and the thrown-type
    /// set are all equal. Bodies, modifiers, and docs are ignored.
    pub fn matches(&self, other: &MethodDefinition) -> bool {
        if self.type_params.len() != other.type_params.len()
            || self.params.len() != other.params.len()
        {
            return false;
        }
        let renamed: Vec<TypeArgument> = self
            .type_params
            .iter()
            .map(TypeParameter::as_argument)
            .collect();
        let rename = |reference: &TypeReference| substitute(reference, &other.type_params, &renamed);

        let results = match (&self.result, &other.result) {
            (None, None) => true,
            (Some(mine), Some(theirs)) => *mine == rename(theirs),
            _ => false,
        };
        if !results {
            return false;
        }

        let params = self
            .params
            .iter()
            .zip(&other.params)
            .all(|(mine, theirs)| mine.effective_type() == rename(&theirs.effective_type()));
        if !params {
            return false;
        }

        let mine: FxHashSet<&TypeReference> = self.throws.iter().collect();
        let theirs: Vec<TypeReference> = other.throws.iter().map(rename).collect();
        let theirs: FxHashSet<&TypeReference> = theirs.iter().collect();
        mine == theirs
    }
}

/// Builder for [`MethodDefinition`].
#[derive(Clone, Debug)]
#[must_use]
pub struct MethodBuilder {
    name: String,
    access: Access,
    flags: MethodFlags,
    type_params: Vec<TypeParameter>,
    result: Option<TypeReference>,
    params: Vec<Param>,
    throws: Vec<TypeReference>,
    body: MethodBody,
    doc: Option<String>,
    location: Option<Location>,
}

impl MethodBuilder {
    /// A public, abstract, parameterless `void` method.
    pub fn new(name: impl Into<String>) -> Self {
        MethodBuilder {
            name: name.into(),
            access: Access::Public,
            flags: MethodFlags::empty(),
            type_params: Vec::new(),
            result: None,
            params: Vec::new(),
            throws: Vec::new(),
            body: MethodBody::Abstract,
            doc: None,
            location: None,
        }
    }

    pub fn access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    pub fn flags(mut self, flags: MethodFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn type_params(mut self, type_params: Vec<TypeParameter>) -> Self {
        self.type_params = type_params;
        self
    }

    pub fn result(mut self, result: Option<TypeReference>) -> Self {
        self.result = result;
        self
    }

    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    pub fn params(mut self, params: Vec<Param>) -> Self {
        self.params = params;
        self
    }

    pub fn throws(mut self, throws: Vec<TypeReference>) -> Self {
        self.throws = throws;
        self
    }

    pub fn body(mut self, body: MethodBody) -> Self {
        self.body = body;
        self
    }

    pub fn doc(mut self, doc: Option<String>) -> Self {
        self.doc = doc;
        self
    }

    pub fn location(mut self, location: Option<Location>) -> Self {
        self.location = location;
        self
    }

    /// Fix the signature against the owner's type parameters.
    ///
    /// An abstract body sets [`MethodFlags::ABSTRACT`].
    pub fn build(self, owner: &str, owner_params: &[TypeParameter]) -> MethodDefinition {
        let scopes: [&[TypeParameter]; 2] = [&self.type_params, owner_params];
        let erased = self
            .params
            .iter()
            .map(|param| ErasedType::of(&param.effective_type(), &scopes))
            .collect();
        let signature = Signature::new(self.name.clone(), erased);
        let mut flags = self.flags;
        if self.body == MethodBody::Abstract {
            flags.insert(MethodFlags::ABSTRACT);
        }
        MethodDefinition {
            access: self.access,
            flags,
            type_params: self.type_params,
            name: self.name,
            result: self.result,
            params: self.params,
            throws: self.throws,
            body: self.body,
            owner: owner.to_string(),
            location: self.location,
            doc: self.doc,
            signature,
        }
    }
}
