//! Erased method signatures.
//!
//! A signature is the method name plus the erased shape of each parameter:
//! type arguments dropped, type variables replaced by their first bound (or
//! `java.lang.Object`), array dimensions kept. It is the key of every method
//! table and is computed once, when the method is built.

use std::fmt;

use capa_ir::{TypeParameter, TypeReference, OBJECT};

/// Erased parameter shape.
#[derive(Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub struct ErasedType {
    pub name: String,
    pub dimensions: u32,
}

impl ErasedType {
    /// Erase `reference` where `scopes` lists the visible type parameters,
    /// innermost first.
    pub fn of(reference: &TypeReference, scopes: &[&[TypeParameter]]) -> Self {
        let limit = scopes.iter().map(|scope| scope.len()).sum::<usize>();
        erase(reference, scopes, limit)
    }
}

fn lookup<'a>(name: &str, scopes: &[&'a [TypeParameter]]) -> Option<&'a TypeParameter> {
    scopes
        .iter()
        .flat_map(|scope| scope.iter())
        .find(|param| param.name == name)
}

// `fuel` bounds the walk through bounds naming other variables
// (`U extends T`); a bound cycle erases to Object.
fn erase(reference: &TypeReference, scopes: &[&[TypeParameter]], fuel: usize) -> ErasedType {
    let segments = reference.segments();
    if segments.len() == 1 && segments[0].args.is_empty() {
        if let Some(param) = lookup(&segments[0].name, scopes) {
            let inner = if fuel == 0 {
                ErasedType {
                    name: OBJECT.to_string(),
                    dimensions: 0,
                }
            } else {
                erase(&param.erasure(), scopes, fuel - 1)
            };
            return ErasedType {
                name: inner.name,
                dimensions: inner.dimensions + reference.dimensions(),
            };
        }
    }
    ErasedType {
        name: reference.qualified_name(),
        dimensions: reference.dimensions(),
    }
}

impl fmt::Display for ErasedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for _ in 0..self.dimensions {
            write!(f, "[]")?;
        }
        Ok(())
    }
}

/// Method name plus erased parameter shapes.
#[derive(Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub struct Signature {
    name: String,
    params: Vec<ErasedType>,
}

impl Signature {
    pub fn new(name: impl Into<String>, params: Vec<ErasedType>) -> Self {
        Signature {
            name: name.into(),
            params,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn params(&self) -> &[ErasedType] {
        &self.params
    }

    /// The signature without its first (receiver) parameter.
    pub fn reduced(&self) -> ReducedSignature {
        ReducedSignature(Signature {
            name: self.name.clone(),
            params: self.params.iter().skip(1).cloned().collect(),
        })
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{param}")?;
        }
        write!(f, ")")
    }
}

/// A factory signature minus its receiver parameter.
///
/// Two factory methods with the same reduced signature make an unqualified
/// call `Dsl.f(this)` ambiguous for a carrier implementing both receivers.
#[derive(Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub struct ReducedSignature(Signature);

impl fmt::Display for ReducedSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
