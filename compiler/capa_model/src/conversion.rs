//! Implicit conversions between capabilities.

use capa_ir::{substitute, Location, TypeArgument, TypeParameter, TypeReference, Wildcard};

use crate::method::Signature;

/// A registered factory turning an instance of one capability into another.
///
/// Created once per implicit production and read-only afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImplicitConversion {
    pub type_params: Vec<TypeParameter>,
    pub source: TypeReference,
    pub target: TypeReference,
    /// Name of the factory method on the entry-point class.
    pub method: String,
    /// Signature of that factory method.
    pub factory_signature: Signature,
    pub location: Option<Location>,
}

impl ImplicitConversion {
    /// The concrete target reached from `from`, an instantiation of
    /// `source`.
    ///
    /// Each type parameter written bare as an argument of `source` is bound
    /// to `from`'s argument at the same position; parameters left unbound
    /// become `?`.
    pub fn apply(&self, from: &TypeReference) -> TypeReference {
        let actual = from.args();
        let bound: Vec<TypeArgument> = self
            .type_params
            .iter()
            .map(|param| {
                self.source
                    .args()
                    .iter()
                    .position(|arg| matches!(arg, TypeArgument::Concrete(r) if r.is_bare(&param.name)))
                    .and_then(|position| actual.get(position))
                    .cloned()
                    .unwrap_or_else(|| TypeArgument::Wildcard(Wildcard::unbounded()))
            })
            .collect();
        substitute(&self.target, &self.type_params, &bound)
    }
}
