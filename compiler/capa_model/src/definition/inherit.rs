//! Full method sets across multi-level inheritance.

use capa_ir::{Location, TypeArgument, TypeParameter, TypeReference};
use rustc_hash::FxHashMap;

use super::{DefinitionKind, DefinitionLookup, TypeDefinition};
use crate::error::{ResolutionError, ResolutionErrorKind};
use crate::method::{MethodDefinition, MethodTable, Signature};

/// Resolve `reference`, written in definition `from` at `location`, to a
/// definition of kind `expected`, and return it with the arguments to
/// substitute for its type parameters.
///
/// A reference without arguments to a generic definition is raw: every
/// parameter is replaced by its erasure.
pub fn resolve_reference<'a>(
    lookup: &'a dyn DefinitionLookup,
    from: &str,
    location: Option<&Location>,
    reference: &TypeReference,
    expected: DefinitionKind,
) -> Result<(&'a TypeDefinition, Vec<TypeArgument>), ResolutionError> {
    let target = lookup
        .definition(&reference.qualified_name())
        .filter(|target| target.kind() == expected)
        .ok_or_else(|| {
            ResolutionError::new(
                ResolutionErrorKind::UnresolvedReference {
                    from: from.to_string(),
                    reference: reference.to_string(),
                    expected: expected.describe(),
                },
                location.cloned(),
            )
        })?;

    let args = reference.args();
    if args.is_empty() && !target.type_params.is_empty() {
        let raw = target
            .type_params
            .iter()
            .map(|param| param.erasure().into_argument())
            .collect();
        return Ok((target, raw));
    }
    if args.len() != target.type_params.len() {
        return Err(ResolutionError::new(
            ResolutionErrorKind::ArgumentCount {
                from: from.to_string(),
                reference: reference.to_string(),
                expected: target.type_params.len(),
                found: args.len(),
            },
            location.cloned(),
        ));
    }
    Ok((target, args.to_vec()))
}

/// The full method set of `definition`.
///
/// Own methods come first, then each ancestor's full set in
/// [`TypeDefinition::ancestors`] order, substituted to the arguments at the
/// extension site and passed through `definition`'s kind policy. A signature
/// already present must be matched structurally by the newcomer, which is
/// then discarded; otherwise the two clash.
///
/// The result is a fresh table; calling this twice without mutating the
/// registry yields equal tables.
pub fn all_methods(
    lookup: &dyn DefinitionLookup,
    definition: &TypeDefinition,
) -> Result<MethodTable, ResolutionError> {
    let mut stack = Vec::new();
    resolve(lookup, definition, &mut stack)
}

/// Whether any method of a resolved set is still abstract.
pub fn is_effectively_abstract(methods: &MethodTable) -> bool {
    methods.iter().any(MethodDefinition::is_abstract)
}

fn resolve(
    lookup: &dyn DefinitionLookup,
    definition: &TypeDefinition,
    stack: &mut Vec<String>,
) -> Result<MethodTable, ResolutionError> {
    if let Some(start) = stack.iter().position(|name| *name == definition.name) {
        let mut chain = stack[start..].to_vec();
        chain.push(definition.name.clone());
        return Err(ResolutionError::new(
            ResolutionErrorKind::CyclicInheritance { chain },
            definition.location.clone(),
        ));
    }
    stack.push(definition.name.clone());

    let mut table = definition.methods.clone();
    // Where each signature first came from, for clash messages.
    let mut origins: FxHashMap<Signature, String> = table
        .signatures()
        .map(|sig| (sig.clone(), definition.name.clone()))
        .collect();
    let policy = definition.policy();

    for (reference, kind) in definition.ancestors() {
        let (ancestor, args) = resolve_reference(
            lookup,
            &definition.name,
            definition.location.as_ref(),
            reference,
            kind,
        )?;
        let inherited = resolve(lookup, ancestor, stack)?;
        for method in inherited.iter().filter(|m| !m.is_static()) {
            let mut derived = derive(method, ancestor, &args, definition);
            policy.apply(&mut derived);
            merge(&mut table, &mut origins, derived, &ancestor.name, definition)?;
        }
    }

    stack.pop();
    Ok(table)
}

fn derive(
    method: &MethodDefinition,
    ancestor: &TypeDefinition,
    args: &[TypeArgument],
    into: &TypeDefinition,
) -> MethodDefinition {
    let params: &[TypeParameter] = &ancestor.type_params;
    method.instantiate(params, args, &into.name, &into.type_params)
}

fn merge(
    table: &mut MethodTable,
    origins: &mut FxHashMap<Signature, String>,
    derived: MethodDefinition,
    origin: &str,
    owner: &TypeDefinition,
) -> Result<(), ResolutionError> {
    let Some(existing) = table.get(derived.signature()) else {
        origins.insert(derived.signature().clone(), origin.to_string());
        // Absent signature: cannot fail.
        let _ = table.insert(derived);
        return Ok(());
    };
    if existing.matches(&derived) {
        return Ok(());
    }
    let first = origins
        .get(derived.signature())
        .cloned()
        .unwrap_or_else(|| existing.owner().to_string());
    tracing::debug!(
        owner = %owner.name,
        signature = %derived.signature(),
        first = %first,
        second = %origin,
        "name clash"
    );
    Err(ResolutionError::new(
        ResolutionErrorKind::NameClash {
            owner: owner.name.clone(),
            signature: derived.signature().to_string(),
            first,
            second: origin.to_string(),
        },
        owner.location.clone(),
    ))
}
