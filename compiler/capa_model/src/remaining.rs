//! Remaining synthesis after the closure: archetype bodies of composite
//! carriers, then the concreteness check.

use capa_ir::ast::Modifier;

use crate::archetype::{ArchetypeKind, RESERVED_PREFIX};
use crate::builder::ModelBuilder;
use crate::definition::{all_methods, Component, DefinitionLookup};
use crate::error::{ModelError, ResolutionError, ResolutionErrorKind};
use crate::method::{MethodBody, MethodDefinition, MethodFlags};
use crate::synth::{CompositePart, MethodSynthesizer};

/// Give every composite carrier its archetype bodies, then require every
/// composite or `final` carrier to be concrete.
#[tracing::instrument(level = "debug", skip_all, fields(definitions = builder.len()))]
pub fn synthesize_remaining(builder: &mut ModelBuilder) -> Result<(), ModelError> {
    for index in 0..builder.len() {
        if builder.get(index).as_carrier().is_some_and(|d| d.composite.is_some()) {
            synthesize_composite(builder, index)?;
        }
    }
    for index in 0..builder.len() {
        check_concrete(builder, index)?;
    }
    Ok(())
}

/// Archetype kind whose contract method `method` is.
fn contract_kind(method: &MethodDefinition) -> Option<ArchetypeKind> {
    if !method.name().starts_with(RESERVED_PREFIX) {
        return None;
    }
    ArchetypeKind::ALL
        .into_iter()
        .find(|kind| kind.method_name() == method.name())
}

/// Contract methods of a composite carrier's target that are still open, or
/// only delegated by the closure, with their composite bodies.
fn composite_bodies(
    builder: &ModelBuilder,
    index: usize,
) -> Result<Vec<MethodDefinition>, ModelError> {
    let carrier = builder.get(index);
    let Some(composite) = carrier.as_carrier().and_then(|d| d.composite.as_ref()) else {
        return Ok(Vec::new());
    };
    let resolved = all_methods(builder, carrier)?;
    let parts: Vec<CompositePart<'_>> = composite
        .components
        .iter()
        .map(|component| {
            Ok(CompositePart {
                component,
                archetype: component_archetype(builder, component)?,
            })
        })
        .collect::<Result<_, ModelError>>()?;
    let synth = MethodSynthesizer::new(builder.config());

    // Contracts of the production target; contracts reached by conversion
    // keep their delegation.
    let mut target_kinds = Vec::new();
    for implemented in carrier.as_carrier().map_or(&[][..], |d| &d.implements) {
        if implemented.via.is_some() {
            continue;
        }
        if let Some(target) = builder.definition(&implemented.reference.qualified_name()) {
            target_kinds.extend(all_methods(builder, target)?.iter().filter_map(contract_kind));
        }
    }

    let mut bodies = Vec::new();
    for method in resolved.iter() {
        let Some(kind) = contract_kind(method).filter(|kind| target_kinds.contains(kind)) else {
            continue;
        };
        if !method.is_abstract() && !method.flags().contains(MethodFlags::PLACEHOLDER) {
            continue;
        }
        let mut method = method.clone();
        method.set_body(MethodBody::Literal(synth.composite(kind, &parts)));
        method.remove_flags(MethodFlags::PLACEHOLDER);
        bodies.push(method);
    }
    Ok(bodies)
}

/// The archetype carried by a component's type, if it names a definition
/// with a contract method.
fn component_archetype(
    builder: &ModelBuilder,
    component: &Component,
) -> Result<Option<ArchetypeKind>, ModelError> {
    let Some(definition) = builder.definition(&component.ty.qualified_name()) else {
        return Ok(None);
    };
    let methods = all_methods(builder, definition)?;
    Ok(methods.iter().find_map(contract_kind))
}

fn synthesize_composite(builder: &mut ModelBuilder, index: usize) -> Result<(), ModelError> {
    let bodies = composite_bodies(builder, index)?;
    let carrier = builder.get_mut(index);
    for method in bodies {
        tracing::trace!(carrier = %carrier.name, method = %method.signature(), "composite body");
        if carrier.methods.contains(method.signature()) {
            carrier.methods.replace(method);
        } else {
            let _ = carrier.methods.insert(method);
        }
    }
    Ok(())
}

fn check_concrete(builder: &ModelBuilder, index: usize) -> Result<(), ModelError> {
    let definition = builder.get(index);
    let Some(detail) = definition.as_carrier() else {
        return Ok(());
    };
    let must_be_concrete = detail.composite.is_some()
        || definition.has_modifier(Modifier::Final);
    if !must_be_concrete {
        return Ok(());
    }
    let resolved = all_methods(builder, definition)?;
    if let Some(missing) = resolved.iter().find(|m| m.is_abstract()) {
        return Err(ResolutionError::new(
            ResolutionErrorKind::MissingImplementation {
                carrier: definition.name.clone(),
                method: missing.signature().to_string(),
            },
            definition.location.clone(),
        )
        .into());
    }
    Ok(())
}
