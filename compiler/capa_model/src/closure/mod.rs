//! Multi-hop conversion closure.
//!
//! For every carrier, discovers every capability reachable from its directly
//! implemented set by composing registered conversions, registers each one as
//! implemented, and gives the carrier a delegating body for every delegable
//! abstract method of the newly reached capability.
//!
//! # Algorithm
//!
//! Breadth-first by hop count. `reachable` and `frontier` both start as the
//! direct set. Each hop sweeps the frontier in ascending priority, applies
//! every conversion whose source is a frontier capability, and stages each
//! target not yet reachable. Targets are compared as substituted types, so
//! `Field<String>` and `Field<Integer>` are distinct. When two conversions
//! stage the same target in one hop, the first staged is kept and the other
//! reported as a warning.
//! Staged targets are then committed and become the next frontier.
//!
//! `reachable` only grows, and a conversion back into it (onto itself
//! included) is dropped without a diagnostic, so the loop runs at most once
//! per distinct capability.


use capa_diagnostic::{Diagnostic, DiagnosticSink, ErrorCode};
use capa_ir::TypeReference;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::builder::ModelBuilder;
use crate::definition::{all_methods, resolve_reference, DefinitionKind, ImplementedCapability};
use crate::error::ModelError;
use crate::method::{Access, MethodBody, MethodDefinition, MethodFlags};
use crate::synth::MethodSynthesizer;

/// A target waiting to be committed at the end of a hop.
#[derive(Clone, Debug)]
struct Staged {
    target: TypeReference,
    /// Frontier capability it was reached from.
    source: TypeReference,
    conversion: usize,
    priority: u32,
}

/// Run the closure for every carrier, in registration order.
#[tracing::instrument(level = "debug", skip_all, fields(conversions = builder.conversions().len()))]
pub fn resolve_closure(builder: &mut ModelBuilder, sink: &mut DiagnosticSink) -> Result<(), ModelError> {
    if builder.conversions().is_empty() {
        return Ok(());
    }
    let carriers: Vec<usize> = (0..builder.len())
        .filter(|&index| builder.get(index).as_carrier().is_some())
        .collect();
    let mut committed = 0usize;
    for index in carriers {
        committed += close_carrier(builder, index, sink)?;
    }
    tracing::debug!(committed, "closure complete");
    Ok(())
}

/// Close one carrier; returns how many capabilities were added.
fn close_carrier(
    builder: &mut ModelBuilder,
    index: usize,
    sink: &mut DiagnosticSink,
) -> Result<usize, ModelError> {
    let direct: Vec<ImplementedCapability> = builder
        .get(index)
        .as_carrier()
        .map(|detail| detail.implements.clone())
        .unwrap_or_default();

    // Membership only; never iterated.
    let mut reachable: FxHashSet<TypeReference> =
        direct.iter().map(|c| c.reference.clone()).collect();
    let mut frontier = direct;
    let mut hop = 0u32;
    let mut added = 0usize;

    while !frontier.is_empty() {
        hop += 1;
        frontier.sort_by_key(|c| c.priority);
        let staged = stage(builder, index, &frontier, &reachable, sink);

        let mut next = Vec::with_capacity(staged.len());
        for staged in staged {
            reachable.insert(staged.target.clone());
            commit(builder, index, &staged)?;
            tracing::debug!(
                carrier = %builder.get(index).name,
                hop,
                target = %staged.target,
                via = %builder.conversion(staged.conversion).method,
                "conversion committed"
            );
            next.push(ImplementedCapability {
                reference: staged.target,
                priority: staged.priority,
                via: Some(staged.conversion),
            });
            added += 1;
        }
        frontier = next;
    }
    Ok(added)
}

/// One sweep over the frontier.
fn stage(
    builder: &ModelBuilder,
    index: usize,
    frontier: &[ImplementedCapability],
    reachable: &FxHashSet<TypeReference>,
    sink: &mut DiagnosticSink,
) -> Vec<Staged> {
    let carrier = builder.get(index);
    let mut staged: Vec<Staged> = Vec::new();
    let mut by_target: FxHashMap<TypeReference, usize> = FxHashMap::default();

    for from in frontier {
        for &conversion_index in builder.conversions_from(&from.reference.qualified_name()) {
            let conversion = builder.conversion(conversion_index);
            let target = conversion.apply(&from.reference);
            if reachable.contains(&target) {
                tracing::trace!(carrier = %carrier.name, %target, "already reachable");
                continue;
            }
            if let Some(&kept) = by_target.get(&target) {
                let kept = &staged[kept];
                let message = format!(
                    "ambiguous conversion to `{target}` for `{}`: keeping `{}` from `{}`, ignoring `{}` from `{}`",
                    carrier.name,
                    builder.conversion(kept.conversion).method,
                    kept.source,
                    conversion.method,
                    from.reference,
                );
                tracing::warn!(carrier = %carrier.name, %target, "ambiguous conversion target");
                let _ = sink.push(
                    Diagnostic::warning(ErrorCode::W4001)
                        .with_message(message)
                        .with_location(carrier.location.clone()),
                );
                continue;
            }
            by_target.insert(target.clone(), staged.len());
            staged.push(Staged {
                target,
                source: from.reference.clone(),
                conversion: conversion_index,
                priority: from.priority,
            });
        }
    }
    staged
}

/// Register `staged.target` on the carrier and add delegating placeholders.
fn commit(builder: &mut ModelBuilder, index: usize, staged: &Staged) -> Result<(), ModelError> {
    if let Some(detail) = builder.get_mut(index).as_carrier_mut() {
        detail.implements.push(ImplementedCapability {
            reference: staged.target.clone(),
            priority: staged.priority,
            via: Some(staged.conversion),
        });
    }

    let placeholders = placeholders(builder, index, staged)?;
    let carrier = builder.get_mut(index);
    for method in placeholders {
        let replaces_abstract = carrier
            .methods
            .get(method.signature())
            .is_some_and(MethodDefinition::is_abstract);
        if replaces_abstract {
            carrier.methods.replace(method);
        } else {
            let _ = carrier.methods.insert(method);
        }
    }
    Ok(())
}

/// Delegating implementations of the target's delegable abstract methods the
/// carrier does not already implement concretely.
fn placeholders(
    builder: &ModelBuilder,
    index: usize,
    staged: &Staged,
) -> Result<Vec<MethodDefinition>, ModelError> {
    let carrier = builder.get(index);
    let (capability, args) = resolve_reference(
        builder,
        &carrier.name,
        carrier.location.as_ref(),
        &staged.target,
        DefinitionKind::Capability,
    )?;
    let Some(delegable) = capability.as_capability().map(|detail| &detail.delegable) else {
        return Ok(Vec::new());
    };
    let contract = all_methods(builder, capability)?;
    let resolved = all_methods(builder, carrier)?;

    let conversion = builder.conversion(staged.conversion);
    let cast = builder
        .needs_cast(&conversion.factory_signature)
        .then_some(&staged.source);
    let synth = MethodSynthesizer::new(builder.config());

    let mut out = Vec::new();
    for method in contract.iter() {
        if !method.is_abstract() || method.is_static() || !delegable.contains(method.signature()) {
            continue;
        }
        let mut derived = method.instantiate(
            &capability.type_params,
            &args,
            &carrier.name,
            &carrier.type_params,
        );
        if resolved
            .get(derived.signature())
            .is_some_and(|existing| !existing.is_abstract())
        {
            continue;
        }
        let body = synth.delegation(&conversion.method, cast, &derived);
        derived.set_access(Access::Public);
        derived.set_body(MethodBody::Literal(body));
        derived.insert_flags(MethodFlags::PLACEHOLDER);
        out.push(derived);
    }
    Ok(out)
}
