//! Production rules: factory methods, composite carriers, and implicit
//! conversions.

use capa_ir::ast::{DeclUnit, Declaration, Modifier, ProductionDecl};

use crate::archetype::check_method_name;
use crate::builder::ModelBuilder;
use crate::conversion::ImplicitConversion;
use crate::definition::{
    all_methods, resolve_reference, Component, Composite, DefinitionKind, ImplementedCapability,
    TypeDefinition,
};
use crate::error::{DeclarationError, DeclarationErrorKind, ModelError};
use crate::method::{Access, MethodBody, MethodBuilder, MethodFlags, Param, Signature};
use crate::synth::MethodSynthesizer;

/// Register every production, then mark the methods of every conversion
/// target as delegable.
///
/// Runs after archetypes are resolved, so archetype contract methods are
/// part of the delegable sets.
#[tracing::instrument(level = "debug", skip_all, fields(units = units.len()))]
pub fn declare_productions(builder: &mut ModelBuilder, units: &[DeclUnit]) -> Result<(), ModelError> {
    let productions = units
        .iter()
        .flat_map(|unit| unit.declarations.iter())
        .filter_map(|decl| match decl {
            Declaration::Production(production) => Some(production),
            _ => None,
        });
    for production in productions {
        declare_production(builder, production)?;
    }
    mark_delegable(builder)?;
    tracing::debug!(
        conversions = builder.conversions().len(),
        factories = builder.factory().methods.len(),
        "productions declared"
    );
    Ok(())
}

fn declare_production(builder: &mut ModelBuilder, decl: &ProductionDecl) -> Result<(), ModelError> {
    let name = decl
        .name
        .clone()
        .unwrap_or_else(|| lower_first(decl.target.simple_name()));
    check_method_name(&builder.config().factory_name, &name, Some(&decl.location))?;

    if decl.implicit && decl.components.len() != 1 {
        return Err(DeclarationError::new(
            DeclarationErrorKind::ImplicitArity {
                name,
                found: decl.components.len(),
            },
            Some(decl.location.clone()),
        )
        .into());
    }
    resolve_reference(
        &*builder,
        &name,
        Some(&decl.location),
        &decl.target,
        DefinitionKind::Capability,
    )?;

    let config = builder.config().clone();
    let synth = MethodSynthesizer::new(&config);
    let components: Vec<Component> = decl
        .components
        .iter()
        .map(|c| Component {
            name: c.name.clone(),
            ty: c.ty.clone(),
        })
        .collect();

    // Composite carrier holding the components.
    let composite_name = composite_name(builder, &name, &config.composite_suffix);
    let mut composite = TypeDefinition::carrier(composite_name.clone(), decl.type_params.clone())
        .at(Some(decl.location.clone()));
    composite.modifiers = vec![Modifier::Final];
    composite.passthrough = synth.fields(&components);
    composite
        .passthrough
        .push(synth.constructor(&composite_name, &components));
    if let Some(detail) = composite.as_carrier_mut() {
        detail.implements.push(ImplementedCapability {
            reference: decl.target.clone(),
            priority: 0,
            via: None,
        });
        detail.composite = Some(Composite {
            factory: name.clone(),
            components: components.clone(),
        });
    }
    builder.define(composite)?;

    // Static factory on the entry-point class.
    let body = synth.factory(&composite_name, !decl.type_params.is_empty(), &components);
    let factory = MethodBuilder::new(name.clone())
        .access(Access::Public)
        .flags(MethodFlags::STATIC)
        .type_params(decl.type_params.clone())
        .result(Some(decl.target.clone()))
        .params(
            components
                .iter()
                .map(|c| Param::new(c.ty.clone(), c.name.clone()))
                .collect(),
        )
        .body(MethodBody::Literal(body))
        .location(Some(decl.location.clone()))
        .build(&config.factory_name, &[]);
    let factory_signature: Signature = factory.signature().clone();
    builder.add_factory_method(factory)?;

    if decl.implicit {
        let source = components[0].ty.clone();
        tracing::trace!(%source, target = %decl.target, method = %name, "implicit conversion");
        builder.add_conversion(ImplicitConversion {
            type_params: decl.type_params.clone(),
            source,
            target: decl.target.clone(),
            method: name,
            factory_signature,
            location: Some(decl.location.clone()),
        });
    }
    Ok(())
}

/// Record every instance method of each conversion target's full method set
/// as delegable.
fn mark_delegable(builder: &mut ModelBuilder) -> Result<(), ModelError> {
    let mut targets: Vec<String> = builder
        .conversions()
        .iter()
        .map(|c| c.target.qualified_name())
        .collect();
    targets.sort();
    targets.dedup();

    for target in targets {
        let Some(index) = builder.index_of(&target) else {
            continue;
        };
        let methods = all_methods(&*builder, builder.get(index))?;
        let signatures: Vec<Signature> = methods
            .iter()
            .filter(|m| !m.is_static())
            .map(|m| m.signature().clone())
            .collect();
        if let Some(detail) = builder.get_mut(index).as_capability_mut() {
            detail.delegable.extend(signatures);
        }
    }
    Ok(())
}

/// `SelectImpl` for factory `select`; overloaded factories get `SelectImpl2`,
/// `SelectImpl3`, ...
fn composite_name(builder: &ModelBuilder, factory: &str, suffix: &str) -> String {
    let base = format!("{}{}", upper_first(factory), suffix);
    if builder.is_available(&base) {
        return base;
    }
    (2u32..)
        .map(|n| format!("{base}{n}"))
        .find(|candidate| builder.is_available(candidate))
        .unwrap_or(base)
}

fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn upper_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn factory_name_casing() {
        assert_eq!(lower_first("SelectQuery"), "selectQuery");
        assert_eq!(upper_first("selectQuery"), "SelectQuery");
        assert_eq!(lower_first(""), "");
    }
}
