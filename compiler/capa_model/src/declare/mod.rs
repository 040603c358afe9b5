//! Declaration passes: load the parsed units into the registry.
//!
//! Each declaration kind has one constructor function; the passes dispatch
//! on [`Declaration`] and never look at text. Capabilities are declared
//! before carriers, and productions only after archetypes are resolved (see
//! [`crate::pipeline`]).

mod production;


use capa_ir::ast::{CapabilityDecl, CarrierDecl, DeclUnit, Declaration, MethodDecl, Modifier};
use capa_ir::{Location, TypeParameter};

use crate::archetype::{check_method_name, Archetype};
use crate::builder::ModelBuilder;
use crate::definition::{DefinitionKind, ImplementedCapability, TypeDefinition};
use crate::error::{DeclarationError, DeclarationErrorKind};
use crate::method::{Access, MethodBody, MethodBuilder, MethodDefinition, MethodFlags, Param};

pub use production::declare_productions;

/// Declare every capability of every unit, in unit order.
#[tracing::instrument(level = "debug", skip_all, fields(units = units.len()))]
pub fn declare_capabilities(
    builder: &mut ModelBuilder,
    units: &[DeclUnit],
) -> Result<(), DeclarationError> {
    let mut count = 0usize;
    for decl in declarations(units) {
        if let Declaration::Capability(capability) = decl {
            let definition = capability_definition(capability)?;
            builder.define(definition)?;
            count += 1;
        }
    }
    tracing::debug!(count, "capabilities declared");
    Ok(())
}

/// Declare every carrier of every unit, in unit order.
#[tracing::instrument(level = "debug", skip_all, fields(units = units.len()))]
pub fn declare_carriers(
    builder: &mut ModelBuilder,
    units: &[DeclUnit],
) -> Result<(), DeclarationError> {
    let mut count = 0usize;
    for decl in declarations(units) {
        if let Declaration::Carrier(carrier) = decl {
            let definition = carrier_definition(carrier)?;
            builder.define(definition)?;
            count += 1;
        }
    }
    tracing::debug!(count, "carriers declared");
    Ok(())
}

fn declarations(units: &[DeclUnit]) -> impl Iterator<Item = &Declaration> {
    units.iter().flat_map(|unit| unit.declarations.iter())
}

fn capability_definition(decl: &CapabilityDecl) -> Result<TypeDefinition, DeclarationError> {
    check_access(&decl.name, &decl.modifiers, &decl.location)?;
    let mut definition = TypeDefinition::capability(decl.name.clone(), decl.type_params.clone())
        .at(Some(decl.location.clone()));
    definition.modifiers.clone_from(&decl.modifiers);
    definition.doc.clone_from(&decl.doc);
    definition.add_imports(decl.imports.iter().cloned());

    let archetype = decl
        .archetype
        .as_deref()
        .map(|kind| Archetype::new(&decl.name, kind, &decl.type_params, Some(&decl.location)))
        .transpose()?;
    if let Some(detail) = definition.as_capability_mut() {
        detail.extends.clone_from(&decl.extends);
        detail.archetype = archetype;
    }

    for method in &decl.methods {
        let method = method_definition(
            &decl.name,
            &decl.type_params,
            DefinitionKind::Capability,
            method,
        )?;
        definition.add_method(method)?;
    }
    Ok(definition)
}

fn carrier_definition(decl: &CarrierDecl) -> Result<TypeDefinition, DeclarationError> {
    check_access(&decl.name, &decl.modifiers, &decl.location)?;
    let mut definition = TypeDefinition::carrier(decl.name.clone(), decl.type_params.clone())
        .at(Some(decl.location.clone()));
    definition.modifiers.clone_from(&decl.modifiers);
    definition.doc.clone_from(&decl.doc);
    definition.passthrough.clone_from(&decl.passthrough);
    definition.add_imports(decl.imports.iter().cloned());

    if let Some(detail) = definition.as_carrier_mut() {
        detail.superclass.clone_from(&decl.superclass);
        detail.implements = decl
            .implements
            .iter()
            .zip(0u32..)
            .map(|(implements, position)| ImplementedCapability {
                reference: implements.capability.clone(),
                priority: implements.priority.unwrap_or(position),
                via: None,
            })
            .collect();
    }

    for method in &decl.methods {
        let method = method_definition(
            &decl.name,
            &decl.type_params,
            DefinitionKind::Carrier,
            method,
        )?;
        definition.add_method(method)?;
    }
    Ok(definition)
}

fn check_access(
    item: &str,
    modifiers: &[Modifier],
    location: &Location,
) -> Result<Access, DeclarationError> {
    Access::from_modifiers(modifiers).map_err(|(first, second)| {
        DeclarationError::new(
            DeclarationErrorKind::ConflictingAccess {
                item: item.to_string(),
                first: first.keyword(),
                second: second.keyword(),
            },
            Some(location.clone()),
        )
    })
}

/// Build a declared method. Capability methods without an access modifier
/// are public.
fn method_definition(
    owner: &str,
    owner_params: &[TypeParameter],
    kind: DefinitionKind,
    decl: &MethodDecl,
) -> Result<MethodDefinition, DeclarationError> {
    check_method_name(owner, &decl.name, Some(&decl.location))?;
    let item = format!("{owner}.{}", decl.name);
    let mut access = check_access(&item, &decl.modifiers, &decl.location)?;
    if kind == DefinitionKind::Capability && access == Access::Package {
        access = Access::Public;
    }

    let params = decl
        .params
        .iter()
        .map(|p| Param {
            modifiers: p.modifiers.clone(),
            ty: p.ty.clone(),
            name: p.name.clone(),
            variadic: p.variadic,
        })
        .collect();
    let body = match &decl.body {
        Some(text) => MethodBody::Literal(text.clone()),
        None => MethodBody::Abstract,
    };

    Ok(MethodBuilder::new(decl.name.clone())
        .access(access)
        .flags(MethodFlags::from_modifiers(&decl.modifiers))
        .type_params(decl.type_params.clone())
        .result(decl.result.clone())
        .params(params)
        .throws(decl.throws.clone())
        .body(body)
        .doc(decl.doc.clone())
        .location(Some(decl.location.clone()))
        .build(owner, owner_params))
}
