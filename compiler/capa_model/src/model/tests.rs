use capa_ir::ast::{CapabilityDecl, CarrierDecl, Declaration};
use capa_ir::CyclicDependency;
use pretty_assertions::assert_eq;

use super::*;
use crate::archetype::resolve_archetypes;
use crate::declare::{declare_capabilities, declare_carriers};
use crate::test_support::{capability, carrier, concrete, method, ty, unit};

fn builder(declarations: Vec<Declaration>) -> ModelBuilder {
    let units = unit(declarations);
    let mut builder = ModelBuilder::new(ModelConfig::default());
    declare_capabilities(&mut builder, &units).unwrap();
    declare_carriers(&mut builder, &units).unwrap();
    resolve_archetypes(&mut builder).unwrap();
    builder
}

fn names(model: &Model) -> Vec<&str> {
    model.definitions().map(|d| d.name.as_str()).collect()
}

#[test]
fn dependencies_are_emitted_first() {
    let model = builder(vec![
        Declaration::Capability(capability("A", 1)),
        Declaration::Carrier(CarrierDecl {
            superclass: Some(ty("Base")),
            ..carrier("Child", &["A"], 2)
        }),
        Declaration::Carrier(carrier("Base", &[], 3)),
    ])
    .seal()
    .unwrap();

    assert_eq!(names(&model), vec!["Dsl", "A", "Base", "Child"]);
    assert_eq!(model.len(), 4);
    assert_eq!(model.factory().name, "Dsl");
}

#[test]
fn independent_definitions_keep_registration_order() {
    let model = builder(vec![
        Declaration::Capability(capability("Zeta", 1)),
        Declaration::Capability(capability("Alpha", 2)),
        Declaration::Carrier(carrier("Mid", &[], 3)),
    ])
    .seal()
    .unwrap();

    assert_eq!(names(&model), vec!["Dsl", "Zeta", "Alpha", "Mid"]);
}

#[test]
fn carrier_cycle_is_structural() {
    let err = builder(vec![
        Declaration::Carrier(CarrierDecl {
            superclass: Some(ty("B")),
            ..carrier("A", &[], 1)
        }),
        Declaration::Carrier(CarrierDecl {
            superclass: Some(ty("A")),
            ..carrier("B", &[], 2)
        }),
    ])
    .seal()
    .unwrap_err();

    assert_eq!(
        err,
        ModelError::Structural(CyclicDependency {
            remaining: vec!["A".to_string(), "B".to_string()],
        })
    );
    assert_eq!(err.code(), capa_diagnostic::ErrorCode::E3001);
}

#[test]
fn abstractness_is_declared_or_inherited() {
    let model = builder(vec![
        Declaration::Capability(CapabilityDecl {
            methods: vec![method("value", Some("String"), &[])],
            ..capability("A", 1)
        }),
        Declaration::Carrier(carrier("Open", &["A"], 2)),
        Declaration::Carrier(CarrierDecl {
            methods: vec![concrete("value", Some("String"), &[], "{ return \"\"; }")],
            ..carrier("Closed", &["A"], 3)
        }),
        Declaration::Carrier(CarrierDecl {
            modifiers: vec![Modifier::Abstract],
            ..carrier("Marked", &[], 4)
        }),
    ])
    .seal()
    .unwrap();

    assert!(model.is_abstract("A"));
    assert!(model.is_abstract("Open"));
    assert!(!model.is_abstract("Closed"));
    assert!(model.is_abstract("Marked"));
    assert!(!model.is_abstract("Dsl"));
    assert!(!model.is_abstract("Missing"));
}

#[test]
fn lookups_match_builder_resolution() {
    let declarations = vec![
        Declaration::Capability(CapabilityDecl {
            methods: vec![method("value", Some("String"), &[])],
            ..capability("A", 1)
        }),
        Declaration::Carrier(carrier("K", &["A"], 2)),
    ];
    let builder = builder(declarations);
    let expected = builder.all_methods("K").unwrap().unwrap();
    let model = builder.seal().unwrap();

    assert_eq!(model.all_methods("K"), Some(&expected));
    assert!(model.all_methods("Missing").is_none());
    assert_eq!(model.definition("A").map(|d| d.kind()), Some(crate::DefinitionKind::Capability));
    assert!(model.conversions().is_empty());
}

#[test]
fn sealing_is_deterministic() {
    let declarations = vec![
        Declaration::Capability(capability("A", 1)),
        Declaration::Carrier(carrier("K", &["A"], 2)),
    ];
    let first = builder(declarations.clone()).seal().unwrap();
    let second = builder(declarations).seal().unwrap();
    assert_eq!(first, second);
}

#[test]
fn unresolved_reference_fails_seal() {
    let err = builder(vec![Declaration::Carrier(carrier("K", &["Missing"], 1))])
        .seal()
        .unwrap_err();
    assert_eq!(err.code(), capa_diagnostic::ErrorCode::E2001);
}

#[test]
fn imports_include_ancestors() {
    let model = builder(vec![
        Declaration::Capability(CapabilityDecl {
            archetype: Some("sql".to_string()),
            imports: vec!["java.util.List".to_string()],
            ..capability("Condition", 1)
        }),
        Declaration::Carrier(CarrierDecl {
            imports: vec!["java.util.Map".to_string()],
            ..carrier("Base", &["Condition"], 2)
        }),
        Declaration::Carrier(CarrierDecl {
            superclass: Some(ty("Base")),
            ..carrier("Child", &[], 3)
        }),
    ])
    .seal()
    .unwrap();

    let imports: Vec<&str> = model.imports("Child").into_iter().collect();
    assert_eq!(
        imports,
        vec!["capa.runtime.Sql", "java.util.List", "java.util.Map"]
    );
    assert!(model.imports("Missing").is_empty());
}
