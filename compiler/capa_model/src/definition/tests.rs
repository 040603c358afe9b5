use capa_ir::ast::{CapabilityDecl, CarrierDecl, Declaration};
use pretty_assertions::assert_eq;

use super::*;
use crate::archetype::resolve_archetypes;
use crate::builder::ModelBuilder;
use crate::config::ModelConfig;
use crate::declare::{declare_capabilities, declare_carriers};
use crate::error::ResolutionErrorKind;
use crate::test_support::{at, capability, carrier, concrete, method, params, ty, unit};

fn declared(declarations: Vec<Declaration>) -> ModelBuilder {
    let units = unit(declarations);
    let mut builder = ModelBuilder::new(ModelConfig::default());
    declare_capabilities(&mut builder, &units).unwrap();
    declare_carriers(&mut builder, &units).unwrap();
    resolve_archetypes(&mut builder).unwrap();
    builder
}

fn with_methods(name: &str, line: u32, methods: Vec<capa_ir::ast::MethodDecl>) -> Declaration {
    Declaration::Capability(CapabilityDecl {
        methods,
        ..capability(name, line)
    })
}

fn find<'a>(table: &'a MethodTable, name: &str) -> &'a MethodDefinition {
    table.iter().find(|m| m.name() == name).unwrap()
}

fn resolution_error(builder: &ModelBuilder, name: &str) -> ResolutionErrorKind {
    builder.all_methods(name).unwrap().unwrap_err().kind
}

// === Merging ===

#[test]
fn same_shape_from_two_capabilities_collapses() {
    let builder = declared(vec![
        with_methods("A", 1, vec![method("value", Some("String"), &[])]),
        with_methods("B", 2, vec![method("value", Some("String"), &[])]),
        Declaration::Carrier(carrier("C", &["A", "B"], 3)),
    ]);

    let table = builder.all_methods("C").unwrap().unwrap();
    assert_eq!(table.len(), 1);
    let value = find(&table, "value");
    assert_eq!(value.owner(), "C");
    assert!(value.is_abstract());
    assert!(value.flags().contains(MethodFlags::NOT_YET_NARROWED));
    assert!(is_effectively_abstract(&table));
}

#[test]
fn different_result_types_clash() {
    let builder = declared(vec![
        with_methods("A", 1, vec![method("value", Some("String"), &[])]),
        with_methods("B", 2, vec![method("value", Some("Integer"), &[])]),
        Declaration::Carrier(carrier("C", &["A", "B"], 3)),
    ]);

    assert_eq!(
        resolution_error(&builder, "C"),
        ResolutionErrorKind::NameClash {
            owner: "C".to_string(),
            signature: "value()".to_string(),
            first: "A".to_string(),
            second: "B".to_string(),
        }
    );
}

#[test]
fn substituted_method_is_implemented_by_carrier() {
    let builder = declared(vec![
        Declaration::Capability(CapabilityDecl {
            type_params: params(&["T"]),
            methods: vec![method("eq", Some("boolean"), &[("T", "value")])],
            ..capability("Field", 1)
        }),
        Declaration::Carrier(CarrierDecl {
            methods: vec![concrete(
                "eq",
                Some("boolean"),
                &[("String", "value")],
                "{ return true; }",
            )],
            ..carrier("NameField", &["Field<String>"], 2)
        }),
    ]);

    let table = builder.all_methods("NameField").unwrap().unwrap();
    assert_eq!(table.len(), 1);
    assert!(!is_effectively_abstract(&table));
    assert_eq!(find(&table, "eq").params()[0].ty, ty("String"));
}

// === Kind policy ===

#[test]
fn capability_forces_inherited_defaults_abstract() {
    let builder = declared(vec![
        with_methods(
            "Base",
            1,
            vec![concrete("greet", Some("String"), &[], "{ return \"hi\"; }")],
        ),
        Declaration::Capability(CapabilityDecl {
            extends: vec![ty("Base")],
            ..capability("Derived", 2)
        }),
        Declaration::Carrier(carrier("Greeter", &["Base"], 3)),
    ]);

    let derived = builder.all_methods("Derived").unwrap().unwrap();
    let greet = find(&derived, "greet");
    assert!(greet.is_abstract());
    assert_eq!(greet.access(), Access::Public);

    let greeter = builder.all_methods("Greeter").unwrap().unwrap();
    assert!(!find(&greeter, "greet").is_abstract());
    assert!(!is_effectively_abstract(&greeter));
}

#[test]
fn carrier_promotes_package_access() {
    let builder = declared(vec![
        Declaration::Carrier(CarrierDecl {
            methods: vec![concrete("helper", None, &[], "{ }")],
            ..carrier("Parent", &[], 1)
        }),
        Declaration::Carrier(CarrierDecl {
            superclass: Some(ty("Parent")),
            ..carrier("Child", &[], 2)
        }),
    ]);

    let parent = builder.all_methods("Parent").unwrap().unwrap();
    assert_eq!(find(&parent, "helper").access(), Access::Package);

    let child = builder.all_methods("Child").unwrap().unwrap();
    let helper = find(&child, "helper");
    assert_eq!(helper.access(), Access::Public);
    assert_eq!(helper.owner(), "Child");
    assert!(!helper.is_abstract());
}

#[test]
fn static_methods_are_not_inherited() {
    let builder = declared(vec![
        Declaration::Carrier(CarrierDecl {
            methods: vec![capa_ir::ast::MethodDecl {
                modifiers: vec![capa_ir::ast::Modifier::Static],
                ..concrete("create", Some("Parent"), &[], "{ return null; }")
            }],
            ..carrier("Parent", &[], 1)
        }),
        Declaration::Carrier(CarrierDecl {
            superclass: Some(ty("Parent")),
            ..carrier("Child", &[], 2)
        }),
    ]);

    assert_eq!(builder.all_methods("Parent").unwrap().unwrap().len(), 1);
    assert!(builder.all_methods("Child").unwrap().unwrap().is_empty());
}

#[test]
fn resolution_is_repeatable() {
    let builder = declared(vec![
        with_methods("A", 1, vec![method("value", Some("String"), &[])]),
        with_methods("B", 2, vec![method("name", Some("String"), &[])]),
        Declaration::Carrier(carrier("C", &["A", "B"], 3)),
    ]);

    let first = builder.all_methods("C").unwrap().unwrap();
    let second = builder.all_methods("C").unwrap().unwrap();
    assert_eq!(first, second);
    let names: Vec<&str> = first.iter().map(MethodDefinition::name).collect();
    assert_eq!(names, vec!["value", "name"]);
}

// === References ===

#[test]
fn argument_count_mismatch() {
    let builder = declared(vec![
        Declaration::Capability(CapabilityDecl {
            type_params: params(&["T"]),
            ..capability("Field", 1)
        }),
        Declaration::Carrier(carrier("Pair", &["Field<String, Integer>"], 2)),
    ]);

    assert_eq!(
        resolution_error(&builder, "Pair"),
        ResolutionErrorKind::ArgumentCount {
            from: "Pair".to_string(),
            reference: "Field<String, Integer>".to_string(),
            expected: 1,
            found: 2,
        }
    );
}

#[test]
fn raw_reference_uses_erasure() {
    let builder = declared(vec![
        Declaration::Capability(CapabilityDecl {
            type_params: params(&["T"]),
            methods: vec![method("eq", Some("boolean"), &[("T", "value")])],
            ..capability("Field", 1)
        }),
        Declaration::Carrier(carrier("RawField", &["Field"], 2)),
    ]);

    let table = builder.all_methods("RawField").unwrap().unwrap();
    assert_eq!(find(&table, "eq").params()[0].ty.to_string(), "java.lang.Object");
}

#[test]
fn unknown_capability_is_unresolved() {
    let builder = declared(vec![Declaration::Carrier(carrier("K", &["Missing"], 1))]);

    assert_eq!(
        resolution_error(&builder, "K"),
        ResolutionErrorKind::UnresolvedReference {
            from: "K".to_string(),
            reference: "Missing".to_string(),
            expected: "capability",
        }
    );
}

#[test]
fn superclass_must_be_a_carrier() {
    let builder = declared(vec![
        Declaration::Capability(capability("A", 1)),
        Declaration::Carrier(CarrierDecl {
            superclass: Some(ty("A")),
            ..carrier("K", &[], 2)
        }),
    ]);

    let err = builder.all_methods("K").unwrap().unwrap_err();
    assert_eq!(
        err.kind,
        ResolutionErrorKind::UnresolvedReference {
            from: "K".to_string(),
            reference: "A".to_string(),
            expected: "carrier",
        }
    );
    assert_eq!(err.location, Some(at(2)));
}

#[test]
fn cyclic_extends_reports_chain() {
    let builder = declared(vec![
        Declaration::Capability(CapabilityDecl {
            extends: vec![ty("Q")],
            ..capability("P", 1)
        }),
        Declaration::Capability(CapabilityDecl {
            extends: vec![ty("P")],
            ..capability("Q", 2)
        }),
    ]);

    assert_eq!(
        resolution_error(&builder, "P"),
        ResolutionErrorKind::CyclicInheritance {
            chain: vec!["P".to_string(), "Q".to_string(), "P".to_string()],
        }
    );
}

#[test]
fn substitution_composes_across_levels() {
    let builder = declared(vec![
        Declaration::Capability(CapabilityDecl {
            type_params: params(&["T"]),
            methods: vec![method("m", None, &[("T", "t")])],
            ..capability("X", 1)
        }),
        Declaration::Capability(CapabilityDecl {
            type_params: params(&["U"]),
            extends: vec![ty("X<java.util.List<U>>")],
            ..capability("Y", 2)
        }),
        Declaration::Capability(CapabilityDecl {
            extends: vec![ty("Y<String>")],
            ..capability("Z", 3)
        }),
    ]);

    let y = builder.all_methods("Y").unwrap().unwrap();
    assert_eq!(find(&y, "m").params()[0].ty.to_string(), "java.util.List<U>");

    let z = builder.all_methods("Z").unwrap().unwrap();
    let m = find(&z, "m");
    assert_eq!(m.params()[0].ty.to_string(), "java.util.List<String>");
    assert_eq!(m.owner(), "Z");
}

// === Clauses ===

#[test]
fn ancestors_list_superclass_first() {
    let builder = declared(vec![
        Declaration::Capability(capability("A", 1)),
        Declaration::Carrier(carrier("Base", &[], 2)),
        Declaration::Carrier(CarrierDecl {
            superclass: Some(ty("Base")),
            ..carrier("K", &["A"], 3)
        }),
    ]);

    let k = builder.definition("K").unwrap();
    let ancestors: Vec<(String, DefinitionKind)> = k
        .ancestors()
        .into_iter()
        .map(|(reference, kind)| (reference.to_string(), kind))
        .collect();
    assert_eq!(
        ancestors,
        vec![
            ("Base".to_string(), DefinitionKind::Carrier),
            ("A".to_string(), DefinitionKind::Capability),
        ]
    );
    assert_eq!(k.extends_clause(), vec![&ty("Base")]);
    assert_eq!(k.implements_clause(), vec![&ty("A")]);
    assert_eq!(k.policy().keyword, "class");
}
