use capa_ir::ast::Modifier;
use capa_ir::{TypeArgument, TypeParameter, TypeReference};
use pretty_assertions::assert_eq;

use super::*;

fn ty(text: &str) -> TypeReference {
    match text.parse() {
        Ok(reference) => reference,
        Err(err) => panic!("{err}"),
    }
}

fn method(name: &str) -> MethodBuilder {
    MethodBuilder::new(name)
}

// === Signatures ===

#[test]
fn signature_erases_arguments_and_keeps_dimensions() {
    let m = method("where")
        .param(Param::new(ty("java.util.List<String>"), "conditions"))
        .param(Param::new(ty("int[][]"), "grid"))
        .build("Select", &[]);
    assert_eq!(m.signature().to_string(), "where(java.util.List, int[][])");
}

#[test]
fn signature_erases_type_variables_to_bounds() {
    let owner = [TypeParameter::new("T")];
    let m = method("eq")
        .type_params(vec![TypeParameter::bounded("N", vec![ty("Number")])])
        .param(Param::new(ty("T"), "value"))
        .param(Param::new(ty("N[]"), "numbers"))
        .build("Field", &owner);
    assert_eq!(
        m.signature().to_string(),
        "eq(java.lang.Object, Number[])"
    );
}

#[test]
fn method_type_parameter_shadows_owner_parameter() {
    let owner = [TypeParameter::bounded("T", vec![ty("CharSequence")])];
    let m = method("cast")
        .type_params(vec![TypeParameter::new("T")])
        .param(Param::new(ty("T"), "value"))
        .build("Field", &owner);
    assert_eq!(m.signature().to_string(), "cast(java.lang.Object)");
}

#[test]
fn variadic_parameter_erases_as_array() {
    let mut values = Param::new(ty("Field<?>"), "fields");
    values.variadic = true;
    let m = method("select").param(values).build("Dsl", &[]);
    assert_eq!(m.signature().to_string(), "select(Field[])");
}

#[test]
fn bound_cycle_erases_to_object() {
    let owner = [
        TypeParameter::bounded("A", vec![ty("B")]),
        TypeParameter::bounded("B", vec![ty("A")]),
    ];
    let m = method("m").param(Param::new(ty("A"), "a")).build("X", &owner);
    assert_eq!(m.signature().to_string(), "m(java.lang.Object)");
}

#[test]
fn reduced_signature_drops_receiver() {
    let m = method("and")
        .param(Param::new(ty("Condition"), "left"))
        .param(Param::new(ty("Condition"), "right"))
        .build("Dsl", &[]);
    assert_eq!(m.signature().reduced().to_string(), "and(Condition)");
}

// === Bodies and flags ===

#[test]
fn abstract_body_sets_flag_and_literal_clears_it() {
    let mut m = method("sql").build("Sql", &[]);
    assert!(m.is_abstract());
    m.insert_flags(MethodFlags::NOT_YET_NARROWED);
    let signature = m.signature().clone();
    m.set_body(MethodBody::Literal("{ return null; }".to_string()));
    assert!(!m.is_abstract());
    assert_eq!(m.signature(), &signature);
}

#[test]
fn access_from_modifiers() {
    assert_eq!(Access::from_modifiers(&[]), Ok(Access::Package));
    assert_eq!(
        Access::from_modifiers(&[Modifier::Static, Modifier::Protected]),
        Ok(Access::Protected)
    );
    assert_eq!(
        Access::from_modifiers(&[Modifier::Public, Modifier::Final, Modifier::Private]),
        Err((Modifier::Public, Modifier::Private))
    );
}

// === Matching ===

#[test]
fn matching_renames_type_parameters_by_position() {
    let a = method("map")
        .type_params(vec![TypeParameter::new("R")])
        .result(Some(ty("Query<R>")))
        .param(Param::new(ty("Mapper<R>"), "mapper"))
        .build("A", &[]);
    let b = method("map")
        .type_params(vec![TypeParameter::new("U")])
        .result(Some(ty("Query<U>")))
        .param(Param::new(ty("Mapper<U>"), "m"))
        .body(MethodBody::Literal("{ return null; }".to_string()))
        .build("B", &[]);
    assert!(a.matches(&b));
    assert!(b.matches(&a));
}

#[test]
fn matching_rejects_different_result() {
    let a = method("value").result(Some(ty("String"))).build("A", &[]);
    let b = method("value").result(Some(ty("Integer"))).build("B", &[]);
    let void = method("value").build("C", &[]);
    assert!(!a.matches(&b));
    assert!(!a.matches(&void));
}

#[test]
fn matching_rejects_type_parameter_arity_mismatch() {
    let a = method("m")
        .type_params(vec![TypeParameter::new("T")])
        .build("A", &[]);
    let b = method("m").build("B", &[]);
    assert!(!a.matches(&b));
}

#[test]
fn matching_compares_throws_as_a_set() {
    let a = method("run")
        .throws(vec![ty("IOException"), ty("SQLException")])
        .build("A", &[]);
    let b = method("run")
        .throws(vec![ty("SQLException"), ty("IOException")])
        .build("B", &[]);
    let c = method("run").throws(vec![ty("IOException")]).build("C", &[]);
    assert!(a.matches(&b));
    assert!(!a.matches(&c));
}

// === Instantiation ===

#[test]
fn instantiate_substitutes_and_rekeys() {
    let generic = method("eq")
        .result(Some(ty("Condition")))
        .param(Param::new(ty("T"), "value"))
        .build("Field", &[TypeParameter::new("T")]);
    assert_eq!(generic.signature().to_string(), "eq(java.lang.Object)");

    let concrete = generic.instantiate(
        &[TypeParameter::new("T")],
        &[TypeArgument::named("String")],
        "Name",
        &[],
    );
    assert_eq!(concrete.owner(), "Name");
    assert_eq!(concrete.params()[0].ty, ty("String"));
    assert_eq!(concrete.signature().to_string(), "eq(String)");
}

#[test]
fn instantiate_respects_method_shadowing() {
    let m = method("as")
        .type_params(vec![TypeParameter::new("T")])
        .result(Some(ty("Field<T>")))
        .build("Field", &[TypeParameter::new("T")]);
    let out = m.instantiate(
        &[TypeParameter::new("T")],
        &[TypeArgument::named("String")],
        "Name",
        &[],
    );
    assert_eq!(out.result(), Some(&ty("Field<T>")));
}

// === Table ===

#[test]
fn table_rejects_duplicate_signature_and_keeps_order() {
    let mut table = MethodTable::new();
    assert!(table.insert(method("b").build("X", &[])).is_ok());
    assert!(table.insert(method("a").build("X", &[])).is_ok());
    let dup = method("b").result(Some(ty("int"))).build("X", &[]);
    let rejected = table.insert(dup);
    assert!(rejected.is_err());
    let names: Vec<&str> = table.iter().map(MethodDefinition::name).collect();
    assert_eq!(names, vec!["b", "a"]);
}

#[test]
fn table_replace_keeps_position() {
    let mut table = MethodTable::new();
    let _ = table.insert(method("a").build("X", &[]));
    let _ = table.insert(method("b").build("X", &[]));
    let replacement = method("a")
        .body(MethodBody::Literal("{}".to_string()))
        .build("X", &[]);
    assert!(table.replace(replacement));
    let first = &table.iter().collect::<Vec<_>>()[0];
    assert_eq!(first.body(), &MethodBody::Literal("{}".to_string()));
}
