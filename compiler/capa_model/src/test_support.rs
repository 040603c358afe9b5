//! Declaration fixtures shared by the unit tests.

use capa_ir::ast::{
    CapabilityDecl, CarrierDecl, ComponentDecl, DeclUnit, Declaration, ImplementsDecl, MethodDecl,
    ParamDecl, ProductionDecl,
};
use capa_ir::{Location, TypeParameter, TypeReference};

pub(crate) fn ty(text: &str) -> TypeReference {
    match text.parse() {
        Ok(reference) => reference,
        Err(err) => panic!("{err}"),
    }
}

pub(crate) fn at(line: u32) -> Location {
    Location::new("grammar.capa", line, 1)
}

pub(crate) fn params(names: &[&str]) -> Vec<TypeParameter> {
    names.iter().map(|n| TypeParameter::new(*n)).collect()
}

pub(crate) fn capability(name: &str, line: u32) -> CapabilityDecl {
    CapabilityDecl {
        modifiers: Vec::new(),
        name: name.to_string(),
        type_params: Vec::new(),
        extends: Vec::new(),
        archetype: None,
        methods: Vec::new(),
        imports: Vec::new(),
        doc: None,
        location: at(line),
    }
}

pub(crate) fn carrier(name: &str, implements: &[&str], line: u32) -> CarrierDecl {
    CarrierDecl {
        modifiers: Vec::new(),
        name: name.to_string(),
        type_params: Vec::new(),
        superclass: None,
        implements: implements
            .iter()
            .map(|c| ImplementsDecl {
                capability: ty(c),
                priority: None,
            })
            .collect(),
        methods: Vec::new(),
        imports: Vec::new(),
        passthrough: Vec::new(),
        doc: None,
        location: at(line),
    }
}

/// Abstract method; `params` are `(type, name)` pairs.
pub(crate) fn method(name: &str, result: Option<&str>, params: &[(&str, &str)]) -> MethodDecl {
    MethodDecl {
        modifiers: Vec::new(),
        type_params: Vec::new(),
        name: name.to_string(),
        result: result.map(ty),
        params: params
            .iter()
            .map(|(t, n)| ParamDecl {
                modifiers: Vec::new(),
                ty: ty(t),
                name: (*n).to_string(),
                variadic: false,
            })
            .collect(),
        throws: Vec::new(),
        body: None,
        doc: None,
        location: at(0),
    }
}

pub(crate) fn concrete(
    name: &str,
    result: Option<&str>,
    params: &[(&str, &str)],
    body: &str,
) -> MethodDecl {
    MethodDecl {
        body: Some(body.to_string()),
        ..method(name, result, params)
    }
}

/// Production rule; `components` are `(name, type)` pairs.
pub(crate) fn production(
    implicit: bool,
    name: Option<&str>,
    target: &str,
    components: &[(&str, &str)],
    line: u32,
) -> ProductionDecl {
    ProductionDecl {
        implicit,
        name: name.map(str::to_string),
        type_params: Vec::new(),
        target: ty(target),
        components: components
            .iter()
            .map(|(n, t)| ComponentDecl {
                name: (*n).to_string(),
                ty: ty(t),
            })
            .collect(),
        location: at(line),
    }
}

/// Implicit conversion `source -> target` through factory `name`.
pub(crate) fn conversion(name: &str, source: &str, target: &str, line: u32) -> Declaration {
    Declaration::Production(production(
        true,
        Some(name),
        target,
        &[("value", source)],
        line,
    ))
}

pub(crate) fn unit(declarations: Vec<Declaration>) -> Vec<DeclUnit> {
    vec![DeclUnit {
        file: "grammar.capa".to_string(),
        declarations,
    }]
}
