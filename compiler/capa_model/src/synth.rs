//! Literal method bodies and members built from a resolved plan.
//!
//! Every body includes its braces, like bodies written in declarations.

use capa_ir::TypeReference;

use crate::archetype::ArchetypeKind;
use crate::config::ModelConfig;
use crate::definition::Component;
use crate::method::MethodDefinition;

/// A composite component and the archetype its type carries, if any.
#[derive(Clone, Debug)]
pub struct CompositePart<'a> {
    pub component: &'a Component,
    pub archetype: Option<ArchetypeKind>,
}

#[derive(Copy, Clone, Debug)]
pub struct MethodSynthesizer<'a> {
    config: &'a ModelConfig,
}

impl<'a> MethodSynthesizer<'a> {
    pub fn new(config: &'a ModelConfig) -> Self {
        MethodSynthesizer { config }
    }

    /// `{ return Dsl.conversion(this).method(args); }`
    ///
    /// With `cast`, the receiver is cast to that capability so the factory
    /// overload is unambiguous.
    pub fn delegation(
        &self,
        conversion: &str,
        cast: Option<&TypeReference>,
        method: &MethodDefinition,
    ) -> String {
        let receiver = match cast {
            Some(source) => format!("({source}) this"),
            None => "this".to_string(),
        };
        let args: Vec<&str> = method.params().iter().map(|p| p.name.as_str()).collect();
        let call = format!(
            "{}.{}({}).{}({})",
            self.config.factory_name,
            conversion,
            receiver,
            method.name(),
            args.join(", ")
        );
        statement(method.result().is_some(), &call)
    }

    /// `{ return Sql.of(this.left.$sql(), this.value); }`
    pub fn composite(&self, kind: ArchetypeKind, parts: &[CompositePart<'_>]) -> String {
        let exprs: Vec<String> = parts
            .iter()
            .map(|part| match part.archetype {
                Some(inner) => format!("this.{}.{}()", part.component.name, inner.method_name()),
                None => format!("this.{}", part.component.name),
            })
            .collect();
        statement(
            true,
            &format!("{}.of({})", kind.runtime_type(), exprs.join(", ")),
        )
    }

    /// `{ return new SelectImpl<>(from, where); }`
    pub fn factory(&self, composite: &str, generic: bool, components: &[Component]) -> String {
        let diamond = if generic { "<>" } else { "" };
        let args: Vec<&str> = components.iter().map(|c| c.name.as_str()).collect();
        statement(
            true,
            &format!("new {composite}{diamond}({})", args.join(", ")),
        )
    }

    /// `private final T name;` per component.
    pub fn fields(&self, components: &[Component]) -> Vec<String> {
        components
            .iter()
            .map(|c| format!("private final {} {};", c.ty, c.name))
            .collect()
    }

    /// Constructor assigning every component field.
    pub fn constructor(&self, composite: &str, components: &[Component]) -> String {
        let params: Vec<String> = components
            .iter()
            .map(|c| format!("{} {}", c.ty, c.name))
            .collect();
        let mut out = format!("{composite}({}) {{", params.join(", "));
        for c in components {
            out.push_str(&format!("\n    this.{0} = {0};", c.name));
        }
        out.push_str("\n}");
        out
    }
}

fn statement(returns: bool, expr: &str) -> String {
    if returns {
        format!("{{ return {expr}; }}")
    } else {
        format!("{{ {expr}; }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::{MethodBuilder, Param};
    use pretty_assertions::assert_eq;

    fn component(name: &str, ty: &str) -> Component {
        Component {
            name: name.to_string(),
            ty: TypeReference::named(ty),
        }
    }

    #[test]
    fn delegation_with_and_without_result() {
        let config = ModelConfig::default();
        let synth = MethodSynthesizer::new(&config);
        let get = MethodBuilder::new("limit")
            .result(Some(TypeReference::named("Select")))
            .param(Param::new(TypeReference::named("int"), "n"))
            .build("Table", &[]);
        assert_eq!(
            synth.delegation("select", None, &get),
            "{ return Dsl.select(this).limit(n); }"
        );

        let run = MethodBuilder::new("execute").build("Table", &[]);
        let source = TypeReference::named("Condition");
        assert_eq!(
            synth.delegation("select", Some(&source), &run),
            "{ Dsl.select((Condition) this).execute(); }"
        );
    }

    #[test]
    fn composite_body_unwraps_archetype_components() {
        let config = ModelConfig::default();
        let synth = MethodSynthesizer::new(&config);
        let left = component("left", "Condition");
        let value = component("value", "String");
        let parts = [
            CompositePart {
                component: &left,
                archetype: Some(ArchetypeKind::Sql),
            },
            CompositePart {
                component: &value,
                archetype: None,
            },
        ];
        assert_eq!(
            synth.composite(ArchetypeKind::Query, &parts),
            "{ return Query.of(this.left.$sql(), this.value); }"
        );
    }

    #[test]
    fn factory_and_members() {
        let config = ModelConfig::default();
        let synth = MethodSynthesizer::new(&config);
        let parts = [component("from", "Table"), component("where", "Condition")];
        assert_eq!(
            synth.factory("SelectImpl", true, &parts),
            "{ return new SelectImpl<>(from, where); }"
        );
        assert_eq!(
            synth.fields(&parts),
            vec!["private final Table from;", "private final Condition where;"]
        );
        assert_eq!(
            synth.constructor("SelectImpl", &parts),
            "SelectImpl(Table from, Condition where) {\n    this.from = from;\n    this.where = where;\n}"
        );
    }
}
