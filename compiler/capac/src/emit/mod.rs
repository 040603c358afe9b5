//! Java rendering of a sealed model.
//!
//! One source per definition, in the model's emission order. The layout of a
//! source is fixed:
//!
//! ```text
//! package <package>;
//!
//! import <line>;
//!
//! <doc><header> {
//!     <pass-through declarations>
//!
//!     <comment><declaration><body-or-semicolon>
//! }
//! ```
//!
//! The emitter only reads the model; every decision about what a definition
//! contains was made by the engine.


use std::path::{Path, PathBuf};

use capa_ir::ast::Modifier;
use capa_ir::display_params;
use capa_model::{DefinitionKind, MethodBody, MethodDefinition, MethodFlags, Model, TypeDefinition};

const INDENT: &str = "    ";

/// A rendered compilation unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Source {
    /// Definition name; the file is `<name>.java`.
    pub name: String,
    pub text: String,
}

impl Source {
    pub fn file_name(&self) -> String {
        format!("{}.java", self.name)
    }
}

/// Renders every definition of a model as Java source text.
pub struct JavaEmitter<'a> {
    model: &'a Model,
    package: Option<&'a str>,
}

impl<'a> JavaEmitter<'a> {
    pub fn new(model: &'a Model, package: Option<&'a str>) -> Self {
        JavaEmitter { model, package }
    }

    /// Every definition, in emission order.
    pub fn sources(&self) -> Vec<Source> {
        self.model
            .definitions()
            .map(|definition| Source {
                name: definition.name.clone(),
                text: self.render(definition),
            })
            .collect()
    }

    pub fn render(&self, definition: &TypeDefinition) -> String {
        let mut out = String::new();
        if let Some(package) = self.package {
            out.push_str(&format!("package {package};\n\n"));
        }

        let imports = self.model.imports(&definition.name);
        if !imports.is_empty() {
            for import in imports {
                out.push_str(&format!("import {import};\n"));
            }
            out.push('\n');
        }

        if let Some(doc) = &definition.doc {
            out.push_str(&doc_comment(doc));
        }
        out.push_str(&self.header(definition));
        out.push_str(" {\n");

        let members: Vec<String> = definition
            .passthrough
            .iter()
            .cloned()
            .chain(
                definition
                    .methods
                    .iter()
                    .map(|method| render_method(definition.kind(), method)),
            )
            .collect();
        for (i, member) in members.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&indent(member));
        }
        out.push_str("}\n");
        out
    }

    /// `public abstract class Name<T> extends Base implements A, B`
    pub fn header(&self, definition: &TypeDefinition) -> String {
        let implicitly_abstract = definition.kind() == DefinitionKind::Carrier
            && !definition.has_modifier(Modifier::Abstract)
            && self.model.is_abstract(&definition.name);

        let mut words: Vec<&str> = definition
            .modifiers
            .iter()
            .filter(|m| m.is_access())
            .map(|m| m.keyword())
            .collect();
        if implicitly_abstract {
            words.push("abstract");
        }
        words.extend(
            definition
                .modifiers
                .iter()
                .filter(|m| !m.is_access())
                .map(|m| m.keyword()),
        );
        words.push(definition.policy().keyword);

        let mut out = words.join(" ");
        out.push(' ');
        out.push_str(&definition.name);
        out.push_str(&display_params(&definition.type_params));

        let extends = definition.extends_clause();
        if !extends.is_empty() {
            out.push_str(" extends ");
            out.push_str(&join(extends.iter().map(ToString::to_string)));
        }
        let implements = definition.implements_clause();
        if !implements.is_empty() {
            out.push_str(" implements ");
            out.push_str(&join(implements.iter().map(ToString::to_string)));
        }
        out
    }
}

/// `<comment><declaration><body-or-semicolon>` for one method of a
/// definition of `kind`.
pub fn render_method(kind: DefinitionKind, method: &MethodDefinition) -> String {
    let mut out = String::new();
    if let Some(doc) = method.doc() {
        out.push_str(&doc_comment(doc));
    }

    let mut words: Vec<String> = Vec::new();
    if let Some(access) = method.access().keyword() {
        words.push(access.to_string());
    }
    match kind {
        DefinitionKind::Capability => {
            if method.is_static() {
                words.push("static".to_string());
            } else if !method.is_abstract() {
                words.push("default".to_string());
            }
        }
        DefinitionKind::Carrier => {
            if method.is_abstract() {
                words.push("abstract".to_string());
            }
            if method.is_static() {
                words.push("static".to_string());
            }
            if method.flags().contains(MethodFlags::FINAL) {
                words.push("final".to_string());
            }
        }
    }
    if !method.type_params().is_empty() {
        words.push(display_params(method.type_params()));
    }
    words.push(
        method
            .result()
            .map_or_else(|| "void".to_string(), ToString::to_string),
    );

    let params = join(method.params().iter().map(|param| {
        let mut text = String::new();
        for modifier in &param.modifiers {
            text.push_str(modifier.keyword());
            text.push(' ');
        }
        text.push_str(&param.ty.to_string());
        if param.variadic {
            text.push_str("...");
        }
        text.push(' ');
        text.push_str(&param.name);
        text
    }));
    words.push(format!("{}({params})", method.name()));
    if !method.throws().is_empty() {
        words.push(format!(
            "throws {}",
            join(method.throws().iter().map(ToString::to_string))
        ));
    }

    out.push_str(&words.join(" "));
    match method.body() {
        MethodBody::Abstract => out.push(';'),
        MethodBody::Literal(body) => {
            out.push(' ');
            out.push_str(body);
        }
    }
    out
}

/// Write every source into `dir`, creating it if needed.
pub fn write_sources(sources: &[Source], dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(sources.len());
    for source in sources {
        let path = dir.join(source.file_name());
        std::fs::write(&path, &source.text)?;
        tracing::trace!(path = %path.display(), "source written");
        written.push(path);
    }
    Ok(written)
}

fn doc_comment(doc: &str) -> String {
    let lines: Vec<&str> = doc.lines().collect();
    if let [line] = lines.as_slice() {
        return format!("/** {line} */\n");
    }
    let mut out = String::from("/**\n");
    for line in lines {
        if line.is_empty() {
            out.push_str(" *\n");
        } else {
            out.push_str(&format!(" * {line}\n"));
        }
    }
    out.push_str(" */\n");
    out
}

fn indent(text: &str) -> String {
    let mut out = String::new();
    for line in text.lines() {
        if !line.is_empty() {
            out.push_str(INDENT);
            out.push_str(line);
        }
        out.push('\n');
    }
    out
}

fn join(items: impl Iterator<Item = String>) -> String {
    items.collect::<Vec<_>>().join(", ")
}
