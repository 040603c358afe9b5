//! Loading declaration units.
//!
//! The parser collaborator hands the engine a JSON array of
//! [`DeclUnit`]s; type references inside are written in their textual form
//! (`java.util.List<? extends T>`).

use std::path::{Path, PathBuf};

use capa_ir::ast::DeclUnit;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot read `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed declaration units in `{}`: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Read and parse a declaration-unit file.
pub fn load_units(path: &Path) -> Result<Vec<DeclUnit>, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let units = parse_units(&text).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), units = units.len(), "units loaded");
    Ok(units)
}

pub fn parse_units(text: &str) -> Result<Vec<DeclUnit>, serde_json::Error> {
    serde_json::from_str(text)
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use capa_ir::ast::Declaration;
    use capa_ir::TypeReference;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_tagged_declarations() {
        let text = r#"[{
            "file": "select.capa",
            "declarations": [
                {
                    "kind": "capability",
                    "name": "Select",
                    "type_params": [{ "name": "R" }],
                    "archetype": "query",
                    "location": { "file": "select.capa", "line": 1, "column": 1 }
                },
                {
                    "kind": "production",
                    "implicit": true,
                    "name": "asCondition",
                    "type_params": [{ "name": "R" }],
                    "target": "Condition",
                    "components": [{ "name": "query", "type": "Select<R>" }],
                    "location": { "file": "select.capa", "line": 4, "column": 1 }
                }
            ]
        }]"#;
        let units = parse_units(text).unwrap();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].declarations.len(), 2);

        let Declaration::Production(production) = &units[0].declarations[1] else {
            panic!("expected a production");
        };
        assert!(production.implicit);
        assert_eq!(
            production.components[0].ty,
            "Select<R>".parse::<TypeReference>().unwrap()
        );
    }

    #[test]
    fn rejects_malformed_type() {
        let text = r#"[{
            "file": "bad.capa",
            "declarations": [{
                "kind": "carrier",
                "name": "K",
                "superclass": "Base<",
                "location": { "file": "bad.capa", "line": 1, "column": 1 }
            }]
        }]"#;
        assert!(parse_units(text).is_err());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_units(Path::new("/nonexistent/units.json")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().starts_with("cannot read `/nonexistent/units.json`"));
    }
}
