//! The `build` command: compile declaration units and write Java sources.

use std::path::PathBuf;

use capa_diagnostic::SinkConfig;
use capa_model::ModelConfig;

use super::{compile_input, CommandError, Report};
use crate::emit::{write_sources, JavaEmitter};

/// Directory used when `--out=` is not given.
pub const DEFAULT_OUT_DIR: &str = "generated";

/// Options for `build` and `check`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Declaration-unit JSON file (first non-flag argument)
    pub input: Option<PathBuf>,
    /// Output directory (--out=<dir>)
    pub out_dir: Option<PathBuf>,
    /// Java package of every emitted source (--package=<pkg>)
    pub package: Option<String>,
    /// Entry-point class name (--factory=<Name>)
    pub factory: Option<String>,
    /// Package of the archetype runtime types (--runtime=<pkg>)
    pub runtime_package: Option<String>,
    /// Keep at most this many warnings (--max-warnings=<n>, 0 = unlimited)
    pub warning_limit: Option<usize>,
    /// List every written file (-v, --verbose)
    pub verbose: bool,
}

impl BuildOptions {
    /// Overlay every option `other` sets.
    pub fn merge(&mut self, other: &Self) {
        if other.input.is_some() {
            self.input.clone_from(&other.input);
        }
        if other.out_dir.is_some() {
            self.out_dir.clone_from(&other.out_dir);
        }
        if other.package.is_some() {
            self.package.clone_from(&other.package);
        }
        if other.factory.is_some() {
            self.factory.clone_from(&other.factory);
        }
        if other.runtime_package.is_some() {
            self.runtime_package.clone_from(&other.runtime_package);
        }
        if other.warning_limit.is_some() {
            self.warning_limit = other.warning_limit;
        }
        self.verbose |= other.verbose;
    }

    pub fn output_dir(&self) -> PathBuf {
        self.out_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR))
    }

    /// Engine configuration: defaults overridden by `--factory=` and
    /// `--runtime=`.
    pub fn model_config(&self) -> ModelConfig {
        let mut config = ModelConfig::default();
        if let Some(factory) = &self.factory {
            config = config.with_factory_name(factory.as_str());
        }
        if let Some(runtime) = &self.runtime_package {
            config = config.with_runtime_package(runtime.as_str());
        }
        config
    }

    pub fn sink_config(&self) -> SinkConfig {
        SinkConfig {
            warning_limit: self.warning_limit.unwrap_or(0),
            ..SinkConfig::default()
        }
    }
}

/// Parse `build`/`check` arguments (everything after the command name).
///
/// Unknown flags are reported and ignored.
pub fn parse_build_options(args: &[String]) -> BuildOptions {
    let mut options = BuildOptions::default();

    for arg in args {
        if let Some(dir) = arg.strip_prefix("--out=") {
            options.out_dir = Some(PathBuf::from(dir));
        } else if let Some(package) = arg.strip_prefix("--package=") {
            options.package = Some(package.to_string());
        } else if let Some(factory) = arg.strip_prefix("--factory=") {
            options.factory = Some(factory.to_string());
        } else if let Some(runtime) = arg.strip_prefix("--runtime=") {
            options.runtime_package = Some(runtime.to_string());
        } else if let Some(limit) = arg.strip_prefix("--max-warnings=") {
            match limit.parse() {
                Ok(limit) => options.warning_limit = Some(limit),
                Err(_) => eprintln!("warning: invalid warning limit '{limit}', ignoring"),
            }
        } else if arg == "-v" || arg == "--verbose" {
            options.verbose = true;
        } else if arg.starts_with('-') {
            eprintln!("warning: unknown option '{arg}', ignoring");
        } else if options.input.is_none() {
            options.input = Some(PathBuf::from(arg));
        } else {
            eprintln!("warning: extra input '{arg}', ignoring");
        }
    }

    options
}

/// Compile `options.input` and write one source per definition.
#[tracing::instrument(level = "debug", skip_all, fields(input = ?options.input))]
pub fn build(options: &BuildOptions) -> Result<Report, CommandError> {
    let (model, warnings) = compile_input(options)?;

    let sources = JavaEmitter::new(&model, options.package.as_deref()).sources();
    let dir = options.output_dir();
    let written = write_sources(&sources, &dir).map_err(|source| CommandError::Write {
        path: dir.clone(),
        source,
    })?;
    tracing::debug!(files = written.len(), dir = %dir.display(), "build complete");

    Ok(Report {
        definitions: model.len(),
        warnings,
        written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn parses_every_option() {
        let options = parse_build_options(&args(&[
            "grammar.json",
            "--out=src/gen",
            "--package=com.example.sql",
            "--factory=Sql",
            "--runtime=org.example.rt",
            "--max-warnings=20",
            "-v",
        ]));
        assert_eq!(
            options,
            BuildOptions {
                input: Some(PathBuf::from("grammar.json")),
                out_dir: Some(PathBuf::from("src/gen")),
                package: Some("com.example.sql".to_string()),
                factory: Some("Sql".to_string()),
                runtime_package: Some("org.example.rt".to_string()),
                warning_limit: Some(20),
                verbose: true,
            }
        );
    }

    #[test]
    fn defaults_without_flags() {
        let options = parse_build_options(&args(&["grammar.json"]));
        assert_eq!(options.output_dir(), PathBuf::from(DEFAULT_OUT_DIR));
        assert_eq!(options.model_config(), ModelConfig::default());
        assert_eq!(options.sink_config(), SinkConfig::default());
        assert!(!options.verbose);
    }

    #[test]
    fn unknown_flags_and_extra_inputs_are_ignored() {
        let options = parse_build_options(&args(&["a.json", "--release", "b.json"]));
        assert_eq!(options.input, Some(PathBuf::from("a.json")));
        assert_eq!(options.out_dir, None);
    }

    #[test]
    fn merge_keeps_unset_fields() {
        let mut options = parse_build_options(&args(&["a.json", "--package=p"]));
        options.merge(&parse_build_options(&args(&["--factory=Q"])));
        assert_eq!(options.input, Some(PathBuf::from("a.json")));
        assert_eq!(options.package.as_deref(), Some("p"));
        assert_eq!(options.model_config().factory_name, "Q");
        assert_eq!(options.model_config().runtime_package, "capa.runtime");
    }

    #[test]
    fn per_argument_merge_matches_one_pass_parse() {
        let list = args(&["a.json", "--out=o", "--max-warnings=3", "-v", "--factory=Q"]);
        let mut merged = BuildOptions::default();
        for arg in list.chunks(1) {
            merged.merge(&parse_build_options(arg));
        }
        assert_eq!(merged, parse_build_options(&list));
        assert_eq!(merged.sink_config().warning_limit, 3);
        assert!(merged.sink_config().deduplicate);
    }

    #[test]
    fn invalid_warning_limit_is_ignored() {
        let options = parse_build_options(&args(&["a.json", "--max-warnings=many"]));
        assert_eq!(options.warning_limit, None);
        assert_eq!(options.sink_config().warning_limit, 0);
    }
}
