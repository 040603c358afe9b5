//! Command handlers for the capa compiler CLI.
//!
//! Each submodule implements one command. Handlers return a [`Report`] or a
//! [`CommandError`] and never print; `main.rs` owns the terminal.

mod build;
mod check;
mod explain;

use std::path::PathBuf;

use capa_diagnostic::{Diagnostic, DiagnosticSink};
use capa_model::{compile, Model, ModelError};

use crate::load::{load_units, LoadError};

pub use build::{build, parse_build_options, BuildOptions};
pub use check::check;
pub use explain::explain_code;

/// What a successful command did.
#[derive(Debug, Default)]
pub struct Report {
    /// Number of definitions in the sealed model.
    pub definitions: usize,
    pub warnings: Vec<Diagnostic>,
    /// Files written, in emission order. Empty for `check`.
    pub written: Vec<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("missing input file")]
    MissingInput,

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("compilation failed: {error}")]
    Compile {
        error: ModelError,
        /// Warnings recorded before the failing pass.
        warnings: Vec<Diagnostic>,
    },

    #[error("cannot write sources to `{}`: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl CommandError {
    /// Everything worth showing the user, warnings first.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        match self {
            CommandError::Compile { error, warnings } => {
                let mut all = warnings.clone();
                all.push(error.to_diagnostic());
                all
            }
            _ => Vec::new(),
        }
    }
}

/// Load the input named by `options` and run the engine over it.
pub(crate) fn compile_input(
    options: &BuildOptions,
) -> Result<(Model, Vec<Diagnostic>), CommandError> {
    let input = options.input.as_deref().ok_or(CommandError::MissingInput)?;
    let units = load_units(input)?;

    let mut sink = DiagnosticSink::with_config(options.sink_config());
    match compile(&units, options.model_config(), &mut sink) {
        Ok(model) => Ok((model, sink.flush())),
        Err(error) => Err(CommandError::Compile {
            error,
            warnings: sink.flush(),
        }),
    }
}
