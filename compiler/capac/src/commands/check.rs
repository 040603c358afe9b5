//! The `check` command: run the engine without writing anything.

use super::{compile_input, BuildOptions, CommandError, Report};

#[tracing::instrument(level = "debug", skip_all, fields(input = ?options.input))]
pub fn check(options: &BuildOptions) -> Result<Report, CommandError> {
    let (model, warnings) = compile_input(options)?;
    Ok(Report {
        definitions: model.len(),
        warnings,
        written: Vec::new(),
    })
}
