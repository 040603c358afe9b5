//! The pass pipeline.
//!
//! Passes run strictly in this order, each relying on what the previous
//! ones established:
//!
//! 1. declare capabilities
//! 2. declare carriers
//! 3. resolve archetypes (contract methods must exist before any
//!    inheritance resolution, since they take part in conflict checks)
//! 4. resolve conversions (productions, factory methods, delegable sets)
//! 5. multi-hop conversion closure
//! 6. remaining synthesis (composite bodies, concreteness)
//! 7. seal
//!
//! The first fatal error aborts the run. The diagnostic sink only receives
//! recoverable warnings.


use capa_diagnostic::DiagnosticSink;
use capa_ir::ast::DeclUnit;

use crate::archetype::resolve_archetypes;
use crate::builder::ModelBuilder;
use crate::closure::resolve_closure;
use crate::config::ModelConfig;
use crate::declare::{declare_capabilities, declare_carriers, declare_productions};
use crate::error::ModelError;
use crate::model::Model;
use crate::remaining::synthesize_remaining;

/// Run every pass over `units` and seal the result.
#[tracing::instrument(level = "debug", skip_all, fields(units = units.len()))]
pub fn compile(
    units: &[DeclUnit],
    config: ModelConfig,
    sink: &mut DiagnosticSink,
) -> Result<Model, ModelError> {
    let mut builder = ModelBuilder::new(config);
    declare_capabilities(&mut builder, units)?;
    declare_carriers(&mut builder, units)?;
    resolve_archetypes(&mut builder)?;
    declare_productions(&mut builder, units)?;
    resolve_closure(&mut builder, sink)?;
    synthesize_remaining(&mut builder)?;
    let model = builder.seal()?;
    tracing::debug!(definitions = model.len(), warnings = sink.warning_count(), "compile complete");
    Ok(model)
}
