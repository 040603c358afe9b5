//! Semantic model and synthesis engine for the capa compiler.
//!
//! Takes pre-parsed declaration units ([`capa_ir::ast`]) and builds a
//! [`Model`]: every capability and carrier with its full method set,
//! synthesized archetype contracts, factory methods, composite carriers, and
//! the delegating implementations discovered by the multi-hop conversion
//! closure.
//!
//! # Phases
//!
//! A [`ModelBuilder`] is mutated in place by each pass of [`compile`], then
//! sealed into an immutable [`Model`] that the emitter reads. Fatal problems
//! are [`ModelError`]s; recoverable ones are warnings pushed into the
//! caller's [`capa_diagnostic::DiagnosticSink`].

mod archetype;
mod builder;
mod closure;
mod config;
mod conversion;
mod declare;
mod definition;
mod error;
mod method;
mod model;
mod pipeline;
mod remaining;
mod synth;

#[cfg(test)]
mod test_support;

pub use archetype::{Archetype, ArchetypeKind, RESERVED_PREFIX};
pub use builder::ModelBuilder;
pub use closure::resolve_closure;
pub use config::ModelConfig;
pub use conversion::ImplicitConversion;
pub use definition::{
    all_methods, AbstractRule, AccessRule, CapabilityDetail, CarrierDetail, Component, Composite,
    DefinitionKind, DefinitionLookup, ImplementedCapability, KindPolicy, TypeDefinition, TypeDetail,
};
pub use error::{
    DeclarationError, DeclarationErrorKind, ModelError, ResolutionError,
    ResolutionErrorKind,
};
pub use method::{
    Access, ErasedType, MethodBody, MethodBuilder, MethodDefinition, MethodFlags, MethodTable,
    Param, ReducedSignature, Signature,
};
pub use model::Model;
pub use pipeline::compile;
pub use synth::{CompositePart, MethodSynthesizer};
