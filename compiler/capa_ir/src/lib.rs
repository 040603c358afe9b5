//! Intermediate representation shared by every capa compiler phase.
//!
//! - [`Location`]: `file:line:column` positions attached to declarations
//! - [`ast`]: the closed set of pre-parsed declaration kinds the engine walks
//! - [`types`]: type references, parameters, arguments, and substitution
//! - [`toposort`]: dependency ordering over arbitrary keys
//!
//! Nothing in this crate knows about capabilities or carriers as semantic
//! entities; that lives in `capa_model`.

pub mod ast;
mod location;
pub mod toposort;
pub mod types;

pub use location::Location;
pub use toposort::{CyclicDependency, DependencySort};
pub use types::{
    display_params, substitute, substitute_argument, BoundDirection, ParseTypeError, TypeArgument,
    TypeParameter, TypeReference, TypeSegment, Wildcard, WildcardBound, OBJECT,
};
