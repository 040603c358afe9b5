//! Fatal errors of the model pipeline.
//!
//! Three tiers, each aborting the pass that raises it:
//! - [`DeclarationError`]: malformed or contradictory declarations, found
//!   while loading declarations into the registry
//! - [`ResolutionError`]: contradictions found while resolving inheritance,
//!   archetypes, and conversions
//! - structural: a dependency cycle met while ordering definitions for
//!   emission
//!
//! The one recoverable condition, an ambiguous conversion target, is not an
//! error: it goes to the [`DiagnosticSink`](capa_diagnostic::DiagnosticSink)
//! as a warning.

use std::fmt;

use capa_diagnostic::{Diagnostic, ErrorCode};
use capa_ir::{CyclicDependency, Location};

/// Renders ` [file:line:column]`, or nothing.
struct LocationSuffix<'a>(&'a Option<Location>);

impl fmt::Display for LocationSuffix<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(location) => write!(f, " [{location}]"),
            None => Ok(()),
        }
    }
}

// === Declaration errors ===

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DeclarationErrorKind {
    #[error("duplicate definition `{name}`")]
    DuplicateName { name: String },

    #[error("definition `{name}` differs from `{existing}` only in case")]
    CaseCollision { name: String, existing: String },

    #[error("duplicate method `{signature}` in `{owner}`")]
    DuplicateSignature { owner: String, signature: String },

    #[error("conflicting access modifiers `{first}` and `{second}` on `{item}`")]
    ConflictingAccess {
        item: String,
        first: &'static str,
        second: &'static str,
    },

    #[error(
        "archetype `{kind}` of capability `{capability}` requires {expected} type parameter(s), found {found}"
    )]
    ArchetypeArity {
        capability: String,
        kind: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("unknown archetype `{kind}` on capability `{capability}`")]
    UnknownArchetype { capability: String, kind: String },

    #[error("method `{method}` in `{owner}` uses the reserved prefix `$`")]
    ReservedPrefix { owner: String, method: String },

    #[error("implicit production `{name}` must have exactly one component, found {found}")]
    ImplicitArity { name: String, found: usize },
}

/// A malformed or contradictory declaration.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind}{}", LocationSuffix(.location))]
pub struct DeclarationError {
    pub kind: DeclarationErrorKind,
    pub location: Option<Location>,
}

impl DeclarationError {
    #[cold]
    pub fn new(kind: DeclarationErrorKind, location: Option<Location>) -> Self {
        DeclarationError { kind, location }
    }

    pub fn code(&self) -> ErrorCode {
        match self.kind {
            DeclarationErrorKind::DuplicateName { .. } => ErrorCode::E1001,
            DeclarationErrorKind::CaseCollision { .. } => ErrorCode::E1002,
            DeclarationErrorKind::DuplicateSignature { .. } => ErrorCode::E1003,
            DeclarationErrorKind::ConflictingAccess { .. } => ErrorCode::E1004,
            DeclarationErrorKind::ArchetypeArity { .. } => ErrorCode::E1005,
            DeclarationErrorKind::UnknownArchetype { .. } => ErrorCode::E1006,
            DeclarationErrorKind::ReservedPrefix { .. } => ErrorCode::E1007,
            DeclarationErrorKind::ImplicitArity { .. } => ErrorCode::E1008,
        }
    }
}

// === Resolution errors ===

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionErrorKind {
    #[error("`{from}` refers to unknown {expected} `{reference}`")]
    UnresolvedReference {
        from: String,
        reference: String,
        expected: &'static str,
    },

    #[error(
        "name clash in `{owner}`: `{signature}` from `{first}` and `{second}` have incompatible shapes"
    )]
    NameClash {
        owner: String,
        signature: String,
        first: String,
        second: String,
    },

    #[error("`{carrier}` must be concrete but has no implementation of `{method}`")]
    MissingImplementation { carrier: String, method: String },

    #[error("`{from}` passes {found} type argument(s) to `{reference}`, which declares {expected}")]
    ArgumentCount {
        from: String,
        reference: String,
        expected: usize,
        found: usize,
    },

    #[error("cyclic inheritance: {}", .chain.join(" -> "))]
    CyclicInheritance { chain: Vec<String> },
}

/// A contradiction found while resolving the model.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind}{}", LocationSuffix(.location))]
pub struct ResolutionError {
    pub kind: ResolutionErrorKind,
    pub location: Option<Location>,
}

impl ResolutionError {
    #[cold]
    pub fn new(kind: ResolutionErrorKind, location: Option<Location>) -> Self {
        ResolutionError { kind, location }
    }

    pub fn code(&self) -> ErrorCode {
        match self.kind {
            ResolutionErrorKind::UnresolvedReference { .. } => ErrorCode::E2001,
            ResolutionErrorKind::NameClash { .. } => ErrorCode::E2002,
            ResolutionErrorKind::MissingImplementation { .. } => ErrorCode::E2003,
            ResolutionErrorKind::ArgumentCount { .. } => ErrorCode::E2004,
            ResolutionErrorKind::CyclicInheritance { .. } => ErrorCode::E2005,
        }
    }
}

// === Pipeline error ===

/// Any fatal error of the pipeline.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error(transparent)]
    Declaration(#[from] DeclarationError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Structural(#[from] CyclicDependency<String>),
}

impl ModelError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ModelError::Declaration(err) => err.code(),
            ModelError::Resolution(err) => err.code(),
            ModelError::Structural(_) => ErrorCode::E3001,
        }
    }

    pub fn location(&self) -> Option<&Location> {
        match self {
            ModelError::Declaration(err) => err.location.as_ref(),
            ModelError::Resolution(err) => err.location.as_ref(),
            ModelError::Structural(_) => None,
        }
    }

    /// Convert to a diagnostic for rendering at the driver boundary.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let message = match self {
            ModelError::Declaration(err) => err.kind.to_string(),
            ModelError::Resolution(err) => err.kind.to_string(),
            ModelError::Structural(err) => err.to_string(),
        };
        Diagnostic::error(self.code())
            .with_message(message)
            .with_location(self.location().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn declaration_error_display_carries_location() {
        let err = DeclarationError::new(
            DeclarationErrorKind::CaseCollision {
                name: "select".to_string(),
                existing: "Select".to_string(),
            },
            Some(Location::new("grammar.capa", 12, 3)),
        );
        assert_eq!(
            err.to_string(),
            "definition `select` differs from `Select` only in case [grammar.capa:12:3]"
        );
    }

    #[test]
    fn unlocated_error_has_no_suffix() {
        let err = ResolutionError::new(
            ResolutionErrorKind::CyclicInheritance {
                chain: vec!["A".to_string(), "B".to_string(), "A".to_string()],
            },
            None,
        );
        assert_eq!(err.to_string(), "cyclic inheritance: A -> B -> A");
    }

    #[test]
    fn model_error_maps_to_diagnostic() {
        let err: ModelError = ResolutionError::new(
            ResolutionErrorKind::MissingImplementation {
                carrier: "SelectImpl".to_string(),
                method: "limit(int)".to_string(),
            },
            Some(Location::new("g.capa", 1, 1)),
        )
        .into();
        let diag = err.to_diagnostic();
        assert_eq!(diag.code, ErrorCode::E2003);
        assert_eq!(
            diag.to_string(),
            "`SelectImpl` must be concrete but has no implementation of `limit(int)` [g.capa:1:1]"
        );
        assert_eq!(diag.to_string(), err.to_string());
    }

    #[test]
    fn structural_error_code() {
        let err = ModelError::from(CyclicDependency {
            remaining: vec!["A".to_string(), "B".to_string()],
        });
        assert_eq!(err.code(), ErrorCode::E3001);
        assert_eq!(err.to_string(), "cyclic dependency among A, B");
    }
}
