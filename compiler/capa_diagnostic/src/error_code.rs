//! Error codes for all compiler diagnostics.
//!
//! Format: E#### / W#### where the first digit indicates the tier:
//! - E1xxx: Declaration errors (malformed or contradictory declarations)
//! - E2xxx: Resolution errors (contradictions found while resolving the model)
//! - E3xxx: Structural errors (emission ordering)
//! - W4xxx: Recoverable warnings

use std::fmt;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub enum ErrorCode {
    // Declaration errors (E1xxx)
    /// Two definitions with the same name
    E1001,
    /// Two definitions whose names differ only in case
    E1002,
    /// Two methods with the same erased signature in one declaration
    E1003,
    /// More than one access modifier on one declaration
    E1004,
    /// Archetype with the wrong number of type parameters
    E1005,
    /// Unknown archetype kind
    E1006,
    /// Method name uses the reserved synthesized-method prefix
    E1007,
    /// Malformed production rule
    E1008,

    // Resolution errors (E2xxx)
    /// Reference to an undefined or wrong-kind capability/carrier
    E2001,
    /// Inherited methods with the same signature but incompatible shapes
    E2002,
    /// A carrier that must be concrete lacks a synthesizable implementation
    E2003,
    /// Wrong number of type arguments at an extension site
    E2004,
    /// Inheritance cycle between definitions
    E2005,

    // Structural errors (E3xxx)
    /// Cyclic dependency between definitions at emission-ordering time
    E3001,

    // Warnings (W4xxx)
    /// Two conversions reach the same capability in the same hop
    W4001,
}

impl ErrorCode {
    /// Every code, in numeric order.
    pub const ALL: &[ErrorCode] = &[
        ErrorCode::E1001,
        ErrorCode::E1002,
        ErrorCode::E1003,
        ErrorCode::E1004,
        ErrorCode::E1005,
        ErrorCode::E1006,
        ErrorCode::E1007,
        ErrorCode::E1008,
        ErrorCode::E2001,
        ErrorCode::E2002,
        ErrorCode::E2003,
        ErrorCode::E2004,
        ErrorCode::E2005,
        ErrorCode::E3001,
        ErrorCode::W4001,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E1006 => "E1006",
            ErrorCode::E1007 => "E1007",
            ErrorCode::E1008 => "E1008",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E3001 => "E3001",
            ErrorCode::W4001 => "W4001",
        }
    }

    /// One-line explanation, used by `capac explain`.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "two definitions share a name",
            ErrorCode::E1002 => "two definition names differ only in letter case",
            ErrorCode::E1003 => "two methods in one declaration share an erased signature",
            ErrorCode::E1004 => "conflicting access modifiers",
            ErrorCode::E1005 => "archetype used with the wrong number of type parameters",
            ErrorCode::E1006 => "unknown archetype kind",
            ErrorCode::E1007 => "method name uses the reserved `$` prefix",
            ErrorCode::E1008 => "malformed production rule",
            ErrorCode::E2001 => "unresolvable type reference",
            ErrorCode::E2002 => "inherited methods clash",
            ErrorCode::E2003 => "missing synthesizable implementation",
            ErrorCode::E2004 => "wrong number of type arguments",
            ErrorCode::E2005 => "cyclic inheritance",
            ErrorCode::E3001 => "cyclic dependency between definitions",
            ErrorCode::W4001 => "ambiguous conversion target",
        }
    }

    /// Check if this is a declaration error (E1xxx range).
    pub fn is_declaration_error(&self) -> bool {
        self.as_str().starts_with("E1")
    }

    /// Check if this is a resolution error (E2xxx range).
    pub fn is_resolution_error(&self) -> bool {
        self.as_str().starts_with("E2")
    }

    /// Check if this is a warning code (Wxxxx range).
    pub fn is_warning(&self) -> bool {
        matches!(self, ErrorCode::W4001)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse an error code string like `"E2002"`, case-insensitively.
impl std::str::FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_uppercase();
        Self::ALL
            .iter()
            .find(|code| code.as_str() == upper)
            .copied()
            .ok_or(())
    }
}
