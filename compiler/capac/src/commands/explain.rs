//! The `explain` command: describe a diagnostic code.

use capa_diagnostic::ErrorCode;

/// Description of `code` (`E2003`, `W4001`, ...), or `None` if unknown.
pub fn explain_code(code: &str) -> Option<&'static str> {
    code.parse::<ErrorCode>().ok().map(|code| code.description())
}
