//! The explicit diagnostic sink.
//!
//! One sink is constructed by the caller for a run and handed by `&mut` to
//! every pass. Passes push diagnostics as they find them; the sink keeps them
//! in arrival order, drops exact duplicates, and mirrors each one to
//! `tracing` for developer logs.

use rustc_hash::FxHashSet;

use crate::{Diagnostic, Severity};

/// Sink behaviour.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct SinkConfig {
    /// Maximum number of warnings kept (0 = unlimited).
    pub warning_limit: usize,
    /// Drop a diagnostic identical to one already recorded.
    pub deduplicate: bool,
}

impl Default for SinkConfig {
    fn default() -> Self {
        SinkConfig {
            warning_limit: 0,
            deduplicate: true,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct DiagnosticSink {
    diagnostics: Vec<Diagnostic>,
    seen: FxHashSet<Diagnostic>,
    warning_count: usize,
    error_count: usize,
    config: SinkConfig,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SinkConfig) -> Self {
        DiagnosticSink {
            config,
            ..Self::default()
        }
    }

    /// Record a diagnostic.
    ///
    /// Returns `true` if it was kept, `false` if filtered as a duplicate or
    /// over the warning limit.
    pub fn push(&mut self, diagnostic: Diagnostic) -> bool {
        if self.config.deduplicate && self.seen.contains(&diagnostic) {
            return false;
        }
        match diagnostic.severity {
            Severity::Warning => {
                if self.config.warning_limit > 0 && self.warning_count >= self.config.warning_limit
                {
                    return false;
                }
                tracing::warn!(code = %diagnostic.code, "{diagnostic}");
                self.warning_count += 1;
            }
            Severity::Error => {
                tracing::error!(code = %diagnostic.code, "{diagnostic}");
                self.error_count += 1;
            }
        }
        if self.config.deduplicate {
            self.seen.insert(diagnostic.clone());
        }
        self.diagnostics.push(diagnostic);
        true
    }

    #[inline]
    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    #[inline]
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Diagnostics in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| !d.is_error())
    }

    /// Take every diagnostic, sorted by location (unlocated first), leaving
    /// the sink empty.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        let mut out = std::mem::take(&mut self.diagnostics);
        out.sort_by(|a, b| a.location.cmp(&b.location));
        self.seen.clear();
        self.warning_count = 0;
        self.error_count = 0;
        out
    }
}
