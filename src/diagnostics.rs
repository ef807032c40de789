//! Diagnostic side channel
//!
//! Conversion is lossy on purpose: unsupported tokens and sub-results that fail their shape
//! check are dropped without a word. The exception is a table cell that fails to build. A
//! missing cell is more likely an integration bug than an authoring choice, so it is reported
//! through a [`DiagnosticSink`] before being dropped.
//!
//! The sink is injected into the [`Transformer`](crate::transform::Transformer), keeping the
//! core free of hardcoded output:
//!
//! - [`TracingSink`]: emits a `warn` event through `tracing` (the default)
//! - [`CollectingSink`]: keeps diagnostics in memory for the caller to inspect
//! - [`NullSink`]: discards everything

use crate::adf::Node;
use serde::Serialize;
use serde_json::Value;
use std::cell::RefCell;
use std::fmt;
use tracing::warn;

/// What went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A node could not be built because its recursively converted content failed the
    /// content shape check.
    BuildFailure,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::BuildFailure => write!(f, "build failure"),
        }
    }
}

/// A non-fatal report raised while transforming.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    /// The offending input fragment, serialized.
    pub source: Value,
    /// What the fragment converted to before it was rejected.
    pub transformed: Vec<Node>,
}

impl Diagnostic {
    pub fn build_failure(message: impl Into<String>, source: Value, transformed: Vec<Node>) -> Self {
        Self {
            kind: DiagnosticKind::BuildFailure,
            message: message.into(),
            source,
            transformed,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} (source: {}", self.kind, self.message, self.source)?;
        let kinds: Vec<&str> = self.transformed.iter().map(Node::type_name).collect();
        write!(f, ", transformed: [{}])", kinds.join(", "))
    }
}

/// Receiver of diagnostics raised during a transform.
pub trait DiagnosticSink {
    fn emit(&self, diagnostic: Diagnostic);
}

impl<T: DiagnosticSink + ?Sized> DiagnosticSink for &T {
    fn emit(&self, diagnostic: Diagnostic) {
        (**self).emit(diagnostic)
    }
}

impl<T: DiagnosticSink + ?Sized> DiagnosticSink for Box<T> {
    fn emit(&self, diagnostic: Diagnostic) {
        (**self).emit(diagnostic)
    }
}

/// Reports diagnostics as structured `warn` events on the `mdadf::diagnostics` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        let transformed = serde_json::to_string(&diagnostic.transformed).unwrap_or_default();
        warn!(
            target: "mdadf::diagnostics",
            kind = %diagnostic.kind,
            cell = %diagnostic.source,
            transformed = %transformed,
            "{}",
            diagnostic.message
        );
    }
}

/// Keeps every diagnostic for later inspection.
#[derive(Debug, Default)]
pub struct CollectingSink {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the diagnostics collected so far.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    /// Drain the collected diagnostics.
    pub fn take(&self) -> Vec<Diagnostic> {
        self.diagnostics.take()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.borrow().is_empty()
    }
}

impl DiagnosticSink for CollectingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&self, _diagnostic: Diagnostic) {}
}
