//! Diagnostics returned by lifecycle operations
//!
//! Operations never short-circuit with `Err`. They return a [`Response`]
//! carrying the resulting tracked state and zero or more [`Diagnostic`]s in
//! the order they were raised.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Category of a failed operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// Declared value violates a constraint; no request was sent
    Validation,
    /// Request body could not be serialized; no request was sent
    Encode,
    /// Request could not be sent, or did not complete
    Transport,
    /// Device answered with a non-success status other than 404
    UnexpectedStatus,
    /// Response body did not match the expected shape
    Decode,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::Validation => "validation",
            DiagnosticKind::Encode => "encode",
            DiagnosticKind::Transport => "transport",
            DiagnosticKind::UnexpectedStatus => "unexpected-status",
            DiagnosticKind::Decode => "decode",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single reported problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Short, human-readable headline
    pub summary: String,
    /// Longer explanation, including the underlying error text when known
    pub detail: String,
    /// Path of the declared attribute at fault (e.g. `steps[1].direction`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            kind,
            summary: summary.into(),
            detail: detail.into(),
            attribute: None,
        }
    }

    /// Attach the path of the offending attribute
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.summary)?;
        if let Some(attribute) = &self.attribute {
            write!(f, " ({})", attribute)?;
        }
        if !self.detail.is_empty() {
            write!(f, ": {}", self.detail)?;
        }
        Ok(())
    }
}

/// Ordered collection of diagnostics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.0.push(diagnostic);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Every diagnostic is an error; any entry fails the operation
    pub fn has_error(&self) -> bool {
        !self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.0.iter()
    }

    /// Kinds of all diagnostics, in order
    pub fn kinds(&self) -> Vec<DiagnosticKind> {
        self.0.iter().map(|d| d.kind).collect()
    }
}

impl From<Diagnostic> for Diagnostics {
    fn from(diagnostic: Diagnostic) -> Self {
        Self(vec![diagnostic])
    }
}

impl Extend<Diagnostic> for Diagnostics {
    fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Outcome of a lifecycle operation
///
/// `state` is the tracked snapshot the host should keep after the call:
/// `None` means the object is not (or no longer) tracked.
#[derive(Debug, Clone, PartialEq)]
pub struct Response<T> {
    pub state: Option<T>,
    pub diagnostics: Diagnostics,
}

impl<T> Response<T> {
    /// Successful call leaving `state` tracked
    pub fn tracked(state: T) -> Self {
        Self {
            state: Some(state),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Successful call after which nothing is tracked
    pub fn removed() -> Self {
        Self {
            state: None,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Failed call; `state` is whatever was tracked before it
    pub fn failed(state: Option<T>, diagnostics: impl Into<Diagnostics>) -> Self {
        Self {
            state,
            diagnostics: diagnostics.into(),
        }
    }

    pub fn has_error(&self) -> bool {
        self.diagnostics.has_error()
    }

    pub fn is_removed(&self) -> bool {
        self.state.is_none()
    }
}
