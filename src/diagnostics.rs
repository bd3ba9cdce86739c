//! Append-only, non-fatal diagnostics collected during emission.
//!
//! Diagnostics never change emission policy (§4.9 design note) — they are
//! collected purely to be printed at the end of a run. The collector is
//! threaded explicitly through the pipeline rather than kept as ambient
//! global state.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A member or flatten-field name collided with a C++23 keyword and was
    /// escaped with a trailing underscore.
    KeywordEscape,
    /// An optional boolean property's documentation suggests `true` is the
    /// default when omitted, but the emitted default is always unspecified.
    SuspiciousOptionalBoolDefault,
    /// A single-inheritance override was not a safe subtype narrowing; both
    /// members were kept and left for the collision-renamer to disambiguate.
    UnsafeOverride,
    /// Two members in the same struct resolved to the same base name after
    /// sanitization; the later one was suffixed `_2`, `_3`, ...
    MemberCollision,
    /// The dependency graph was not a DAG; remaining nodes were appended in
    /// sorted order so emission could still complete.
    GraphAnomaly,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// The schema name (struct/enum/alias) the diagnostic concerns, if any.
    pub subject: Option<String>,
    pub message: String,
}

/// Append-only diagnostics sink, partitioned by [`DiagnosticKind`] only at
/// read time (`by_kind`) — storage itself is a single ordered list so that
/// diagnostics are printed in the order they were raised.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: DiagnosticKind, subject: Option<String>, message: impl Into<String>) {
        self.entries.push(Diagnostic {
            kind,
            subject,
            message: message.into(),
        });
    }

    pub fn keyword_escape(&mut self, subject: impl Into<String>, message: impl Into<String>) {
        self.push(DiagnosticKind::KeywordEscape, Some(subject.into()), message);
    }

    pub fn suspicious_optional_bool_default(&mut self, subject: impl Into<String>, message: impl Into<String>) {
        self.push(DiagnosticKind::SuspiciousOptionalBoolDefault, Some(subject.into()), message);
    }

    pub fn unsafe_override(&mut self, subject: impl Into<String>, message: impl Into<String>) {
        self.push(DiagnosticKind::UnsafeOverride, Some(subject.into()), message);
    }

    pub fn member_collision(&mut self, subject: impl Into<String>, message: impl Into<String>) {
        self.push(DiagnosticKind::MemberCollision, Some(subject.into()), message);
    }

    pub fn graph_anomaly(&mut self, message: impl Into<String>) {
        self.push(DiagnosticKind::GraphAnomaly, None, message);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn by_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(move |d| d.kind == kind)
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.subject {
            Some(subject) => write!(f, "[{:?}] {}: {}", self.kind, subject, self.message),
            None => write!(f, "[{:?}] {}", self.kind, self.message),
        }
    }
}
