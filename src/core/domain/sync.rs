//! Per-entry outcomes of a pull, push or exec run.

use std::fmt;

/// Where a secret lives locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretKind {
    File,
    EnvVar,
}

impl fmt::Display for SecretKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecretKind::File => f.write_str("File"),
            SecretKind::EnvVar => f.write_str("EnvVar"),
        }
    }
}

/// Why an entry was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    PullOnly,
    Unsupported,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::PullOnly => f.write_str("pull only"),
            SkipReason::Unsupported => f.write_str("unsupported"),
        }
    }
}

/// What happened to one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Pulled,
    Pushed,
    Skipped(SkipReason),
}

/// Outcome of a single named secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub kind: SecretKind,
    pub name: String,
    pub outcome: Outcome,
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.outcome {
            Outcome::Pulled => write!(f, "[{}] Pulled: {}", self.kind, self.name),
            Outcome::Pushed => write!(f, "[{}] Pushed: {}", self.kind, self.name),
            Outcome::Skipped(reason) => {
                write!(f, "[{}] Skipped: {} ({})", self.kind, self.name, reason)
            }
        }
    }
}

/// Result of a sync operation, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub entries: Vec<Entry>,
}

impl SyncReport {
    pub fn record(&mut self, kind: SecretKind, name: &str, outcome: Outcome) {
        self.entries.push(Entry {
            kind,
            name: name.to_string(),
            outcome,
        });
    }

    pub fn skipped(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, Outcome::Skipped(_)))
            .count()
    }

    pub fn completed(&self) -> usize {
        self.entries.len() - self.skipped()
    }
}
