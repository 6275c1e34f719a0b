//! Memory: the ordered record log behind the reflect-refine loop.
//!
//! Records are append-only and never mutated. Two derived views are
//! offered: the rendered [`Memory::trajectory`] and the most recent
//! execution via [`Memory::last_execution`].
//!
//! A `Memory` belongs to exactly one run and is emptied at the start of
//! every `run`; nothing is persisted across process runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

// ── Data Structures ───────────────────────────────────────────────────────

/// What a record holds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// An artifact produced by generate or refine.
    Execution,
    /// A critique of the preceding execution.
    Reflection,
}

impl RecordKind {
    fn heading(self) -> &'static str {
        match self {
            RecordKind::Execution => "--- Previous attempt ---",
            RecordKind::Reflection => "--- Reviewer feedback ---",
        }
    }
}

/// A single immutable entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Record {
    pub kind: RecordKind,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Memory {
    records: Vec<Record>,
}

// ── Implementation ────────────────────────────────────────────────────────

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record. Always succeeds.
    pub fn append(&mut self, kind: RecordKind, content: impl Into<String>) {
        self.records.push(Record {
            kind,
            content: content.into(),
            created_at: Utc::now(),
        });
        debug!(kind = ?kind, total = self.records.len(), "Memory record appended");
    }

    /// Render every record in insertion order as headed blocks separated
    /// by blank lines.
    pub fn trajectory(&self) -> String {
        let mut out = String::new();
        for record in &self.records {
            out.push_str(record.kind.heading());
            out.push('\n');
            out.push_str(&record.content);
            out.push_str("\n\n");
        }
        out.trim().to_string()
    }

    /// Content of the most recent execution record.
    ///
    /// Returns `""` when there is none. Callers must read that as "no
    /// prior attempt", not as an empty artifact.
    pub fn last_execution(&self) -> &str {
        self.last_of(RecordKind::Execution)
    }

    /// Content of the most recent reflection record, or `""`.
    pub fn last_reflection(&self) -> &str {
        self.last_of(RecordKind::Reflection)
    }

    fn last_of(&self, kind: RecordKind) -> &str {
        self.records
            .iter()
            .rev()
            .find(|r| r.kind == kind)
            .map(|r| r.content.as_str())
            .unwrap_or("")
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────
