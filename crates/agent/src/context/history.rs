//! The reason-act transcript: alternating `Action:` / `Observation:` lines.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct History {
    entries: Vec<String>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one completed step. Always adds exactly two entries.
    pub fn push_step(&mut self, action: &str, observation: &str) {
        self.entries.push(format!("Action: {action}"));
        self.entries.push(format!("Observation: {observation}"));
    }

    /// The transcript as it appears in the next prompt.
    pub fn render(&self) -> String {
        self.entries.join("\n")
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
