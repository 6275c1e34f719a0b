//! Per-run state for the agent loops.
//!
//! | Structure | Used by | Shape |
//! |-----------|---------|-------|
//! | [`History`] | ReAct | `Action:` / `Observation:` lines |
//! | [`Memory`] | Reflection | Execution and Reflection records |
//!
//! Both are single-owner and reset at the start of each run.

pub mod history;
pub mod memory;

pub use history::History;
pub use memory::{Memory, Record, RecordKind};
