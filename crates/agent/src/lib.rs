//! The agent loops: where model text becomes tool calls and answers.
//!
//! Each loop sends one prompt per turn to the LLM and decides what to do
//! with the reply:
//!
//! 1. **ReAct** parses `Thought:`/`Action:` text, dispatches tools, and
//!    feeds observations back until `Finish[...]` or the step cap
//! 2. **Plan-and-Execute** turns a fenced JSON plan into sequential steps
//! 3. **Reflection** iterates generate → critique → refine over [`Memory`]
//!
//! LLM and parse failures abort a run; tool failures become observations.

pub mod context;
pub mod llm;
pub mod parser;
pub mod patterns;
pub mod prompts;

pub use context::{History, Memory, Record, RecordKind};
pub use llm::LlmClient;
pub use parser::{ModelTurn, parse, parse_action};
pub use patterns::{
    Executor, Plan, PlanExecuteAgent, PlanExecuteResult, Planner, ReactAgent, ReactOutcome,
    ReactResult, ReflectionAgent, ReflectionResult, StepResult, parse_plan,
};
