//! Agent patterns: structured control loops over the LLM collaborator.
//!
//! 1. **ReAct**: Thought → Action → Observation loop over the tool registry
//! 2. **Plan-and-Execute**: plan once, then execute every step in order
//! 3. **Reflection**: generate, critique and refine one artifact
//!
//! Every loop takes an explicit bound (step or iteration cap) and a
//! cancellation token.

pub mod plan_execute;
pub mod react;
pub mod reflection;

pub use plan_execute::{
    Executor, Plan, PlanExecuteAgent, PlanExecuteResult, Planner, StepResult, parse_plan,
};
pub use react::{ReactAgent, ReactOutcome, ReactResult};
pub use reflection::{DEFAULT_STOP_PHRASES, ReflectionAgent, ReflectionResult};

#[cfg(test)]
pub(crate) mod test_helpers;
