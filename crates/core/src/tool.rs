//! Tool trait: the abstraction over agent capabilities.
//!
//! Tools are deterministic, trusted, in-process functions. The registry
//! maps names to tools and turns lookup and execution failures into
//! explicit [`ToolError`]s instead of panics.

use crate::action::ToolInput;
use crate::error::ToolError;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// The core Tool trait.
///
/// Each tool (calculator, search, weather, ...) implements this trait.
/// Tools are registered in the ToolRegistry and made available to the
/// agent loops.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "Calculator").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the LLM).
    fn description(&self) -> &str;

    /// Execute the tool.
    async fn invoke(&self, input: ToolInput) -> std::result::Result<String, ToolError>;
}

type ToolFn = dyn Fn(&str) -> std::result::Result<String, String> + Send + Sync;

/// A tool backed by a plain `(input) -> (output, error)` function.
///
/// Call-dialect arguments are re-serialized as `a="1", b="2"` before the
/// function sees them.
pub struct FnTool {
    name: String,
    description: String,
    func: Box<ToolFn>,
}

impl FnTool {
    pub fn new<F>(name: impl Into<String>, description: impl Into<String>, func: F) -> Self
    where
        F: Fn(&str) -> std::result::Result<String, String> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            func: Box::new(func),
        }
    }
}

#[async_trait]
impl Tool for FnTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    async fn invoke(&self, input: ToolInput) -> std::result::Result<String, ToolError> {
        let raw = match input {
            ToolInput::Text(text) => text,
            ToolInput::Args(args) => args.to_string(),
        };
        (self.func)(&raw).map_err(|reason| ToolError::ExecutionFailed {
            tool_name: self.name.clone(),
            reason,
        })
    }
}

/// A registry of available tools.
///
/// The agent loops use this to:
/// 1. Describe the tools inside prompts
/// 2. Look up and execute tools when the model requests them
///
/// Names are matched exactly and case-sensitively. `describe()` lists tools
/// in registration order.
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a tool. An existing tool with the same name is replaced in
    /// place and a warning is logged.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        match self.index.get(&name) {
            Some(&slot) => {
                warn!(tool = %name, "Tool already registered, overwriting");
                self.tools[slot] = tool;
            }
            None => {
                self.index.insert(name.clone(), self.tools.len());
                self.tools.push(tool);
                debug!(tool = %name, "Tool registered");
            }
        }
    }

    /// Register a plain function as a tool.
    pub fn register_fn<F>(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        func: F,
    ) where
        F: Fn(&str) -> std::result::Result<String, String> + Send + Sync + 'static,
    {
        self.register(Box::new(FnTool::new(name, description, func)));
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.index.get(name).map(|&slot| self.tools[slot].as_ref())
    }

    /// Get a tool by name, failing with [`ToolError::NotFound`].
    pub fn lookup(&self, name: &str) -> std::result::Result<&dyn Tool, ToolError> {
        self.get(name).ok_or_else(|| ToolError::NotFound(name.to_string()))
    }

    /// Resolve and invoke a tool. Returns promptly with
    /// [`ToolError::Cancelled`] once `cancel` fires.
    pub async fn dispatch(
        &self,
        name: &str,
        input: ToolInput,
        cancel: &CancellationToken,
    ) -> std::result::Result<String, ToolError> {
        let tool = self.lookup(name)?;
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ToolError::Cancelled(name.to_string())),
            result = tool.invoke(input) => result,
        }
    }

    /// Dispatch and fold any failure into an observation string.
    pub async fn observe(
        &self,
        name: &str,
        input: ToolInput,
        cancel: &CancellationToken,
    ) -> String {
        match self.dispatch(name, input, cancel).await {
            Ok(output) => output,
            Err(e) => {
                warn!(tool = %name, error = %e, "Tool dispatch failed");
                e.to_observation()
            }
        }
    }

    /// Render all tools as `- name: description` lines for a prompt.
    pub fn describe(&self) -> String {
        self.tools
            .iter()
            .map(|t| format!("- {}: {}", t.name(), t.description()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// List all registered tool names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
