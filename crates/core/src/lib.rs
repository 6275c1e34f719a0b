//! # agentloops core
//!
//! Domain types, traits, and error definitions shared by every agentloops
//! crate. Nothing in here talks to the network or the filesystem.
//!
//! ## Design Philosophy
//!
//! The two external collaborators of an agent loop, the LLM and the tools,
//! are defined as traits here. Implementations live in their respective
//! crates. This enables:
//! - Swapping the LLM backend via configuration
//! - Scripted providers and stub tools in tests
//! - Clean dependency graph (all crates depend inward on core)

pub mod action;
pub mod error;
pub mod message;
pub mod provider;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use action::{Action, Arguments, ToolInput};
pub use error::{Error, ParseError, PlanParseError, ProviderError, Result, Stage, ToolError};
pub use message::{Message, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, StreamChunk, Usage};
pub use tool::{FnTool, Tool, ToolRegistry};
