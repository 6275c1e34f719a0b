//! ReAct pattern: Thought → Action → Observation loop.
//!
//! The agent reasons step-by-step in the text protocol, choosing tools to
//! gather information, then finishes with `Finish[answer]`.
//!
//! # State machine
//!
//! ```text
//! THINKING → PARSE_ATTEMPT → FINISHED
//!                          → DISPATCHING → OBSERVED → THINKING
//!                          → ABORTED
//! ```
//!
//! - LLM failures (including empty output and cancellation) abort the run.
//! - Parse failures abort the run; the loop does not re-prompt.
//! - Unknown tools and tool errors become observations and the loop goes on.
//! - Running out of steps is [`ReactOutcome::MaxStepsReached`], not an error.

use agentloops_core::action::Action;
use agentloops_core::error::{Error, Stage};
use agentloops_core::tool::ToolRegistry;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use crate::context::History;
use crate::llm::LlmClient;
use crate::parser;
use crate::prompts;

/// Default sampling temperature for the reasoning turns.
pub const DEFAULT_TEMPERATURE: f32 = 0.5;

/// Observations come from tools. Generation stops before the model can
/// write one itself.
const STOP_SEQUENCES: [&str; 1] = ["Observation:"];

pub struct ReactAgent {
    /// LLM collaborator.
    llm: LlmClient,
    /// Tool registry.
    tools: Arc<ToolRegistry>,
    /// Hard cap on LLM calls per run.
    max_steps: usize,
    /// Temperature.
    temperature: f32,
    /// Transcript of the current run.
    history: History,
}

/// How a ReAct run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReactOutcome {
    /// The model emitted `Finish[...]`.
    Finished { answer: String },
    /// The step cap was hit first. Carries no answer.
    MaxStepsReached,
}

/// The result of a ReAct execution.
#[derive(Debug, Clone)]
pub struct ReactResult {
    pub outcome: ReactOutcome,
    /// `Action:` / `Observation:` lines, in order.
    pub history: Vec<String>,
    /// Number of LLM calls made.
    pub steps: usize,
}

impl ReactResult {
    /// The final answer, or `""` when the step cap was reached.
    pub fn answer(&self) -> &str {
        match &self.outcome {
            ReactOutcome::Finished { answer } => answer,
            ReactOutcome::MaxStepsReached => "",
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.outcome, ReactOutcome::Finished { .. })
    }
}

impl ReactAgent {
    /// Create a new ReAct agent. `max_steps` bounds the number of LLM calls
    /// in one run.
    pub fn new(llm: LlmClient, tools: Arc<ToolRegistry>, max_steps: usize) -> Self {
        Self {
            llm: llm.with_stop(STOP_SEQUENCES.iter().map(|s| s.to_string()).collect()),
            tools,
            max_steps,
            temperature: DEFAULT_TEMPERATURE,
            history: History::new(),
        }
    }

    /// Set the temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// The transcript of the most recent run.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Execute the ReAct loop for one question.
    pub async fn run(
        &mut self,
        question: &str,
        cancel: &CancellationToken,
    ) -> Result<ReactResult, Error> {
        let span = info_span!("react", run_id = %Uuid::new_v4());
        self.run_inner(question, cancel).instrument(span).await
    }

    async fn run_inner(
        &mut self,
        question: &str,
        cancel: &CancellationToken,
    ) -> Result<ReactResult, Error> {
        self.history.clear();
        let tool_descriptions = self.tools.describe();

        info!(model = %self.llm.model(), max_steps = self.max_steps, "ReAct loop starting");

        for step in 1..=self.max_steps {
            debug!(step, "ReAct step");

            // ── Think ──
            let prompt = prompts::react(&tool_descriptions, question, &self.history.render());
            let response = self
                .llm
                .prompt(prompt, self.temperature, cancel)
                .await
                .map_err(|e| {
                    warn!(step, error = %e, "ReAct aborted: LLM call failed");
                    Error::llm(Stage::Think { step }, e)
                })?;

            // ── Parse ──
            let turn = parser::parse(&response).map_err(|source| {
                warn!(step, error = %source, "ReAct aborted: unparseable model output");
                Error::Parse { step, source }
            })?;
            if let Some(thought) = &turn.thought {
                debug!(step, thought = %thought, "Thought");
            }

            // ── Act ──
            let (name, input) = match turn.action {
                Action::Finish { answer } => {
                    info!(steps = step, "ReAct loop completed");
                    return Ok(ReactResult {
                        outcome: ReactOutcome::Finished { answer },
                        history: self.history.entries().to_vec(),
                        steps: step,
                    });
                }
                Action::Tool { name, input } => (name, input),
            };

            info!(step, tool = %name, "Dispatching tool");
            let observation = self.tools.observe(&name, input, cancel).await;
            debug!(step, observation = %observation, "Observation");

            // ── Observe ──
            self.history.push_step(&turn.raw_action, &observation);
        }

        warn!(max_steps = self.max_steps, "ReAct: max steps reached without an answer");
        Ok(ReactResult {
            outcome: ReactOutcome::MaxStepsReached,
            history: self.history.entries().to_vec(),
            steps: self.max_steps,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────
