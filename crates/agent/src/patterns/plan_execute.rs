//! Plan-and-Execute pattern.
//!
//! Two sequential phases with no backtracking:
//!
//! 1. **Plan**: the [`Planner`] asks the model for a fenced JSON array of
//!    step strings and parses it into a [`Plan`]. An empty array is
//!    rejected before anything executes.
//! 2. **Execute**: the [`Executor`] walks the plan in order. Each step's
//!    prompt carries the question, the full plan, and every earlier
//!    `(step, result)` pair verbatim. The last step's result is the answer.
//!
//! Any LLM failure aborts the whole run; partial results are not returned.

use agentloops_core::error::{Error, PlanParseError, Stage};
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use crate::llm::LlmClient;
use crate::prompts;

pub const DEFAULT_PLANNER_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_EXECUTOR_TEMPERATURE: f32 = 0.5;

const FENCE: &str = "```";

/// An ordered, non-empty list of step descriptions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Plan {
    steps: Vec<String>,
}

impl Plan {
    pub fn new(steps: Vec<String>) -> Result<Self, PlanParseError> {
        if steps.is_empty() {
            return Err(PlanParseError::EmptyPlan);
        }
        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Rendered as a JSON array, the same shape the planner produced.
impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(&self.steps).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// Parse a planner response.
///
/// Uses the body of the first fenced block (an optional language tag on
/// the opening fence is skipped). Without a complete fence, the whole
/// response is parsed.
pub fn parse_plan(text: &str) -> Result<Plan, PlanParseError> {
    let body = fenced_body(text).unwrap_or(text).trim();
    let steps: Vec<String> =
        serde_json::from_str(body).map_err(|e| PlanParseError::InvalidJson(e.to_string()))?;
    Plan::new(steps)
}

fn fenced_body(text: &str) -> Option<&str> {
    let start = text.find(FENCE)? + FENCE.len();
    let after_open = &text[start..];

    // Skip a language tag such as `json` up to the end of the line.
    let tag_len = after_open
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(after_open.len());
    let inner = &after_open[tag_len..];

    let end = inner.find(FENCE)?;
    Some(&inner[..end])
}

/// One executed step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResult {
    /// 1-based position in the plan.
    pub index: usize,
    pub step: String,
    pub result: String,
}

/// The result of a plan-and-execute run.
#[derive(Debug, Clone)]
pub struct PlanExecuteResult {
    /// Result of the final step.
    pub answer: String,
    pub plan: Plan,
    pub steps: Vec<StepResult>,
}

/// Produces a [`Plan`] for a question.
pub struct Planner {
    llm: LlmClient,
    temperature: f32,
}

impl Planner {
    pub fn new(llm: LlmClient) -> Self {
        Self {
            llm,
            temperature: DEFAULT_PLANNER_TEMPERATURE,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub async fn plan(&self, question: &str, cancel: &CancellationToken) -> Result<Plan, Error> {
        let response = self
            .llm
            .prompt(prompts::plan(question), self.temperature, cancel)
            .await
            .map_err(|e| Error::llm(Stage::Plan, e))?;

        let plan = parse_plan(&response).inspect_err(|e| {
            warn!(error = %e, "Planner returned an unusable plan");
        })?;
        info!(steps = plan.len(), "Plan created");
        Ok(plan)
    }
}

/// Runs a [`Plan`] step by step.
pub struct Executor {
    llm: LlmClient,
    temperature: f32,
}

impl Executor {
    pub fn new(llm: LlmClient) -> Self {
        Self {
            llm,
            temperature: DEFAULT_EXECUTOR_TEMPERATURE,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Execute every step in order and return each step's result.
    pub async fn execute(
        &self,
        question: &str,
        plan: &Plan,
        cancel: &CancellationToken,
    ) -> Result<Vec<StepResult>, Error> {
        let rendered_plan = plan.to_string();
        let mut results: Vec<StepResult> = Vec::with_capacity(plan.len());

        for (i, step) in plan.steps().iter().enumerate() {
            let index = i + 1;
            debug!(step = index, total = plan.len(), description = %step, "Executing plan step");

            let history = render_history(&results);
            let prompt = prompts::execute(question, &rendered_plan, &history, step);
            let result = self
                .llm
                .prompt(prompt, self.temperature, cancel)
                .await
                .map_err(|e| Error::llm(Stage::Execute { step: index }, e))?;

            results.push(StepResult {
                index,
                step: step.clone(),
                result,
            });
        }

        Ok(results)
    }
}

/// Prior steps as `Step n: ...` / `Result: ...` blocks, or `None`.
fn render_history(results: &[StepResult]) -> String {
    if results.is_empty() {
        return "None".to_string();
    }
    results
        .iter()
        .map(|r| format!("Step {}: {}\nResult: {}", r.index, r.step, r.result))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Planner and executor sharing one LLM collaborator.
pub struct PlanExecuteAgent {
    planner: Planner,
    executor: Executor,
}

impl PlanExecuteAgent {
    pub fn new(llm: LlmClient) -> Self {
        Self {
            planner: Planner::new(llm.clone()),
            executor: Executor::new(llm),
        }
    }

    pub fn with_temperatures(mut self, planner: f32, executor: f32) -> Self {
        self.planner = self.planner.with_temperature(planner);
        self.executor = self.executor.with_temperature(executor);
        self
    }

    pub async fn run(
        &self,
        question: &str,
        cancel: &CancellationToken,
    ) -> Result<PlanExecuteResult, Error> {
        let span = info_span!("plan_execute", run_id = %Uuid::new_v4());
        async {
            info!("Plan-and-execute starting");
            let plan = self.planner.plan(question, cancel).await?;
            let steps = self.executor.execute(question, &plan, cancel).await?;

            // A plan is never empty, so there is always a last step.
            let answer = steps.last().map(|s| s.result.clone()).unwrap_or_default();
            info!(steps = steps.len(), "Plan-and-execute completed");
            Ok(PlanExecuteResult {
                answer,
                plan,
                steps,
            })
        }
        .instrument(span)
        .await
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────
