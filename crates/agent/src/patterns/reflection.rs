//! Reflection pattern: Generate → Reflect → Refine.
//!
//! One artifact is improved over a bounded number of iterations, with every
//! attempt and critique kept in [`Memory`]:
//!
//! ```text
//! generate ─▶ Execution
//! repeat ≤ max_iterations:
//!     reflect(last Execution) ─▶ Reflection
//!     stop phrase found?  ─▶ done
//!     refine(last Execution, Reflection) ─▶ Execution
//! ```
//!
//! Running out of iterations is a normal ending; the last execution is
//! returned either way. Any LLM failure aborts the run.

use agentloops_core::error::{Error, Stage};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span};
use uuid::Uuid;

use crate::context::{Memory, RecordKind};
use crate::llm::LlmClient;
use crate::prompts;

pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Phrases a reviewer uses to signal that nothing is left to improve.
pub const DEFAULT_STOP_PHRASES: [&str; 2] = ["无需改进", "no need for improvement"];

pub struct ReflectionAgent {
    /// LLM collaborator.
    llm: LlmClient,
    /// Attempts and critiques of the current run.
    memory: Memory,
    /// Maximum reflect/refine rounds.
    max_iterations: usize,
    /// Temperature.
    temperature: f32,
    /// Matched case-insensitively as substrings of a critique.
    stop_phrases: Vec<String>,
}

/// The result of a reflection run.
#[derive(Debug, Clone)]
pub struct ReflectionResult {
    /// The last execution record.
    pub artifact: String,
    /// Reflect rounds performed.
    pub iterations: usize,
    /// Whether a stop phrase ended the run before the cap.
    pub stopped_early: bool,
    /// Snapshot of the run's records.
    pub memory: Memory,
}

impl ReflectionAgent {
    pub fn new(llm: LlmClient, max_iterations: usize) -> Self {
        Self {
            llm,
            memory: Memory::new(),
            max_iterations,
            temperature: DEFAULT_TEMPERATURE,
            stop_phrases: DEFAULT_STOP_PHRASES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Set the temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Replace the stop phrases.
    pub fn with_stop_phrases(mut self, phrases: Vec<String>) -> Self {
        self.stop_phrases = phrases;
        self
    }

    /// Records of the most recent run.
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    fn is_stop(&self, feedback: &str) -> bool {
        let feedback = feedback.to_lowercase();
        self.stop_phrases
            .iter()
            .any(|p| feedback.contains(&p.to_lowercase()))
    }

    /// The phrase the reviewer is told to use.
    fn stop_hint(&self) -> &str {
        self.stop_phrases
            .last()
            .map(String::as_str)
            .unwrap_or(DEFAULT_STOP_PHRASES[1])
    }

    pub async fn run(
        &mut self,
        task: &str,
        cancel: &CancellationToken,
    ) -> Result<ReflectionResult, Error> {
        let span = info_span!("reflection", run_id = %Uuid::new_v4());
        self.run_inner(task, cancel).instrument(span).await
    }

    async fn run_inner(
        &mut self,
        task: &str,
        cancel: &CancellationToken,
    ) -> Result<ReflectionResult, Error> {
        self.memory.clear();
        info!(max_iterations = self.max_iterations, "Reflection starting");

        // ── Generate ──
        let initial = self
            .llm
            .prompt(prompts::generate(task), self.temperature, cancel)
            .await
            .map_err(|e| Error::llm(Stage::Generate, e))?;
        self.memory.append(RecordKind::Execution, initial);

        let mut iterations = 0;
        let mut stopped_early = false;

        for iteration in 1..=self.max_iterations {
            iterations = iteration;
            let last = self.memory.last_execution().to_string();

            // ── Reflect ──
            let prompt = prompts::reflect(task, &last, self.stop_hint());
            let feedback = self
                .llm
                .prompt(prompt, self.temperature, cancel)
                .await
                .map_err(|e| Error::llm(Stage::Reflect { iteration }, e))?;
            self.memory.append(RecordKind::Reflection, feedback.clone());

            if self.is_stop(&feedback) {
                info!(iteration, "Reviewer found nothing to improve");
                stopped_early = true;
                break;
            }
            debug!(iteration, "Refining");

            // ── Refine ──
            let prompt = prompts::refine(task, &last, &feedback);
            let refined = self
                .llm
                .prompt(prompt, self.temperature, cancel)
                .await
                .map_err(|e| Error::llm(Stage::Refine { iteration }, e))?;
            self.memory.append(RecordKind::Execution, refined);
        }

        info!(iterations, stopped_early, "Reflection completed");
        Ok(ReflectionResult {
            artifact: self.memory.last_execution().to_string(),
            iterations,
            stopped_early,
            memory: self.memory.clone(),
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::test_helpers::*;
    use agentloops_core::error::ProviderError;
    use std::sync::Arc;

    fn agent(provider: Arc<SequentialMockProvider>, max_iterations: usize) -> ReflectionAgent {
        ReflectionAgent::new(LlmClient::new(provider, "mock-model"), max_iterations)
    }

    #[tokio::test]
    async fn stop_phrase_ends_early_with_preceding_execution() {
        let provider = Arc::new(SequentialMockProvider::from_texts(&[
            "v1: trial division",
            "Use a sieve of Eratosthenes instead.",
            "v2: sieve",
            "算法已经最优，无需改进。",
        ]));
        let mut agent = agent(provider.clone(), 5);

        let result = agent.run("primes up to n", &CancellationToken::new()).await.unwrap();

        assert_eq!(result.artifact, "v2: sieve");
        assert!(result.stopped_early);
        assert_eq!(result.iterations, 2);
        assert_eq!(provider.call_count(), 4);
        assert_eq!(result.memory.len(), 4);
        assert_eq!(result.memory.last_reflection(), "算法已经最优，无需改进。");
    }

    #[tokio::test]
    async fn stop_phrase_is_case_insensitive() {
        let provider = Arc::new(SequentialMockProvider::from_texts(&[
            "v1",
            "There is NO NEED FOR IMPROVEMENT here.",
        ]));
        let mut agent = agent(provider, 3);

        let result = agent.run("task", &CancellationToken::new()).await.unwrap();
        assert!(result.stopped_early);
        assert_eq!(result.artifact, "v1");
        assert_eq!(result.iterations, 1);
    }

    #[tokio::test]
    async fn exhausting_iterations_returns_last_execution() {
        let provider = Arc::new(SequentialMockProvider::from_texts(&[
            "v1", "fix a", "v2", "fix b", "v3",
        ]));
        let mut agent = agent(provider.clone(), 2);

        let result = agent.run("task", &CancellationToken::new()).await.unwrap();

        assert_eq!(result.artifact, "v3");
        assert!(!result.stopped_early);
        assert_eq!(result.iterations, 2);
        assert_eq!(provider.call_count(), 5);
        assert_eq!(
            result.memory.records().iter().map(|r| r.kind).collect::<Vec<_>>(),
            vec![
                RecordKind::Execution,
                RecordKind::Reflection,
                RecordKind::Execution,
                RecordKind::Reflection,
                RecordKind::Execution,
            ]
        );
    }

    #[tokio::test]
    async fn refine_prompt_uses_last_execution_and_feedback() {
        let provider = Arc::new(SequentialMockProvider::from_texts(&[
            "v1", "make it faster", "v2",
        ]));
        let mut agent = agent(provider.clone(), 1);

        agent.run("sort a list", &CancellationToken::new()).await.unwrap();

        let prompts = provider.prompts();
        assert!(prompts[1].contains("# Code under review:\nv1"));
        assert!(prompts[2].contains("# Your previous attempt:\nv1"));
        assert!(prompts[2].contains("# Reviewer feedback:\nmake it faster"));
        assert!(prompts.iter().all(|p| p.contains("sort a list")));
    }

    #[tokio::test]
    async fn custom_stop_phrases() {
        let provider = Arc::new(SequentialMockProvider::from_texts(&["v1", "LGTM"]));
        let mut agent = agent(provider.clone(), 3).with_stop_phrases(vec!["lgtm".into()]);

        let result = agent.run("task", &CancellationToken::new()).await.unwrap();
        assert!(result.stopped_early);
        assert!(provider.prompts()[1].contains("\"lgtm\""));
    }

    #[tokio::test]
    async fn zero_iterations_returns_initial_artifact() {
        let provider = Arc::new(SequentialMockProvider::from_texts(&["v1"]));
        let mut agent = agent(provider, 0);

        let result = agent.run("task", &CancellationToken::new()).await.unwrap();
        assert_eq!(result.artifact, "v1");
        assert_eq!(result.iterations, 0);
    }

    #[tokio::test]
    async fn memory_resets_between_runs() {
        let provider = Arc::new(SequentialMockProvider::from_texts(&[
            "a1", "no need for improvement", "b1", "no need for improvement",
        ]));
        let mut agent = agent(provider, 3);

        agent.run("first", &CancellationToken::new()).await.unwrap();
        let second = agent.run("second", &CancellationToken::new()).await.unwrap();

        assert_eq!(second.memory.len(), 2);
        assert_eq!(second.artifact, "b1");
        assert_eq!(agent.memory().len(), 2);
    }

    #[tokio::test]
    async fn failures_carry_their_stage() {
        let provider = Arc::new(SequentialMockProvider::new(vec![api_error()]));
        let err = agent(provider, 3)
            .run("t", &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Llm { stage: Stage::Generate, .. }));

        let provider = Arc::new(SequentialMockProvider::new(vec![
            Ok(make_text_response("v1")),
            api_error(),
        ]));
        let err = agent(provider, 3)
            .run("t", &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Llm { stage: Stage::Reflect { iteration: 1 }, .. }));

        let provider = Arc::new(SequentialMockProvider::new(vec![
            Ok(make_text_response("v1")),
            Ok(make_text_response("needs work")),
            Err(ProviderError::Timeout("slow".into())),
        ]));
        let err = agent(provider, 3)
            .run("t", &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Llm {
                stage: Stage::Refine { iteration: 1 },
                source: ProviderError::Timeout(_)
            }
        ));
    }
}
