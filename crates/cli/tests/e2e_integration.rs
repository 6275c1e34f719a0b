//! End-to-end integration tests for the agentloops runtime.
//!
//! These tests drive each loop through the public API with a scripted
//! provider and the built-in tool registry, from question to answer.

use std::sync::Arc;

use agentloops_agent::{
    LlmClient, PlanExecuteAgent, ReactAgent, ReactOutcome, RecordKind, ReflectionAgent,
};
use agentloops_config::AppConfig;
use agentloops_core::error::{Error, ParseError, PlanParseError, ProviderError, Stage};
use agentloops_core::message::Message;
use agentloops_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use agentloops_tools::default_registry;
use tokio_util::sync::CancellationToken;

// ── Mock Provider ────────────────────────────────────────────────────────

/// A mock provider that returns scripted responses in sequence and
/// remembers every prompt it was sent.
struct ScriptedProvider {
    responses: std::sync::Mutex<Vec<Result<String, ProviderError>>>,
    prompts: std::sync::Mutex<Vec<String>>,
}

impl ScriptedProvider {
    fn new(responses: &[&str]) -> Self {
        Self::with_results(responses.iter().map(|r| Ok(r.to_string())).collect())
    }

    fn with_results(responses: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            responses: std::sync::Mutex::new(responses),
            prompts: std::sync::Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    fn prompt(&self, index: usize) -> String {
        self.prompts.lock().unwrap()[index].clone()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "e2e_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut prompts = self.prompts.lock().unwrap();
        let responses = self.responses.lock().unwrap();
        let count = prompts.len();
        if count >= responses.len() {
            panic!(
                "ScriptedProvider exhausted: call #{}, have {}",
                count,
                responses.len()
            );
        }
        prompts.push(
            request
                .messages
                .iter()
                .map(|m| m.content.clone())
                .collect::<Vec<_>>()
                .join("\n"),
        );
        let text = responses[count].clone()?;
        Ok(ProviderResponse {
            message: Message::assistant(text),
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
            model: "mock".into(),
        })
    }
}

fn llm(provider: &Arc<ScriptedProvider>) -> LlmClient {
    LlmClient::new(provider.clone(), "mock")
}

// ── E2E: ReAct ───────────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_react_travel_assistant() {
    // Scenario: weather lookup, then attraction lookup, then finish.
    let provider = Arc::new(ScriptedProvider::new(&[
        "Thought: I need the weather in Paris first.\nAction: get_weather(city=\"Paris\")",
        "Thought: Rain is likely, find indoor sights.\n\
         Action: get_attraction(city=\"Paris\", weather=\"Light rain\")",
        "Thought: I have everything.\nAction: Finish[Visit the Louvre]",
    ]));
    let config = AppConfig::default();
    let tools = Arc::new(default_registry());
    let mut agent = ReactAgent::new(llm(&provider), tools, config.react.max_steps)
        .with_temperature(config.react.temperature);

    let result = agent
        .run("Plan a day in Paris", &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.outcome, ReactOutcome::Finished { answer: "Visit the Louvre".into() });
    assert_eq!(result.steps, 3);
    assert_eq!(result.history.len(), 4);
    assert_eq!(result.history[0], "Action: get_weather(city=\"Paris\")");
    assert!(result.history[1].starts_with("Observation: Paris: "));
    assert!(result.history[3].contains("Louvre"));

    // The final prompt sees the whole transcript and every tool.
    let last = provider.prompt(2);
    assert!(last.contains("- get_weather: "));
    assert!(last.contains("- get_attraction: "));
    assert!(last.contains("Observation: Given Light rain weather in Paris"));
}

#[tokio::test]
async fn e2e_react_search_then_calculate() {
    let provider = Arc::new(ScriptedProvider::new(&[
        "Thought: look it up\nAction: Search[latest Huawei phone]",
        "Thought: compute\nAction: Calculator[2 ^ 10 % 1000]",
        "Action: Finish[Mate 60 Pro, 24]",
    ]));
    let mut agent = ReactAgent::new(llm(&provider), Arc::new(default_registry()), 5);

    let result = agent.run("q", &CancellationToken::new()).await.unwrap();

    assert_eq!(result.answer(), "Mate 60 Pro, 24");
    assert!(result.history[1].contains("[1] Huawei Mate 60 Pro launch"));
    assert_eq!(result.history[3], "Observation: 24");
}

#[tokio::test]
async fn e2e_react_step_cap_is_not_an_error() {
    let provider = Arc::new(ScriptedProvider::new(&["Action: Teleport[Mars]"; 4]));
    let mut agent = ReactAgent::new(llm(&provider), Arc::new(default_registry()), 4);

    let result = agent.run("q", &CancellationToken::new()).await.unwrap();

    assert_eq!(result.outcome, ReactOutcome::MaxStepsReached);
    assert_eq!(result.answer(), "");
    assert_eq!(provider.calls(), 4);
    assert!(result.history.iter().skip(1).step_by(2).all(|o| o.contains("Teleport")));
}

#[tokio::test]
async fn e2e_react_parse_failure_aborts() {
    let provider = Arc::new(ScriptedProvider::new(&["Thought: I'm not sure what to do."]));
    let mut agent = ReactAgent::new(llm(&provider), Arc::new(default_registry()), 5);

    let err = agent.run("q", &CancellationToken::new()).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Parse {
            step: 1,
            source: ParseError::NoAction
        }
    ));
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn e2e_react_custom_tool() {
    let mut registry = default_registry();
    registry.register_fn("shout", "Uppercases its input", |s| Ok(s.to_uppercase()));

    let provider = Arc::new(ScriptedProvider::new(&[
        "Action: shout[hello]",
        "Action: Finish[HELLO]",
    ]));
    let mut agent = ReactAgent::new(llm(&provider), Arc::new(registry), 5);

    let result = agent.run("q", &CancellationToken::new()).await.unwrap();
    assert_eq!(result.history[1], "Observation: HELLO");
    assert!(provider.prompt(0).contains("- shout: Uppercases its input"));
}

// ── E2E: Plan-and-Execute ────────────────────────────────────────────────

#[tokio::test]
async fn e2e_plan_and_execute() {
    let provider = Arc::new(ScriptedProvider::new(&[
        "Here is my plan:\n```json\n[\"Find Monday's sales\", \"Double it for Tuesday\", \"Sum both days\"]\n```",
        "15 apples",
        "30 apples",
        "45 apples",
    ]));
    let config = AppConfig::default();
    let agent = PlanExecuteAgent::new(llm(&provider))
        .with_temperatures(config.plan.planner_temperature, config.plan.executor_temperature);

    let result = agent
        .run("How many apples were sold on Monday and Tuesday?", &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.answer, "45 apples");
    assert_eq!(result.plan.steps().len(), 3);
    assert_eq!(
        result.steps.iter().map(|s| s.result.as_str()).collect::<Vec<_>>(),
        vec!["15 apples", "30 apples", "45 apples"]
    );
    assert!(provider.prompt(3).contains("Result: 15 apples"));
    assert!(provider.prompt(3).contains("Result: 30 apples"));
}

#[tokio::test]
async fn e2e_plan_rejects_empty_plan() {
    let provider = Arc::new(ScriptedProvider::new(&["```json\n[]\n```"]));
    let agent = PlanExecuteAgent::new(llm(&provider));

    let err = agent.run("q", &CancellationToken::new()).await.unwrap_err();
    assert!(matches!(err, Error::PlanParse(PlanParseError::EmptyPlan)));
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn e2e_plan_step_failure_reports_step() {
    let provider = Arc::new(ScriptedProvider::with_results(vec![
        Ok("[\"a\", \"b\"]".into()),
        Err(ProviderError::RateLimited { retry_after_secs: 30 }),
    ]));
    let agent = PlanExecuteAgent::new(llm(&provider));

    let err = agent.run("q", &CancellationToken::new()).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Llm {
            stage: Stage::Execute { step: 1 },
            ..
        }
    ));
    assert!(err.to_string().contains("execute (step 1)"));
}

// ── E2E: Reflection ──────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_reflection_improves_until_reviewer_is_satisfied() {
    let provider = Arc::new(ScriptedProvider::new(&[
        "def primes(n): trial division",
        "O(n*sqrt(n)); use the sieve of Eratosthenes.",
        "def primes(n): sieve",
        "The algorithm is already optimal, no need for improvement.",
    ]));
    let config = AppConfig::default();
    let mut agent = ReflectionAgent::new(llm(&provider), config.reflection.max_iterations)
        .with_temperature(config.reflection.temperature)
        .with_stop_phrases(config.reflection.stop_phrases.clone());

    let result = agent
        .run("List all primes up to n", &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.artifact, "def primes(n): sieve");
    assert!(result.stopped_early);
    assert_eq!(result.iterations, 2);
    assert_eq!(result.memory.records()[3].kind, RecordKind::Reflection);
    assert!(
        result
            .memory
            .trajectory()
            .starts_with("--- Previous attempt ---\ndef primes(n): trial division")
    );
    assert!(provider.prompt(2).contains("use the sieve of Eratosthenes"));
}

#[tokio::test]
async fn e2e_reflection_cap_returns_last_attempt() {
    let provider = Arc::new(ScriptedProvider::new(&["v1", "meh", "v2"]));
    let mut agent = ReflectionAgent::new(llm(&provider), 1);

    let result = agent.run("task", &CancellationToken::new()).await.unwrap();
    assert_eq!(result.artifact, "v2");
    assert!(!result.stopped_early);
}

// ── E2E: Cancellation ────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_cancelled_runs_fail_fast() {
    let cancel = CancellationToken::new();
    cancel.cancel();

    let provider = Arc::new(ScriptedProvider::new(&[]));
    let mut react = ReactAgent::new(llm(&provider), Arc::new(default_registry()), 3);
    assert!(react.run("q", &cancel).await.unwrap_err().is_cancelled());

    let plan = PlanExecuteAgent::new(llm(&provider));
    assert!(plan.run("q", &cancel).await.unwrap_err().is_cancelled());

    let mut reflect = ReflectionAgent::new(llm(&provider), 3);
    assert!(reflect.run("q", &cancel).await.unwrap_err().is_cancelled());

    assert_eq!(provider.calls(), 0);
}
