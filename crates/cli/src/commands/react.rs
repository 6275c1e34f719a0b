//! `agentloops react`: Thought/Action/Observation loop.

use std::sync::Arc;

use agentloops_agent::{ReactAgent, ReactOutcome};

use super::{cancel_on_ctrl_c, load_llm};

pub async fn run(
    question: &str,
    max_steps: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (config, llm) = load_llm(|c| {
        if let Some(max_steps) = max_steps {
            c.react.max_steps = max_steps;
        }
    })?;
    let tools = Arc::new(agentloops_tools::default_registry());

    let mut agent = ReactAgent::new(llm, tools, config.react.max_steps)
        .with_temperature(config.react.temperature);
    let result = agent.run(question, &cancel_on_ctrl_c()).await?;

    for line in &result.history {
        eprintln!("  {line}");
    }

    match result.outcome {
        ReactOutcome::Finished { answer } => println!("{answer}"),
        ReactOutcome::MaxStepsReached => eprintln!("No answer after {} steps.", result.steps),
    }
    Ok(())
}
