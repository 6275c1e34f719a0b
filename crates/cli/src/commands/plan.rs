//! `agentloops plan`: plan, then execute each step.

use agentloops_agent::PlanExecuteAgent;

use super::{cancel_on_ctrl_c, load_llm};

pub async fn run(question: &str) -> Result<(), Box<dyn std::error::Error>> {
    let (config, llm) = load_llm(|_| {})?;
    let agent = PlanExecuteAgent::new(llm)
        .with_temperatures(config.plan.planner_temperature, config.plan.executor_temperature);

    let result = agent.run(question, &cancel_on_ctrl_c()).await?;

    eprintln!("Plan:");
    for step in &result.steps {
        eprintln!("  {}. {}", step.index, step.step);
        eprintln!("     → {}", step.result);
    }
    println!("{}", result.answer);
    Ok(())
}
