//! `agentloops reflect`: generate, critique, refine.

use agentloops_agent::ReflectionAgent;

use super::{cancel_on_ctrl_c, load_llm};

pub async fn run(
    task: &str,
    max_iterations: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (config, llm) = load_llm(|c| {
        if let Some(max_iterations) = max_iterations {
            c.reflection.max_iterations = max_iterations;
        }
    })?;

    let mut agent = ReflectionAgent::new(llm, config.reflection.max_iterations)
        .with_temperature(config.reflection.temperature)
        .with_stop_phrases(config.reflection.stop_phrases.clone());

    let result = agent.run(task, &cancel_on_ctrl_c()).await?;

    if result.stopped_early {
        eprintln!("Reviewer satisfied after {} iteration(s).", result.iterations);
    } else {
        eprintln!("Stopped at the iteration cap ({}).", result.iterations);
    }
    println!("{}", result.artifact);
    Ok(())
}
