//! `agentloops config`: show configuration.

use agentloops_config::AppConfig;

pub fn run(default: bool) -> Result<(), Box<dyn std::error::Error>> {
    if default {
        print!("{}", AppConfig::default_toml());
        return Ok(());
    }

    let config = AppConfig::load()?;
    println!("Config file: {}", AppConfig::config_dir().join("config.toml").display());
    println!("API key:     {}", if config.has_api_key() { "set" } else { "missing" });
    println!("Base URL:    {}", config.base_url);
    println!("Model:       {}", config.model);
    println!("Timeout:     {}s", config.timeout_secs);
    println!("Streaming:   {}", config.stream);
    println!(
        "ReAct:       max_steps={} temperature={}",
        config.react.max_steps, config.react.temperature
    );
    println!(
        "Plan:        planner={} executor={}",
        config.plan.planner_temperature, config.plan.executor_temperature
    );
    println!(
        "Reflection:  max_iterations={} temperature={} stop_phrases={:?}",
        config.reflection.max_iterations,
        config.reflection.temperature,
        config.reflection.stop_phrases
    );
    Ok(())
}
