//! agentloops CLI: the main entry point.
//!
//! Commands:
//! - `react`: Answer a question with the Thought/Action/Observation loop
//! - `plan`: Plan the question into steps, then execute them in order
//! - `reflect`: Generate, critique and refine a piece of code
//! - `tools`: List the built-in tools
//! - `config`: Show the effective or default configuration

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "agentloops",
    about = "agentloops: text-protocol agent loops over an LLM",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true, env = "AGENTLOOPS_LOG_JSON")]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a question with the ReAct loop and the built-in tools
    React {
        /// The question to answer
        question: String,

        /// Override the configured step cap
        #[arg(long)]
        max_steps: Option<usize>,
    },

    /// Decompose a question into a plan and execute it step by step
    Plan {
        /// The question to answer
        question: String,
    },

    /// Iteratively improve generated code through self-review
    Reflect {
        /// The programming task
        task: String,

        /// Override the configured iteration cap
        #[arg(long)]
        max_iterations: Option<usize>,
    },

    /// List the built-in tools
    Tools,

    /// Show configuration
    Config {
        /// Print the default config file instead of the effective settings
        #[arg(long)]
        default: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing (logs go to stderr, answers to stdout)
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.log_json {
        builder.json().init();
    } else {
        builder.init();
    }

    match cli.command {
        Commands::React {
            question,
            max_steps,
        } => commands::react::run(&question, max_steps).await?,
        Commands::Plan { question } => commands::plan::run(&question).await?,
        Commands::Reflect {
            task,
            max_iterations,
        } => commands::reflect::run(&task, max_iterations).await?,
        Commands::Tools => commands::tools::run(),
        Commands::Config { default } => commands::config_cmd::run(default)?,
    }

    Ok(())
}
