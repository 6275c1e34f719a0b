//! `agentloops tools`: list the built-in tools.

pub fn run() {
    let registry = agentloops_tools::default_registry();
    println!("{}", registry.describe());
}
