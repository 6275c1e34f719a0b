//! Prompt templates for the three loops.
//!
//! The wording is free to change; the structural parts are not. The ReAct
//! prompt must document the `Thought:`/`Action:` protocol, and the planner
//! prompt must ask for a fenced JSON array of strings.

/// Reason-act prompt: tool list, question, and the transcript so far.
pub fn react(tools: &str, question: &str, history: &str) -> String {
    format!(
        r#"You are an assistant that can call external tools.

Available tools:
{tools}

Respond strictly in the following format:

Thought: your reasoning, used to analyse the problem, break it down and plan the next step.
Action: the single action you decide to take, in one of these forms:
- tool_name[input] to call a tool with free-form input.
- tool_name(arg="value", ...) to call a tool with named arguments.
- Finish[final answer] when you have the final answer.

Now solve the following problem:
Question: {question}
History:
{history}
"#
    )
}

/// Planner prompt: decompose the question into a JSON array of steps.
pub fn plan(question: &str) -> String {
    format!(
        r#"You are an expert planner. Break the user's question down into a plan of simple steps.
Each step must be an independent, executable subtask, listed in strict logical order.
Your output must be a JSON array in which every element is a string describing one subtask.

Question: {question}

Output the plan strictly in this format; the ```json prefix and ``` suffix are required:
```json
["step 1", "step 2", "step 3"]
```
"#
    )
}

/// Executor prompt for one plan step.
pub fn execute(question: &str, plan: &str, history: &str, step: &str) -> String {
    format!(
        r#"You are an expert executor. Solve the problem by following the given plan one step at a time.
You receive the original question, the full plan, and the steps completed so far with their results.
Focus only on the "current step" and output only its answer, with no extra explanation or dialogue.

# Original question:
{question}

# Full plan:
{plan}

# Completed steps and results:
{history}

# Current step:
{step}

Output only the answer to the current step:
"#
    )
}

/// Initial artifact for a reflection run.
pub fn generate(task: &str) -> String {
    format!(
        r#"You are a senior software engineer. Write a complete function that satisfies the requirement below.
Include the full signature and documentation, and follow the language's standard style.

Requirement: {task}

Output only the code, without any extra explanation.
"#
    )
}

/// Critique of the latest artifact. `stop_phrase` is what the reviewer
/// must answer when nothing can be improved.
pub fn reflect(task: &str, artifact: &str, stop_phrase: &str) -> String {
    format!(
        r#"You are an extremely strict code reviewer and senior algorithm engineer with demanding performance standards.
Review the code below and focus on its main bottleneck in algorithmic efficiency.

# Original task:
{task}

# Code under review:
{artifact}

Analyse its time complexity and consider whether an algorithmically better solution would significantly improve performance.
If so, state clearly what is lacking and propose a concrete, workable improvement (for example, a sieve instead of trial division).
Only if the code is already algorithmically optimal, answer "{stop_phrase}".

Output only your feedback, without any extra explanation.
"#
    )
}

/// Improved artifact given the last attempt and its critique.
pub fn refine(task: &str, last_attempt: &str, feedback: &str) -> String {
    format!(
        r#"You are a senior software engineer improving your code based on a reviewer's feedback.

# Original task:
{task}

# Your previous attempt:
{last_attempt}

# Reviewer feedback:
{feedback}

Produce an improved version of the code according to the feedback.
Include the full signature and documentation, and follow the language's standard style.
Output only the improved code, without any extra explanation.
"#
    )
}
