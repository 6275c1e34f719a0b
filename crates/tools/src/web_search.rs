//! Search tool: deterministic offline search results.
//!
//! Results are canned per topic and rendered as numbered `[n] title`
//! blocks followed by a snippet, so the reason-act loop can be exercised
//! end-to-end without network access.

use agentloops_core::action::ToolInput;
use agentloops_core::error::ToolError;
use agentloops_core::tool::Tool;
use async_trait::async_trait;

pub struct WebSearchTool;

pub const NAME: &str = "Search";

const MAX_RESULTS: usize = 3;

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "A web search engine. Use it when you need current events, facts, or \
         information not found in your own knowledge base."
    }

    async fn invoke(&self, input: ToolInput) -> Result<String, ToolError> {
        let query = input
            .primary("query")
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'query' argument".into()))?;

        let results = generate_mock_results(query);
        Ok(render(&results))
    }
}

#[derive(Debug, Clone)]
struct SearchResult {
    title: String,
    snippet: String,
}

impl SearchResult {
    fn new(title: &str, snippet: &str) -> Self {
        Self {
            title: title.into(),
            snippet: snippet.into(),
        }
    }
}

fn render(results: &[SearchResult]) -> String {
    results
        .iter()
        .enumerate()
        .map(|(i, r)| format!("[{}] {}\n{}", i + 1, r.title, r.snippet))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn generate_mock_results(query: &str) -> Vec<SearchResult> {
    let q = query.to_lowercase();

    let templates: [(&[&str], Vec<SearchResult>); 3] = [
        (
            &["huawei", "phone"],
            vec![
                SearchResult::new(
                    "Huawei Mate 60 Pro launch",
                    "Huawei's latest flagship is the Mate 60 Pro, built around the Kirin 9000s chip with 5G, a 120Hz display, 12GB RAM and 512GB storage.",
                ),
                SearchResult::new(
                    "Mate 60 Pro review",
                    "Satellite calling and a much improved camera system are the headline selling points.",
                ),
            ],
        ),
        (
            &["rust"],
            vec![
                SearchResult::new(
                    "The Rust Programming Language",
                    "Rust is a systems programming language focused on safety, speed, and concurrency.",
                ),
                SearchResult::new(
                    "Rust by Example",
                    "A collection of runnable examples that illustrate Rust concepts and standard library usage.",
                ),
                SearchResult::new(
                    "crates.io: Rust Package Registry",
                    "The Rust community's crate registry for sharing and discovering Rust libraries.",
                ),
            ],
        ),
        (
            &["weather", "forecast"],
            vec![SearchResult::new(
                "Weather forecasts worldwide",
                "Current conditions and multi-day forecasts for cities around the world.",
            )],
        ),
    ];

    for (keywords, results) in &templates {
        if keywords.iter().any(|k| q.contains(k)) {
            return results.iter().take(MAX_RESULTS).cloned().collect();
        }
    }

    (0..MAX_RESULTS)
        .map(|i| SearchResult {
            title: format!("Result {} for: {}", i + 1, query),
            snippet: format!("No curated entry matches '{}'; this is a generic offline result.", query),
        })
        .collect()
}
