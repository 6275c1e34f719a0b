//! Built-in tool implementations for agentloops.
//!
//! All tools are deterministic and offline: arithmetic, canned search
//! results, and mock weather/attraction lookups. They exist so the agent
//! loops can be driven end-to-end without any external service besides
//! the LLM.

pub mod attraction;
pub mod calculator;
pub mod weather_lookup;
pub mod web_search;

use agentloops_core::tool::ToolRegistry;

pub use attraction::AttractionTool;
pub use calculator::CalculatorTool;
pub use weather_lookup::WeatherLookupTool;
pub use web_search::WebSearchTool;

/// Create a registry with every built-in tool, in a stable order.
pub fn default_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(web_search::WebSearchTool));
    registry.register(Box::new(calculator::CalculatorTool));
    registry.register(Box::new(weather_lookup::WeatherLookupTool));
    registry.register(Box::new(attraction::AttractionTool));
    registry
}
