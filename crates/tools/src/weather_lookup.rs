//! Weather tool: deterministic mock conditions per city.
//!
//! The output is a single sentence such as
//! `Beijing: Partly cloudy, 21°C` so that a follow-up
//! `get_attraction(city="...", weather="...")` call can quote it.

use agentloops_core::action::ToolInput;
use agentloops_core::error::ToolError;
use agentloops_core::tool::Tool;
use async_trait::async_trait;

pub struct WeatherLookupTool;

pub const NAME: &str = "get_weather";

const CONDITIONS: [&str; 6] = [
    "Sunny",
    "Partly cloudy",
    "Overcast",
    "Light rain",
    "Heavy rain",
    "Foggy",
];

#[async_trait]
impl Tool for WeatherLookupTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "get_weather(city) looks up the current weather for a city."
    }

    async fn invoke(&self, input: ToolInput) -> Result<String, ToolError> {
        let city = input
            .primary("city")
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| {
                ToolError::InvalidArguments("get_weather requires a 'city' argument".into())
            })?;

        let (conditions, temperature) = mock_weather(city);
        Ok(format!("{city}: {conditions}, {temperature}°C"))
    }
}

/// Conditions and temperature derived from a hash of the city name.
pub fn mock_weather(city: &str) -> (&'static str, i32) {
    let hash: u32 = city
        .to_lowercase()
        .bytes()
        .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u32));

    let conditions = CONDITIONS[(hash as usize / 7) % CONDITIONS.len()];
    let temperature = (hash % 40) as i32 - 5; // -5 to 34°C
    (conditions, temperature)
}
