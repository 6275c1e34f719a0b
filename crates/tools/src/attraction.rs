//! Attraction tool: recommends sights for a city given the weather.
//!
//! Rainy or foggy weather favours indoor venues; everything else gets
//! outdoor suggestions. The venue list is a small offline catalogue with a
//! generic fallback for unknown cities.

use agentloops_core::action::ToolInput;
use agentloops_core::error::ToolError;
use agentloops_core::tool::Tool;
use async_trait::async_trait;

pub struct AttractionTool;

pub const NAME: &str = "get_attraction";

struct CityGuide {
    city: &'static str,
    indoor: &'static [&'static str],
    outdoor: &'static [&'static str],
}

const GUIDES: &[CityGuide] = &[
    CityGuide {
        city: "beijing",
        indoor: &[
            "The Palace Museum: imperial palace of the Ming and Qing dynasties",
            "National Museum of China",
        ],
        outdoor: &["The Great Wall at Mutianyu", "Summer Palace gardens"],
    },
    CityGuide {
        city: "paris",
        indoor: &["The Louvre", "Musée d'Orsay"],
        outdoor: &["Eiffel Tower and Champ de Mars", "A walk along the Seine"],
    },
    CityGuide {
        city: "tokyo",
        indoor: &["Tokyo National Museum", "teamLab Planets"],
        outdoor: &["Senso-ji and Asakusa", "Shinjuku Gyoen"],
    },
];

#[async_trait]
impl Tool for AttractionTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "get_attraction(city, weather) recommends tourist attractions for a city based on the weather."
    }

    async fn invoke(&self, input: ToolInput) -> Result<String, ToolError> {
        let (city, weather) = match (input.arg("city"), input.arg("weather")) {
            (Some(city), Some(weather)) => (city.trim(), weather.trim()),
            _ => {
                return Err(ToolError::InvalidArguments(
                    "get_attraction requires 'city' and 'weather' arguments".into(),
                ));
            }
        };

        let picks = recommend(city, weather);
        let lines: Vec<String> = picks.iter().map(|p| format!("- {p}")).collect();
        Ok(format!(
            "Given {weather} weather in {city}, we recommend:\n{}",
            lines.join("\n")
        ))
    }
}

fn prefers_indoor(weather: &str) -> bool {
    let w = weather.to_lowercase();
    ["rain", "storm", "snow", "fog"].iter().any(|k| w.contains(k))
}

fn recommend(city: &str, weather: &str) -> Vec<String> {
    let indoor = prefers_indoor(weather);
    let key = city.to_lowercase();

    match GUIDES.iter().find(|g| g.city == key) {
        Some(guide) => {
            let picks = if indoor { guide.indoor } else { guide.outdoor };
            picks.iter().map(|p| p.to_string()).collect()
        }
        None if indoor => vec![
            format!("The {city} city museum"),
            format!("A covered market in central {city}"),
        ],
        None => vec![
            format!("The old town of {city}"),
            format!("The largest public park in {city}"),
        ],
    }
}
