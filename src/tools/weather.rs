//! Dummy weather tool backed by a fixed table.

use std::sync::Arc;

use agent_core::{Agent, FunctionTool, Tool};
use once_cell::sync::Lazy;
use regex::Regex;
use schemars::JsonSchema;
use serde::Deserialize;

/// (English name, Korean name, report)
const WEATHER_TABLE: &[(&str, &str, &str)] = &[
    ("seoul", "서울", "Sunny, 22°C"),
    ("busan", "부산", "Cloudy, 20°C"),
    ("jeju", "제주", "Rain, 18°C"),
];

pub const DEFAULT_WEATHER_QUERY: &str = "What's the weather like in Seoul today?";

pub fn lookup_weather(location: &str) -> String {
    let wanted = location.trim();
    let lower = wanted.to_lowercase();
    WEATHER_TABLE
        .iter()
        .find(|(english, korean, _)| *english == lower || *korean == wanted)
        .map(|(_, _, report)| (*report).to_string())
        .unwrap_or_else(|| format!("No weather information for {wanted}."))
}

static LATIN_WEATHER_IN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i:weather\s+(?:like\s+)?(?:in|for|at))\s+(?P<city>[a-zA-Z][a-zA-Z-]*(?:\s+[A-Z][a-zA-Z-]*)*)")
        .expect("latin weather regex")
});

static KOREAN_WEATHER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?P<city>[\u{AC00}-\u{D7A3}]{2,8}?)(?:의)?\s*(?:오늘\s*)?날씨")
        .expect("korean weather regex")
});

/// City named in phrases like "check weather in Seoul" or "서울의 오늘 날씨".
pub fn city_from_task(task: &str) -> Option<String> {
    [&*LATIN_WEATHER_IN_REGEX, &*KOREAN_WEATHER_REGEX]
        .iter()
        .find_map(|regex| regex.captures(task))
        .and_then(|caps| caps.name("city"))
        .map(|city| city.as_str().trim().to_string())
        .filter(|city| !city.is_empty())
}

/// Fixed-table entry for the city a question names, as `City: report`.
pub fn table_answer(question: &str) -> Option<String> {
    city_from_task(question).map(|city| format!("{city}: {}", lookup_weather(&city)))
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct WeatherArgs {
    /// City to report the weather for.
    pub location: String,
}

pub fn weather_tool() -> Arc<dyn Tool> {
    FunctionTool::new(
        "get_current_weather",
        "Return the current weather for a location.",
        |args: WeatherArgs| async move { lookup_weather(&args.location) },
    )
    .into_arc()
}

pub fn weather_agent() -> Agent {
    Agent::new(
        "Weather Assistant",
        "You answer the user's weather questions. You provide current weather for the major \
         cities of Korea using the get_current_weather tool.",
    )
    .with_tool(weather_tool())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_table_lookups() {
        assert_eq!(lookup_weather("Seoul"), "Sunny, 22°C");
        assert_eq!(lookup_weather("서울"), "Sunny, 22°C");
        assert_eq!(lookup_weather("busan"), "Cloudy, 20°C");
        assert_eq!(lookup_weather("제주"), "Rain, 18°C");
        assert_eq!(lookup_weather("Tokyo"), "No weather information for Tokyo.");
    }

    #[test]
    fn extracts_city_from_task() {
        assert_eq!(city_from_task("check weather in Seoul").as_deref(), Some("Seoul"));
        assert_eq!(
            city_from_task("What is the weather for Busan today?").as_deref(),
            Some("Busan")
        );
        assert_eq!(city_from_task("서울의 오늘 날씨는 어때?").as_deref(), Some("서울"));
        assert_eq!(city_from_task("book a flight"), None);
    }

    #[test]
    fn seoul_task_resolves_to_fixed_string() {
        let city = city_from_task("check weather in Seoul").unwrap();
        assert_eq!(lookup_weather(&city), "Sunny, 22°C");
    }

    #[test]
    fn default_question_has_a_table_answer() {
        assert_eq!(
            table_answer(DEFAULT_WEATHER_QUERY).as_deref(),
            Some("Seoul: Sunny, 22°C")
        );
        assert_eq!(
            table_answer("weather in Tokyo").as_deref(),
            Some("Tokyo: No weather information for Tokyo.")
        );
        assert_eq!(table_answer("book a flight"), None);
    }
}
