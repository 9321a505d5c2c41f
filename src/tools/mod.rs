//! Demo function tools.

pub mod search;
pub mod weather;

pub use search::{placeholder_results, web_search_tool, SearchResult, WebSearch};
pub use weather::{city_from_task, lookup_weather, table_answer, weather_agent, weather_tool};
