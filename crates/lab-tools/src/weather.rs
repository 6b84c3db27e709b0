//! Weather Lookup Tool
//!
//! Simulated weather over a fixed city table. Unknown cities fall back to a
//! default record instead of failing, so the model always gets an answer.

use async_trait::async_trait;

use lab_core::tool::{ParameterSpec, Tool, ToolCall, ToolResult, ToolSchema};
use lab_core::Result;

/// Default record for cities outside the table
const DEFAULT_WEATHER: (i32, &str) = (20, "Sunny");

pub struct WeatherTool;

fn city_weather(city: &str) -> (i32, &'static str) {
    // (temperature °C, condition)
    match city.to_lowercase().as_str() {
        "taipei" => (25, "Sunny"),
        "tokyo" => (18, "Partly cloudy"),
        "new york" => (12, "Overcast"),
        "london" => (8, "Light rain"),
        "beijing" => (15, "Hazy"),
        _ => DEFAULT_WEATHER,
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_weather".into(),
            description: "Get the weather for a given city".into(),
            parameters: vec![ParameterSpec::required(
                "city",
                "string",
                "City name, e.g. Taipei, Tokyo, New York",
            )],
        }
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
        let city = call.str_arg("city").unwrap_or_default();
        let (temperature, condition) = city_weather(city);

        let payload = serde_json::json!({
            "city": city,
            "temperature": temperature,
            "condition": condition,
        });

        Ok(ToolResult::success("get_weather", payload.to_string()))
    }
}
