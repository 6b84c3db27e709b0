//! Clock Tool

use async_trait::async_trait;
use chrono::Utc;

use lab_core::tool::{Tool, ToolCall, ToolResult, ToolSchema};
use lab_core::Result;

pub struct ClockTool;

#[async_trait]
impl Tool for ClockTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_current_time".into(),
            description: "Get the current date and time".into(),
            parameters: vec![],
        }
    }

    async fn execute(&self, _call: &ToolCall) -> Result<ToolResult> {
        let now = Utc::now();
        let payload = serde_json::json!({
            "datetime": now.format("%Y-%m-%d %H:%M:%S").to_string(),
            "day_of_week": now.format("%A").to_string(),
        });

        Ok(ToolResult::success("get_current_time", payload.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_payload_shape() {
        let result = ClockTool
            .execute(&ToolCall::new("get_current_time"))
            .await
            .unwrap();

        assert!(result.success);
        let payload: serde_json::Value = serde_json::from_str(&result.output).unwrap();
        assert!(payload["datetime"].is_string());
        assert!(payload["day_of_week"].is_string());
    }
}
