//! Document Search Tool
//!
//! Simulated internal knowledge base: a fixed office-policy handbook searched
//! by case-insensitive substring match over topic and body. An empty result
//! set is a normal payload, not an error.

use async_trait::async_trait;

use lab_core::tool::{ParameterSpec, Tool, ToolCall, ToolResult, ToolSchema};
use lab_core::Result;

pub struct DocumentSearchTool;

/// (topic, body)
const HANDBOOK: &[(&str, &str)] = &[
    (
        "leave",
        "Per company policy, employees receive 14 days of paid leave per year. Leave requests \
         must be submitted 3 days in advance, except in emergencies.",
    ),
    (
        "expenses",
        "Expense reimbursement: 1. Fill in the expense form 2. Attach receipts 3. Manager \
         sign-off 4. Finance department review.",
    ),
    (
        "meeting rooms",
        "Book meeting rooms through the internal system. Slots can be reserved up to 2 weeks \
         ahead, 2 hours maximum per booking.",
    ),
    (
        "overtime",
        "Overtime requires prior approval. Weekday overtime pays 1.33x the hourly rate, \
         weekends pay 2x.",
    ),
];

fn search(query: &str) -> Vec<&'static str> {
    let needle = query.to_lowercase();
    HANDBOOK
        .iter()
        .filter(|(topic, body)| {
            topic.to_lowercase().contains(&needle) || body.to_lowercase().contains(&needle)
        })
        .map(|(_, body)| *body)
        .collect()
}

#[async_trait]
impl Tool for DocumentSearchTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "search_documents".into(),
            description: "Search the internal document library (simulated retrieval)".into(),
            parameters: vec![ParameterSpec::required(
                "query",
                "string",
                "Search keyword",
            )],
        }
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
        let query = call.str_arg("query").unwrap_or_default();
        let documents = search(query);

        let payload = serde_json::json!({
            "found": documents.len(),
            "documents": documents,
        });

        Ok(ToolResult::success("search_documents", payload.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_match_on_topic() {
        let call =
            ToolCall::new("search_documents").with_arg("query", serde_json::json!("leave"));
        let result = DocumentSearchTool.execute(&call).await.unwrap();

        let payload: serde_json::Value = serde_json::from_str(&result.output).unwrap();
        assert_eq!(payload["found"], 1);
        assert!(payload["documents"][0]
            .as_str()
            .unwrap()
            .contains("14 days"));
    }

    #[tokio::test]
    async fn test_match_on_body() {
        let call =
            ToolCall::new("search_documents").with_arg("query", serde_json::json!("receipts"));
        let result = DocumentSearchTool.execute(&call).await.unwrap();

        let payload: serde_json::Value = serde_json::from_str(&result.output).unwrap();
        assert_eq!(payload["found"], 1);
    }

    #[tokio::test]
    async fn test_no_match_is_empty_payload_not_error() {
        let call =
            ToolCall::new("search_documents").with_arg("query", serde_json::json!("zeppelin"));
        let result = DocumentSearchTool.execute(&call).await.unwrap();

        assert!(result.success);
        let payload: serde_json::Value = serde_json::from_str(&result.output).unwrap();
        assert_eq!(payload["found"], 0);
        assert!(payload["documents"].as_array().unwrap().is_empty());
    }
}
