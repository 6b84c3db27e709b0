//! Order Tools
//!
//! Simulated order system: status lookup and return requests over a fixed
//! order table. Unknown order ids return an explicit not-found payload.

use async_trait::async_trait;

use lab_core::tool::{ParameterSpec, Tool, ToolCall, ToolResult, ToolSchema};
use lab_core::Result;

struct OrderRecord {
    status: &'static str,
    item: &'static str,
    can_return: bool,
}

fn lookup_order(order_id: &str) -> Option<OrderRecord> {
    match order_id {
        "ORD-2024001" => Some(OrderRecord {
            status: "Shipped",
            item: "Wireless Mechanical Keyboard",
            can_return: true,
        }),
        "ORD-2024002" => Some(OrderRecord {
            status: "Processing",
            item: "USB-C Docking Station",
            can_return: false,
        }),
        "ORD-2024003" => Some(OrderRecord {
            status: "Delivered",
            item: "27-inch Monitor",
            can_return: true,
        }),
        _ => None,
    }
}

pub struct OrderStatusTool;

#[async_trait]
impl Tool for OrderStatusTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_order_status".into(),
            description: "Look up the status of an order by its order id".into(),
            parameters: vec![ParameterSpec::required(
                "order_id",
                "string",
                "Order id, e.g. ORD-2024001",
            )],
        }
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
        let order_id = call.str_arg("order_id").unwrap_or_default();

        let payload = match lookup_order(order_id) {
            Some(order) => serde_json::json!({
                "order_id": order_id,
                "status": order.status,
                "item": order.item,
                "can_return": order.can_return,
            }),
            None => serde_json::json!({
                "order_id": order_id,
                "found": false,
                "message": "No order with this id exists",
            }),
        };

        Ok(ToolResult::success("get_order_status", payload.to_string()))
    }
}

pub struct ReturnRequestTool;

#[async_trait]
impl Tool for ReturnRequestTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "submit_return_request".into(),
            description: "Submit a return request for an order".into(),
            parameters: vec![
                ParameterSpec::required("order_id", "string", "Order id, e.g. ORD-2024001"),
                ParameterSpec::required("reason", "string", "Reason for the return"),
            ],
        }
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
        let order_id = call.str_arg("order_id").unwrap_or_default();
        let reason = call.str_arg("reason").unwrap_or_default();

        let payload = match lookup_order(order_id) {
            Some(order) if order.can_return => serde_json::json!({
                "success": true,
                "order_id": order_id,
                "reason": reason,
                "rma_code": rma_code(order_id),
            }),
            Some(order) => serde_json::json!({
                "success": false,
                "order_id": order_id,
                "reason": format!("Order in status '{}' is not eligible for return", order.status),
            }),
            None => serde_json::json!({
                "success": false,
                "order_id": order_id,
                "reason": "No order with this id exists",
            }),
        };

        Ok(ToolResult::success("submit_return_request", payload.to_string()))
    }
}

/// Deterministic confirmation code so repeated demo runs line up.
fn rma_code(order_id: &str) -> String {
    let sum: u32 = order_id.bytes().map(u32::from).sum();
    format!("RMA-{:04}", 1000 + sum % 9000)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_call(order_id: &str) -> ToolCall {
        ToolCall::new("get_order_status").with_arg("order_id", serde_json::json!(order_id))
    }

    #[tokio::test]
    async fn test_known_order_is_idempotent() {
        let first = OrderStatusTool
            .execute(&status_call("ORD-2024001"))
            .await
            .unwrap();
        let second = OrderStatusTool
            .execute(&status_call("ORD-2024001"))
            .await
            .unwrap();

        assert_eq!(first.output, second.output);

        let payload: serde_json::Value = serde_json::from_str(&first.output).unwrap();
        assert_eq!(payload["status"], "Shipped");
        assert_eq!(payload["item"], "Wireless Mechanical Keyboard");
        assert_eq!(payload["can_return"], true);
    }

    #[tokio::test]
    async fn test_unknown_order_is_not_found_never_success_payload() {
        let result = OrderStatusTool
            .execute(&status_call("ORD-0000000"))
            .await
            .unwrap();

        let payload: serde_json::Value = serde_json::from_str(&result.output).unwrap();
        assert_eq!(payload["found"], false);
        assert!(payload.get("status").is_none());
    }

    fn return_call(order_id: &str) -> ToolCall {
        ToolCall::new("submit_return_request")
            .with_arg("order_id", serde_json::json!(order_id))
            .with_arg("reason", serde_json::json!("wrong size"))
    }

    #[tokio::test]
    async fn test_return_for_returnable_order() {
        let result = ReturnRequestTool
            .execute(&return_call("ORD-2024001"))
            .await
            .unwrap();

        let payload: serde_json::Value = serde_json::from_str(&result.output).unwrap();
        assert_eq!(payload["success"], true);
        assert!(payload["rma_code"].as_str().unwrap().starts_with("RMA-"));
    }

    #[tokio::test]
    async fn test_return_rejected_for_non_returnable_order() {
        let result = ReturnRequestTool
            .execute(&return_call("ORD-2024002"))
            .await
            .unwrap();

        let payload: serde_json::Value = serde_json::from_str(&result.output).unwrap();
        assert_eq!(payload["success"], false);
    }

    #[tokio::test]
    async fn test_return_rejected_for_unknown_order() {
        let result = ReturnRequestTool
            .execute(&return_call("ORD-9999999"))
            .await
            .unwrap();

        let payload: serde_json::Value = serde_json::from_str(&result.output).unwrap();
        assert_eq!(payload["success"], false);
    }

    #[test]
    fn test_rma_code_is_deterministic() {
        assert_eq!(rma_code("ORD-2024001"), rma_code("ORD-2024001"));
    }
}
