//! # lab-tools
//!
//! The demo tool set for the learning lab: simulated weather, document
//! search, order handling, arithmetic, clock, and meeting booking. All tools
//! run over static in-memory tables so demos behave the same on every run.
//!
//! Levels that need different tool subsets all go through
//! [`demo_registry`] instead of maintaining duplicate registries.

pub mod calculator;
pub mod clock;
pub mod documents;
pub mod meeting;
pub mod orders;
pub mod weather;

pub use calculator::CalculatorTool;
pub use clock::ClockTool;
pub use documents::DocumentSearchTool;
pub use meeting::MeetingBookingTool;
pub use orders::{OrderStatusTool, ReturnRequestTool};
pub use weather::WeatherTool;

use lab_core::ToolRegistry;

/// Names of every demo tool, in registration order.
pub const ALL_TOOLS: &[&str] = &[
    "get_weather",
    "calculate",
    "search_documents",
    "get_order_status",
    "submit_return_request",
    "get_current_time",
    "book_meeting",
];

/// Build a registry containing every demo tool.
pub fn full_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(WeatherTool);
    registry.register(CalculatorTool);
    registry.register(DocumentSearchTool);
    registry.register(OrderStatusTool);
    registry.register(ReturnRequestTool);
    registry.register(ClockTool);
    registry.register(MeetingBookingTool);
    registry
}

/// Build a registry containing only the named demo tools.
///
/// Unknown names are ignored, so callers can pass level-specific lists
/// without tracking which tools exist.
pub fn demo_registry(enabled: &[&str]) -> ToolRegistry {
    full_registry().subset(enabled)
}

/// System prompt used by the tool-calling and agent levels.
pub const ASSISTANT_PROMPT: &str = "You are a customer service assistant for an online store. \
Use the available tools to look up orders, search company policies, and handle return \
requests. Always check the order status before submitting a return. If a tool reports an \
error, explain the problem to the user instead of retrying endlessly. Be concise and accurate.";
