//! Meeting Booking Tool
//!
//! Simulated booking against a fixed conflict table. Confirmation codes are
//! derived from the booking details so demo runs are reproducible.

use async_trait::async_trait;

use lab_core::tool::{ParameterSpec, Tool, ToolCall, ToolResult, ToolSchema};
use lab_core::Result;

pub struct MeetingBookingTool;

/// (room, date, start time) slots already taken
const BOOKED_SLOTS: &[(&str, &str, &str)] = &[
    ("Orion", "2025-03-10", "09:00"),
    ("Orion", "2025-03-10", "14:00"),
    ("Lyra", "2025-03-11", "10:00"),
];

fn slot_taken(room: &str, date: &str, start_time: &str) -> bool {
    BOOKED_SLOTS
        .iter()
        .any(|(r, d, t)| r.eq_ignore_ascii_case(room) && *d == date && *t == start_time)
}

fn confirmation_code(room: &str, date: &str, start_time: &str) -> String {
    let sum: u32 = format!("{room}{date}{start_time}")
        .bytes()
        .map(u32::from)
        .sum();
    format!("MTG-{:04}", 1000 + sum % 9000)
}

#[async_trait]
impl Tool for MeetingBookingTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "book_meeting".into(),
            description: "Book a meeting room".into(),
            parameters: vec![
                ParameterSpec::required("room", "string", "Meeting room name"),
                ParameterSpec::required("date", "string", "Date in YYYY-MM-DD format"),
                ParameterSpec::required("start_time", "string", "Start time in HH:MM format"),
                ParameterSpec::required("duration_hours", "integer", "Meeting length in hours"),
            ],
        }
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
        let room = call.str_arg("room").unwrap_or_default();
        let date = call.str_arg("date").unwrap_or_default();
        let start_time = call.str_arg("start_time").unwrap_or_default();
        let duration_hours = call.int_arg("duration_hours").unwrap_or(1);

        let payload = if slot_taken(room, date, start_time) {
            serde_json::json!({
                "success": false,
                "reason": format!("Room {room} is already booked on {date} at {start_time}"),
            })
        } else {
            serde_json::json!({
                "success": true,
                "room": room,
                "date": date,
                "time": start_time,
                "duration": duration_hours,
                "confirmation_code": confirmation_code(room, date, start_time),
            })
        };

        Ok(ToolResult::success("book_meeting", payload.to_string()))
    }
}
