//! Arithmetic Tool
//!
//! Evaluates `+ - * / ^` with parentheses over a small recursive-descent
//! parser. Malformed input is a normal outcome at the tool boundary: any
//! evaluation error becomes an error payload, never a propagated failure.

use async_trait::async_trait;

use lab_core::tool::{error_payload, ParameterSpec, Tool, ToolCall, ToolResult, ToolSchema};
use lab_core::Result;

pub struct CalculatorTool;

#[async_trait]
impl Tool for CalculatorTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "calculate".into(),
            description: "Evaluate a mathematical expression".into(),
            parameters: vec![ParameterSpec::required(
                "expression",
                "string",
                "Mathematical expression, e.g. '2+2' or '(10*5)/2'",
            )],
        }
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
        let expression = call.str_arg("expression").unwrap_or_default();

        match evaluate(expression) {
            Ok(value) => {
                let payload = serde_json::json!({
                    "expression": expression,
                    "result": value,
                });
                Ok(ToolResult::success("calculate", payload.to_string()))
            }
            Err(reason) => {
                tracing::debug!(expression, reason, "Expression rejected");
                Ok(ToolResult::failure(
                    "calculate",
                    error_payload(format!("Cannot evaluate expression: {expression}")),
                ))
            }
        }
    }
}

/// Evaluate an arithmetic expression.
///
/// Grammar (recursive descent, `^` right-associative):
/// ```text
/// expr   := term (('+'|'-') term)*
/// term   := power (('*'|'/') power)*
/// power  := unary ('^' power)?
/// unary  := '-' unary | atom
/// atom   := number | '(' expr ')'
/// ```
fn evaluate(input: &str) -> std::result::Result<f64, &'static str> {
    let mut parser = Parser {
        input: input.as_bytes(),
        pos: 0,
    };
    let value = parser.expr()?;
    parser.skip_spaces();
    if parser.pos != parser.input.len() {
        return Err("trailing input");
    }
    Ok(value)
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
}

impl Parser<'_> {
    fn skip_spaces(&mut self) {
        while self.input.get(self.pos) == Some(&b' ') {
            self.pos += 1;
        }
    }

    fn peek(&mut self) -> Option<u8> {
        self.skip_spaces();
        self.input.get(self.pos).copied()
    }

    fn expr(&mut self) -> std::result::Result<f64, &'static str> {
        let mut value = self.term()?;
        while let Some(op @ (b'+' | b'-')) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            value = if op == b'+' { value + rhs } else { value - rhs };
        }
        Ok(value)
    }

    fn term(&mut self) -> std::result::Result<f64, &'static str> {
        let mut value = self.power()?;
        while let Some(op @ (b'*' | b'/')) = self.peek() {
            self.pos += 1;
            let rhs = self.power()?;
            if op == b'/' {
                if rhs == 0.0 {
                    return Err("division by zero");
                }
                value /= rhs;
            } else {
                value *= rhs;
            }
        }
        Ok(value)
    }

    fn power(&mut self) -> std::result::Result<f64, &'static str> {
        let base = self.unary()?;
        if self.peek() == Some(b'^') {
            self.pos += 1;
            let exponent = self.power()?;
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    fn unary(&mut self) -> std::result::Result<f64, &'static str> {
        if self.peek() == Some(b'-') {
            self.pos += 1;
            return Ok(-self.unary()?);
        }
        self.atom()
    }

    fn atom(&mut self) -> std::result::Result<f64, &'static str> {
        match self.peek() {
            Some(b'(') => {
                self.pos += 1;
                let value = self.expr()?;
                if self.peek() != Some(b')') {
                    return Err("unbalanced parentheses");
                }
                self.pos += 1;
                Ok(value)
            }
            Some(c) if c.is_ascii_digit() || c == b'.' => self.number(),
            _ => Err("expected number or '('"),
        }
    }

    fn number(&mut self) -> std::result::Result<f64, &'static str> {
        let start = self.pos;
        while self
            .input
            .get(self.pos)
            .is_some_and(|c| c.is_ascii_digit() || *c == b'.')
        {
            self.pos += 1;
        }
        std::str::from_utf8(&self.input[start..self.pos])
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or("invalid number")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_arithmetic() {
        assert!((evaluate("2+2").unwrap() - 4.0).abs() < f64::EPSILON);
        assert!((evaluate("10 * 5").unwrap() - 50.0).abs() < f64::EPSILON);
        assert!((evaluate("(10*5)/2").unwrap() - 25.0).abs() < f64::EPSILON);
        assert!((evaluate("2 ^ 8").unwrap() - 256.0).abs() < f64::EPSILON);
        assert!((evaluate("-3 + 5").unwrap() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_precedence() {
        assert!((evaluate("2+3*4").unwrap() - 14.0).abs() < f64::EPSILON);
        assert!((evaluate("(2+3)*4").unwrap() - 20.0).abs() < f64::EPSILON);
        // Right-associative power
        assert!((evaluate("2^3^2").unwrap() - 512.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rejects_malformed_input() {
        assert!(evaluate("not-an-expr").is_err());
        assert!(evaluate("2+").is_err());
        assert!(evaluate("(2+3").is_err());
        assert!(evaluate("1/0").is_err());
        assert!(evaluate("").is_err());
    }

    #[tokio::test]
    async fn test_success_payload_contains_result() {
        let call = ToolCall::new("calculate").with_arg("expression", serde_json::json!("2+2"));
        let result = CalculatorTool.execute(&call).await.unwrap();

        assert!(result.success);
        let payload: serde_json::Value = serde_json::from_str(&result.output).unwrap();
        assert_eq!(payload["result"], 4.0);
    }

    #[tokio::test]
    async fn test_malformed_expression_yields_error_payload() {
        let call =
            ToolCall::new("calculate").with_arg("expression", serde_json::json!("not-an-expr"));
        let result = CalculatorTool.execute(&call).await.unwrap();

        assert!(!result.success);
        let payload: serde_json::Value = serde_json::from_str(&result.output).unwrap();
        assert!(payload["error"].as_str().unwrap().contains("not-an-expr"));
    }
}
