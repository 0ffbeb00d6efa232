use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{Tool, ToolOutput};
use crate::error::{VotaError, VotaResult};

#[derive(Debug, Deserialize)]
pub struct CalculatorInput {
    /// first number
    pub a: i64,
    /// second number
    pub b: i64,
}

/// `(2a) / (b + 10)`
pub fn supermultiply(a: i64, b: i64) -> VotaResult<f64> {
    let divisor = b
        .checked_add(10)
        .ok_or_else(|| VotaError::arithmetic(format!("{} + 10 overflows", b)))?;
    if divisor == 0 {
        return Err(VotaError::arithmetic("division by zero"));
    }
    Ok((2 * a as i128) as f64 / divisor as f64)
}

pub struct SupermultiplyTool;

impl SupermultiplyTool {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SupermultiplyTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for SupermultiplyTool {
    async fn execute(&self, input: Value) -> VotaResult<ToolOutput> {
        let args: CalculatorInput = serde_json::from_value(input)
            .map_err(|e| VotaError::invalid_input(format!("supermultiply expects integers a and b: {}", e)))?;

        let result = supermultiply(args.a, args.b)?;
        Ok(ToolOutput::new(json!(result)))
    }

    fn name(&self) -> &str {
        "supermultiply"
    }

    fn description(&self) -> &str {
        "Supermultiply two numbers."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "a": { "type": "integer", "description": "first number" },
                "b": { "type": "integer", "description": "second number" }
            },
            "required": ["a", "b"]
        })
    }

    fn return_direct(&self) -> bool {
        true
    }
}
