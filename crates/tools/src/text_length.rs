//! Text length tool — counts characters (Unicode scalar values).

use async_trait::async_trait;
use thinkloop_core::error::ToolError;
use thinkloop_core::tool::{Arguments, Tool, ToolParameter, sole_string_arg};

pub struct TextLengthTool;

#[async_trait]
impl Tool for TextLengthTool {
    fn name(&self) -> &str {
        "string_length"
    }

    fn description(&self) -> &str {
        "Count the number of characters in a text."
    }

    fn parameters(&self) -> Vec<ToolParameter> {
        vec![ToolParameter::new("text", "string - the text to measure")]
    }

    async fn execute(&self, arguments: &Arguments) -> Result<String, ToolError> {
        let text = sole_string_arg(arguments, "text")?;
        Ok(text.chars().count().to_string())
    }
}
