//! Clock tool — reports the current local date and time.

use async_trait::async_trait;
use chrono::Local;
use thinkloop_core::error::ToolError;
use thinkloop_core::tool::{Arguments, Tool, ToolParameter};

/// Output format: `2024-05-17 14:03:59`.
pub const CLOCK_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct ClockTool;

#[async_trait]
impl Tool for ClockTool {
    fn name(&self) -> &str {
        "get_current_time"
    }

    fn description(&self) -> &str {
        "Get the current date and time (YYYY-MM-DD HH:MM:SS, local time)."
    }

    fn parameters(&self) -> Vec<ToolParameter> {
        vec![]
    }

    async fn execute(&self, _arguments: &Arguments) -> Result<String, ToolError> {
        Ok(Local::now().format(CLOCK_FORMAT).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    #[tokio::test]
    async fn output_matches_documented_format() {
        let out = ClockTool.execute(&Arguments::new()).await.unwrap();
        assert!(NaiveDateTime::parse_from_str(&out, CLOCK_FORMAT).is_ok());
        assert_eq!(out.len(), 19);
    }

    #[tokio::test]
    async fn ignores_arguments() {
        let mut args = Arguments::new();
        args.insert("input".into(), serde_json::json!("now please"));
        assert!(ClockTool.execute(&args).await.is_ok());
    }

    #[test]
    fn signature_has_no_parameters() {
        assert!(ClockTool.signature().starts_with("get_current_time():"));
    }
}
