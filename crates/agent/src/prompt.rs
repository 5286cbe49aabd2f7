//! System prompt assembly.
//!
//! The prompt is built once per agent: grammar rules, the tool catalog, and
//! a worked example. The grammar markers are fixed English keywords; the
//! parser only understands these exact spellings.

use thinkloop_core::tool::ToolRegistry;

use crate::parser::{ACTION_INPUT_MARKER, ACTION_MARKER, FINAL_ANSWER_MARKER, THOUGHT_MARKER};

const PREAMBLE: &str = "You are an autonomous agent that uses tools to solve tasks.";

const RULES: &[&str] = &[
    "Use one tool at a time",
    "Wait for the observation before continuing",
    "If a tool fails, try another approach",
    "Do not repeat the same action",
    "Keep your thoughts concise",
];

/// Builds the system message injected at the start of every run.
pub struct PromptBuilder<'a> {
    registry: &'a ToolRegistry,
}

impl<'a> PromptBuilder<'a> {
    pub fn new(registry: &'a ToolRegistry) -> Self {
        Self { registry }
    }

    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(PREAMBLE);
        prompt.push_str("\n\nAVAILABLE TOOLS:\n");
        prompt.push_str(&self.registry.describe());

        prompt.push_str("\n\nRESPONSE FORMAT:\nYou must answer using EXACTLY this format:\n\n");
        prompt.push_str(&format!(
            "{THOUGHT_MARKER} [your reasoning about what to do]\n\
             {ACTION_MARKER} [tool name]\n\
             {ACTION_INPUT_MARKER} [tool parameters as a JSON object]\n"
        ));
        prompt.push_str("\nOR, when you have the final answer:\n\n");
        prompt.push_str(&format!(
            "{THOUGHT_MARKER} I now have all the information I need\n\
             {FINAL_ANSWER_MARKER} [your final answer]\n"
        ));

        prompt.push_str("\nIMPORTANT RULES:\n");
        for (i, rule) in RULES.iter().enumerate() {
            prompt.push_str(&format!("{}. {}\n", i + 1, rule));
        }

        prompt.push_str("\nEXAMPLE:\n");
        prompt.push_str(&format!(
            "Question: What is 15% of 200?\n\
             {THOUGHT_MARKER} I need to compute 15% of 200, which is 200 * 0.15\n\
             {ACTION_MARKER} calculator\n\
             {ACTION_INPUT_MARKER} {{\"expression\": \"200 * 0.15\"}}\n\
             Observation: 30.0\n\
             {THOUGHT_MARKER} I have the result of the calculation\n\
             {FINAL_ANSWER_MARKER} 15% of 200 is 30.\n"
        ));

        prompt.push_str("\nBegin!");
        prompt
    }
}
