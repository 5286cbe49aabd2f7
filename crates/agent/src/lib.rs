//! The core agent loop — the heart of Thinkloop.
//!
//! The agent follows a **Thought → Action → Observation** cycle:
//!
//! 1. **Prompt** the model with the grammar, the tool catalog and the task
//! 2. **Parse** its reply into a final answer or a single tool action
//! 3. **Dispatch** the action through the shared tool registry
//! 4. **Observe**: append the result to the transcript and loop back to 1
//!
//! The loop ends on `Final Answer:` or when the iteration budget runs out.

pub mod parser;
pub mod prompt;
pub mod react;

pub use parser::{Action, ParseError, ParsedOutcome};
pub use prompt::PromptBuilder;
pub use react::{EXHAUSTED_ANSWER, ReactAgent, ReactResult, RunOutcome, TraceStep};

#[cfg(test)]
pub(crate) mod test_helpers;
