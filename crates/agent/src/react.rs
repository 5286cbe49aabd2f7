//! ReAct loop — Thought → Action → Observation until a final answer.
//!
//! One run owns its transcript and iteration counter; nothing survives the
//! call. Per iteration the loop:
//!
//! 1. sends the whole transcript to the reasoning service,
//! 2. appends the raw reply as an assistant message,
//! 3. parses it: a final answer ends the run, a parse failure is fed back
//!    as `Error: ...`,
//! 4. otherwise dispatches exactly one tool and feeds back
//!    `Observation: ...`.
//!
//! Only a failing reasoning call ends a run with an error. Running out of
//! iterations is a normal outcome with a fixed answer.

use std::sync::Arc;
use std::time::Duration;
use thinkloop_core::agent::AgentConfig;
use thinkloop_core::error::ProviderError;
use thinkloop_core::message::Message;
use thinkloop_core::provider::{Provider, ProviderRequest};
use thinkloop_core::tool::{Arguments, ToolRegistry};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::parser::{self, ParsedOutcome};
use crate::prompt::PromptBuilder;

/// Answer returned when the iteration budget runs out.
pub const EXHAUSTED_ANSWER: &str =
    "I could not complete the task within the allowed number of iterations.";

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Answered,
    Exhausted,
}

/// One inspectable step of a run.
#[derive(Debug, Clone, PartialEq)]
pub enum TraceStep {
    Thought(String),
    Action { tool: String, arguments: Arguments },
    Observation(String),
    ParseFailure(String),
    FinalAnswer(String),
}

/// The result of a ReAct execution.
#[derive(Debug, Clone)]
pub struct ReactResult {
    /// The final answer, or [`EXHAUSTED_ANSWER`].
    pub answer: String,
    pub outcome: RunOutcome,
    /// Number of iterations used.
    pub iterations: u32,
    /// Total tool dispatches.
    pub tool_calls_made: usize,
    /// Complete reasoning trace.
    pub trace: Vec<TraceStep>,
    /// Every message exchanged, system prompt first.
    pub transcript: Vec<Message>,
}

/// Per-run state. Created by `execute`, dropped when it returns.
struct RunState {
    transcript: Vec<Message>,
    iteration: u32,
    max_iterations: u32,
}

impl RunState {
    fn new(system_prompt: &str, task: &str, max_iterations: u32) -> Self {
        Self {
            transcript: vec![
                Message::system(system_prompt),
                Message::user(format!("Question: {task}")),
            ],
            iteration: 0,
            max_iterations,
        }
    }

    /// Advance to the next iteration. Returns false once the budget is spent.
    fn tick(&mut self) -> bool {
        if self.iteration >= self.max_iterations {
            return false;
        }
        self.iteration += 1;
        true
    }

    fn observe(&mut self, observation: &str) {
        self.transcript
            .push(Message::user(format!("Observation: {observation}")));
    }
}

/// The agent loop controller.
pub struct ReactAgent {
    provider: Arc<dyn Provider>,
    tools: Arc<ToolRegistry>,
    config: AgentConfig,
    system_prompt: String,
}

impl ReactAgent {
    /// Create an agent. The registry may be shared by any number of agents.
    pub fn new(provider: Arc<dyn Provider>, tools: Arc<ToolRegistry>, config: AgentConfig) -> Self {
        let system_prompt = PromptBuilder::new(&tools).build();
        info!(
            tools = tools.len(),
            provider = provider.name(),
            model = %config.model,
            "ReAct agent initialized"
        );
        Self {
            provider,
            tools,
            config,
            system_prompt,
        }
    }

    /// Registered tool names, sorted.
    pub fn list_tools(&self) -> Vec<&str> {
        self.tools.names()
    }

    /// The tool catalog, one signature per line.
    pub fn describe_tools(&self) -> String {
        self.tools.describe()
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Run a task and return only the answer text.
    pub async fn run(&self, task: &str) -> thinkloop_core::Result<String> {
        self.execute(task).await.map(|result| result.answer)
    }

    /// Run a task and return the answer with its full trace.
    pub async fn execute(&self, task: &str) -> thinkloop_core::Result<ReactResult> {
        let run_id = Uuid::new_v4();
        let mut state = RunState::new(&self.system_prompt, task, self.config.max_iterations);
        let mut trace = Vec::new();
        let mut tool_calls_made = 0usize;

        info!(
            %run_id,
            model = %self.config.model,
            max_iter = self.config.max_iterations,
            "ReAct run starting"
        );

        while state.tick() {
            debug!(%run_id, iteration = state.iteration, "ReAct iteration");

            let Some(reply) = self.reason(&state.transcript).await? else {
                let observation = format!(
                    "reasoning service timed out after {}s",
                    self.config.llm_timeout_secs.unwrap_or_default()
                );
                warn!(%run_id, iteration = state.iteration, "Reasoning call timed out");
                trace.push(TraceStep::Observation(observation.clone()));
                state.observe(&observation);
                continue;
            };

            state.transcript.push(Message::assistant(reply.as_str()));

            match parser::parse(&reply) {
                Ok(ParsedOutcome::FinalAnswer { text }) => {
                    trace.push(TraceStep::FinalAnswer(text.clone()));
                    info!(
                        %run_id,
                        iterations = state.iteration,
                        tool_calls = tool_calls_made,
                        "ReAct run completed"
                    );
                    return Ok(ReactResult {
                        answer: text,
                        outcome: RunOutcome::Answered,
                        iterations: state.iteration,
                        tool_calls_made,
                        trace,
                        transcript: state.transcript,
                    });
                }
                Ok(ParsedOutcome::Action(action)) => {
                    debug!(
                        %run_id,
                        tool = %action.name,
                        thought = %action.thought,
                        "Dispatching action"
                    );
                    trace.push(TraceStep::Thought(action.thought));
                    trace.push(TraceStep::Action {
                        tool: action.name.clone(),
                        arguments: action.arguments.clone(),
                    });

                    let observation = self.tools.dispatch(&action.name, &action.arguments).await;
                    tool_calls_made += 1;

                    debug!(%run_id, tool = %action.name, observation = %observation, "Observation");
                    trace.push(TraceStep::Observation(observation.clone()));
                    state.observe(&observation);
                }
                Err(e) => {
                    warn!(
                        %run_id,
                        iteration = state.iteration,
                        error = %e,
                        "Could not parse model reply"
                    );
                    trace.push(TraceStep::ParseFailure(e.to_string()));
                    state.transcript.push(Message::user(format!("Error: {e}")));
                }
            }
        }

        warn!(
            %run_id,
            max_iter = self.config.max_iterations,
            "ReAct run hit the iteration limit"
        );

        Ok(ReactResult {
            answer: EXHAUSTED_ANSWER.to_string(),
            outcome: RunOutcome::Exhausted,
            iterations: state.iteration,
            tool_calls_made,
            trace,
            transcript: state.transcript,
        })
    }

    /// One reasoning call. `Ok(None)` means the configured timeout expired.
    async fn reason(&self, transcript: &[Message]) -> Result<Option<String>, ProviderError> {
        let request = ProviderRequest {
            model: self.config.model.clone(),
            messages: transcript.to_vec(),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            stop: vec![],
        };

        let response = match self.config.llm_timeout_secs {
            Some(secs) => {
                let limit = Duration::from_secs(secs);
                match tokio::time::timeout(limit, self.provider.complete(request)).await {
                    Ok(response) => response?,
                    Err(_) => return Ok(None),
                }
            }
            None => self.provider.complete(request).await?,
        };

        if let Some(usage) = &response.usage {
            debug!(
                model = %response.model,
                total_tokens = usage.total_tokens,
                "Reasoning call finished"
            );
        }

        Ok(Some(response.message.content))
    }
}
