//! Subcommands and the wiring they share.

pub mod chat;
pub mod demo;
pub mod onboard;
pub mod run;
pub mod scenarios;
pub mod tools;

use anyhow::Context as _;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thinkloop_agent::{ReactAgent, ReactResult, RunOutcome, TraceStep};
use thinkloop_config::AppConfig;
use thinkloop_core::tool::ToolRegistry;
use thinkloop_tools::{RateTable, builtin_tools};

/// Global flags every command sees.
pub struct Context {
    pub config_path: Option<PathBuf>,
    pub verbose: bool,
}

/// Per-invocation overrides from the command line.
#[derive(Default)]
pub struct Overrides {
    pub max_iterations: Option<u32>,
    pub model: Option<String>,
}

impl Context {
    pub fn config_file(&self) -> PathBuf {
        self.config_path
            .clone()
            .unwrap_or_else(|| AppConfig::config_dir().join("config.toml"))
    }

    pub fn load_config(&self) -> anyhow::Result<AppConfig> {
        let path = self.config_file();
        AppConfig::load_with_env(&path)
            .with_context(|| format!("failed to load config from {}", path.display()))
    }
}

/// Build the shared tool registry described by `config`.
pub fn build_registry(config: &AppConfig) -> anyhow::Result<Arc<ToolRegistry>> {
    let currency = &config.tools.currency;
    let rates = RateTable::new(currency.base.clone(), currency.rates.clone());

    let mut registry = ToolRegistry::register_all(builtin_tools(rates))?;
    if let Some(secs) = config.agent.tool_timeout_secs {
        registry = registry.with_timeout(Duration::from_secs(secs));
    }
    Ok(Arc::new(registry))
}

/// Load config, check credentials, and assemble an agent.
pub fn build_agent(ctx: &Context, overrides: Overrides) -> anyhow::Result<ReactAgent> {
    let config = ctx.load_config()?;

    let provider = thinkloop_providers::build_from_config(&config).map_err(|e| {
        anyhow::anyhow!(
            "{e}\n\n  Set THINKLOOP_API_KEY or OPENAI_API_KEY, or add api_key to {}",
            ctx.config_file().display()
        )
    })?;
    let tools = build_registry(&config)?;

    let mut agent_config = config.agent_config();
    if let Some(max) = overrides.max_iterations {
        anyhow::ensure!(max >= 1, "--max-iterations must be at least 1");
        agent_config = agent_config.with_max_iterations(max);
    }
    if let Some(model) = overrides.model {
        agent_config.model = model;
    }

    Ok(ReactAgent::new(provider, tools, agent_config))
}

/// Items selected by a 1-based `index`, or all of them.
pub fn select_by_index<T: Clone>(
    items: &[T],
    index: Option<usize>,
    what: &str,
) -> anyhow::Result<Vec<T>> {
    match index {
        None => Ok(items.to_vec()),
        Some(i) => {
            let item = i
                .checked_sub(1)
                .and_then(|i| items.get(i))
                .ok_or_else(|| {
                    anyhow::anyhow!("{what} index must be between 1 and {}", items.len())
                })?;
            Ok(vec![item.clone()])
        }
    }
}

/// One trace step as a display line.
pub fn format_step(step: &TraceStep) -> String {
    match step {
        TraceStep::Thought(text) => format!("Thought: {text}"),
        TraceStep::Action { tool, arguments } => {
            let args = serde_json::to_string(arguments).unwrap_or_default();
            format!("Action: {tool} {args}")
        }
        TraceStep::Observation(text) => format!("Observation: {text}"),
        TraceStep::ParseFailure(text) => format!("Parse error: {text}"),
        TraceStep::FinalAnswer(text) => format!("Final Answer: {text}"),
    }
}

/// Print a run result; with `verbose`, the trace first.
pub fn print_result(result: &ReactResult, verbose: bool) {
    if verbose {
        println!();
        for step in &result.trace {
            for line in format_step(step).lines() {
                println!("  │ {line}");
            }
        }
        let outcome = match result.outcome {
            RunOutcome::Answered => "answered",
            RunOutcome::Exhausted => "iteration limit reached",
        };
        println!(
            "  └ {outcome} after {} iteration(s), {} tool call(s)",
            result.iterations, result.tool_calls_made
        );
        println!();
    }
    println!("{}", result.answer);
}

#[cfg(test)]
mod tests {
    use super::*;
    use thinkloop_core::tool::Arguments;

    #[test]
    fn format_action_step() {
        let mut arguments = Arguments::new();
        arguments.insert("expression".into(), "200 * 0.15".into());
        let line = format_step(&TraceStep::Action {
            tool: "calculator".into(),
            arguments,
        });
        assert_eq!(line, r#"Action: calculator {"expression":"200 * 0.15"}"#);
    }

    #[test]
    fn format_other_steps() {
        assert_eq!(
            format_step(&TraceStep::Observation("30.0".into())),
            "Observation: 30.0"
        );
        assert_eq!(
            format_step(&TraceStep::ParseFailure("no 'Action:'".into())),
            "Parse error: no 'Action:'"
        );
    }

    #[test]
    fn registry_uses_configured_rates() {
        let mut config = AppConfig::default();
        config.tools.currency.rates.insert("SEK".into(), 11.5);
        let registry = build_registry(&config).unwrap();
        assert!(
            registry
                .get("convert_currency")
                .unwrap()
                .description()
                .contains("SEK")
        );
    }

    #[test]
    fn select_by_index_bounds() {
        let items = ["a", "b", "c"];
        assert_eq!(select_by_index(&items, None, "item").unwrap().len(), 3);
        assert_eq!(select_by_index(&items, Some(3), "item").unwrap(), vec!["c"]);

        let err = select_by_index(&items, Some(0), "item").unwrap_err();
        assert_eq!(err.to_string(), "item index must be between 1 and 3");
        assert!(select_by_index(&items, Some(4), "item").is_err());
    }

    #[test]
    fn explicit_config_path_wins() {
        let ctx = Context {
            config_path: Some(PathBuf::from("/tmp/thinkloop-test.toml")),
            verbose: false,
        };
        assert_eq!(ctx.config_file(), PathBuf::from("/tmp/thinkloop-test.toml"));
    }
}
