//! Built-in tool implementations for Thinkloop.
//!
//! Tools give the agent the ability to act: do arithmetic safely, read the
//! clock, convert currencies, measure text, and look facts up in a small
//! stub knowledge base.

pub mod calculator;
pub mod clock;
pub mod currency;
pub mod text_length;
pub mod web_search;

use thinkloop_core::error::RegistryError;
use thinkloop_core::tool::{Tool, ToolRegistry};

pub use calculator::{CalculatorTool, EvalError};
pub use clock::ClockTool;
pub use currency::{CurrencyConverterTool, CurrencyError, RateTable};
pub use text_length::TextLengthTool;
pub use web_search::WebSearchTool;

/// The built-in tool set, with the given exchange-rate table.
pub fn builtin_tools(rates: RateTable) -> Vec<Box<dyn Tool>> {
    vec![
        Box::new(WebSearchTool),
        Box::new(CalculatorTool),
        Box::new(ClockTool),
        Box::new(TextLengthTool),
        Box::new(CurrencyConverterTool::new(rates)),
    ]
}

/// Create a registry with all built-in tools and the default rate table.
pub fn default_registry() -> Result<ToolRegistry, RegistryError> {
    ToolRegistry::register_all(builtin_tools(RateTable::default()))
}
