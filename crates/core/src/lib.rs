//! # Thinkloop Core
//!
//! Domain types, traits, and error definitions for the Thinkloop agent.
//! This crate has **no framework dependencies**: it defines the domain model
//! that every other crate implements against.
//!
//! ## Design Philosophy
//!
//! Each external capability is a trait here. Implementations live in their
//! respective crates:
//! - [`Provider`]: the reasoning service (`thinkloop-providers`)
//! - [`Tool`]: a callable capability (`thinkloop-tools`)
//!
//! The [`ToolRegistry`] is the one place where tool failures are turned into
//! observation text, so the agent loop never sees a tool error.

pub mod agent;
pub mod error;
pub mod message;
pub mod provider;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use agent::AgentConfig;
pub use error::{Error, ProviderError, RegistryError, Result, ToolError};
pub use message::{Message, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
pub use tool::{Arguments, Tool, ToolParameter, ToolRegistry};
