//! Reasoning service clients for Thinkloop.
//!
//! All providers implement the `thinkloop_core::Provider` trait.
//! [`build_from_config`] selects and validates one from configuration.

pub mod openai_compat;
pub mod router;

pub use openai_compat::OpenAiCompatProvider;
pub use router::build_from_config;
