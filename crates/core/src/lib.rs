//! # PersonaChat Core
//!
//! Domain types, traits, and error definitions for the PersonaChat assistant.
//! This crate has **no framework dependencies**: it defines the vocabulary
//! (messages, tool calls, provider requests, persona context) that the
//! provider, tool, agent and gateway crates implement against.
//!
//! The two outbound seams are traits defined here:
//! - [`Provider`] for the language-model API
//! - [`Notifier`] for best-effort push alerts
//!
//! so the conversation engine can be exercised with scripted stand-ins.

pub mod error;
pub mod message;
pub mod notify;
pub mod persona;
pub mod provider;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{ProviderError, ToolError};
pub use message::{Message, MessageToolCall, Role};
pub use notify::Notifier;
pub use persona::PersonaContext;
pub use provider::{
    FinishReason, Provider, ProviderRequest, ProviderResponse, ToolDefinition, Usage,
};
pub use tool::{RECORDED_OK, ToolResult};
