//! The conversation engine: the heart of PersonaChat.
//!
//! Each request runs a bounded **Ask → Act → Observe** cycle:
//!
//! 1. **Build context** (persona system prompt + caller history + new user message)
//! 2. **Send to the model** together with the tool declarations
//! 3. **If tool calls**: dispatch each one, append the results, loop back to step 2
//! 4. **If text**: return it to the caller
//!
//! The loop ends on the first final answer or after `max_rounds` tool rounds.
//! [`context`] loads the persona's background once at startup.

pub mod context;
pub mod engine;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use context::load_persona;
pub use engine::{ConversationEngine, EMPTY_RESPONSE_APOLOGY, ERROR_APOLOGY, EngineError};
