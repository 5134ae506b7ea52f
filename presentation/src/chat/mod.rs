//! Interactive chat module
//!
//! Provides a readline-based interactive chat interface to the gateway.

mod repl;

pub use repl::{ChatRepl, ReplCommand};
