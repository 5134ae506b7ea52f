//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod await_response;
pub mod negotiate_session;
pub mod submit_turn;
