//! Response delivery domain: events, the read cursor, response matching and
//! poll backoff.
//!
//! # Flow
//!
//! ```text
//! gateway event log ──► Event ──► ReadCursor::observe ──► match_response ──► ResponseOutcome
//! ```
//!
//! The cursor is observed for every event regardless of delivery mode, so
//! switching between tail and poll never rewinds the stream.

pub mod backoff;
pub mod cursor;
pub mod event;
pub mod mode;
pub mod outcome;
