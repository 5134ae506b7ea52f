//! Event sources: one per delivery mode.
//!
//! Both produce a lazy, non-rewindable sequence of events and observe every
//! event on the shared [`ReadCursor`] before yielding it. Matching happens
//! in the engine, not here.

use super::DeliveryError;
use dbl_chat_domain::{Event, ReadCursor};
use futures::stream::BoxStream;

/// A delivery strategy over the gateway event log.
pub trait EventSource: Send + Sync {
    /// Consume events starting at `cursor`.
    ///
    /// The stream holds the cursor exclusively until dropped; dropping it
    /// at any await point leaves the cursor at the last fully processed
    /// event.
    fn consume<'a>(
        &'a self,
        cursor: &'a mut ReadCursor,
    ) -> BoxStream<'a, Result<Event, DeliveryError>>;
}
