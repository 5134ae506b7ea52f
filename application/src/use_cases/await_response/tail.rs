//! Tail (push) delivery.

use super::DeliveryError;
use super::source::EventSource;
use crate::ports::gateway_transport::{EventStream, GatewayTransport};
use dbl_chat_domain::{Event, ReadCursor};
use futures::StreamExt;
use futures::stream::{self, BoxStream};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Reads the live tail stream, resuming after `last_index`.
///
/// A connection that stays silent for `idle_timeout` is dropped and
/// reopened from the current cursor. A clean end of stream ends the
/// sequence.
pub struct TailSource {
    transport: Arc<dyn GatewayTransport>,
    idle_timeout: Duration,
}

impl TailSource {
    pub fn new(transport: Arc<dyn GatewayTransport>, idle_timeout: Duration) -> Self {
        Self {
            transport,
            idle_timeout,
        }
    }
}

struct TailState<'a> {
    transport: &'a dyn GatewayTransport,
    cursor: &'a mut ReadCursor,
    idle_timeout: Duration,
    connection: Option<EventStream>,
    finished: bool,
}

impl EventSource for TailSource {
    fn consume<'a>(
        &'a self,
        cursor: &'a mut ReadCursor,
    ) -> BoxStream<'a, Result<Event, DeliveryError>> {
        let state = TailState {
            transport: self.transport.as_ref(),
            cursor,
            idle_timeout: self.idle_timeout,
            connection: None,
            finished: false,
        };

        stream::unfold(state, |mut state| async move {
            if state.finished {
                return None;
            }

            loop {
                if state.connection.is_none() {
                    let since = state.cursor.tail_since();
                    debug!("Opening tail stream since {}", since);
                    match state.transport.tail(since).await {
                        Ok(connection) => state.connection = Some(connection),
                        Err(e) => {
                            state.finished = true;
                            return Some((Err(DeliveryError::TailUnavailable(e)), state));
                        }
                    }
                }
                let Some(connection) = state.connection.as_mut() else {
                    continue;
                };

                let next = tokio::time::timeout(state.idle_timeout, connection.next()).await;
                match next {
                    Ok(Some(Ok(event))) => {
                        state.cursor.observe(&event);
                        return Some((Ok(event), state));
                    }
                    Ok(Some(Err(e))) => {
                        state.finished = true;
                        return Some((Err(DeliveryError::TailUnavailable(e)), state));
                    }
                    Ok(None) => {
                        debug!("Tail stream closed at {}", state.cursor);
                        return None;
                    }
                    Err(_) => {
                        warn!(
                            "Tail stream silent for {:?}; reconnecting from {}",
                            state.idle_timeout, state.cursor
                        );
                        state.connection = None;
                    }
                }
            }
        })
        .boxed()
    }
}
