//! Poll (pull) delivery.

use super::DeliveryError;
use super::source::EventSource;
use crate::ports::gateway_transport::GatewayTransport;
use dbl_chat_domain::{BackoffStep, Event, PollBackoff, PollPolicy, ReadCursor};
use futures::StreamExt;
use futures::stream::{self, BoxStream};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, warn};

/// Pages through the snapshot surface with adaptive delay.
///
/// The page offset advances by the length of every page fetched, so a page
/// is never requested twice. The sequence only ends with an error.
pub struct PollSource {
    transport: Arc<dyn GatewayTransport>,
    policy: PollPolicy,
}

impl PollSource {
    pub fn new(transport: Arc<dyn GatewayTransport>, policy: PollPolicy) -> Self {
        Self { transport, policy }
    }
}

struct PollState<'a> {
    transport: &'a dyn GatewayTransport,
    cursor: &'a mut ReadCursor,
    backoff: PollBackoff,
    page_limit: u32,
    pending: VecDeque<Event>,
    /// A page was fetched and fully handed out without ending the wait.
    page_drained: bool,
    finished: bool,
}

impl EventSource for PollSource {
    fn consume<'a>(
        &'a self,
        cursor: &'a mut ReadCursor,
    ) -> BoxStream<'a, Result<Event, DeliveryError>> {
        let state = PollState {
            transport: self.transport.as_ref(),
            cursor,
            backoff: PollBackoff::new(self.policy.clone()),
            page_limit: self.policy.page_limit,
            pending: VecDeque::new(),
            page_drained: false,
            finished: false,
        };

        stream::unfold(state, |mut state| async move {
            if state.finished {
                return None;
            }

            loop {
                if let Some(event) = state.pending.pop_front() {
                    state.cursor.observe(&event);
                    return Some((Ok(event), state));
                }

                if state.page_drained {
                    let delay = state.backoff.on_page();
                    tokio::time::sleep(delay).await;
                }

                let offset = state.cursor.offset();
                match state.transport.snapshot(offset, state.page_limit).await {
                    Ok(page) => {
                        debug!(
                            "Snapshot page at offset {}: {} events (log length {})",
                            offset,
                            page.events.len(),
                            page.length
                        );
                        state.cursor.advance_offset(page.events.len());
                        state.pending = page.events.into();
                        state.page_drained = true;
                    }
                    Err(e) if e.is_not_found() => {
                        state.finished = true;
                        return Some((Err(DeliveryError::SnapshotUnsupported), state));
                    }
                    Err(e) => match state.backoff.on_failure() {
                        BackoffStep::Retry(delay) => {
                            warn!(
                                "Snapshot poll failed ({} in a row), retrying in {:?}: {}",
                                state.backoff.failures(),
                                delay,
                                e
                            );
                            state.page_drained = false;
                            tokio::time::sleep(delay).await;
                        }
                        BackoffStep::Exhausted { failures } => {
                            state.finished = true;
                            return Some((
                                Err(DeliveryError::PollingExhausted {
                                    failures,
                                    last_error: e,
                                }),
                                state,
                            ));
                        }
                    },
                }
            }
        })
        .boxed()
    }
}
