//! Scripted in-memory gateway used by use case tests.

use crate::ports::gateway_transport::{EventStream, GatewayTransport, SnapshotPage, TransportError};
use async_trait::async_trait;
use dbl_chat_domain::{Capabilities, Event, EventKind, IntentEnvelope};
use futures::StreamExt;
use futures::stream;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

/// One step of a scripted tail connection.
#[derive(Debug, Clone)]
pub enum TailStep {
    Event(Event),
    Error(TransportError),
    /// The connection stays open and silent forever.
    Stall,
}

#[derive(Default)]
pub struct ScriptedTransport {
    capabilities: Mutex<Option<Result<Capabilities, TransportError>>>,
    intent_results: Mutex<VecDeque<Result<Value, TransportError>>>,
    snapshots: Mutex<VecDeque<Result<SnapshotPage, TransportError>>>,
    tails: Mutex<VecDeque<Result<Vec<TailStep>, TransportError>>>,
    pub intents: Mutex<Vec<IntentEnvelope>>,
    pub snapshot_calls: Mutex<Vec<(u64, u32)>>,
    pub tail_calls: Mutex<Vec<i64>>,
    pub capability_calls: Mutex<usize>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capabilities(self, result: Result<Capabilities, TransportError>) -> Self {
        *self.capabilities.lock().unwrap() = Some(result);
        self
    }

    pub fn push_intent_result(&self, result: Result<Value, TransportError>) {
        self.intent_results.lock().unwrap().push_back(result);
    }

    pub fn push_page(&self, events: Vec<Event>) {
        let length = events.len() as u64;
        self.snapshots
            .lock()
            .unwrap()
            .push_back(Ok(SnapshotPage { length, events }));
    }

    pub fn push_page_with_length(&self, length: u64, events: Vec<Event>) {
        self.snapshots
            .lock()
            .unwrap()
            .push_back(Ok(SnapshotPage { length, events }));
    }

    pub fn push_snapshot_error(&self, error: TransportError) {
        self.snapshots.lock().unwrap().push_back(Err(error));
    }

    pub fn push_tail(&self, steps: Vec<TailStep>) {
        self.tails.lock().unwrap().push_back(Ok(steps));
    }

    pub fn push_tail_error(&self, error: TransportError) {
        self.tails.lock().unwrap().push_back(Err(error));
    }

    pub fn snapshot_calls(&self) -> Vec<(u64, u32)> {
        self.snapshot_calls.lock().unwrap().clone()
    }

    pub fn tail_calls(&self) -> Vec<i64> {
        self.tail_calls.lock().unwrap().clone()
    }

    pub fn network_calls(&self) -> usize {
        self.snapshot_calls.lock().unwrap().len()
            + self.tail_calls.lock().unwrap().len()
            + self.intents.lock().unwrap().len()
            + *self.capability_calls.lock().unwrap()
    }
}

#[async_trait]
impl GatewayTransport for ScriptedTransport {
    async fn capabilities(&self) -> Result<Capabilities, TransportError> {
        *self.capability_calls.lock().unwrap() += 1;
        self.capabilities
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Ok(Capabilities::default()))
    }

    async fn post_intent(&self, envelope: &IntentEnvelope) -> Result<Value, TransportError> {
        self.intents.lock().unwrap().push(envelope.clone());
        self.intent_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(serde_json::json!({"accepted": true})))
    }

    async fn snapshot(&self, offset: u64, limit: u32) -> Result<SnapshotPage, TransportError> {
        self.snapshot_calls.lock().unwrap().push((offset, limit));
        self.snapshots
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(SnapshotPage::default()))
    }

    async fn tail(&self, since: i64) -> Result<EventStream, TransportError> {
        self.tail_calls.lock().unwrap().push(since);
        let steps = self
            .tails
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))?;

        let stalls = steps.iter().any(|step| matches!(step, TailStep::Stall));
        let items: Vec<Result<Event, TransportError>> = steps
            .into_iter()
            .take_while(|step| !matches!(step, TailStep::Stall))
            .map(|step| match step {
                TailStep::Event(event) => Ok(event),
                TailStep::Error(error) => Err(error),
                TailStep::Stall => unreachable!(),
            })
            .collect();

        let head = stream::iter(items);
        if stalls {
            Ok(head.chain(stream::pending()).boxed())
        } else {
            Ok(head.boxed())
        }
    }
}

/// Event builder shorthand.
pub fn event(index: u64, correlation_id: &str, kind: EventKind, payload: Value) -> Event {
    Event::new(index, correlation_id, kind, payload)
}

pub fn output(index: u64, correlation_id: &str, text: &str) -> Event {
    event(
        index,
        correlation_id,
        EventKind::Execution,
        serde_json::json!({"output_text": text}),
    )
}

pub fn noise(index: u64) -> Event {
    event(
        index,
        "someone-else",
        EventKind::Other("INTENT".to_string()),
        serde_json::json!({}),
    )
}
