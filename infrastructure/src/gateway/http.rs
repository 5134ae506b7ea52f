//! HTTP adapter for the agent gateway.

use super::sse::SseEventDecoder;
use async_trait::async_trait;
use dbl_chat_application::ports::gateway_transport::{
    EventStream, GatewayTransport, SnapshotPage, TransportError,
};
use dbl_chat_domain::{Capabilities, Event, IntentEnvelope};
use futures::StreamExt;
use futures::stream;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::collections::VecDeque;
use std::time::Duration;
use tracing::{debug, trace};

/// [`GatewayTransport`] over reqwest.
///
/// Every non-streaming request is bounded by the request timeout. The tail
/// stream is bounded only while its headers arrive; idle reads are the
/// delivery engine's concern.
#[derive(Debug, Clone)]
pub struct HttpGatewayTransport {
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpGatewayTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let http = Client::builder()
            .connect_timeout(timeout)
            .build()
            .map_err(map_reqwest_error)?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn send(
        &self,
        request: RequestBuilder,
        surface: &str,
    ) -> Result<Response, TransportError> {
        let response = request
            .timeout(self.timeout)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        check_status(response, surface).await
    }
}

#[async_trait]
impl GatewayTransport for HttpGatewayTransport {
    async fn capabilities(&self) -> Result<Capabilities, TransportError> {
        let response = self
            .send(self.http.get(self.url("capabilities")), "capabilities")
            .await?;
        decode_json(response).await
    }

    async fn post_intent(
        &self,
        envelope: &IntentEnvelope,
    ) -> Result<serde_json::Value, TransportError> {
        debug!("POST /ingress/intent correlation_id={}", envelope.correlation_id);
        let response = self
            .send(self.http.post(self.url("ingress/intent")).json(envelope), "ingress")
            .await?;
        decode_json(response).await
    }

    async fn snapshot(&self, offset: u64, limit: u32) -> Result<SnapshotPage, TransportError> {
        trace!("GET /snapshot offset={} limit={}", offset, limit);
        let request = self
            .http
            .get(self.url("snapshot"))
            .query(&[("offset", offset.to_string()), ("limit", limit.to_string())]);
        let response = self.send(request, "snapshot").await?;
        decode_json(response).await
    }

    async fn tail(&self, since: i64) -> Result<EventStream, TransportError> {
        debug!("GET /tail since={}", since);
        let request = self
            .http
            .get(self.url("tail"))
            .query(&[("since", since.to_string())])
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .send();

        let response = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| TransportError::Timeout)?
            .map_err(map_reqwest_error)?;
        let response = check_status(response, "tail").await?;

        Ok(decode_event_stream(response))
    }
}

struct TailBody<S> {
    bytes: S,
    decoder: SseEventDecoder,
    pending: VecDeque<Event>,
}

fn decode_event_stream(response: Response) -> EventStream {
    let state = TailBody {
        bytes: response.bytes_stream().boxed(),
        decoder: SseEventDecoder::new(),
        pending: VecDeque::new(),
    };

    stream::unfold(Some(state), |state| async move {
        let mut state = state?;
        loop {
            if let Some(event) = state.pending.pop_front() {
                return Some((Ok(event), Some(state)));
            }
            match state.bytes.next().await {
                Some(Ok(chunk)) => state.pending.extend(state.decoder.feed(&chunk)),
                Some(Err(e)) => return Some((Err(map_reqwest_error(e)), None)),
                None => {
                    if state.decoder.has_partial_block() {
                        debug!("Tail stream closed inside an unterminated block");
                    }
                    return None;
                }
            }
        }
    })
    .boxed()
}

async fn check_status(response: Response, surface: &str) -> Result<Response, TransportError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(TransportError::NotFound {
            surface: surface.to_string(),
        });
    }

    let body = response.text().await.unwrap_or_else(|_| {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    });
    Err(TransportError::Status {
        status: status.as_u16(),
        body,
    })
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, TransportError> {
    let bytes = response.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&bytes).map_err(|e| TransportError::Decode(e.to_string()))
}

fn map_reqwest_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else if error.is_decode() {
        TransportError::Decode(error.to_string())
    } else {
        TransportError::Connection(error.to_string())
    }
}
