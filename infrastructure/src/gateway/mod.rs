//! Gateway adapter
//!
//! [`HttpGatewayTransport`] implements the
//! [`GatewayTransport`](dbl_chat_application::GatewayTransport) port over
//! HTTP. The `/tail` body is decoded incrementally by [`SseEventDecoder`].

pub mod http;
pub mod sse;

pub use http::HttpGatewayTransport;
pub use sse::SseEventDecoder;
