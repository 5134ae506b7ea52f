//! Delivery mode selection.

use crate::capability::entities::Capabilities;
use crate::capability::surface::Surface;

/// How the engine reads the event log for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMode {
    /// Push: one streaming connection per wait.
    Tail,
    /// Pull: adaptive snapshot polling.
    Poll,
}

impl DeliveryMode {
    /// Pick the mode once from configuration and negotiated capabilities.
    ///
    /// Tail needs both the operator's preference and the advertised surface;
    /// poll needs only the surface. `None` means no read surface is usable.
    pub fn select(capabilities: &Capabilities, prefer_streaming: bool) -> Option<Self> {
        if prefer_streaming && capabilities.supports(Surface::Tail) {
            Some(DeliveryMode::Tail)
        } else if capabilities.supports(Surface::Snapshot) {
            Some(DeliveryMode::Poll)
        } else {
            None
        }
    }

    pub fn surface(&self) -> Surface {
        match self {
            DeliveryMode::Tail => Surface::Tail,
            DeliveryMode::Poll => Surface::Snapshot,
        }
    }
}

impl std::fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryMode::Tail => f.write_str("tail"),
            DeliveryMode::Poll => f.write_str("poll"),
        }
    }
}
