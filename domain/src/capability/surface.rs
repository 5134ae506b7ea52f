//! Read surfaces a gateway can advertise.

use serde::{Deserialize, Serialize};

/// A way of reading the gateway's event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Surface {
    /// Push: a live server-sent-event stream starting after a given index.
    Tail,
    /// Pull: paginated reads by offset.
    Snapshot,
}

impl Surface {
    /// Name used in the capability descriptor's `surfaces` map.
    pub fn as_str(&self) -> &'static str {
        match self {
            Surface::Tail => "tail",
            Surface::Snapshot => "snapshot",
        }
    }
}

impl std::fmt::Display for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
