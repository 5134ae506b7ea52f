//! Incremental decoder for the `/tail` server-sent event stream.
//!
//! Blocks are separated by a blank line; a line holding only whitespace
//! counts as blank. The `data:` lines of a block are joined with `\n` and
//! decoded as one [`Event`]; blocks that are not valid event JSON are
//! dropped without ending the stream.

use dbl_chat_domain::Event;
use tracing::debug;

/// Largest pending block kept while waiting for its separator.
pub const MAX_BLOCK_BYTES: usize = 1024 * 1024;

#[derive(Debug, Default)]
pub struct SseEventDecoder {
    /// Bytes of the current, unterminated line.
    line: Vec<u8>,
    /// Complete lines of the current block.
    block: Vec<String>,
    block_bytes: usize,
    /// Skipping the rest of an oversized block.
    discarding: bool,
}

impl SseEventDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of the response body and drain every complete event.
    ///
    /// Chunks may split lines, blocks or multi-byte characters anywhere.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<Event> {
        let mut events = Vec::new();

        for &byte in bytes {
            match byte {
                b'\r' => {}
                b'\n' => {
                    let line = String::from_utf8_lossy(&self.line).into_owned();
                    self.line.clear();
                    if let Some(event) = self.push_line(line) {
                        events.push(event);
                    }
                }
                _ => self.line.push(byte),
            }
        }

        if self.block_bytes + self.line.len() > MAX_BLOCK_BYTES {
            if !self.discarding {
                debug!(
                    "Dropping tail block over {} bytes without a separator",
                    MAX_BLOCK_BYTES
                );
                self.reset_block();
                self.discarding = true;
            }
            // Keep one byte so a non-blank line still reads as non-blank.
            let blank = self.line.iter().all(u8::is_ascii_whitespace);
            self.line.clear();
            if !blank {
                self.line.push(b'.');
            }
        }

        events
    }

    /// Whether a partial block is still waiting for its terminator.
    pub fn has_partial_block(&self) -> bool {
        !self.discarding
            && (!self.block.is_empty() || self.line.iter().any(|b| !b.is_ascii_whitespace()))
    }

    fn push_line(&mut self, line: String) -> Option<Event> {
        if !line.trim().is_empty() {
            if !self.discarding {
                self.block_bytes += line.len();
                self.block.push(line);
            }
            return None;
        }

        if self.discarding {
            self.discarding = false;
            return None;
        }

        let data = extract_data(&self.block);
        self.reset_block();

        match serde_json::from_str::<Event>(&data?) {
            Ok(event) => Some(event),
            Err(e) => {
                debug!("Dropping malformed tail block: {}", e);
                None
            }
        }
    }

    fn reset_block(&mut self) {
        self.block.clear();
        self.block_bytes = 0;
    }
}

fn extract_data(block: &[String]) -> Option<String> {
    let lines: Vec<&str> = block
        .iter()
        .map(|line| line.trim())
        .filter_map(|line| line.strip_prefix("data:"))
        .map(str::trim_start)
        .collect();

    if lines.is_empty() {
        return None;
    }
    let data = lines.join("\n");
    if data.trim().is_empty() { None } else { Some(data) }
}
