//! Read cursor over the gateway event log.

use super::event::Event;

/// Position of the delivery engine in the event log.
///
/// - `offset` is the start of the next snapshot page (poll mode).
/// - `last_index` is the highest event index observed by either mode and is
///   the resume point for tail reconnection.
///
/// Both only ever move forward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadCursor {
    offset: u64,
    last_index: Option<u64>,
}

impl ReadCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn last_index(&self) -> Option<u64> {
        self.last_index
    }

    /// Record an observed event. Returns true if `last_index` moved.
    pub fn observe(&mut self, event: &Event) -> bool {
        match (event.index, self.last_index) {
            (Some(index), Some(last)) if index <= last => false,
            (Some(index), _) => {
                self.last_index = Some(index);
                true
            }
            (None, _) => false,
        }
    }

    /// Consume a snapshot page of `count` events, empty pages included.
    pub fn advance_offset(&mut self, count: usize) {
        self.offset = self.offset.saturating_add(count as u64);
    }

    /// Jump the page offset forward to `offset`; never rewinds.
    pub fn seek_offset(&mut self, offset: u64) {
        self.offset = self.offset.max(offset);
    }

    /// `since` parameter for a tail request: events strictly after this index.
    ///
    /// `-1` asks for the whole log when nothing has been observed yet.
    pub fn tail_since(&self) -> i64 {
        self.last_index
            .map(|index| i64::try_from(index).unwrap_or(i64::MAX))
            .unwrap_or(-1)
    }
}

impl std::fmt::Display for ReadCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.last_index {
            Some(index) => write!(f, "offset={} last_index={}", self.offset, index),
            None => write!(f, "offset={} last_index=-", self.offset),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::event::EventKind;
    use serde_json::Value;

    fn event(index: Option<u64>) -> Event {
        Event {
            index,
            correlation_id: None,
            kind: EventKind::default(),
            payload: Value::Null,
        }
    }

    #[test]
    fn test_last_index_is_non_decreasing() {
        let mut cursor = ReadCursor::new();
        let observed = [Some(3), Some(1), None, Some(3), Some(9), Some(4), Some(0)];
        let mut previous = cursor.last_index();
        for index in observed {
            cursor.observe(&event(index));
            assert!(cursor.last_index() >= previous);
            previous = cursor.last_index();
        }
        assert_eq!(cursor.last_index(), Some(9));
    }

    #[test]
    fn test_observe_reports_movement() {
        let mut cursor = ReadCursor::new();
        assert!(cursor.observe(&event(Some(0))));
        assert!(!cursor.observe(&event(Some(0))));
        assert!(!cursor.observe(&event(None)));
        assert!(cursor.observe(&event(Some(2))));
    }

    #[test]
    fn test_offset_advances_by_page_length() {
        let mut cursor = ReadCursor::new();
        for (page, expected) in [(3, 3), (0, 3), (200, 203), (1, 204)] {
            cursor.advance_offset(page);
            assert_eq!(cursor.offset(), expected);
        }
    }

    #[test]
    fn test_seek_never_rewinds() {
        let mut cursor = ReadCursor::new();
        cursor.seek_offset(10);
        cursor.seek_offset(4);
        assert_eq!(cursor.offset(), 10);
    }

    #[test]
    fn test_tail_since() {
        let mut cursor = ReadCursor::new();
        assert_eq!(cursor.tail_since(), -1);
        cursor.observe(&event(Some(12)));
        assert_eq!(cursor.tail_since(), 12);
        assert_eq!(cursor.to_string(), "offset=0 last_index=12");
    }
}
