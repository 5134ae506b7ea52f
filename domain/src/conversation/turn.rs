//! Turn lineage within a conversation thread.

use super::value_objects::{ThreadId, TurnId};

/// One submitted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub turn_id: TurnId,
    pub parent_turn_id: Option<TurnId>,
    pub message: String,
}

/// Singly linked chain of turns for one thread.
///
/// The chain is advisory lineage for the gateway; it plays no part in
/// local response correlation.
#[derive(Debug, Clone)]
pub struct TurnChain {
    thread_id: ThreadId,
    last_turn_id: Option<TurnId>,
    turns: usize,
}

impl TurnChain {
    /// Start a chain for a freshly minted thread.
    pub fn new() -> Self {
        Self::for_thread(ThreadId::generate())
    }

    pub fn for_thread(thread_id: ThreadId) -> Self {
        Self {
            thread_id,
            last_turn_id: None,
            turns: 0,
        }
    }

    pub fn thread_id(&self) -> &ThreadId {
        &self.thread_id
    }

    pub fn last_turn_id(&self) -> Option<&TurnId> {
        self.last_turn_id.as_ref()
    }

    /// Number of turns appended so far.
    pub fn len(&self) -> usize {
        self.turns
    }

    pub fn is_empty(&self) -> bool {
        self.turns == 0
    }

    /// Mint the next turn and record it as the new tail of the chain.
    pub fn append(&mut self, message: impl Into<String>) -> Turn {
        let turn_id = TurnId::generate();
        let parent_turn_id = self.last_turn_id.replace(turn_id.clone());
        self.turns += 1;
        Turn {
            turn_id,
            parent_turn_id,
            message: message.into(),
        }
    }
}

impl Default for TurnChain {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_turn_has_no_parent() {
        let mut chain = TurnChain::new();
        assert!(chain.is_empty());
        let turn = chain.append("hello");
        assert_eq!(turn.parent_turn_id, None);
        assert_eq!(turn.message, "hello");
        assert_eq!(chain.last_turn_id(), Some(&turn.turn_id));
    }

    #[test]
    fn test_turns_link_to_predecessor() {
        let mut chain = TurnChain::for_thread(ThreadId::new("thread"));
        let first = chain.append("one");
        let second = chain.append("two");
        let third = chain.append("three");

        assert_eq!(second.parent_turn_id.as_ref(), Some(&first.turn_id));
        assert_eq!(third.parent_turn_id.as_ref(), Some(&second.turn_id));
        assert_eq!(chain.len(), 3);
        assert_eq!(chain.thread_id().as_str(), "thread");
    }
}
