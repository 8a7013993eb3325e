use std::collections::{HashSet, VecDeque};

use crate::domain::MessageKey;

/// Size at which the set is truncated.
pub const SEEN_HIGH_WATER: usize = 1000;
/// Entries kept after truncation (the most recent ones).
pub const SEEN_KEEP: usize = 500;

/// Best-effort record of posts already answered.
#[derive(Debug, Default)]
pub struct SeenMessages {
    order: VecDeque<MessageKey>,
    set: HashSet<MessageKey>,
}

impl SeenMessages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &MessageKey) -> bool {
        self.set.contains(key)
    }

    /// Record a key. Returns `false` if it was already present.
    pub fn insert(&mut self, key: MessageKey) -> bool {
        if !self.set.insert(key) {
            return false;
        }
        self.order.push_back(key);

        if self.order.len() > SEEN_HIGH_WATER {
            let excess = self.order.len() - SEEN_KEEP;
            for old in self.order.drain(..excess) {
                self.set.remove(&old);
            }
        }
        true
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChatId, MessageId};

    fn key(chat: i64, id: i32) -> MessageKey {
        MessageKey {
            chat_id: ChatId(chat),
            message_id: MessageId(id),
        }
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let mut seen = SeenMessages::new();
        assert!(seen.insert(key(1, 7)));
        assert!(!seen.insert(key(1, 7)));
        assert!(seen.contains(&key(1, 7)));
        // Same message id in another chat is a different post.
        assert!(!seen.contains(&key(2, 7)));
        assert_eq!(seen.len(), 1);
    }

    #[test]
    fn truncates_to_most_recent_after_high_water() {
        let mut seen = SeenMessages::new();
        for i in 0..=SEEN_HIGH_WATER as i32 {
            seen.insert(key(1, i));
        }
        assert_eq!(seen.len(), SEEN_KEEP);

        let newest = SEEN_HIGH_WATER as i32;
        let oldest_kept = newest - SEEN_KEEP as i32 + 1;
        assert!(seen.contains(&key(1, newest)));
        assert!(seen.contains(&key(1, oldest_kept)));
        assert!(!seen.contains(&key(1, oldest_kept - 1)));
        assert!(!seen.contains(&key(1, 0)));
    }

    #[test]
    fn stays_intact_up_to_high_water() {
        let mut seen = SeenMessages::new();
        for i in 0..SEEN_HIGH_WATER as i32 {
            seen.insert(key(1, i));
        }
        assert_eq!(seen.len(), SEEN_HIGH_WATER);
        assert!(seen.contains(&key(1, 0)));
    }
}
