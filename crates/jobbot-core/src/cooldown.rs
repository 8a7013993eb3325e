use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

/// Minimum spacing between two replies to the same handle.
pub const REPLY_COOLDOWN: Duration = Duration::from_secs(30);

/// Last-send timestamp per recipient handle.
///
/// Entries are only ever overwritten, never evicted.
#[derive(Clone, Debug)]
pub struct CooldownTable {
    cooldown: Duration,
    last_sent: HashMap<String, Instant>,
}

impl Default for CooldownTable {
    fn default() -> Self {
        Self::new(REPLY_COOLDOWN)
    }
}

impl CooldownTable {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_sent: HashMap::new(),
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub fn is_cooling_down_at(&self, handle: &str, now: Instant) -> bool {
        self.last_sent
            .get(handle)
            .is_some_and(|last| now.saturating_duration_since(*last) < self.cooldown)
    }

    pub fn record_at(&mut self, handle: &str, now: Instant) {
        self.last_sent.insert(handle.to_string(), now);
    }

    pub fn last_sent(&self, handle: &str) -> Option<Instant> {
        self.last_sent.get(handle).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_handle_is_eligible() {
        let t = CooldownTable::default();
        assert!(!t.is_cooling_down_at("jane_doe", Instant::now()));
        assert_eq!(t.cooldown(), Duration::from_secs(30));
    }

    #[test]
    fn blocks_within_window_and_releases_after() {
        let start = Instant::now();
        let mut t = CooldownTable::new(Duration::from_secs(30));
        t.record_at("jane_doe", start);

        assert!(t.is_cooling_down_at("jane_doe", start));
        assert!(t.is_cooling_down_at("jane_doe", start + Duration::from_secs(29)));
        assert!(!t.is_cooling_down_at("jane_doe", start + Duration::from_secs(30)));
        assert!(!t.is_cooling_down_at("someone_else", start));
    }

    #[test]
    fn newer_send_supersedes_older() {
        let start = Instant::now();
        let mut t = CooldownTable::new(Duration::from_secs(30));
        t.record_at("a", start);
        t.record_at("a", start + Duration::from_secs(40));
        assert!(t.is_cooling_down_at("a", start + Duration::from_secs(50)));
        assert_eq!(t.last_sent("a"), Some(start + Duration::from_secs(40)));
    }
}
