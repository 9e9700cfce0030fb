#[cfg(test)]
use std::cell::Cell;
use std::collections::HashSet;

use chrono::Utc;
use log::trace;
use uuid::Uuid;

/// Source of "now" for timestamp stamping.
pub trait Clock {
    /// Current time in epoch milliseconds.
    fn now_millis(&self) -> i64;
}

/// Wall clock backed by chrono.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Clock that advances by a fixed step on every read.
#[cfg(test)]
#[derive(Debug)]
pub struct ManualClock {
    next: Cell<i64>,
    step: i64,
}

#[cfg(test)]
impl ManualClock {
    pub fn new(start: i64, step: i64) -> Self {
        ManualClock {
            next: Cell::new(start),
            step,
        }
    }

    /// Moves the clock to `at` without reading it.
    pub fn set(&self, at: i64) {
        self.next.set(at);
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        let now = self.next.get();
        self.next.set(now + self.step);
        now
    }
}

/// Generates a fresh note id.
pub fn generate_note_id() -> String {
    let id = Uuid::new_v4().to_string();
    trace!("Generated note id {}", id);
    id
}

// Helper method for parsing tags
pub fn parse_tags(tags: Option<String>) -> Vec<String> {
    tags.map(|t| normalize_tags(t.split(',')))
        .unwrap_or_default()
}

/// Trims, drops empties and collapses duplicates, keeping first occurrence order.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    tags.into_iter()
        .map(|s| s.as_ref().trim().to_string())
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_tags_handles_missing_and_blank_input() {
        assert!(parse_tags(None).is_empty());
        assert!(parse_tags(Some(" , ,".into())).is_empty());
        assert_eq!(parse_tags(Some("a,b , a".into())), vec!["a", "b"]);
    }

    #[test]
    fn normalize_keeps_first_occurrence_and_case() {
        let tags = normalize_tags(["Work", " work", "Work ", ""]);
        assert_eq!(tags, vec!["Work", "work"]);
    }

    #[test]
    fn manual_clock_steps() {
        let clock = ManualClock::new(100, 10);
        assert_eq!(clock.now_millis(), 100);
        assert_eq!(clock.now_millis(), 110);
        clock.set(5);
        assert_eq!(clock.now_millis(), 5);
    }

    #[test]
    fn generated_ids_differ() {
        assert_ne!(generate_note_id(), generate_note_id());
    }
}
