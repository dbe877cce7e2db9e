use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::dice::RollResult;

/// Maximum number of entries the activity feed keeps.
pub const LOG_CAPACITY: usize = 5;

/// One rendered line of the activity feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub message: String,
    pub at: DateTime<Utc>,
}

/// Most-recent-first feed of turn lines, capped at [`LOG_CAPACITY`].
#[derive(Debug, Clone, Default)]
pub struct ActivityLog {
    entries: VecDeque<LogEntry>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Formats and records a completed roll.
    pub fn record_roll(&mut self, player_name: &str, result: &RollResult) {
        let callout = if result.is_double {
            format!("DOUBLE! (+{}) ", result.bonus)
        } else {
            String::new()
        };
        let message = format!(
            "{} rolled {} & {}. {}Total: {}",
            player_name, result.die1, result.die2, callout, result.total
        );
        self.entries.push_front(LogEntry {
            message,
            at: Utc::now(),
        });
        self.entries.truncate(LOG_CAPACITY);
    }

    /// Entries newest first.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
