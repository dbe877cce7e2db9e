use serde::{Deserialize, Serialize};

use super::core::PlayerStanding;

/// Leaderboard captured the moment a round completed. Immutable once
/// appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundSnapshot {
    /// 1-indexed round number.
    pub round: u32,
    /// Standings by descending score; ties keep registration order.
    pub standings: Vec<PlayerStanding>,
}

impl RoundSnapshot {
    /// The round's leader, when the roster was non-empty.
    pub fn leader(&self) -> Option<&PlayerStanding> {
        self.standings.first()
    }
}

/// Append-only record of completed rounds, ordered by round number.
#[derive(Debug, Clone, Default)]
pub struct RoundHistory {
    snapshots: Vec<RoundSnapshot>,
}

impl RoundHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, snapshot: RoundSnapshot) {
        self.snapshots.push(snapshot);
    }

    pub fn snapshots(&self) -> &[RoundSnapshot] {
        &self.snapshots
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }
}
