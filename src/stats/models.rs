use serde::{Deserialize, Serialize};

/// Per-player aggregates, updated exactly once per completed roll.
///
/// `cumulative_score` always equals the player's running score under
/// normal flow; the repository tests assert the invariant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub total_rolls: u32,
    pub highest_turn_score: u32,
    pub cumulative_score: u32,
}

impl PlayerStats {
    /// Mean score per roll, shown on the final leaderboard. Derived at
    /// read time, never stored.
    pub fn average_score(&self) -> f64 {
        if self.total_rolls == 0 {
            0.0
        } else {
            f64::from(self.cumulative_score) / f64::from(self.total_rolls)
        }
    }
}
