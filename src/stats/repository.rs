use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::models::PlayerStats;

/// Storage for per-player running scores and aggregates.
///
/// `record_roll` applies the whole update for one roll atomically; no
/// partially updated player is ever observable. Reads on unknown ids
/// return zero-valued defaults; game start pre-populates every
/// registered player so that path is defensive only.
#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Re-initializes the store to zeroed records for the given roster.
    async fn reset(&self, player_ids: &[String]);

    /// Applies one completed roll: rolls += 1, score and cumulative +=
    /// total, best single-turn total updated.
    async fn record_roll(&self, player_id: &str, roll_total: u32);

    async fn score(&self, player_id: &str) -> u32;

    async fn stats(&self, player_id: &str) -> PlayerStats;

    /// Bulk score read used when building ranking snapshots.
    async fn scores(&self) -> HashMap<String, u32>;
}

#[derive(Debug, Clone, Copy, Default)]
struct PlayerRecord {
    score: u32,
    stats: PlayerStats,
}

#[derive(Debug, Default)]
pub struct InMemoryStatsRepository {
    records: Arc<RwLock<HashMap<String, PlayerRecord>>>,
}

impl InMemoryStatsRepository {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl StatsRepository for InMemoryStatsRepository {
    async fn reset(&self, player_ids: &[String]) {
        let mut records = self.records.write().await;
        records.clear();
        for id in player_ids {
            records.insert(id.clone(), PlayerRecord::default());
        }
    }

    async fn record_roll(&self, player_id: &str, roll_total: u32) {
        let mut records = self.records.write().await;
        let record = records.entry(player_id.to_string()).or_default();

        record.score += roll_total;
        record.stats.total_rolls += 1;
        record.stats.cumulative_score += roll_total;
        record.stats.highest_turn_score = record.stats.highest_turn_score.max(roll_total);
    }

    async fn score(&self, player_id: &str) -> u32 {
        let records = self.records.read().await;
        records.get(player_id).map(|r| r.score).unwrap_or_default()
    }

    async fn stats(&self, player_id: &str) -> PlayerStats {
        let records = self.records.read().await;
        records.get(player_id).map(|r| r.stats).unwrap_or_default()
    }

    async fn scores(&self) -> HashMap<String, u32> {
        let records = self.records.read().await;
        records
            .iter()
            .map(|(id, record)| (id.clone(), record.score))
            .collect()
    }
}
