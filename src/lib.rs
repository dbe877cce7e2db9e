// Library crate for the dice arena game core
// This file exposes the public API for the demo binary and integration tests

pub mod collections;
pub mod event;
pub mod game;
pub mod stats;

// Re-export commonly used types for easier access in tests
pub use collections::{MaxHeap, Ranked, TurnQueue};
pub use event::{EventBus, GameEvent};
pub use game::{
    DiceRoller, DiceSkin, Game, GameConfig, GameError, GamePhase, GameService, GameSnapshot,
    PacingConfig, Player, PlayerStanding, RandomDice, RollResult,
};
pub use stats::{InMemoryStatsRepository, PlayerStats, StatsRepository};
