use serde::{Deserialize, Serialize};

use crate::game::{PlayerStanding, RollResult, RoundSnapshot};

/// Events the game core publishes while a session runs.
///
/// Events represent facts about things that have already happened. They
/// flow one way, out to subscribers, and never feed back into game
/// state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GameEvent {
    /// A player was added to the roster during setup.
    PlayerRegistered { player_id: String, name: String },

    /// Setup finished and the first turn began.
    GameStarted {
        roster: Vec<String>,
        total_rounds: u8,
    },

    /// The active player's dice were resolved.
    DiceRolled {
        player_id: String,
        name: String,
        result: RollResult,
    },

    /// The rotation moved on to the next active player.
    TurnChanged {
        player_id: String,
        name: String,
        round: u32,
    },

    /// Every player rolled once; the round's standings were snapshotted.
    RoundCompleted { snapshot: RoundSnapshot },

    /// The final round finished and the session is over.
    GameCompleted { leaderboard: Vec<PlayerStanding> },

    /// The session returned to setup, discarding all game state.
    GameReset,

    /// An intent failed a precondition and was dropped without effect.
    IntentIgnored { intent: String, reason: String },
}

impl GameEvent {
    /// Short machine-readable tag for logging and subscriber filtering.
    pub fn event_type(&self) -> &'static str {
        match self {
            GameEvent::PlayerRegistered { .. } => "player_registered",
            GameEvent::GameStarted { .. } => "game_started",
            GameEvent::DiceRolled { .. } => "dice_rolled",
            GameEvent::TurnChanged { .. } => "turn_changed",
            GameEvent::RoundCompleted { .. } => "round_completed",
            GameEvent::GameCompleted { .. } => "game_completed",
            GameEvent::GameReset => "game_reset",
            GameEvent::IntentIgnored { .. } => "intent_ignored",
        }
    }
}
