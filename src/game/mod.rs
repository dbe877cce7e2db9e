// Public API
pub use self::activity_log::{ActivityLog, LogEntry, LOG_CAPACITY};
pub use self::config::{
    AvatarColor, DiceSkin, GameConfig, DEFAULT_ROUNDS, MAX_ROUNDS, MIN_PLAYERS, MIN_ROUNDS,
};
pub use self::core::{
    Game, GameError, GamePhase, Player, PlayerId, PlayerStanding, TurnOutcome, TurnStage,
};
pub use self::dice::{DiceRoller, RandomDice, RollResult, DOUBLE_BONUS};
pub use self::history::{RoundHistory, RoundSnapshot};
pub use self::service::{
    GameService, GameServiceBuilder, GameSnapshot, LeaderboardRow, PacingConfig,
};

// Internal modules
mod activity_log;
mod config;
mod core;
mod dice;
mod history;
mod service;
