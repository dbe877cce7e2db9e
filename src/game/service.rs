use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, Mutex, RwLock};
use tracing::{debug, info, instrument};

use crate::event::{EventBus, GameEvent};
use crate::stats::{InMemoryStatsRepository, PlayerStats, StatsRepository};

use super::activity_log::LogEntry;
use super::config::{DiceSkin, GameConfig};
use super::core::{Game, GameError, GamePhase, PlayerStanding, TurnOutcome};
use super::dice::{DiceRoller, RandomDice, RollResult};
use super::history::RoundSnapshot;

/// Delay between publishing a resolved roll and advancing the turn, so
/// the result stays observable before the next player activates.
#[derive(Debug, Clone, Copy)]
pub struct PacingConfig {
    pub advance_delay: Duration,
}

impl PacingConfig {
    /// No staging delay; callers drive `advance_turn` themselves.
    pub fn instant() -> Self {
        Self {
            advance_delay: Duration::ZERO,
        }
    }

    pub fn is_instant(&self) -> bool {
        self.advance_delay.is_zero()
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            advance_delay: Duration::from_secs(2),
        }
    }
}

/// One final-leaderboard row: ranking plus the player's aggregates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub standing: PlayerStanding,
    pub stats: PlayerStats,
    pub average_score: f64,
}

/// Read-only view of the whole session, rebuilt on demand for the
/// presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub phase: GamePhase,
    pub config: GameConfig,
    /// Registration order with live scores.
    pub roster: Vec<PlayerStanding>,
    pub active_player: Option<PlayerStanding>,
    pub last_roll: Option<RollResult>,
    pub queue_len: usize,
    pub current_round: u32,
    /// Most recent first, capped.
    pub activity_log: Vec<LogEntry>,
    pub round_history: Vec<RoundSnapshot>,
    /// Populated once the game is over.
    pub leaderboard: Vec<LeaderboardRow>,
}

/// Single update entry point for every game intent.
///
/// Owns the authoritative state; the presentation layer submits intents
/// and renders `snapshot()` or the event stream. Invalid intents are
/// silent no-ops: the guard reason is logged at debug, published as
/// `IntentIgnored`, and state is untouched.
pub struct GameService {
    game: Arc<RwLock<Game>>,
    stats: Arc<dyn StatsRepository>,
    event_bus: EventBus,
    dice: Arc<Mutex<Box<dyn DiceRoller>>>,
    pacing: PacingConfig,
}

impl GameService {
    pub fn builder() -> GameServiceBuilder {
        GameServiceBuilder::new()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.event_bus.subscribe()
    }

    /// Leaves the landing screen for setup.
    #[instrument(skip(self))]
    pub async fn enter_setup(&self) {
        let mut game = self.game.write().await;
        match game.enter_setup() {
            Ok(()) => info!("entered setup"),
            Err(err) => self.ignore_intent("enter_setup", &err),
        }
    }

    /// Registers a player; whitespace-only names are ignored.
    #[instrument(skip(self))]
    pub async fn add_player(&self, name: &str) {
        let mut game = self.game.write().await;
        match game.add_player(name) {
            Ok(player) => {
                info!(player_id = %player.id, name = %player.name, "player registered");
                self.event_bus.emit(GameEvent::PlayerRegistered {
                    player_id: player.id,
                    name: player.name,
                });
            }
            Err(err) => self.ignore_intent("add_player", &err),
        }
    }

    #[instrument(skip(self))]
    pub async fn configure_rounds(&self, rounds: u8) {
        let mut game = self.game.write().await;
        match game.configure_rounds(rounds) {
            Ok(()) => debug!(rounds, "round count configured"),
            Err(err) => self.ignore_intent("configure_rounds", &err),
        }
    }

    #[instrument(skip(self))]
    pub async fn select_skin(&self, skin: DiceSkin) {
        let mut game = self.game.write().await;
        match game.select_skin(skin) {
            Ok(()) => debug!(%skin, "dice skin selected"),
            Err(err) => self.ignore_intent("select_skin", &err),
        }
    }

    /// Setup → Playing. Ignored with fewer than two registered players.
    #[instrument(skip(self))]
    pub async fn start_game(&self) {
        let mut game = self.game.write().await;
        match game.start() {
            Ok(first_player) => {
                let ids: Vec<String> = game.roster().iter().map(|p| p.id.clone()).collect();
                self.stats.reset(&ids).await;

                let roster: Vec<String> = game.roster().iter().map(|p| p.name.clone()).collect();
                let total_rounds = game.config().total_rounds;
                info!(players = roster.len(), rounds = total_rounds, "game started");
                self.event_bus.emit(GameEvent::GameStarted {
                    roster,
                    total_rounds,
                });

                let name = Self::player_name(&game, &first_player);
                self.event_bus.emit(GameEvent::TurnChanged {
                    player_id: first_player,
                    name,
                    round: 1,
                });
            }
            Err(err) => self.ignore_intent("start_game", &err),
        }
    }

    /// Rolls for the active player: resolves the dice, records score and
    /// stats, re-enqueues the player and publishes the result. Ignored
    /// while a result is already staged or no player is active, so a
    /// re-entrant call during the staging window registers nothing.
    ///
    /// With non-instant pacing the turn then advances automatically
    /// after the staging delay; with instant pacing the caller drives
    /// `advance_turn` explicitly. Either way one roll yields exactly one
    /// advance.
    #[instrument(skip(self))]
    pub async fn roll(&self) {
        {
            let mut game = self.game.write().await;
            let player = match game.ensure_can_roll() {
                Ok(player) => player.clone(),
                Err(err) => {
                    self.ignore_intent("roll", &err);
                    return;
                }
            };

            let result = {
                let mut dice = self.dice.lock().await;
                dice.roll()
            };

            if let Err(err) = game.apply_roll(result) {
                self.ignore_intent("roll", &err);
                return;
            }
            self.stats.record_roll(&player.id, result.total).await;

            info!(
                player = %player.name,
                die1 = result.die1,
                die2 = result.die2,
                total = result.total,
                double = result.is_double,
                "dice rolled"
            );
            self.event_bus.emit(GameEvent::DiceRolled {
                player_id: player.id,
                name: player.name,
                result,
            });
        }

        if !self.pacing.is_instant() {
            tokio::time::sleep(self.pacing.advance_delay).await;
            self.advance_turn().await;
        }
    }

    /// Consumes the staged roll and activates the next player, closing
    /// the round or the game when the rotation dictates. Ignored when no
    /// roll is staged.
    #[instrument(skip(self))]
    pub async fn advance_turn(&self) {
        let mut game = self.game.write().await;
        let scores = self.stats.scores().await;
        match game.advance_turn(&scores) {
            Ok(outcome) => self.publish_outcome(&game, outcome),
            Err(err) => self.ignore_intent("advance_turn", &err),
        }
    }

    /// GameOver → Setup, discarding the roster and all derived state.
    #[instrument(skip(self))]
    pub async fn reset_game(&self) {
        let mut game = self.game.write().await;
        match game.reset() {
            Ok(()) => {
                self.stats.reset(&[]).await;
                info!("game reset to setup");
                self.event_bus.emit(GameEvent::GameReset);
            }
            Err(err) => self.ignore_intent("reset_game", &err),
        }
    }

    /// Builds the read-only view the presentation layer renders.
    pub async fn snapshot(&self) -> GameSnapshot {
        let game = self.game.read().await;
        let scores = self.stats.scores().await;

        let roster: Vec<PlayerStanding> = game
            .roster()
            .iter()
            .map(|p| PlayerStanding {
                player_id: p.id.clone(),
                name: p.name.clone(),
                avatar: p.avatar,
                score: scores.get(&p.id).copied().unwrap_or(0),
            })
            .collect();

        let active_player = game.active_player().map(|p| PlayerStanding {
            player_id: p.id.clone(),
            name: p.name.clone(),
            avatar: p.avatar,
            score: scores.get(&p.id).copied().unwrap_or(0),
        });

        let leaderboard = if game.phase() == GamePhase::GameOver {
            let mut rows = Vec::with_capacity(game.roster().len());
            for standing in game.standings(&scores) {
                let stats = self.stats.stats(&standing.player_id).await;
                rows.push(LeaderboardRow {
                    average_score: stats.average_score(),
                    stats,
                    standing,
                });
            }
            rows
        } else {
            Vec::new()
        };

        GameSnapshot {
            phase: game.phase(),
            config: game.config(),
            roster,
            active_player,
            last_roll: game.last_roll(),
            queue_len: game.queue_len(),
            current_round: game.current_round(),
            activity_log: game.log().entries(),
            round_history: game.history().snapshots().to_vec(),
            leaderboard,
        }
    }

    fn publish_outcome(&self, game: &Game, outcome: TurnOutcome) {
        match outcome {
            TurnOutcome::NextPlayer { player_id, round } => {
                let name = Self::player_name(game, &player_id);
                debug!(player = %name, round, "turn advanced");
                self.event_bus.emit(GameEvent::TurnChanged {
                    player_id,
                    name,
                    round,
                });
            }
            TurnOutcome::RoundCompleted {
                snapshot,
                next_player,
                round,
            } => {
                info!(round = snapshot.round, "round completed");
                self.event_bus.emit(GameEvent::RoundCompleted { snapshot });
                let name = Self::player_name(game, &next_player);
                self.event_bus.emit(GameEvent::TurnChanged {
                    player_id: next_player,
                    name,
                    round,
                });
            }
            TurnOutcome::GameCompleted {
                snapshot,
                leaderboard,
            } => {
                let winner = leaderboard
                    .first()
                    .map(|p| p.name.clone())
                    .unwrap_or_default();
                info!(%winner, "game completed");
                self.event_bus.emit(GameEvent::RoundCompleted { snapshot });
                self.event_bus.emit(GameEvent::GameCompleted { leaderboard });
            }
        }
    }

    fn ignore_intent(&self, intent: &'static str, err: &GameError) {
        debug!(intent, reason = %err, "intent ignored");
        self.event_bus.emit(GameEvent::IntentIgnored {
            intent: intent.to_string(),
            reason: err.to_string(),
        });
    }

    fn player_name(game: &Game, player_id: &str) -> String {
        game.roster()
            .iter()
            .find(|p| p.id == player_id)
            .map(|p| p.name.clone())
            .unwrap_or_default()
    }
}

impl Default for GameService {
    fn default() -> Self {
        Self::builder().build()
    }
}

pub struct GameServiceBuilder {
    stats: Option<Arc<dyn StatsRepository>>,
    dice: Option<Box<dyn DiceRoller>>,
    pacing: PacingConfig,
}

impl GameServiceBuilder {
    fn new() -> Self {
        Self {
            stats: None,
            dice: None,
            pacing: PacingConfig::default(),
        }
    }

    pub fn with_stats_repository(mut self, repository: Arc<dyn StatsRepository>) -> Self {
        self.stats = Some(repository);
        self
    }

    pub fn with_dice(mut self, dice: Box<dyn DiceRoller>) -> Self {
        self.dice = Some(dice);
        self
    }

    /// Deterministic dice for reproducible sessions.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.dice = Some(Box::new(RandomDice::seeded(seed)));
        self
    }

    pub fn with_pacing(mut self, pacing: PacingConfig) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn build(self) -> GameService {
        GameService {
            game: Arc::new(RwLock::new(Game::new())),
            stats: self
                .stats
                .unwrap_or_else(|| Arc::new(InMemoryStatsRepository::new())),
            event_bus: EventBus::default(),
            dice: Arc::new(Mutex::new(
                self.dice
                    .unwrap_or_else(|| Box::new(RandomDice::from_entropy())),
            )),
            pacing: self.pacing,
        }
    }
}
