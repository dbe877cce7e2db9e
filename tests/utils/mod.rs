use std::collections::VecDeque;

use dice_arena::game::{DiceRoller, GameService, PacingConfig, RollResult};
use dice_arena::GameEvent;
use tokio::sync::broadcast;

/// Dice that replay a fixed script of faces, for deterministic flows.
pub struct ScriptedDice {
    faces: VecDeque<(u8, u8)>,
}

impl ScriptedDice {
    pub fn boxed(faces: &[(u8, u8)]) -> Box<Self> {
        Box::new(Self {
            faces: faces.iter().copied().collect(),
        })
    }
}

impl DiceRoller for ScriptedDice {
    fn roll(&mut self) -> RollResult {
        let (die1, die2) = self.faces.pop_front().expect("dice script exhausted");
        RollResult::from_faces(die1, die2)
    }
}

/// Builds a service in the setup phase with the given roster and round
/// count, rolling from a scripted sequence of faces.
pub async fn scripted_service(faces: &[(u8, u8)], players: &[&str], rounds: u8) -> GameService {
    let service = GameService::builder()
        .with_dice(ScriptedDice::boxed(faces))
        .with_pacing(PacingConfig::instant())
        .build();
    configure(&service, players, rounds).await;
    service
}

/// Builds a service in the setup phase rolling real dice from a fixed
/// seed.
pub async fn seeded_service(seed: u64, players: &[&str], rounds: u8) -> GameService {
    let service = GameService::builder()
        .with_seed(seed)
        .with_pacing(PacingConfig::instant())
        .build();
    configure(&service, players, rounds).await;
    service
}

async fn configure(service: &GameService, players: &[&str], rounds: u8) {
    service.enter_setup().await;
    for name in players {
        service.add_player(name).await;
    }
    service.configure_rounds(rounds).await;
}

/// Collects everything the bus has buffered so far.
pub fn drain_events(receiver: &mut broadcast::Receiver<GameEvent>) -> Vec<GameEvent> {
    let mut events = Vec::new();
    while let Ok(event) = receiver.try_recv() {
        events.push(event);
    }
    events
}
