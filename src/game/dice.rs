use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Bonus added when both dice show the same face.
pub const DOUBLE_BONUS: u32 = 5;

/// Outcome of a single two-die roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollResult {
    pub die1: u8,
    pub die2: u8,
    pub is_double: bool,
    pub bonus: u32,
    pub total: u32,
}

impl RollResult {
    /// Scores a pair of faces: face sum, plus the fixed bonus on a
    /// double. This is the entire scoring rule.
    pub fn from_faces(die1: u8, die2: u8) -> Self {
        let is_double = die1 == die2;
        let bonus = if is_double { DOUBLE_BONUS } else { 0 };
        let total = u32::from(die1) + u32::from(die2) + bonus;
        Self {
            die1,
            die2,
            is_double,
            bonus,
            total,
        }
    }
}

/// Source of roll outcomes. The seam exists so tests can script faces
/// instead of sampling an RNG.
pub trait DiceRoller: Send {
    fn roll(&mut self) -> RollResult;
}

/// Fair two-die roller backed by a seedable RNG. Each face is drawn
/// independently and uniformly from 1..=6.
pub struct RandomDice {
    rng: StdRng,
}

impl RandomDice {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic roller for reproducible sessions.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl DiceRoller for RandomDice {
    fn roll(&mut self) -> RollResult {
        let die1: u8 = self.rng.random_range(1..=6);
        let die2: u8 = self.rng.random_range(1..=6);
        RollResult::from_faces(die1, die2)
    }
}
