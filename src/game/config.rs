use std::fmt;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

/// Minimum roster size required to start a game.
pub const MIN_PLAYERS: usize = 2;

pub const MIN_ROUNDS: u8 = 1;
pub const MAX_ROUNDS: u8 = 20;
pub const DEFAULT_ROUNDS: u8 = 5;

/// Cosmetic dice style. Carried in snapshots for the presentation layer;
/// game logic never reads it.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, EnumIter,
)]
pub enum DiceSkin {
    #[default]
    Classic,
    Neon,
    Gold,
    Cyber,
}

impl fmt::Display for DiceSkin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                DiceSkin::Classic => "classic",
                DiceSkin::Neon => "neon",
                DiceSkin::Gold => "gold",
                DiceSkin::Cyber => "cyber",
            }
        )
    }
}

impl TryFrom<&str> for DiceSkin {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "classic" => Ok(DiceSkin::Classic),
            "neon" => Ok(DiceSkin::Neon),
            "gold" => Ok(DiceSkin::Gold),
            "cyber" => Ok(DiceSkin::Cyber),
            _ => Err(s.to_string()),
        }
    }
}

/// Fixed avatar palette, assigned round-robin in registration order.
/// Opaque to game logic.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, EnumIter,
)]
pub enum AvatarColor {
    Blue,
    Purple,
    Pink,
    Green,
    Orange,
    Red,
}

impl AvatarColor {
    /// Tag for the nth registered player, wrapping over the palette.
    pub fn for_index(index: usize) -> Self {
        let palette: Vec<Self> = Self::iter().collect();
        palette[index % palette.len()]
    }
}

impl fmt::Display for AvatarColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                AvatarColor::Blue => "blue",
                AvatarColor::Purple => "purple",
                AvatarColor::Pink => "pink",
                AvatarColor::Green => "green",
                AvatarColor::Orange => "orange",
                AvatarColor::Red => "red",
            }
        )
    }
}

/// Session configuration chosen during setup. Survives a reset so a
/// rematch keeps the same rounds and skin.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct GameConfig {
    pub total_rounds: u8,
    pub skin: DiceSkin,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            total_rounds: DEFAULT_ROUNDS,
            skin: DiceSkin::Classic,
        }
    }
}
