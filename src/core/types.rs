use super::SyncError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upstream leaderboard category. Each mode is mirrored into its own
/// store partition and paged independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    #[serde(rename = "BR")]
    BattleRoyale,
    #[serde(rename = "SB")]
    SquadronBattle,
    #[serde(rename = "VC")]
    VanduulSwarmCoop,
    #[serde(rename = "CC")]
    CaptureTheCore,
}

impl GameMode {
    /// Short code used by the upstream API query parameters.
    pub fn code(&self) -> &'static str {
        match self {
            Self::BattleRoyale => "BR",
            Self::SquadronBattle => "SB",
            Self::VanduulSwarmCoop => "VC",
            Self::CaptureTheCore => "CC",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::BattleRoyale => "Battle Royale",
            Self::SquadronBattle => "Squadron Battle",
            Self::VanduulSwarmCoop => "Vanduul Swarm Coop",
            Self::CaptureTheCore => "Capture the Core",
        }
    }

    pub fn all() -> [GameMode; 4] {
        [
            Self::BattleRoyale,
            Self::SquadronBattle,
            Self::VanduulSwarmCoop,
            Self::CaptureTheCore,
        ]
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for GameMode {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BR" => Ok(Self::BattleRoyale),
            "SB" => Ok(Self::SquadronBattle),
            "VC" => Ok(Self::VanduulSwarmCoop),
            "CC" => Ok(Self::CaptureTheCore),
            other => Err(SyncError::UnknownMode(other.to_string())),
        }
    }
}
