//! Common types shared by the gamehub engine and service.
//!
//! Everything in this crate is plain data: the fixed game catalog, reward
//! tiers, the airdrop eligibility table, the reference leaderboard standings,
//! and the API payload shapes. No component here holds mutable state.

pub mod api;

use serde::{Deserialize, Serialize};

/// Entry fee charged per play attempt, in lamports (0.01 SOL).
/// The fee is fixed and independent of which game is started.
pub const ENTRY_FEE_LAMPORTS: u64 = 10_000_000;

/// Treasury address entry fees are paid to.
pub const GAME_TREASURY_ADDRESS: &str = "DHw7Je34SmMGT7GcSdkKHBfjCbYaFoYKa2yxKKwPvYdW";

/// Minimum elapsed time between two successful airdrop claims by the
/// same identity.
pub const AIRDROP_COOLDOWN_MS: u64 = 24 * 60 * 60 * 1_000;

/// Airdrop eligibility table: (minimum points, token units granted).
/// Thresholds are strictly increasing in both keys; the largest threshold
/// at or below the player's total wins.
pub const AIRDROP_TIERS: [(u64, u64); 3] = [(100, 5), (500, 30), (1_000, 100)];

/// Maximum number of entries shown on the leaderboard.
pub const LEADERBOARD_CAP: usize = 10;

/// Opaque stable key for a player, supplied by the identity provider.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlayerId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The fixed set of game variants. Adding a variant means adding a case
/// here and a matching arm in the engine's dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameId {
    Memory,
    Quiz,
}

impl GameId {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameId::Memory => "memory",
            GameId::Quiz => "quiz",
        }
    }
}

impl std::str::FromStr for GameId {
    type Err = UnknownGame;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "memory" => Ok(GameId::Memory),
            "quiz" => Ok(GameId::Quiz),
            other => Err(UnknownGame(other.to_string())),
        }
    }
}

/// Error returned when parsing an unrecognized game id.
#[derive(Debug, thiserror::Error)]
#[error("unknown game: {0}")]
pub struct UnknownGame(pub String);

/// Immutable description of one game variant.
#[derive(Clone, Copy, Debug)]
pub struct GameDescriptor {
    pub id: GameId,
    pub name: &'static str,
    pub description: &'static str,
    pub points_per_win: u64,
}

/// The fixed game catalog, defined at process start. No dynamic
/// registration.
pub const GAME_CATALOG: [GameDescriptor; 2] = [
    GameDescriptor {
        id: GameId::Memory,
        name: "Memory Match",
        description: "Match pairs of cards to earn points",
        points_per_win: 10,
    },
    GameDescriptor {
        id: GameId::Quiz,
        name: "Crypto Quiz",
        description: "Test your crypto knowledge and earn points",
        points_per_win: 15,
    },
];

/// Look up a game descriptor by id.
pub fn game_descriptor(id: GameId) -> &'static GameDescriptor {
    match id {
        GameId::Memory => &GAME_CATALOG[0],
        GameId::Quiz => &GAME_CATALOG[1],
    }
}

/// Coarse reward bracket derived purely from cumulative points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    Bronze,
    Silver,
    Gold,
    Diamond,
}

impl Tier {
    /// Classify a point total. Total over the non-negative integers, with
    /// inclusive lower bounds: <100 Bronze, <500 Silver, <1000 Gold,
    /// otherwise Diamond.
    pub fn from_points(points: u64) -> Self {
        if points >= 1_000 {
            Tier::Diamond
        } else if points >= 500 {
            Tier::Gold
        } else if points >= 100 {
            Tier::Silver
        } else {
            Tier::Bronze
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Bronze => "Bronze",
            Tier::Silver => "Silver",
            Tier::Gold => "Gold",
            Tier::Diamond => "Diamond",
        }
    }
}

/// One row of a ranked leaderboard. Ephemeral: recomputed on every ranker
/// invocation, never persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub address: String,
    pub points: u64,
    pub rank: u32,
    pub is_current_player: bool,
    /// Bonus token reward for a top-3 rank.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bonus: Option<u64>,
}

/// Reference standings the live player is merged into, sorted descending
/// by points.
pub const REFERENCE_STANDINGS: [(&str, u64); 10] = [
    ("8xyt45...j29d", 1_250),
    ("3fgh78...k31e", 980),
    ("9ikl23...m45f", 875),
    ("2opq67...r89g", 720),
    ("5stu01...v23h", 650),
    ("7wxy45...z67i", 540),
    ("1abc89...d01j", 490),
    ("4efg23...h45k", 430),
    ("6ijk67...l89m", 380),
    ("0nop01...q23n", 320),
];

/// Bonus token reward shown for a top-3 rank, if any.
pub fn rank_bonus(rank: u32) -> Option<u64> {
    match rank {
        1 => Some(50),
        2 => Some(30),
        3 => Some(20),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(Tier::from_points(0), Tier::Bronze);
        assert_eq!(Tier::from_points(99), Tier::Bronze);
        assert_eq!(Tier::from_points(100), Tier::Silver);
        assert_eq!(Tier::from_points(499), Tier::Silver);
        assert_eq!(Tier::from_points(500), Tier::Gold);
        assert_eq!(Tier::from_points(999), Tier::Gold);
        assert_eq!(Tier::from_points(1_000), Tier::Diamond);
        assert_eq!(Tier::from_points(u64::MAX), Tier::Diamond);
    }

    #[test]
    fn test_tier_monotone() {
        let samples = [0, 1, 50, 99, 100, 101, 499, 500, 999, 1_000, 5_000];
        let mut last = Tier::Bronze;
        for points in samples {
            let tier = Tier::from_points(points);
            assert!(tier >= last, "tier regressed at {points} points");
            last = tier;
        }
    }

    #[test]
    fn test_catalog_lookup() {
        assert_eq!(game_descriptor(GameId::Memory).points_per_win, 10);
        assert_eq!(game_descriptor(GameId::Quiz).points_per_win, 15);
    }

    #[test]
    fn test_game_id_round_trip() {
        for game in GAME_CATALOG {
            assert_eq!(game.id.as_str().parse::<GameId>().unwrap(), game.id);
        }
        assert!("poker".parse::<GameId>().is_err());
    }

    #[test]
    fn test_reference_standings_sorted_descending() {
        for pair in REFERENCE_STANDINGS.windows(2) {
            assert!(pair[0].1 >= pair[1].1);
        }
    }
}
