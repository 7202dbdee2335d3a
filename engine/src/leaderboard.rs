//! Leaderboard ranker.
//!
//! Merges one live (address, points) pair into the fixed reference
//! standings. Pure: the output is recomputed from scratch on every call and
//! nothing is persisted.
//!
//! Placement rules:
//! - zero points never ranks;
//! - the live entry goes before the first reference entry with strictly
//!   fewer points, so ties land after all equal entries (arrival order is
//!   the tie-break);
//! - with no strictly-smaller entry the live entry is appended only while
//!   the list is below the cap;
//! - the merged list is truncated to the cap, ranks are recomputed as
//!   1-based positions, and the top three ranks carry their bonus reward
//!   labels.

use gamehub_types::{rank_bonus, LeaderboardEntry, LEADERBOARD_CAP, REFERENCE_STANDINGS};

/// Merged standings plus the live player's own rank (`None` = unranked).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ranking {
    pub entries: Vec<LeaderboardEntry>,
    pub player_rank: Option<u32>,
}

/// Merge the live player into the fixed reference standings.
pub fn merge_standings(live_address: &str, live_points: u64) -> Ranking {
    merge_into(&REFERENCE_STANDINGS, live_address, live_points)
}

/// Merge against an explicit reference list (descending by points).
pub fn merge_into(reference: &[(&str, u64)], live_address: &str, live_points: u64) -> Ranking {
    let mut entries: Vec<LeaderboardEntry> = reference
        .iter()
        .map(|(address, points)| LeaderboardEntry {
            address: (*address).to_string(),
            points: *points,
            rank: 0,
            is_current_player: false,
            bonus: None,
        })
        .collect();

    let mut player_rank = None;
    if live_points > 0 {
        let live = LeaderboardEntry {
            address: short_address(live_address),
            points: live_points,
            rank: 0,
            is_current_player: true,
            bonus: None,
        };
        match entries.iter().position(|entry| entry.points < live_points) {
            Some(index) => {
                entries.insert(index, live);
                player_rank = Some(index as u32 + 1);
            }
            None if entries.len() < LEADERBOARD_CAP => {
                entries.push(live);
                player_rank = Some(entries.len() as u32);
            }
            None => {}
        }
    }

    entries.truncate(LEADERBOARD_CAP);
    for (index, entry) in entries.iter_mut().enumerate() {
        entry.rank = index as u32 + 1;
        entry.bonus = rank_bonus(entry.rank);
    }
    Ranking {
        entries,
        player_rank,
    }
}

/// Shorten a wallet address for display: first four and last four
/// characters. Addresses at most eight characters long pass through
/// unchanged.
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 8 {
        return address.to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}
