//! Request and response payloads for the gamehub HTTP surface.
//!
//! Field names are camelCase on the wire to match the frontend the service
//! was built against.

use crate::{GameId, LeaderboardEntry, Tier};
use serde::{Deserialize, Serialize};

/// `GET /points` and `POST /points` response.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PointsResponse {
    pub points: u64,
    /// Reward tier badge for the total, recomputed on every read.
    pub tier: Tier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// `POST /points` request: an additive award, never a replacement.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AwardPointsRequest {
    pub points: u64,
}

/// `POST /airdrop` request.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirdropRequest {
    pub points: u64,
    pub wallet_address: String,
}

/// `POST /airdrop` success response.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirdropResponse {
    pub success: bool,
    pub tokens_airdropped: u64,
    pub total_airdropped: u64,
    pub message: String,
}

/// Error body shared by every endpoint. `next_airdrop_available` is only
/// present on rate-limited airdrop claims (HTTP 429) and carries the exact
/// RFC3339 timestamp at which the next claim becomes eligible.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_airdrop_available: Option<String>,
}

/// `POST /session/start` request.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StartSessionRequest {
    pub game: GameId,
}

/// `POST /session/input` request: one player input for the active game.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SessionInputRequest {
    /// Reveal a board position (pair-matching game).
    Reveal { position: usize },
    /// Answer the current question (quiz game).
    Answer { option: usize },
    /// Restart the variant with a fresh shuffle.
    Restart,
}

/// Session status returned by every session endpoint.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    /// "idle", "feePending" or "active".
    pub phase: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game: Option<GameId>,
    /// The player's cumulative point total.
    pub points: u64,
    /// Reward tier badge for the total.
    pub tier: Tier,
    /// Present when the delivered input completed the session.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<CompletedRound>,
}

/// How a finished session settled.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedRound {
    pub success: bool,
    pub points_awarded: u64,
    pub total_points: u64,
}

/// `GET /balance` response.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub balance: u64,
}

/// `GET /leaderboard` response.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardResponse {
    pub entries: Vec<LeaderboardEntry>,
    /// 1-based rank of the requesting player, absent when unranked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_rank: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_airdrop_request_wire_shape() {
        let request: AirdropRequest =
            serde_json::from_str(r#"{"points":500,"walletAddress":"abc"}"#).unwrap();
        assert_eq!(request.points, 500);
        assert_eq!(request.wallet_address, "abc");
    }

    #[test]
    fn test_points_response_carries_tier_badge() {
        let body = PointsResponse {
            points: 120,
            tier: Tier::from_points(120),
            message: None,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"points":120,"tier":"Silver"}"#);
    }

    #[test]
    fn test_error_response_omits_empty_fields() {
        let body = ErrorResponse {
            error: "Insufficient points".into(),
            message: None,
            next_airdrop_available: None,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"error":"Insufficient points"}"#);
    }
}
