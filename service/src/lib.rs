//! Gamehub HTTP service.
//!
//! Hosts the session, points, airdrop and leaderboard surfaces over axum.
//! All engine state lives behind one mutex; the engine itself never reads
//! the clock, so every handler resolves `now_ms` once and passes it down.
//!
//! Identity is resolved from the `x-player-id` header (supplied by the
//! auth collaborator in front of this service); requests without it are
//! rejected. The identity provider's "has funding capability" flag arrives
//! as the `x-has-wallet` header and defaults to true.

pub mod funding;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};
use gamehub_engine::{
    AirdropEngine, AirdropRecord, ClaimError, GameInput, MemStore, PointsLedger, SessionError,
    SessionManager, SessionPhase, SessionUpdate,
};
use gamehub_types::api::{
    AirdropRequest, AirdropResponse, AwardPointsRequest, BalanceResponse, CompletedRound,
    ErrorResponse, LeaderboardResponse, PointsResponse, SessionInputRequest, SessionResponse,
    StartSessionRequest,
};
use gamehub_types::{PlayerId, Tier, ENTRY_FEE_LAMPORTS, GAME_TREASURY_ADDRESS};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

pub use funding::SimulatedFunding;

/// All engine state owned by the service.
pub struct Hub {
    pub sessions: SessionManager<SimulatedFunding, MemStore<u64>>,
    pub airdrop: AirdropEngine<MemStore<AirdropRecord>>,
    pub funding: SimulatedFunding,
}

impl Hub {
    pub fn new(entry_fee: u64, treasury: String) -> Self {
        let funding = SimulatedFunding::default();
        Self {
            sessions: SessionManager::new(
                funding.clone(),
                PointsLedger::new(MemStore::new()),
                entry_fee,
                treasury,
            ),
            airdrop: AirdropEngine::new(MemStore::new()),
            funding,
        }
    }
}

impl Default for Hub {
    fn default() -> Self {
        Self::new(ENTRY_FEE_LAMPORTS, GAME_TREASURY_ADDRESS.to_string())
    }
}

#[derive(Clone)]
pub struct AppState {
    pub hub: Arc<Mutex<Hub>>,
}

impl AppState {
    pub fn new(hub: Hub) -> Self {
        Self {
            hub: Arc::new(Mutex::new(hub)),
        }
    }
}

/// Build the service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/points", get(get_points).post(post_points))
        .route("/airdrop", post(post_airdrop))
        .route("/balance", get(get_balance))
        .route("/leaderboard", get(get_leaderboard))
        .route("/session", get(get_session))
        .route("/session/start", post(post_session_start))
        .route("/session/input", post(post_session_input))
        .route("/session/exit", post(post_session_exit))
        .with_state(state)
}

/// Drive session timers while no request is doing it (a quiz question can
/// expire with nobody polling).
pub fn spawn_sweeper(hub: Arc<Mutex<Hub>>, period: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            let settled = hub.lock().await.sessions.tick_all(now_ms());
            for (player, update) in settled {
                debug!(%player, ?update, "session settled by sweep");
            }
        }
    })
}

/// Epoch milliseconds.
pub fn now_ms() -> u64 {
    Utc::now().timestamp_millis().max(0) as u64
}

/// RFC3339 rendering of an epoch-millisecond timestamp.
pub fn rfc3339(epoch_ms: u64) -> String {
    chrono::DateTime::from_timestamp_millis(epoch_ms as i64)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Error rendered as a JSON body with the matching HTTP status.
struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl ApiError {
    fn bad_request(error: &str, message: Option<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorResponse {
                error: error.to_string(),
                message,
                next_airdrop_available: None,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        let status = match &err {
            SessionError::NoWallet => StatusCode::BAD_REQUEST,
            SessionError::AlreadyActive => StatusCode::CONFLICT,
            SessionError::EntryFeeFailed(_) => StatusCode::PAYMENT_REQUIRED,
            SessionError::NoActiveSession => StatusCode::NOT_FOUND,
            SessionError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        };
        Self {
            status,
            body: ErrorResponse {
                error: err.to_string(),
                message: None,
                next_airdrop_available: None,
            },
        }
    }
}

impl From<ClaimError> for ApiError {
    fn from(err: ClaimError) -> Self {
        match err {
            ClaimError::RateLimited { next_available_ms } => Self {
                status: StatusCode::TOO_MANY_REQUESTS,
                body: ErrorResponse {
                    error: "Airdrop limit reached".to_string(),
                    message: Some("You can request an airdrop once every 24 hours".to_string()),
                    next_airdrop_available: Some(rfc3339(next_available_ms)),
                },
            },
            ClaimError::InsufficientPoints { .. } => Self {
                status: StatusCode::BAD_REQUEST,
                body: ErrorResponse {
                    error: "Insufficient points".to_string(),
                    message: Some(
                        "You need at least 100 points to receive an airdrop".to_string(),
                    ),
                    next_airdrop_available: None,
                },
            },
            ClaimError::TransferFailed(reason) => Self {
                status: StatusCode::BAD_GATEWAY,
                body: ErrorResponse {
                    error: "Transfer failed".to_string(),
                    message: Some(reason),
                    next_airdrop_available: None,
                },
            },
        }
    }
}

/// Resolve the calling identity from the `x-player-id` header.
fn player_id(headers: &HeaderMap) -> Result<PlayerId, ApiError> {
    headers
        .get("x-player-id")
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(PlayerId::from)
        .ok_or_else(|| ApiError::bad_request("Missing x-player-id header", None))
}

/// The identity provider's funding-capability flag. Absent means present.
fn has_wallet(headers: &HeaderMap) -> bool {
    headers
        .get("x-has-wallet")
        .and_then(|value| value.to_str().ok())
        .map(|value| value != "false")
        .unwrap_or(true)
}

/// Unwrap a JSON body, turning axum's rejection into a 400.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => Err(ApiError::bad_request(
            "Invalid request data",
            Some(rejection.body_text()),
        )),
    }
}

async fn healthz() -> &'static str {
    "ok"
}

async fn get_points(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<PointsResponse>, ApiError> {
    let player = player_id(&headers)?;
    let hub = state.hub.lock().await;
    let points = hub.sessions.ledger().total(&player);
    Ok(Json(PointsResponse {
        points,
        tier: Tier::from_points(points),
        message: None,
    }))
}

async fn post_points(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<AwardPointsRequest>, JsonRejection>,
) -> Result<Json<PointsResponse>, ApiError> {
    let player = player_id(&headers)?;
    let request = json_body(payload)?;
    let mut hub = state.hub.lock().await;
    let points = hub.sessions.ledger_mut().award(&player, request.points);
    Ok(Json(PointsResponse {
        points,
        tier: Tier::from_points(points),
        message: Some("Points updated successfully".to_string()),
    }))
}

async fn post_airdrop(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<AirdropRequest>, JsonRejection>,
) -> Result<Json<AirdropResponse>, ApiError> {
    let player = player_id(&headers)?;
    let request = json_body(payload)?;
    if request.wallet_address.is_empty() {
        return Err(ApiError::bad_request("Invalid request data", None));
    }

    let mut hub = state.hub.lock().await;
    // Eligibility is computed from the ledger, not the client-posted total.
    let total = hub.sessions.ledger().total(&player);
    let funding = hub.funding.clone();
    let receipt = hub
        .airdrop
        .claim(&funding, &player, total, &request.wallet_address, now_ms())
        .await?;
    Ok(Json(AirdropResponse {
        success: true,
        tokens_airdropped: receipt.tokens_airdropped,
        total_airdropped: receipt.total_airdropped,
        message: format!(
            "Successfully airdropped {} tokens to your wallet!",
            receipt.tokens_airdropped
        ),
    }))
}

#[derive(Debug, Deserialize)]
struct BalanceQuery {
    address: String,
}

/// Display-only balance refresh; no core decision reads this.
async fn get_balance(
    State(state): State<AppState>,
    Query(query): Query<BalanceQuery>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let hub = state.hub.lock().await;
    let balance = hub.funding.balance(&query.address).await.map_err(|err| ApiError {
        status: StatusCode::BAD_GATEWAY,
        body: ErrorResponse {
            error: "Balance query failed".to_string(),
            message: Some(err.0),
            next_airdrop_available: None,
        },
    })?;
    Ok(Json(BalanceResponse { balance }))
}

#[derive(Debug, Deserialize)]
struct LeaderboardQuery {
    #[serde(default)]
    address: String,
}

async fn get_leaderboard(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<LeaderboardResponse>, ApiError> {
    let player = player_id(&headers)?;
    let hub = state.hub.lock().await;
    let points = hub.sessions.ledger().total(&player);
    let ranking = gamehub_engine::merge_standings(&query.address, points);
    Ok(Json(LeaderboardResponse {
        entries: ranking.entries,
        player_rank: ranking.player_rank,
    }))
}

fn phase_str(phase: SessionPhase) -> &'static str {
    match phase {
        SessionPhase::Idle => "idle",
        SessionPhase::FeePending => "feePending",
        SessionPhase::Active => "active",
    }
}

fn session_response(hub: &Hub, player: &PlayerId, completed: Option<CompletedRound>) -> SessionResponse {
    let points = hub.sessions.ledger().total(player);
    SessionResponse {
        phase: phase_str(hub.sessions.phase(player)).to_string(),
        game: hub.sessions.active_game(player).map(|game| match game {
            gamehub_engine::ActiveGame::Memory(_) => gamehub_types::GameId::Memory,
            gamehub_engine::ActiveGame::Quiz(_) => gamehub_types::GameId::Quiz,
        }),
        points,
        tier: Tier::from_points(points),
        completed,
    }
}

async fn get_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SessionResponse>, ApiError> {
    let player = player_id(&headers)?;
    let mut hub = state.hub.lock().await;
    // Settle anything the sweeper has not reached yet.
    let settled = hub.sessions.tick_all(now_ms());
    let completed = settled
        .into_iter()
        .find(|(id, _)| id == &player)
        .and_then(|(_, update)| completed_round(update));
    Ok(Json(session_response(&hub, &player, completed)))
}

async fn post_session_start(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<StartSessionRequest>, JsonRejection>,
) -> Result<Json<SessionResponse>, ApiError> {
    let player = player_id(&headers)?;
    let request = json_body(payload)?;
    let mut rng = StdRng::from_entropy();
    let mut hub = state.hub.lock().await;
    hub.sessions
        .start(&player, request.game, has_wallet(&headers), &mut rng, now_ms())
        .await?;
    Ok(Json(session_response(&hub, &player, None)))
}

async fn post_session_input(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<SessionInputRequest>, JsonRejection>,
) -> Result<Json<SessionResponse>, ApiError> {
    let player = player_id(&headers)?;
    let request = json_body(payload)?;
    let input = match request {
        SessionInputRequest::Reveal { position } => GameInput::Reveal(position),
        SessionInputRequest::Answer { option } => GameInput::Answer(option),
        SessionInputRequest::Restart => GameInput::Restart,
    };
    let mut rng = StdRng::from_entropy();
    let mut hub = state.hub.lock().await;
    let now = now_ms();
    // Expired timers first, so a stale question cannot swallow the input.
    hub.sessions.tick_all(now);
    let update = hub.sessions.input(&player, input, &mut rng, now)?;
    Ok(Json(session_response(
        &hub,
        &player,
        completed_round(update),
    )))
}

async fn post_session_exit(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SessionResponse>, ApiError> {
    let player = player_id(&headers)?;
    let mut hub = state.hub.lock().await;
    hub.sessions.abandon(&player)?;
    Ok(Json(session_response(&hub, &player, None)))
}

fn completed_round(update: SessionUpdate) -> Option<CompletedRound> {
    match update {
        SessionUpdate::Continuing => None,
        SessionUpdate::Completed {
            success,
            points_awarded,
            new_total,
        } => Some(CompletedRound {
            success,
            points_awarded,
            total_points: new_total,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_router() -> Router {
        router(AppState::new(Hub::default()))
    }

    fn request(method: &str, uri: &str, player: Option<&str>, body: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(player) = player {
            builder = builder.header("x-player-id", player);
        }
        match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_healthz() {
        let response = test_router()
            .oneshot(request("GET", "/healthz", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_points_require_identity() {
        let response = test_router()
            .oneshot(request("GET", "/points", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_points_award_and_read_back() {
        let app = test_router();
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/points",
                Some("alice"),
                Some(r#"{"points":25}"#),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["points"], 25);
        assert_eq!(body["tier"], "Bronze");

        let response = app
            .oneshot(request("GET", "/points", Some("alice"), None))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["points"], 25);
    }

    #[tokio::test]
    async fn test_points_response_tier_tracks_total() {
        let app = test_router();
        let response = app
            .oneshot(request(
                "POST",
                "/points",
                Some("alice"),
                Some(r#"{"points":600}"#),
            ))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["tier"], "Gold");
    }

    #[tokio::test]
    async fn test_points_malformed_body_is_400() {
        let response = test_router()
            .oneshot(request(
                "POST",
                "/points",
                Some("alice"),
                Some(r#"{"points":"many"}"#),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_airdrop_ineligible_is_400() {
        let response = test_router()
            .oneshot(request(
                "POST",
                "/airdrop",
                Some("alice"),
                Some(r#"{"points":99,"walletAddress":"wallet"}"#),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Insufficient points");
    }

    #[tokio::test]
    async fn test_airdrop_claim_then_rate_limited() {
        let app = test_router();
        // Earn enough points first; eligibility reads the ledger, not the
        // posted value.
        app.clone()
            .oneshot(request(
                "POST",
                "/points",
                Some("alice"),
                Some(r#"{"points":500}"#),
            ))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/airdrop",
                Some("alice"),
                Some(r#"{"points":500,"walletAddress":"wallet"}"#),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["tokensAirdropped"], 30);
        assert_eq!(body["totalAirdropped"], 30);

        let response = app
            .oneshot(request(
                "POST",
                "/airdrop",
                Some("alice"),
                Some(r#"{"points":500,"walletAddress":"wallet"}"#),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Airdrop limit reached");
        assert!(body["nextAirdropAvailable"].is_string());
    }

    #[tokio::test]
    async fn test_airdrop_ledger_total_beats_posted_points() {
        // The client claims 10000 points but the ledger holds none.
        let response = test_router()
            .oneshot(request(
                "POST",
                "/airdrop",
                Some("alice"),
                Some(r#"{"points":10000,"walletAddress":"wallet"}"#),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_balance_query() {
        let response = test_router()
            .oneshot(request("GET", "/balance?address=abc", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_json(response).await["balance"].as_u64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_leaderboard_merges_player() {
        let app = test_router();
        app.clone()
            .oneshot(request(
                "POST",
                "/points",
                Some("alice"),
                Some(r#"{"points":900}"#),
            ))
            .await
            .unwrap();
        let response = app
            .oneshot(request(
                "GET",
                "/leaderboard?address=9vMJfxuKxXBoEaL4dcmAnXyqGv6qzzbMBWTYyfcYabcd",
                Some("alice"),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["playerRank"], 3);
        let entries = body["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 10);
        // Top-3 bonus labels ride along; lower ranks omit the field.
        assert_eq!(entries[0]["bonus"], 50);
        assert_eq!(entries[2]["bonus"], 20);
        assert!(entries[3].get("bonus").is_none());
    }

    #[tokio::test]
    async fn test_leaderboard_zero_points_is_unranked() {
        let response = test_router()
            .oneshot(request("GET", "/leaderboard?address=abc", Some("alice"), None))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert!(body.get("playerRank").is_none());
    }

    #[tokio::test]
    async fn test_session_start_without_wallet_is_rejected() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/session/start")
                    .header("x-player-id", "alice")
                    .header("x-has-wallet", "false")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"game":"memory"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_session_lifecycle_start_conflict_exit() {
        let app = test_router();
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/session/start",
                Some("alice"),
                Some(r#"{"game":"quiz"}"#),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["phase"], "active");

        // A second start while active conflicts.
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/session/start",
                Some("alice"),
                Some(r#"{"game":"memory"}"#),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        // Exit abandons without awarding points.
        let response = app
            .clone()
            .oneshot(request("POST", "/session/exit", Some("alice"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["phase"], "idle");
        assert_eq!(body["points"], 0);
        assert_eq!(body["tier"], "Bronze");

        // Exiting again finds nothing.
        let response = app
            .oneshot(request("POST", "/session/exit", Some("alice"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_session_input_routes_to_game() {
        let app = test_router();
        app.clone()
            .oneshot(request(
                "POST",
                "/session/start",
                Some("alice"),
                Some(r#"{"game":"memory"}"#),
            ))
            .await
            .unwrap();
        let response = app
            .oneshot(request(
                "POST",
                "/session/input",
                Some("alice"),
                Some(r#"{"type":"reveal","position":0}"#),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["phase"], "active");
    }

    #[tokio::test]
    async fn test_rfc3339_rendering() {
        // 2026-01-01T00:00:00Z
        assert_eq!(rfc3339(1_767_225_600_000), "2026-01-01T00:00:00.000Z");
    }
}
