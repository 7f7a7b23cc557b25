//! REST API handlers for ledger operations
//!
//! Caller identity travels in the request body; there is no signature layer.
//! All mutating handlers take the single registry write lock, so operations
//! are serialized and each call commits fully or not at all.

use crate::api::websocket::{WsBroadcaster, WsEvent};
use crate::ledger::{Address, Event, EventRecord, LedgerError, LedgerManager, ManagedToken};
use crate::storage::Storage;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared application state for API handlers
#[derive(Clone)]
pub struct ApiState {
    pub ledger: Arc<RwLock<LedgerManager>>,
    pub storage: Arc<Storage>,
    pub ws_broadcaster: Arc<WsBroadcaster>,
}

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct ApiError {
    pub error: String,
}

/// Token info response
#[derive(Serialize)]
pub struct TokenInfo {
    pub address: String,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub total_supply: String,
    pub owner: String,
    pub paused: bool,
    pub holder_count: usize,
}

impl TokenInfo {
    fn from_token(address: &Address, token: &ManagedToken) -> Self {
        Self {
            address: address.to_string(),
            name: token.name().to_string(),
            symbol: token.symbol().to_string(),
            decimals: token.decimals(),
            total_supply: token.total_supply().to_string(),
            owner: token.owner().to_string(),
            paused: token.paused(),
            holder_count: token.holder_count(),
        }
    }
}

/// Token balance response
#[derive(Serialize)]
pub struct BalanceResponse {
    pub token: String,
    pub account: String,
    pub balance: String,
    pub blacklisted: bool,
}

/// Allowance response
#[derive(Serialize)]
pub struct AllowanceResponse {
    pub token: String,
    pub owner: String,
    pub spender: String,
    pub allowance: String,
}

/// Response for every mutating operation: the event it emitted
#[derive(Serialize)]
pub struct OperationResponse {
    pub success: bool,
    pub event: Event,
}

// ============================================================================
// Request Types
// ============================================================================

/// Request to deploy a token
#[derive(Deserialize)]
pub struct DeployTokenRequest {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub initial_supply: String,
    pub deployer: String,
}

/// Transfer request
#[derive(Deserialize)]
pub struct TransferRequest {
    pub caller: String,
    pub to: String,
    pub amount: String,
}

/// Approve request
#[derive(Deserialize)]
pub struct ApproveRequest {
    pub caller: String,
    pub spender: String,
    pub amount: String,
}

/// Delegated transfer request
#[derive(Deserialize)]
pub struct TransferFromRequest {
    pub caller: String,
    pub from: String,
    pub to: String,
    pub amount: String,
}

/// Allowance increase/decrease request
#[derive(Deserialize)]
pub struct AllowanceDeltaRequest {
    pub caller: String,
    pub spender: String,
    pub delta: String,
}

/// Mint/burn request
#[derive(Deserialize)]
pub struct SupplyRequest {
    pub caller: String,
    pub account: String,
    pub amount: String,
}

/// Pause/unpause request
#[derive(Deserialize)]
pub struct PauseRequest {
    pub caller: String,
}

/// Blacklist/unblacklist request
#[derive(Deserialize)]
pub struct BlacklistRequest {
    pub caller: String,
    pub account: String,
}

/// Ownership transfer request
#[derive(Deserialize)]
pub struct OwnershipRequest {
    pub caller: String,
    pub new_owner: String,
}

// ============================================================================
// Helpers
// ============================================================================

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

fn bad_request(message: String) -> (StatusCode, Json<ApiError>) {
    (StatusCode::BAD_REQUEST, Json(ApiError { error: message }))
}

fn parse_address(s: &str, what: &str) -> Result<Address, (StatusCode, Json<ApiError>)> {
    s.parse()
        .map_err(|e| bad_request(format!("Invalid {} address: {}", what, e)))
}

fn parse_amount(s: &str) -> Result<u128, (StatusCode, Json<ApiError>)> {
    s.parse()
        .map_err(|_| bad_request("Invalid amount: must be a non-negative integer".to_string()))
}

/// Map a ledger failure to an HTTP status
fn ledger_error(e: LedgerError) -> (StatusCode, Json<ApiError>) {
    let status = match e {
        LedgerError::NotOwner => StatusCode::FORBIDDEN,
        LedgerError::TokenNotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::BAD_REQUEST,
    };
    (
        status,
        Json(ApiError {
            error: e.to_string(),
        }),
    )
}

// ============================================================================
// Health
// ============================================================================

/// GET /health - Health check
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "token-ledger",
    }))
}

// ============================================================================
// Token Read Endpoints
// ============================================================================

/// GET /api/tokens - List all tokens
pub async fn list_tokens(State(state): State<ApiState>) -> Json<Vec<TokenInfo>> {
    let manager = state.ledger.read().await;

    let tokens: Vec<TokenInfo> = manager
        .list()
        .iter()
        .map(|(address, token)| TokenInfo::from_token(address, token))
        .collect();

    Json(tokens)
}

/// GET /api/tokens/{address} - Get token info
pub async fn get_token(
    State(state): State<ApiState>,
    Path(address): Path<String>,
) -> ApiResult<TokenInfo> {
    let address = parse_address(&address, "token")?;
    let manager = state.ledger.read().await;

    match manager.get(&address) {
        Some(token) => Ok(Json(TokenInfo::from_token(&address, token))),
        None => Err(ledger_error(LedgerError::TokenNotFound(address))),
    }
}

/// GET /api/tokens/{address}/balance/{account} - Get balance
pub async fn get_balance(
    State(state): State<ApiState>,
    Path((address, account)): Path<(String, String)>,
) -> ApiResult<BalanceResponse> {
    let address = parse_address(&address, "token")?;
    let account = parse_address(&account, "account")?;
    let manager = state.ledger.read().await;

    let balance = manager
        .balance_of(&address, &account)
        .map_err(ledger_error)?;
    let blacklisted = manager
        .get(&address)
        .map(|t| t.is_blacklisted(&account))
        .unwrap_or(false);

    Ok(Json(BalanceResponse {
        token: address.to_string(),
        account: account.to_string(),
        balance: balance.to_string(),
        blacklisted,
    }))
}

/// GET /api/tokens/{address}/allowance/{owner}/{spender} - Get allowance
pub async fn get_allowance(
    State(state): State<ApiState>,
    Path((address, owner, spender)): Path<(String, String, String)>,
) -> ApiResult<AllowanceResponse> {
    let address = parse_address(&address, "token")?;
    let owner = parse_address(&owner, "owner")?;
    let spender = parse_address(&spender, "spender")?;
    let manager = state.ledger.read().await;

    let allowance = manager
        .allowance(&address, &owner, &spender)
        .map_err(ledger_error)?;

    Ok(Json(AllowanceResponse {
        token: address.to_string(),
        owner: owner.to_string(),
        spender: spender.to_string(),
        allowance: allowance.to_string(),
    }))
}

/// GET /api/tokens/{address}/events - Get the event log
pub async fn get_events(
    State(state): State<ApiState>,
    Path(address): Path<String>,
) -> ApiResult<Vec<EventRecord>> {
    let address = parse_address(&address, "token")?;
    let manager = state.ledger.read().await;

    let events = manager.events(&address).map_err(ledger_error)?;
    Ok(Json(events.to_vec()))
}

// ============================================================================
// Token Write Endpoints
// ============================================================================

/// POST /api/tokens - Deploy a new token
pub async fn deploy_token(
    State(state): State<ApiState>,
    Json(req): Json<DeployTokenRequest>,
) -> ApiResult<TokenInfo> {
    let deployer = parse_address(&req.deployer, "deployer")?;
    let initial_supply = parse_amount(&req.initial_supply)?;

    let mut manager = state.ledger.write().await;

    let address = manager
        .deploy(req.name, req.symbol, req.decimals, initial_supply, deployer)
        .map_err(ledger_error)?;

    let token = manager
        .get(&address)
        .ok_or_else(|| ledger_error(LedgerError::TokenNotFound(address)))?;

    Ok(Json(TokenInfo::from_token(&address, token)))
}

/// Run one mutating ledger operation, broadcast its event, and reply with it
async fn run_operation<F>(state: &ApiState, address: Address, op: F) -> ApiResult<OperationResponse>
where
    F: FnOnce(&mut LedgerManager) -> Result<Event, LedgerError>,
{
    let mut manager = state.ledger.write().await;
    let event = op(&mut *manager).map_err(ledger_error)?;
    drop(manager);

    state.ws_broadcaster.broadcast(WsEvent::Ledger {
        token: address.to_string(),
        event: event.clone(),
    });

    Ok(Json(OperationResponse {
        success: true,
        event,
    }))
}

/// POST /api/tokens/{address}/transfer - Transfer tokens
pub async fn transfer(
    State(state): State<ApiState>,
    Path(address): Path<String>,
    Json(req): Json<TransferRequest>,
) -> ApiResult<OperationResponse> {
    let address = parse_address(&address, "token")?;
    let caller = parse_address(&req.caller, "caller")?;
    let to = parse_address(&req.to, "recipient")?;
    let amount = parse_amount(&req.amount)?;

    run_operation(&state, address, |m| m.transfer(&address, caller, to, amount)).await
}

/// POST /api/tokens/{address}/approve - Approve a spender
pub async fn approve(
    State(state): State<ApiState>,
    Path(address): Path<String>,
    Json(req): Json<ApproveRequest>,
) -> ApiResult<OperationResponse> {
    let address = parse_address(&address, "token")?;
    let caller = parse_address(&req.caller, "caller")?;
    let spender = parse_address(&req.spender, "spender")?;
    let amount = parse_amount(&req.amount)?;

    run_operation(&state, address, |m| {
        m.approve(&address, caller, spender, amount)
    })
    .await
}

/// POST /api/tokens/{address}/transfer-from - Delegated transfer
pub async fn transfer_from(
    State(state): State<ApiState>,
    Path(address): Path<String>,
    Json(req): Json<TransferFromRequest>,
) -> ApiResult<OperationResponse> {
    let address = parse_address(&address, "token")?;
    let caller = parse_address(&req.caller, "caller")?;
    let from = parse_address(&req.from, "source")?;
    let to = parse_address(&req.to, "recipient")?;
    let amount = parse_amount(&req.amount)?;

    run_operation(&state, address, |m| {
        m.transfer_from(&address, caller, from, to, amount)
    })
    .await
}

/// POST /api/tokens/{address}/allowance/increase - Increase an allowance
pub async fn increase_allowance(
    State(state): State<ApiState>,
    Path(address): Path<String>,
    Json(req): Json<AllowanceDeltaRequest>,
) -> ApiResult<OperationResponse> {
    let address = parse_address(&address, "token")?;
    let caller = parse_address(&req.caller, "caller")?;
    let spender = parse_address(&req.spender, "spender")?;
    let delta = parse_amount(&req.delta)?;

    run_operation(&state, address, |m| {
        m.increase_allowance(&address, caller, spender, delta)
    })
    .await
}

/// POST /api/tokens/{address}/allowance/decrease - Decrease an allowance
pub async fn decrease_allowance(
    State(state): State<ApiState>,
    Path(address): Path<String>,
    Json(req): Json<AllowanceDeltaRequest>,
) -> ApiResult<OperationResponse> {
    let address = parse_address(&address, "token")?;
    let caller = parse_address(&req.caller, "caller")?;
    let spender = parse_address(&req.spender, "spender")?;
    let delta = parse_amount(&req.delta)?;

    run_operation(&state, address, |m| {
        m.decrease_allowance(&address, caller, spender, delta)
    })
    .await
}

// ============================================================================
// Administrative Endpoints
// ============================================================================

/// POST /api/tokens/{address}/mint - Mint tokens (owner-only)
pub async fn mint(
    State(state): State<ApiState>,
    Path(address): Path<String>,
    Json(req): Json<SupplyRequest>,
) -> ApiResult<OperationResponse> {
    let address = parse_address(&address, "token")?;
    let caller = parse_address(&req.caller, "caller")?;
    let account = parse_address(&req.account, "account")?;
    let amount = parse_amount(&req.amount)?;

    run_operation(&state, address, |m| {
        m.mint(&address, caller, account, amount)
    })
    .await
}

/// POST /api/tokens/{address}/burn - Burn tokens (owner-only)
pub async fn burn(
    State(state): State<ApiState>,
    Path(address): Path<String>,
    Json(req): Json<SupplyRequest>,
) -> ApiResult<OperationResponse> {
    let address = parse_address(&address, "token")?;
    let caller = parse_address(&req.caller, "caller")?;
    let account = parse_address(&req.account, "account")?;
    let amount = parse_amount(&req.amount)?;

    run_operation(&state, address, |m| {
        m.burn(&address, caller, account, amount)
    })
    .await
}

/// POST /api/tokens/{address}/pause - Pause the token (owner-only)
pub async fn pause(
    State(state): State<ApiState>,
    Path(address): Path<String>,
    Json(req): Json<PauseRequest>,
) -> ApiResult<OperationResponse> {
    let address = parse_address(&address, "token")?;
    let caller = parse_address(&req.caller, "caller")?;

    run_operation(&state, address, |m| m.pause(&address, caller)).await
}

/// POST /api/tokens/{address}/unpause - Unpause the token (owner-only)
pub async fn unpause(
    State(state): State<ApiState>,
    Path(address): Path<String>,
    Json(req): Json<PauseRequest>,
) -> ApiResult<OperationResponse> {
    let address = parse_address(&address, "token")?;
    let caller = parse_address(&req.caller, "caller")?;

    run_operation(&state, address, |m| m.unpause(&address, caller)).await
}

/// POST /api/tokens/{address}/blacklist - Blacklist an account (owner-only)
pub async fn blacklist(
    State(state): State<ApiState>,
    Path(address): Path<String>,
    Json(req): Json<BlacklistRequest>,
) -> ApiResult<OperationResponse> {
    let address = parse_address(&address, "token")?;
    let caller = parse_address(&req.caller, "caller")?;
    let account = parse_address(&req.account, "account")?;

    run_operation(&state, address, |m| m.blacklist(&address, caller, account)).await
}

/// POST /api/tokens/{address}/unblacklist - Unblacklist an account (owner-only)
pub async fn unblacklist(
    State(state): State<ApiState>,
    Path(address): Path<String>,
    Json(req): Json<BlacklistRequest>,
) -> ApiResult<OperationResponse> {
    let address = parse_address(&address, "token")?;
    let caller = parse_address(&req.caller, "caller")?;
    let account = parse_address(&req.account, "account")?;

    run_operation(&state, address, |m| {
        m.unblacklist(&address, caller, account)
    })
    .await
}

/// POST /api/tokens/{address}/ownership - Transfer ownership (owner-only)
pub async fn transfer_ownership(
    State(state): State<ApiState>,
    Path(address): Path<String>,
    Json(req): Json<OwnershipRequest>,
) -> ApiResult<OperationResponse> {
    let address = parse_address(&address, "token")?;
    let caller = parse_address(&req.caller, "caller")?;
    let new_owner = parse_address(&req.new_owner, "new owner")?;

    run_operation(&state, address, |m| {
        m.transfer_ownership(&address, caller, new_owner)
    })
    .await
}
