//! REST API module
//!
//! Provides HTTP REST API for programmatic access to the ledger.
//!
//! # Endpoints
//!
//! ## Registry
//! - `GET /api/tokens` - List tokens
//! - `POST /api/tokens` - Deploy a token
//! - `GET /api/tokens/:address` - Token info
//!
//! ## Reads
//! - `GET /api/tokens/:address/balance/:account` - Balance
//! - `GET /api/tokens/:address/allowance/:owner/:spender` - Allowance
//! - `GET /api/tokens/:address/events` - Event log
//!
//! ## Ledger operations
//! - `POST /api/tokens/:address/transfer` - Transfer
//! - `POST /api/tokens/:address/approve` - Approve
//! - `POST /api/tokens/:address/transfer-from` - Delegated transfer
//! - `POST /api/tokens/:address/allowance/increase` - Increase allowance
//! - `POST /api/tokens/:address/allowance/decrease` - Decrease allowance
//!
//! ## Administrative (owner-only)
//! - `POST /api/tokens/:address/mint` - Mint
//! - `POST /api/tokens/:address/burn` - Burn
//! - `POST /api/tokens/:address/pause` / `unpause` - Pause toggle
//! - `POST /api/tokens/:address/blacklist` / `unblacklist` - Blacklist toggle
//! - `POST /api/tokens/:address/ownership` - Transfer ownership
//!
//! ## WebSocket
//! - `GET /ws` - Real-time ledger events

pub mod handlers;
pub mod routes;
pub mod websocket;

pub use handlers::ApiState;
pub use routes::create_router;
pub use websocket::WsBroadcaster;
