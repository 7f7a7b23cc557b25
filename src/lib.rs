//! Token-Ledger: an ERC-20 style fungible-token ledger in Rust
//!
//! This crate provides a complete token ledger featuring:
//! - Balance and allowance bookkeeping with strict supply conservation
//! - Infinite-approval sentinel that is never decremented by spending
//! - A managed variant with owner, pause and blacklist controls
//! - Owner-only mint and burn with checked (fail-closed) arithmetic
//! - An append-only event log per token
//! - A deployment registry with JSON persistence
//! - REST API with WebSocket event streaming
//!
//! # Example
//!
//! ```rust
//! use token_ledger::ledger::{Address, LedgerManager};
//!
//! let deployer = Address::from_bytes([1; 20]);
//! let recipient = Address::from_bytes([2; 20]);
//!
//! // Deploy a token: the deployer owns it and holds the initial supply
//! let mut manager = LedgerManager::new();
//! let token = manager
//!     .deploy("My Token".to_string(), "MTK".to_string(), 18, 1000, deployer)
//!     .unwrap();
//!
//! // Move some of it
//! manager.transfer(&token, deployer, recipient, 500).unwrap();
//! assert_eq!(manager.balance_of(&token, &recipient).unwrap(), 500);
//!
//! // Administrative controls are owner-gated
//! manager.pause(&token, deployer).unwrap();
//! assert!(manager.get(&token).unwrap().paused());
//! ```

pub mod api;
pub mod cli;
pub mod ledger;
pub mod storage;

// Re-export commonly used types
pub use api::{create_router, ApiState, WsBroadcaster};
pub use ledger::{
    Address, Event, EventRecord, LedgerError, LedgerManager, ManagedToken, Token, TokenMetadata,
    MAX_ALLOWANCE,
};
pub use storage::{Storage, StorageConfig, StorageError};
