//! Fungible-token ledger core
//!
//! Provides an ERC-20 style ledger in two flavors:
//! - [`Token`]: balances, allowances and total supply with strict
//!   conservation and checked arithmetic
//! - [`ManagedToken`]: the same ledger behind owner/pause/blacklist gates,
//!   with owner-only mint and burn
//!
//! plus the [`LedgerManager`] registry that deploys tokens and routes
//! operations by token address.
//!
//! # Example
//!
//! ```
//! use token_ledger::ledger::{Address, LedgerManager};
//!
//! let deployer = Address::from_bytes([1; 20]);
//! let recipient = Address::from_bytes([2; 20]);
//!
//! let mut manager = LedgerManager::new();
//! let token = manager
//!     .deploy("My Token".to_string(), "MTK".to_string(), 18, 1000, deployer)
//!     .unwrap();
//!
//! manager.transfer(&token, deployer, recipient, 500).unwrap();
//! assert_eq!(manager.balance_of(&token, &recipient).unwrap(), 500);
//! ```

pub mod address;
pub mod error;
pub mod event;
pub mod managed;
pub mod manager;
pub mod token;

pub use address::{Address, AddressParseError};
pub use error::LedgerError;
pub use event::{Event, EventRecord};
pub use managed::ManagedToken;
pub use manager::LedgerManager;
pub use token::{Token, TokenMetadata, MAX_ALLOWANCE};
