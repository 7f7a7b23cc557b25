//! Ledger error taxonomy
//!
//! Every failed precondition aborts the whole call with no partial mutation
//! and no event emitted. There is no recoverable-vs-fatal split: the caller
//! decides whether to retry with corrected arguments.

use crate::ledger::Address;
use thiserror::Error;

/// Errors returned by ledger operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Caller is not the owner")]
    NotOwner,
    #[error("Contract is paused")]
    ContractPaused,
    #[error("Account is blacklisted: {0}")]
    AccountBlacklisted(Address),
    #[error("Invalid recipient: zero address")]
    InvalidRecipient,
    #[error("Invalid owner: zero address")]
    InvalidOwner,
    #[error("Invalid spender: zero address")]
    InvalidSpender,
    #[error("Invalid account: zero address")]
    InvalidAccount,
    #[error("Insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: u128, need: u128 },
    #[error("Insufficient allowance: have {have}, need {need}")]
    InsufficientAllowance { have: u128, need: u128 },
    #[error("Allowance underflow: cannot decrease {current} by {delta}")]
    AllowanceUnderflow { current: u128, delta: u128 },
    #[error("Cannot blacklist the current owner")]
    CannotBlacklistOwner,
    #[error("Arithmetic overflow")]
    ArithmeticOverflow,
    #[error("Token not found: {0}")]
    TokenNotFound(Address),
    #[error("Token already exists: {0}")]
    TokenAlreadyExists(Address),
    #[error("Invalid name: must be 1-50 characters")]
    InvalidName,
    #[error("Invalid symbol: must be 1-10 characters")]
    InvalidSymbol,
    #[error("Invalid decimals: must be 0-18")]
    InvalidDecimals,
}
