//! Ledger events
//!
//! Events are the only external side channel besides state reads. Each token
//! keeps an append-only log; within one call, log order matches the textual
//! order of effects (a `transfer_from` that reduces an allowance records the
//! Approval before the Transfer). Failed calls record nothing.

use crate::ledger::Address;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An event emitted by a ledger operation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Tokens moved; `from`/`to` is the zero address for mint/burn
    Transfer {
        from: Address,
        to: Address,
        amount: u128,
    },
    /// An allowance was set (or reduced by spending)
    Approval {
        owner: Address,
        spender: Address,
        amount: u128,
    },
    /// Ownership moved to a new account
    OwnershipTransferred { previous: Address, new: Address },
    /// The ledger was paused by `account`
    Paused { account: Address },
    /// The ledger was unpaused by `account`
    Unpaused { account: Address },
    /// An account was added to the blacklist
    Blacklisted { account: Address },
    /// An account was removed from the blacklist
    Unblacklisted { account: Address },
}

/// A logged event with the time it was recorded
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EventRecord {
    pub event: Event,
    pub timestamp: DateTime<Utc>,
}

impl EventRecord {
    pub fn new(event: Event) -> Self {
        Self {
            event,
            timestamp: Utc::now(),
        }
    }
}
