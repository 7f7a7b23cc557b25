//! Basic fungible-token ledger
//!
//! Balance-by-account and allowance-by-(owner, spender) bookkeeping with
//! strict conservation: after every successful operation the sum of all
//! balances equals the total supply. All supply/balance/allowance arithmetic
//! is checked and rejects rather than wrapping.

use crate::ledger::{Address, Event, EventRecord, LedgerError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sentinel allowance meaning "infinite approval"
///
/// Checked by equality before any subtraction: spending against it never
/// decrements it and never re-emits an Approval.
pub const MAX_ALLOWANCE: u128 = u128::MAX;

/// Token metadata (immutable after creation)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TokenMetadata {
    /// Token name (e.g., "My Token")
    pub name: String,
    /// Token symbol (e.g., "MTK")
    pub symbol: String,
    /// Decimal places (conventionally 18)
    pub decimals: u8,
    /// Deployer address
    pub creator: Address,
    /// Timestamp when created
    pub created_at: DateTime<Utc>,
}

impl TokenMetadata {
    /// Create new token metadata with validation
    pub fn new(
        name: String,
        symbol: String,
        decimals: u8,
        creator: Address,
    ) -> Result<Self, LedgerError> {
        if name.is_empty() || name.len() > 50 {
            return Err(LedgerError::InvalidName);
        }

        if symbol.is_empty() || symbol.len() > 10 {
            return Err(LedgerError::InvalidSymbol);
        }

        if decimals > 18 {
            return Err(LedgerError::InvalidDecimals);
        }

        Ok(Self {
            name,
            symbol,
            decimals,
            creator,
            created_at: Utc::now(),
        })
    }
}

/// An ERC-20 style fungible-token ledger
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Token {
    /// Token metadata
    pub metadata: TokenMetadata,
    /// Balances: address -> amount (absent means zero)
    balances: HashMap<Address, u128>,
    /// Allowances: owner -> (spender -> remaining authorization)
    allowances: HashMap<Address, HashMap<Address, u128>>,
    /// Total supply; changed only by mint (+) and burn (-)
    total_supply: u128,
    /// Append-only event log
    events: Vec<EventRecord>,
}

impl Token {
    /// Create a new token, crediting the scaled initial supply to the deployer
    ///
    /// `initial_supply` is in whole units and is scaled by `10^decimals`
    /// before crediting. A non-zero initial supply records an initial
    /// Transfer from the zero address.
    pub fn new(metadata: TokenMetadata, initial_supply: u128) -> Result<Self, LedgerError> {
        let scale = 10u128
            .checked_pow(metadata.decimals as u32)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        let supply = initial_supply
            .checked_mul(scale)
            .ok_or(LedgerError::ArithmeticOverflow)?;

        let mut token = Self {
            metadata,
            balances: HashMap::new(),
            allowances: HashMap::new(),
            total_supply: 0,
            events: Vec::new(),
        };

        if supply > 0 {
            let deployer = token.metadata.creator;
            token.credit(deployer, supply)?;
        }

        Ok(token)
    }

    // =========================================================================
    // View Functions
    // =========================================================================

    /// Get token name
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Get token symbol
    pub fn symbol(&self) -> &str {
        &self.metadata.symbol
    }

    /// Get decimal places
    pub fn decimals(&self) -> u8 {
        self.metadata.decimals
    }

    /// Get total supply
    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    /// Get balance of an address (zero when absent)
    pub fn balance_of(&self, account: &Address) -> u128 {
        *self.balances.get(account).unwrap_or(&0)
    }

    /// Get remaining allowance for a spender
    pub fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.allowances
            .get(owner)
            .and_then(|spenders| spenders.get(spender))
            .copied()
            .unwrap_or(0)
    }

    /// The append-only event log
    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    /// Get all holders with non-zero balances
    pub fn holders(&self) -> Vec<(&Address, &u128)> {
        self.balances.iter().filter(|(_, &b)| b > 0).collect()
    }

    /// Get holder count
    pub fn holder_count(&self) -> usize {
        self.balances.values().filter(|&&b| b > 0).count()
    }

    // =========================================================================
    // Mutating Functions
    // =========================================================================

    /// Transfer tokens from the caller to another address
    ///
    /// A zero-amount transfer is valid and still records a Transfer event.
    pub fn transfer(
        &mut self,
        caller: Address,
        to: Address,
        amount: u128,
    ) -> Result<Event, LedgerError> {
        if to.is_zero() {
            return Err(LedgerError::InvalidRecipient);
        }

        let from_balance = self.balance_of(&caller);
        if from_balance < amount {
            return Err(LedgerError::InsufficientBalance {
                have: from_balance,
                need: amount,
            });
        }

        self.move_balance(caller, to, amount)?;

        Ok(self.emit(Event::Transfer {
            from: caller,
            to,
            amount,
        }))
    }

    /// Set a spender's allowance, overwriting any prior value
    pub fn approve(
        &mut self,
        caller: Address,
        spender: Address,
        amount: u128,
    ) -> Result<Event, LedgerError> {
        if caller.is_zero() {
            return Err(LedgerError::InvalidOwner);
        }
        if spender.is_zero() {
            return Err(LedgerError::InvalidSpender);
        }

        self.allowances
            .entry(caller)
            .or_default()
            .insert(spender, amount);

        Ok(self.emit(Event::Approval {
            owner: caller,
            spender,
            amount,
        }))
    }

    /// Transfer tokens on behalf of `from` (requires prior approval)
    ///
    /// Spends the allowance first, then moves the balance. An allowance equal
    /// to [`MAX_ALLOWANCE`] is never decremented; any other allowance is
    /// reduced through the approve path, which re-records an Approval with
    /// the new value before the Transfer.
    pub fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: u128,
    ) -> Result<Event, LedgerError> {
        let current = self.allowance(&from, &spender);
        if current != MAX_ALLOWANCE && current < amount {
            return Err(LedgerError::InsufficientAllowance {
                have: current,
                need: amount,
            });
        }

        // Validate the transfer before touching the allowance, so a failure
        // leaves no partial effect.
        if to.is_zero() {
            return Err(LedgerError::InvalidRecipient);
        }
        let from_balance = self.balance_of(&from);
        if from_balance < amount {
            return Err(LedgerError::InsufficientBalance {
                have: from_balance,
                need: amount,
            });
        }

        if current != MAX_ALLOWANCE {
            self.approve(from, spender, current - amount)?;
        }

        self.move_balance(from, to, amount)?;

        Ok(self.emit(Event::Transfer { from, to, amount }))
    }

    /// Increase a spender's allowance by `delta`
    pub fn increase_allowance(
        &mut self,
        caller: Address,
        spender: Address,
        delta: u128,
    ) -> Result<Event, LedgerError> {
        let current = self.allowance(&caller, &spender);
        let updated = current
            .checked_add(delta)
            .ok_or(LedgerError::ArithmeticOverflow)?;

        self.approve(caller, spender, updated)
    }

    /// Decrease a spender's allowance by `delta`
    pub fn decrease_allowance(
        &mut self,
        caller: Address,
        spender: Address,
        delta: u128,
    ) -> Result<Event, LedgerError> {
        let current = self.allowance(&caller, &spender);
        if delta > current {
            return Err(LedgerError::AllowanceUnderflow { current, delta });
        }

        self.approve(caller, spender, current - delta)
    }

    // =========================================================================
    // Internal primitives (used by the managed variant for mint/burn)
    // =========================================================================

    /// Grow supply and credit an account; records a Transfer from zero
    pub(crate) fn credit(&mut self, account: Address, amount: u128) -> Result<Event, LedgerError> {
        let new_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        let balance = self.balance_of(&account);
        let new_balance = balance
            .checked_add(amount)
            .ok_or(LedgerError::ArithmeticOverflow)?;

        self.total_supply = new_supply;
        self.balances.insert(account, new_balance);

        Ok(self.emit(Event::Transfer {
            from: Address::ZERO,
            to: account,
            amount,
        }))
    }

    /// Debit an account and shrink supply; records a Transfer to zero
    pub(crate) fn debit(&mut self, account: Address, amount: u128) -> Result<Event, LedgerError> {
        let balance = self.balance_of(&account);
        if balance < amount {
            return Err(LedgerError::InsufficientBalance {
                have: balance,
                need: amount,
            });
        }

        self.balances.insert(account, balance - amount);
        // Sum of balances == supply, so this cannot underflow.
        self.total_supply -= amount;

        Ok(self.emit(Event::Transfer {
            from: account,
            to: Address::ZERO,
            amount,
        }))
    }

    /// Record an event in the append-only log
    pub(crate) fn emit(&mut self, event: Event) -> Event {
        self.events.push(EventRecord::new(event.clone()));
        event
    }

    /// Move a pre-validated amount between two accounts
    fn move_balance(&mut self, from: Address, to: Address, amount: u128) -> Result<(), LedgerError> {
        let from_balance = self.balance_of(&from);
        debug_assert!(from_balance >= amount);

        self.balances.insert(from, from_balance - amount);

        let to_balance = self.balance_of(&to);
        let updated = to_balance
            .checked_add(amount)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        self.balances.insert(to, updated);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u8) -> Address {
        Address::from_bytes([n; 20])
    }

    fn create_test_token() -> Token {
        let metadata =
            TokenMetadata::new("Test Token".to_string(), "TST".to_string(), 0, addr(1)).unwrap();
        Token::new(metadata, 1_000_000).unwrap()
    }

    fn sum_of_balances(token: &Token) -> u128 {
        token.holders().iter().map(|(_, &b)| b).sum()
    }

    #[test]
    fn test_token_creation() {
        let token = create_test_token();

        assert_eq!(token.name(), "Test Token");
        assert_eq!(token.symbol(), "TST");
        assert_eq!(token.decimals(), 0);
        assert_eq!(token.total_supply(), 1_000_000);
        assert_eq!(token.balance_of(&addr(1)), 1_000_000);
        assert_eq!(token.holder_count(), 1);

        // Initial supply records a Transfer from the zero address
        assert_eq!(token.events().len(), 1);
        assert_eq!(
            token.events()[0].event,
            Event::Transfer {
                from: Address::ZERO,
                to: addr(1),
                amount: 1_000_000,
            }
        );
    }

    #[test]
    fn test_initial_supply_is_scaled_by_decimals() {
        let metadata =
            TokenMetadata::new("Scaled".to_string(), "SCL".to_string(), 18, addr(1)).unwrap();
        let token = Token::new(metadata, 1000).unwrap();

        let expected = 1000u128 * 10u128.pow(18);
        assert_eq!(token.total_supply(), expected);
        assert_eq!(token.balance_of(&addr(1)), expected);
    }

    #[test]
    fn test_zero_initial_supply_records_nothing() {
        let metadata =
            TokenMetadata::new("Empty".to_string(), "EMP".to_string(), 18, addr(1)).unwrap();
        let token = Token::new(metadata, 0).unwrap();

        assert_eq!(token.total_supply(), 0);
        assert!(token.events().is_empty());
    }

    #[test]
    fn test_initial_supply_overflow_rejected() {
        let metadata =
            TokenMetadata::new("Huge".to_string(), "HUG".to_string(), 18, addr(1)).unwrap();
        let result = Token::new(metadata, u128::MAX);
        assert_eq!(result.unwrap_err(), LedgerError::ArithmeticOverflow);
    }

    #[test]
    fn test_metadata_validation() {
        assert!(TokenMetadata::new("".to_string(), "TST".to_string(), 18, addr(1)).is_err());
        assert!(
            TokenMetadata::new("Test".to_string(), "TOOLONGSYMBOL".to_string(), 18, addr(1))
                .is_err()
        );
        assert!(TokenMetadata::new("Test".to_string(), "TST".to_string(), 19, addr(1)).is_err());
    }

    #[test]
    fn test_transfer() {
        let mut token = create_test_token();

        let event = token.transfer(addr(1), addr(2), 1000).unwrap();

        assert_eq!(
            event,
            Event::Transfer {
                from: addr(1),
                to: addr(2),
                amount: 1000,
            }
        );
        assert_eq!(token.balance_of(&addr(1)), 999_000);
        assert_eq!(token.balance_of(&addr(2)), 1000);
        assert_eq!(sum_of_balances(&token), token.total_supply());
    }

    #[test]
    fn test_zero_amount_transfer_is_valid_and_recorded() {
        let mut token = create_test_token();
        let before = token.events().len();

        token.transfer(addr(1), addr(2), 0).unwrap();

        assert_eq!(token.balance_of(&addr(2)), 0);
        assert_eq!(token.events().len(), before + 1);
    }

    #[test]
    fn test_self_transfer_preserves_balance() {
        let mut token = create_test_token();

        token.transfer(addr(1), addr(1), 500).unwrap();

        assert_eq!(token.balance_of(&addr(1)), 1_000_000);
        assert_eq!(sum_of_balances(&token), token.total_supply());
    }

    #[test]
    fn test_transfer_to_zero_address_fails_cleanly() {
        let mut token = create_test_token();
        let events_before = token.events().len();

        let result = token.transfer(addr(1), Address::ZERO, 1);

        assert_eq!(result.unwrap_err(), LedgerError::InvalidRecipient);
        assert_eq!(token.balance_of(&addr(1)), 1_000_000);
        assert_eq!(token.events().len(), events_before);
    }

    #[test]
    fn test_transfer_insufficient_balance() {
        let mut token = create_test_token();

        let result = token.transfer(addr(1), addr(2), 2_000_000);
        assert!(matches!(
            result,
            Err(LedgerError::InsufficientBalance { .. })
        ));
        assert_eq!(token.balance_of(&addr(2)), 0);
    }

    #[test]
    fn test_approve_overwrites() {
        let mut token = create_test_token();

        assert_eq!(token.allowance(&addr(1), &addr(3)), 0);

        token.approve(addr(1), addr(3), 5000).unwrap();
        assert_eq!(token.allowance(&addr(1), &addr(3)), 5000);

        token.approve(addr(1), addr(3), 3000).unwrap();
        assert_eq!(token.allowance(&addr(1), &addr(3)), 3000);

        token.approve(addr(1), addr(3), 0).unwrap();
        assert_eq!(token.allowance(&addr(1), &addr(3)), 0);
    }

    #[test]
    fn test_approve_zero_spender_fails() {
        let mut token = create_test_token();

        let result = token.approve(addr(1), Address::ZERO, 100);
        assert_eq!(result.unwrap_err(), LedgerError::InvalidSpender);
    }

    #[test]
    fn test_transfer_from_spends_allowance_and_reemits_approval() {
        let mut token = create_test_token();

        token.approve(addr(1), addr(3), 100).unwrap();
        token.transfer_from(addr(3), addr(1), addr(2), 50).unwrap();

        assert_eq!(token.allowance(&addr(1), &addr(3)), 50);
        assert_eq!(token.balance_of(&addr(2)), 50);

        // The allowance reduction is recorded as an Approval, before the
        // Transfer it enables.
        let events: Vec<&Event> = token.events().iter().map(|r| &r.event).collect();
        let n = events.len();
        assert_eq!(
            events[n - 2],
            &Event::Approval {
                owner: addr(1),
                spender: addr(3),
                amount: 50,
            }
        );
        assert_eq!(
            events[n - 1],
            &Event::Transfer {
                from: addr(1),
                to: addr(2),
                amount: 50,
            }
        );
    }

    #[test]
    fn test_transfer_from_insufficient_allowance() {
        let mut token = create_test_token();

        token.approve(addr(1), addr(3), 500).unwrap();
        let result = token.transfer_from(addr(3), addr(1), addr(2), 1000);

        assert!(matches!(
            result,
            Err(LedgerError::InsufficientAllowance { .. })
        ));
        assert_eq!(token.allowance(&addr(1), &addr(3)), 500);
    }

    #[test]
    fn test_max_allowance_is_never_decremented() {
        let mut token = create_test_token();
        token.approve(addr(1), addr(3), MAX_ALLOWANCE).unwrap();
        let events_before = token.events().len();

        token
            .transfer_from(addr(3), addr(1), addr(2), 10_000)
            .unwrap();

        assert_eq!(token.allowance(&addr(1), &addr(3)), MAX_ALLOWANCE);
        assert_eq!(token.balance_of(&addr(2)), 10_000);
        // Only the Transfer was recorded; no Approval re-emission
        assert_eq!(token.events().len(), events_before + 1);
    }

    #[test]
    fn test_transfer_from_failure_leaves_allowance_untouched() {
        let mut token = create_test_token();
        token.approve(addr(1), addr(3), 5_000_000).unwrap();

        let result = token.transfer_from(addr(3), addr(1), addr(2), 2_000_000);

        assert!(matches!(
            result,
            Err(LedgerError::InsufficientBalance { .. })
        ));
        assert_eq!(token.allowance(&addr(1), &addr(3)), 5_000_000);
    }

    #[test]
    fn test_increase_and_decrease_allowance() {
        let mut token = create_test_token();

        token.increase_allowance(addr(1), addr(3), 100).unwrap();
        token.increase_allowance(addr(1), addr(3), 50).unwrap();
        assert_eq!(token.allowance(&addr(1), &addr(3)), 150);

        token.decrease_allowance(addr(1), addr(3), 120).unwrap();
        assert_eq!(token.allowance(&addr(1), &addr(3)), 30);
    }

    #[test]
    fn test_decrease_allowance_underflow() {
        let mut token = create_test_token();

        token.approve(addr(1), addr(3), 10).unwrap();
        let result = token.decrease_allowance(addr(1), addr(3), 11);

        assert_eq!(
            result.unwrap_err(),
            LedgerError::AllowanceUnderflow {
                current: 10,
                delta: 11
            }
        );
    }

    #[test]
    fn test_increase_allowance_overflow() {
        let mut token = create_test_token();

        token.approve(addr(1), addr(3), MAX_ALLOWANCE).unwrap();
        let result = token.increase_allowance(addr(1), addr(3), 1);

        assert_eq!(result.unwrap_err(), LedgerError::ArithmeticOverflow);
    }

    #[test]
    fn test_conservation_across_transfers() {
        let mut token = create_test_token();

        token.transfer(addr(1), addr(2), 300).unwrap();
        token.transfer(addr(2), addr(4), 100).unwrap();
        token.approve(addr(1), addr(3), 1000).unwrap();
        token.transfer_from(addr(3), addr(1), addr(4), 700).unwrap();

        assert_eq!(sum_of_balances(&token), 1_000_000);
        assert_eq!(token.total_supply(), 1_000_000);
    }
}
