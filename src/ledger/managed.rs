//! Managed token: the basic ledger plus administrative controls
//!
//! Adds a single privileged owner, a pause flag, and a blacklist over the
//! basic [`Token`] ledger. Every balance-mutating entry point evaluates its
//! gates in a fixed order that callers can rely on: pause first, then
//! blacklist membership of the relevant parties, then (for owner-gated
//! calls) authorization, then the arithmetic preconditions. Mint and burn
//! bypass the pause flag, and burn deliberately skips the blacklist check
//! so the owner can retire supply held by a blocked account.

use crate::ledger::{Address, Event, EventRecord, LedgerError, Token, TokenMetadata};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A fungible token with owner, pause and blacklist controls
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ManagedToken {
    /// The underlying balance/allowance ledger
    ledger: Token,
    /// Account with exclusive rights to mint, burn, pause, blacklist and
    /// transfer ownership; never zero after construction
    owner: Address,
    /// Global gate over transfer/approve/transfer_from
    paused: bool,
    /// Accounts blocked from sending or receiving
    blacklisted: HashSet<Address>,
}

impl ManagedToken {
    /// Create a new managed token; the deployer becomes the owner
    pub fn new(metadata: TokenMetadata, initial_supply: u128) -> Result<Self, LedgerError> {
        let owner = metadata.creator;
        let ledger = Token::new(metadata, initial_supply)?;

        Ok(Self {
            ledger,
            owner,
            paused: false,
            blacklisted: HashSet::new(),
        })
    }

    // =========================================================================
    // View Functions
    // =========================================================================

    /// Get token name
    pub fn name(&self) -> &str {
        self.ledger.name()
    }

    /// Get token symbol
    pub fn symbol(&self) -> &str {
        self.ledger.symbol()
    }

    /// Get decimal places
    pub fn decimals(&self) -> u8 {
        self.ledger.decimals()
    }

    /// Token metadata
    pub fn metadata(&self) -> &TokenMetadata {
        &self.ledger.metadata
    }

    /// Get total supply
    pub fn total_supply(&self) -> u128 {
        self.ledger.total_supply()
    }

    /// Get balance of an address
    pub fn balance_of(&self, account: &Address) -> u128 {
        self.ledger.balance_of(account)
    }

    /// Get remaining allowance for a spender
    pub fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.ledger.allowance(owner, spender)
    }

    /// Current owner
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Whether the ledger is paused
    pub fn paused(&self) -> bool {
        self.paused
    }

    /// Whether an account is blacklisted
    pub fn is_blacklisted(&self, account: &Address) -> bool {
        self.blacklisted.contains(account)
    }

    /// The append-only event log
    pub fn events(&self) -> &[EventRecord] {
        self.ledger.events()
    }

    /// Get holder count
    pub fn holder_count(&self) -> usize {
        self.ledger.holder_count()
    }

    // =========================================================================
    // Gated Ledger Operations
    // =========================================================================

    /// Transfer tokens; gated on pause and blacklist of both parties
    pub fn transfer(
        &mut self,
        caller: Address,
        to: Address,
        amount: u128,
    ) -> Result<Event, LedgerError> {
        self.ensure_not_paused()?;
        self.ensure_not_blacklisted(&caller)?;
        self.ensure_not_blacklisted(&to)?;

        self.ledger.transfer(caller, to, amount)
    }

    /// Set an allowance; gated on pause only
    pub fn approve(
        &mut self,
        caller: Address,
        spender: Address,
        amount: u128,
    ) -> Result<Event, LedgerError> {
        self.ensure_not_paused()?;

        self.ledger.approve(caller, spender, amount)
    }

    /// Delegated transfer; gated on pause and blacklist of source and recipient
    pub fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: u128,
    ) -> Result<Event, LedgerError> {
        self.ensure_not_paused()?;
        self.ensure_not_blacklisted(&from)?;
        self.ensure_not_blacklisted(&to)?;

        self.ledger.transfer_from(spender, from, to, amount)
    }

    /// Increase a spender's allowance; gated like approve
    pub fn increase_allowance(
        &mut self,
        caller: Address,
        spender: Address,
        delta: u128,
    ) -> Result<Event, LedgerError> {
        self.ensure_not_paused()?;

        self.ledger.increase_allowance(caller, spender, delta)
    }

    /// Decrease a spender's allowance; gated like approve
    pub fn decrease_allowance(
        &mut self,
        caller: Address,
        spender: Address,
        delta: u128,
    ) -> Result<Event, LedgerError> {
        self.ensure_not_paused()?;

        self.ledger.decrease_allowance(caller, spender, delta)
    }

    // =========================================================================
    // Owner-Gated Supply Operations
    // =========================================================================

    /// Mint new tokens to an account (owner-only)
    ///
    /// Bypasses the pause flag; rejects blacklisted recipients.
    pub fn mint(
        &mut self,
        caller: Address,
        account: Address,
        amount: u128,
    ) -> Result<Event, LedgerError> {
        self.ensure_owner(&caller)?;
        if account.is_zero() {
            return Err(LedgerError::InvalidRecipient);
        }
        self.ensure_not_blacklisted(&account)?;

        self.ledger.credit(account, amount)
    }

    /// Burn tokens from an account (owner-only)
    ///
    /// Bypasses the pause flag and, unlike mint, does not consult the
    /// blacklist.
    pub fn burn(
        &mut self,
        caller: Address,
        account: Address,
        amount: u128,
    ) -> Result<Event, LedgerError> {
        self.ensure_owner(&caller)?;
        if account.is_zero() {
            return Err(LedgerError::InvalidAccount);
        }

        self.ledger.debit(account, amount)
    }

    // =========================================================================
    // Access Control & Gating
    // =========================================================================

    /// Transfer ownership to a new account (owner-only)
    pub fn transfer_ownership(
        &mut self,
        caller: Address,
        new_owner: Address,
    ) -> Result<Event, LedgerError> {
        self.ensure_owner(&caller)?;
        if new_owner.is_zero() {
            return Err(LedgerError::InvalidOwner);
        }

        let previous = self.owner;
        self.owner = new_owner;

        Ok(self.ledger.emit(Event::OwnershipTransferred {
            previous,
            new: new_owner,
        }))
    }

    /// Pause the ledger (owner-only, idempotent, always re-emits)
    pub fn pause(&mut self, caller: Address) -> Result<Event, LedgerError> {
        self.ensure_owner(&caller)?;

        self.paused = true;
        Ok(self.ledger.emit(Event::Paused { account: caller }))
    }

    /// Unpause the ledger (owner-only, idempotent, always re-emits)
    pub fn unpause(&mut self, caller: Address) -> Result<Event, LedgerError> {
        self.ensure_owner(&caller)?;

        self.paused = false;
        Ok(self.ledger.emit(Event::Unpaused { account: caller }))
    }

    /// Add an account to the blacklist (owner-only)
    ///
    /// The current owner can never be blacklisted. Idempotent: listing an
    /// already-listed account succeeds and re-emits.
    pub fn blacklist(&mut self, caller: Address, account: Address) -> Result<Event, LedgerError> {
        self.ensure_owner(&caller)?;
        if account.is_zero() {
            return Err(LedgerError::InvalidAccount);
        }
        if account == self.owner {
            return Err(LedgerError::CannotBlacklistOwner);
        }

        self.blacklisted.insert(account);
        Ok(self.ledger.emit(Event::Blacklisted { account }))
    }

    /// Remove an account from the blacklist (owner-only)
    ///
    /// Unconditional: removing a never-listed account succeeds and still
    /// emits.
    pub fn unblacklist(&mut self, caller: Address, account: Address) -> Result<Event, LedgerError> {
        self.ensure_owner(&caller)?;

        self.blacklisted.remove(&account);
        Ok(self.ledger.emit(Event::Unblacklisted { account }))
    }

    fn ensure_owner(&self, caller: &Address) -> Result<(), LedgerError> {
        if *caller != self.owner {
            return Err(LedgerError::NotOwner);
        }
        Ok(())
    }

    fn ensure_not_paused(&self) -> Result<(), LedgerError> {
        if self.paused {
            return Err(LedgerError::ContractPaused);
        }
        Ok(())
    }

    fn ensure_not_blacklisted(&self, account: &Address) -> Result<(), LedgerError> {
        if self.blacklisted.contains(account) {
            return Err(LedgerError::AccountBlacklisted(*account));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u8) -> Address {
        Address::from_bytes([n; 20])
    }

    /// Owner is addr(1), holding 1,000,000 units (decimals 0)
    fn create_test_token() -> ManagedToken {
        let metadata =
            TokenMetadata::new("Managed Token".to_string(), "MGT".to_string(), 0, addr(1)).unwrap();
        ManagedToken::new(metadata, 1_000_000).unwrap()
    }

    #[test]
    fn test_deployer_becomes_owner() {
        let token = create_test_token();

        assert_eq!(token.owner(), addr(1));
        assert!(!token.paused());
        assert_eq!(token.balance_of(&addr(1)), 1_000_000);
    }

    #[test]
    fn test_transfer_while_unpaused() {
        let mut token = create_test_token();

        token.transfer(addr(1), addr(2), 1000).unwrap();
        assert_eq!(token.balance_of(&addr(2)), 1000);
    }

    #[test]
    fn test_paused_blocks_transfer_approve_and_transfer_from() {
        let mut token = create_test_token();
        token.approve(addr(1), addr(3), 100).unwrap();
        token.pause(addr(1)).unwrap();

        assert_eq!(
            token.transfer(addr(1), addr(2), 1).unwrap_err(),
            LedgerError::ContractPaused
        );
        assert_eq!(
            token.approve(addr(1), addr(3), 50).unwrap_err(),
            LedgerError::ContractPaused
        );
        assert_eq!(
            token.transfer_from(addr(3), addr(1), addr(2), 1).unwrap_err(),
            LedgerError::ContractPaused
        );

        token.unpause(addr(1)).unwrap();
        token.transfer(addr(1), addr(2), 1).unwrap();
    }

    #[test]
    fn test_pause_error_masks_blacklist_and_balance_errors() {
        let mut token = create_test_token();
        token.blacklist(addr(1), addr(2)).unwrap();
        token.pause(addr(1)).unwrap();

        // Target is blacklisted AND the sender has no balance for this
        // amount; the pause failure still wins.
        let result = token.transfer(addr(4), addr(2), 999_999_999);
        assert_eq!(result.unwrap_err(), LedgerError::ContractPaused);
    }

    #[test]
    fn test_blacklist_error_masks_balance_error() {
        let mut token = create_test_token();
        token.blacklist(addr(1), addr(2)).unwrap();

        let result = token.transfer(addr(2), addr(3), 999_999_999);
        assert_eq!(result.unwrap_err(), LedgerError::AccountBlacklisted(addr(2)));
    }

    #[test]
    fn test_pause_is_idempotent_and_reemits() {
        let mut token = create_test_token();

        token.pause(addr(1)).unwrap();
        let events_before = token.events().len();
        token.pause(addr(1)).unwrap();

        assert!(token.paused());
        assert_eq!(token.events().len(), events_before + 1);
    }

    #[test]
    fn test_pause_requires_owner() {
        let mut token = create_test_token();

        assert_eq!(token.pause(addr(2)).unwrap_err(), LedgerError::NotOwner);
        assert!(!token.paused());
    }

    #[test]
    fn test_blacklisted_sender_and_recipient_rejected() {
        let mut token = create_test_token();
        token.transfer(addr(1), addr(2), 1000).unwrap();
        token.blacklist(addr(1), addr(2)).unwrap();

        assert_eq!(
            token.transfer(addr(2), addr(3), 10).unwrap_err(),
            LedgerError::AccountBlacklisted(addr(2))
        );
        assert_eq!(
            token.transfer(addr(1), addr(2), 10).unwrap_err(),
            LedgerError::AccountBlacklisted(addr(2))
        );
    }

    #[test]
    fn test_transfer_from_checks_source_and_recipient_blacklist() {
        let mut token = create_test_token();
        token.approve(addr(1), addr(3), 1000).unwrap();
        token.blacklist(addr(1), addr(4)).unwrap();

        assert_eq!(
            token.transfer_from(addr(3), addr(1), addr(4), 10).unwrap_err(),
            LedgerError::AccountBlacklisted(addr(4))
        );
    }

    #[test]
    fn test_blacklisted_spender_may_still_transfer_from() {
        let mut token = create_test_token();
        token.approve(addr(1), addr(3), 100).unwrap();
        token.blacklist(addr(1), addr(3)).unwrap();

        // Only the source and recipient are blacklist-gated; the spender
        // moves funds it does not hold
        token
            .transfer_from(addr(3), addr(1), addr(2), 50)
            .unwrap();

        assert_eq!(token.balance_of(&addr(2)), 50);
        assert_eq!(token.allowance(&addr(1), &addr(3)), 50);
    }

    #[test]
    fn test_approve_ignores_blacklist() {
        let mut token = create_test_token();
        token.blacklist(addr(1), addr(2)).unwrap();

        // Blacklisted accounts may still manage allowances while unpaused
        token.approve(addr(2), addr(3), 100).unwrap();
        assert_eq!(token.allowance(&addr(2), &addr(3)), 100);
    }

    #[test]
    fn test_cannot_blacklist_owner() {
        let mut token = create_test_token();

        assert_eq!(
            token.blacklist(addr(1), addr(1)).unwrap_err(),
            LedgerError::CannotBlacklistOwner
        );
    }

    #[test]
    fn test_cannot_blacklist_zero_address() {
        let mut token = create_test_token();

        assert_eq!(
            token.blacklist(addr(1), Address::ZERO).unwrap_err(),
            LedgerError::InvalidAccount
        );
    }

    #[test]
    fn test_blacklist_is_idempotent_and_reemits() {
        let mut token = create_test_token();

        token.blacklist(addr(1), addr(2)).unwrap();
        let events_before = token.events().len();
        token.blacklist(addr(1), addr(2)).unwrap();

        assert!(token.is_blacklisted(&addr(2)));
        assert_eq!(token.events().len(), events_before + 1);
    }

    #[test]
    fn test_unblacklist_never_listed_account_still_emits() {
        let mut token = create_test_token();
        let events_before = token.events().len();

        token.unblacklist(addr(1), addr(9)).unwrap();

        assert_eq!(token.events().len(), events_before + 1);
        assert_eq!(
            token.events().last().unwrap().event,
            Event::Unblacklisted { account: addr(9) }
        );
    }

    #[test]
    fn test_mint_grows_supply_and_balance() {
        let mut token = create_test_token();

        let event = token.mint(addr(1), addr(2), 100).unwrap();

        assert_eq!(
            event,
            Event::Transfer {
                from: Address::ZERO,
                to: addr(2),
                amount: 100,
            }
        );
        assert_eq!(token.total_supply(), 1_000_100);
        assert_eq!(token.balance_of(&addr(2)), 100);
    }

    #[test]
    fn test_mint_then_burn_scenario() {
        let mut token = create_test_token();
        let baseline = token.total_supply();

        token.mint(addr(1), addr(2), 100).unwrap();
        token.burn(addr(1), addr(2), 40).unwrap();

        assert_eq!(token.total_supply(), baseline + 60);
        assert_eq!(token.balance_of(&addr(2)), 60);
    }

    #[test]
    fn test_mint_requires_owner() {
        let mut token = create_test_token();

        assert_eq!(
            token.mint(addr(2), addr(2), 100).unwrap_err(),
            LedgerError::NotOwner
        );
    }

    #[test]
    fn test_mint_to_zero_or_blacklisted_rejected() {
        let mut token = create_test_token();
        token.blacklist(addr(1), addr(2)).unwrap();

        assert_eq!(
            token.mint(addr(1), Address::ZERO, 100).unwrap_err(),
            LedgerError::InvalidRecipient
        );
        assert_eq!(
            token.mint(addr(1), addr(2), 100).unwrap_err(),
            LedgerError::AccountBlacklisted(addr(2))
        );
    }

    #[test]
    fn test_mint_and_burn_bypass_pause() {
        let mut token = create_test_token();
        token.pause(addr(1)).unwrap();

        token.mint(addr(1), addr(2), 100).unwrap();
        token.burn(addr(1), addr(2), 50).unwrap();

        assert_eq!(token.balance_of(&addr(2)), 50);
    }

    #[test]
    fn test_burn_skips_blacklist_check() {
        let mut token = create_test_token();
        token.mint(addr(1), addr(2), 100).unwrap();
        token.blacklist(addr(1), addr(2)).unwrap();

        // The owner can retire supply held by a blocked account
        token.burn(addr(1), addr(2), 100).unwrap();
        assert_eq!(token.balance_of(&addr(2)), 0);
    }

    #[test]
    fn test_burn_failures() {
        let mut token = create_test_token();

        assert_eq!(
            token.burn(addr(2), addr(1), 1).unwrap_err(),
            LedgerError::NotOwner
        );
        assert_eq!(
            token.burn(addr(1), Address::ZERO, 1).unwrap_err(),
            LedgerError::InvalidAccount
        );
        assert!(matches!(
            token.burn(addr(1), addr(2), 1),
            Err(LedgerError::InsufficientBalance { .. })
        ));
    }

    #[test]
    fn test_mint_overflow_fails_closed() {
        let mut token = create_test_token();

        let result = token.mint(addr(1), addr(2), u128::MAX);
        assert_eq!(result.unwrap_err(), LedgerError::ArithmeticOverflow);
        assert_eq!(token.total_supply(), 1_000_000);
        assert_eq!(token.balance_of(&addr(2)), 0);
    }

    #[test]
    fn test_transfer_ownership() {
        let mut token = create_test_token();

        let event = token.transfer_ownership(addr(1), addr(2)).unwrap();

        assert_eq!(
            event,
            Event::OwnershipTransferred {
                previous: addr(1),
                new: addr(2),
            }
        );
        assert_eq!(token.owner(), addr(2));

        // Old owner lost its privileges
        assert_eq!(token.pause(addr(1)).unwrap_err(), LedgerError::NotOwner);
        token.pause(addr(2)).unwrap();
    }

    #[test]
    fn test_transfer_ownership_to_zero_rejected() {
        let mut token = create_test_token();

        assert_eq!(
            token.transfer_ownership(addr(1), Address::ZERO).unwrap_err(),
            LedgerError::InvalidOwner
        );
        assert_eq!(token.owner(), addr(1));
    }

    #[test]
    fn test_previous_owner_becomes_blacklistable() {
        let mut token = create_test_token();

        token.transfer_ownership(addr(1), addr(2)).unwrap();
        token.blacklist(addr(2), addr(1)).unwrap();

        assert!(token.is_blacklisted(&addr(1)));
    }
}
