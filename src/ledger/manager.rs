//! Deployment registry for managed tokens
//!
//! Owns every deployed token keyed by its derived address and re-exposes the
//! full operation set. The registry is serde-serializable so the whole ledger
//! state persists as a single JSON document.

use crate::ledger::{Address, Event, EventRecord, LedgerError, ManagedToken, TokenMetadata};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Manages all deployed tokens
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LedgerManager {
    /// All tokens by address
    tokens: HashMap<Address, ManagedToken>,
    /// Deployment counter for address generation
    nonce: u64,
}

impl LedgerManager {
    /// Create a new, empty registry
    pub fn new() -> Self {
        Self {
            tokens: HashMap::new(),
            nonce: 0,
        }
    }

    /// Deploy a new managed token
    ///
    /// The deployer becomes the owner and receives the scaled initial supply.
    /// Returns the derived token address.
    pub fn deploy(
        &mut self,
        name: String,
        symbol: String,
        decimals: u8,
        initial_supply: u128,
        deployer: Address,
    ) -> Result<Address, LedgerError> {
        let metadata = TokenMetadata::new(name, symbol, decimals, deployer)?;

        let address = self.generate_address(&deployer, &metadata.symbol);

        if self.tokens.contains_key(&address) {
            return Err(LedgerError::TokenAlreadyExists(address));
        }

        let token = ManagedToken::new(metadata, initial_supply)?;

        // A failed deploy must not advance the nonce: it would shift
        // every subsequently derived address.
        self.nonce += 1;

        log::info!(
            "Token deployed: {} ({}) at {} by {}",
            token.name(),
            token.symbol(),
            address,
            deployer
        );

        self.tokens.insert(address, token);
        Ok(address)
    }

    /// Derive a token address from deployer, symbol and deployment nonce
    fn generate_address(&self, deployer: &Address, symbol: &str) -> Address {
        let input = format!("{}:{}:{}", deployer, symbol, self.nonce);
        Address::derive(input.as_bytes())
    }

    /// Get a token by address
    pub fn get(&self, address: &Address) -> Option<&ManagedToken> {
        self.tokens.get(address)
    }

    /// List all tokens with their addresses
    pub fn list(&self) -> Vec<(&Address, &ManagedToken)> {
        self.tokens.iter().collect()
    }

    /// Get token count
    pub fn count(&self) -> usize {
        self.tokens.len()
    }

    /// Check if a token exists
    pub fn exists(&self, address: &Address) -> bool {
        self.tokens.contains_key(address)
    }

    fn token_mut(&mut self, address: &Address) -> Result<&mut ManagedToken, LedgerError> {
        self.tokens
            .get_mut(address)
            .ok_or(LedgerError::TokenNotFound(*address))
    }

    fn token(&self, address: &Address) -> Result<&ManagedToken, LedgerError> {
        self.tokens
            .get(address)
            .ok_or(LedgerError::TokenNotFound(*address))
    }

    // =========================================================================
    // Ledger Operations
    // =========================================================================

    /// Transfer tokens
    pub fn transfer(
        &mut self,
        address: &Address,
        caller: Address,
        to: Address,
        amount: u128,
    ) -> Result<Event, LedgerError> {
        self.token_mut(address)?.transfer(caller, to, amount)
    }

    /// Approve a spender
    pub fn approve(
        &mut self,
        address: &Address,
        caller: Address,
        spender: Address,
        amount: u128,
    ) -> Result<Event, LedgerError> {
        self.token_mut(address)?.approve(caller, spender, amount)
    }

    /// Delegated transfer
    pub fn transfer_from(
        &mut self,
        address: &Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: u128,
    ) -> Result<Event, LedgerError> {
        self.token_mut(address)?
            .transfer_from(spender, from, to, amount)
    }

    /// Increase a spender's allowance
    pub fn increase_allowance(
        &mut self,
        address: &Address,
        caller: Address,
        spender: Address,
        delta: u128,
    ) -> Result<Event, LedgerError> {
        self.token_mut(address)?
            .increase_allowance(caller, spender, delta)
    }

    /// Decrease a spender's allowance
    pub fn decrease_allowance(
        &mut self,
        address: &Address,
        caller: Address,
        spender: Address,
        delta: u128,
    ) -> Result<Event, LedgerError> {
        self.token_mut(address)?
            .decrease_allowance(caller, spender, delta)
    }

    // =========================================================================
    // Administrative Operations
    // =========================================================================

    /// Mint new tokens (owner-only)
    pub fn mint(
        &mut self,
        address: &Address,
        caller: Address,
        account: Address,
        amount: u128,
    ) -> Result<Event, LedgerError> {
        self.token_mut(address)?.mint(caller, account, amount)
    }

    /// Burn tokens (owner-only)
    pub fn burn(
        &mut self,
        address: &Address,
        caller: Address,
        account: Address,
        amount: u128,
    ) -> Result<Event, LedgerError> {
        self.token_mut(address)?.burn(caller, account, amount)
    }

    /// Pause a token (owner-only)
    pub fn pause(&mut self, address: &Address, caller: Address) -> Result<Event, LedgerError> {
        let event = self.token_mut(address)?.pause(caller)?;
        log::warn!("Token {} paused by {}", address, caller);
        Ok(event)
    }

    /// Unpause a token (owner-only)
    pub fn unpause(&mut self, address: &Address, caller: Address) -> Result<Event, LedgerError> {
        let event = self.token_mut(address)?.unpause(caller)?;
        log::info!("Token {} unpaused by {}", address, caller);
        Ok(event)
    }

    /// Blacklist an account (owner-only)
    pub fn blacklist(
        &mut self,
        address: &Address,
        caller: Address,
        account: Address,
    ) -> Result<Event, LedgerError> {
        let event = self.token_mut(address)?.blacklist(caller, account)?;
        log::warn!("Account {} blacklisted on token {}", account, address);
        Ok(event)
    }

    /// Remove an account from the blacklist (owner-only)
    pub fn unblacklist(
        &mut self,
        address: &Address,
        caller: Address,
        account: Address,
    ) -> Result<Event, LedgerError> {
        self.token_mut(address)?.unblacklist(caller, account)
    }

    /// Transfer token ownership (owner-only)
    pub fn transfer_ownership(
        &mut self,
        address: &Address,
        caller: Address,
        new_owner: Address,
    ) -> Result<Event, LedgerError> {
        self.token_mut(address)?.transfer_ownership(caller, new_owner)
    }

    // =========================================================================
    // Read Operations
    // =========================================================================

    /// Get balance for an account
    pub fn balance_of(&self, address: &Address, account: &Address) -> Result<u128, LedgerError> {
        Ok(self.token(address)?.balance_of(account))
    }

    /// Get allowance
    pub fn allowance(
        &self,
        address: &Address,
        owner: &Address,
        spender: &Address,
    ) -> Result<u128, LedgerError> {
        Ok(self.token(address)?.allowance(owner, spender))
    }

    /// Get the event log for a token
    pub fn events(&self, address: &Address) -> Result<&[EventRecord], LedgerError> {
        Ok(self.token(address)?.events())
    }

    /// Get all tokens held by an account
    pub fn tokens_for_holder(&self, holder: &Address) -> Vec<(&Address, &ManagedToken, u128)> {
        self.tokens
            .iter()
            .filter_map(|(address, token)| {
                let balance = token.balance_of(holder);
                if balance > 0 {
                    Some((address, token, balance))
                } else {
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u8) -> Address {
        Address::from_bytes([n; 20])
    }

    fn deploy_test_token(manager: &mut LedgerManager) -> Address {
        manager
            .deploy(
                "Test Token".to_string(),
                "TST".to_string(),
                0,
                1_000_000,
                addr(1),
            )
            .unwrap()
    }

    #[test]
    fn test_manager_creation() {
        let manager = LedgerManager::new();
        assert_eq!(manager.count(), 0);
    }

    #[test]
    fn test_deploy() {
        let mut manager = LedgerManager::new();

        let address = deploy_test_token(&mut manager);

        assert!(manager.exists(&address));
        assert_eq!(manager.count(), 1);
        assert_eq!(manager.balance_of(&address, &addr(1)).unwrap(), 1_000_000);

        let token = manager.get(&address).unwrap();
        assert_eq!(token.owner(), addr(1));
        assert!(!token.paused());
    }

    #[test]
    fn test_deploy_addresses_are_unique() {
        let mut manager = LedgerManager::new();

        let a = deploy_test_token(&mut manager);
        let b = deploy_test_token(&mut manager);

        assert_ne!(a, b);
        assert_eq!(manager.count(), 2);
    }

    #[test]
    fn test_deploy_rejects_bad_metadata() {
        let mut manager = LedgerManager::new();

        let result = manager.deploy("".to_string(), "TST".to_string(), 0, 1000, addr(1));
        assert_eq!(result.unwrap_err(), LedgerError::InvalidName);
        assert_eq!(manager.count(), 0);
    }

    #[test]
    fn test_failed_deploy_does_not_advance_addressing() {
        let mut manager = LedgerManager::new();

        // Supply scaling overflows after metadata validation passes
        let result = manager.deploy(
            "Test Token".to_string(),
            "TST".to_string(),
            18,
            u128::MAX,
            addr(1),
        );
        assert_eq!(result.unwrap_err(), LedgerError::ArithmeticOverflow);
        assert_eq!(manager.count(), 0);

        // The next deploy derives the same address a fresh registry would
        let mut fresh = LedgerManager::new();
        assert_eq!(
            deploy_test_token(&mut manager),
            deploy_test_token(&mut fresh)
        );
    }

    #[test]
    fn test_transfer_via_manager() {
        let mut manager = LedgerManager::new();
        let address = deploy_test_token(&mut manager);

        manager.transfer(&address, addr(1), addr(2), 1000).unwrap();

        assert_eq!(manager.balance_of(&address, &addr(1)).unwrap(), 999_000);
        assert_eq!(manager.balance_of(&address, &addr(2)).unwrap(), 1000);
    }

    #[test]
    fn test_approve_and_transfer_from_scenario() {
        let mut manager = LedgerManager::new();
        let address = deploy_test_token(&mut manager);

        manager.approve(&address, addr(1), addr(3), 100).unwrap();
        manager
            .transfer_from(&address, addr(3), addr(1), addr(2), 50)
            .unwrap();

        assert_eq!(manager.allowance(&address, &addr(1), &addr(3)).unwrap(), 50);
        assert_eq!(manager.balance_of(&address, &addr(2)).unwrap(), 50);
    }

    #[test]
    fn test_admin_operations_via_manager() {
        let mut manager = LedgerManager::new();
        let address = deploy_test_token(&mut manager);

        manager.mint(&address, addr(1), addr(2), 500).unwrap();
        manager.burn(&address, addr(1), addr(2), 200).unwrap();
        manager.pause(&address, addr(1)).unwrap();
        manager.unpause(&address, addr(1)).unwrap();
        manager.blacklist(&address, addr(1), addr(4)).unwrap();
        manager.unblacklist(&address, addr(1), addr(4)).unwrap();
        manager.transfer_ownership(&address, addr(1), addr(2)).unwrap();

        let token = manager.get(&address).unwrap();
        assert_eq!(token.owner(), addr(2));
        assert_eq!(token.balance_of(&addr(2)), 300);
        assert!(!token.is_blacklisted(&addr(4)));
    }

    #[test]
    fn test_unknown_token_is_reported() {
        let mut manager = LedgerManager::new();
        let missing = addr(9);

        let result = manager.transfer(&missing, addr(1), addr(2), 100);
        assert_eq!(result.unwrap_err(), LedgerError::TokenNotFound(missing));
    }

    #[test]
    fn test_tokens_for_holder() {
        let mut manager = LedgerManager::new();
        let first = deploy_test_token(&mut manager);
        let _second = manager
            .deploy("Other".to_string(), "OTH".to_string(), 0, 2000, addr(1))
            .unwrap();

        assert_eq!(manager.tokens_for_holder(&addr(1)).len(), 2);
        assert_eq!(manager.tokens_for_holder(&addr(2)).len(), 0);

        manager.transfer(&first, addr(1), addr(2), 500).unwrap();

        let held = manager.tokens_for_holder(&addr(2));
        assert_eq!(held.len(), 1);
        assert_eq!(held[0].2, 500);
    }

    #[test]
    fn test_registry_serde_roundtrip() {
        let mut manager = LedgerManager::new();
        let address = deploy_test_token(&mut manager);
        manager.pause(&address, addr(1)).unwrap();

        let json = serde_json::to_string(&manager).unwrap();
        let back: LedgerManager = serde_json::from_str(&json).unwrap();

        assert_eq!(back.count(), 1);
        let token = back.get(&address).unwrap();
        assert!(token.paused());
        assert_eq!(token.balance_of(&addr(1)), 1_000_000);
    }
}
