//! CLI commands for the ledger
//!
//! Implements all command handlers for the CLI interface. Every mutating
//! command saves the registry back to disk before returning.

use crate::ledger::{Address, LedgerManager};
use crate::storage::{Storage, StorageConfig};
use std::path::PathBuf;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Application state
pub struct AppState {
    pub manager: LedgerManager,
    pub storage: Storage,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Initialize application state
    pub fn new(data_dir: PathBuf) -> CliResult<Self> {
        let storage_config = StorageConfig {
            data_dir: data_dir.clone(),
            ..Default::default()
        };

        let storage = Storage::new(storage_config)?;

        // Load or create the registry
        let manager = if storage.exists() {
            storage.load()?
        } else {
            let manager = LedgerManager::new();
            storage.save(&manager)?;
            manager
        };

        Ok(Self {
            manager,
            storage,
            data_dir,
        })
    }

    /// Save the current state
    pub fn save(&self) -> CliResult<()> {
        self.storage.save(&self.manager)?;
        Ok(())
    }
}

/// Deploy a new token
pub fn cmd_deploy(
    state: &mut AppState,
    name: &str,
    symbol: &str,
    decimals: u8,
    initial_supply: u128,
    deployer: &str,
) -> CliResult<()> {
    let deployer: Address = deployer.parse()?;

    let address = state.manager.deploy(
        name.to_string(),
        symbol.to_string(),
        decimals,
        initial_supply,
        deployer,
    )?;
    state.save()?;

    let token = state
        .manager
        .get(&address)
        .ok_or("token missing after deploy")?;

    println!("✅ Token deployed!");
    println!("   Address: {}", address);
    println!("   Name: {} ({})", token.name(), token.symbol());
    println!("   Decimals: {}", token.decimals());
    println!("   Total supply: {}", token.total_supply());
    println!("   Owner: {}", token.owner());

    Ok(())
}

/// Transfer tokens
pub fn cmd_transfer(
    state: &mut AppState,
    token: &str,
    from: &str,
    to: &str,
    amount: u128,
) -> CliResult<()> {
    let token: Address = token.parse()?;
    let from: Address = from.parse()?;
    let to: Address = to.parse()?;

    state.manager.transfer(&token, from, to, amount)?;
    state.save()?;

    println!("✅ Transferred {} from {} to {}", amount, from, to);
    println!("   Sender balance: {}", state.manager.balance_of(&token, &from)?);
    println!("   Recipient balance: {}", state.manager.balance_of(&token, &to)?);

    Ok(())
}

/// Approve a spender
pub fn cmd_approve(
    state: &mut AppState,
    token: &str,
    from: &str,
    spender: &str,
    amount: u128,
) -> CliResult<()> {
    let token: Address = token.parse()?;
    let from: Address = from.parse()?;
    let spender: Address = spender.parse()?;

    state.manager.approve(&token, from, spender, amount)?;
    state.save()?;

    println!("✅ Approved {} to spend {} on behalf of {}", spender, amount, from);

    Ok(())
}

/// Delegated transfer
pub fn cmd_transfer_from(
    state: &mut AppState,
    token: &str,
    spender: &str,
    source: &str,
    to: &str,
    amount: u128,
) -> CliResult<()> {
    let token: Address = token.parse()?;
    let spender: Address = spender.parse()?;
    let source: Address = source.parse()?;
    let to: Address = to.parse()?;

    state.manager.transfer_from(&token, spender, source, to, amount)?;
    state.save()?;

    println!("✅ Transferred {} from {} to {} (spender: {})", amount, source, to, spender);
    println!(
        "   Remaining allowance: {}",
        state.manager.allowance(&token, &source, &spender)?
    );

    Ok(())
}

/// Increase or decrease an allowance
pub fn cmd_change_allowance(
    state: &mut AppState,
    token: &str,
    from: &str,
    spender: &str,
    delta: u128,
    increase: bool,
) -> CliResult<()> {
    let token: Address = token.parse()?;
    let from: Address = from.parse()?;
    let spender: Address = spender.parse()?;

    if increase {
        state.manager.increase_allowance(&token, from, spender, delta)?;
    } else {
        state.manager.decrease_allowance(&token, from, spender, delta)?;
    }
    state.save()?;

    println!(
        "✅ Allowance of {} for {} is now {}",
        from,
        spender,
        state.manager.allowance(&token, &from, &spender)?
    );

    Ok(())
}

/// Mint tokens (owner-only)
pub fn cmd_mint(
    state: &mut AppState,
    token: &str,
    caller: &str,
    account: &str,
    amount: u128,
) -> CliResult<()> {
    let token: Address = token.parse()?;
    let caller: Address = caller.parse()?;
    let account: Address = account.parse()?;

    state.manager.mint(&token, caller, account, amount)?;
    state.save()?;

    let total = state
        .manager
        .get(&token)
        .ok_or("token not found")?
        .total_supply();
    println!("✅ Minted {} to {}", amount, account);
    println!("   Total supply: {}", total);

    Ok(())
}

/// Burn tokens (owner-only)
pub fn cmd_burn(
    state: &mut AppState,
    token: &str,
    caller: &str,
    account: &str,
    amount: u128,
) -> CliResult<()> {
    let token: Address = token.parse()?;
    let caller: Address = caller.parse()?;
    let account: Address = account.parse()?;

    state.manager.burn(&token, caller, account, amount)?;
    state.save()?;

    let total = state
        .manager
        .get(&token)
        .ok_or("token not found")?
        .total_supply();
    println!("✅ Burned {} from {}", amount, account);
    println!("   Total supply: {}", total);

    Ok(())
}

/// Pause or unpause a token (owner-only)
pub fn cmd_set_paused(state: &mut AppState, token: &str, caller: &str, paused: bool) -> CliResult<()> {
    let token: Address = token.parse()?;
    let caller: Address = caller.parse()?;

    if paused {
        state.manager.pause(&token, caller)?;
        println!("⏸️  Token {} paused", token);
    } else {
        state.manager.unpause(&token, caller)?;
        println!("▶️  Token {} unpaused", token);
    }
    state.save()?;

    Ok(())
}

/// Add or remove a blacklist entry (owner-only)
pub fn cmd_set_blacklisted(
    state: &mut AppState,
    token: &str,
    caller: &str,
    account: &str,
    blacklisted: bool,
) -> CliResult<()> {
    let token: Address = token.parse()?;
    let caller: Address = caller.parse()?;
    let account: Address = account.parse()?;

    if blacklisted {
        state.manager.blacklist(&token, caller, account)?;
        println!("🚫 Account {} blacklisted", account);
    } else {
        state.manager.unblacklist(&token, caller, account)?;
        println!("✅ Account {} removed from blacklist", account);
    }
    state.save()?;

    Ok(())
}

/// Transfer token ownership (owner-only)
pub fn cmd_transfer_ownership(
    state: &mut AppState,
    token: &str,
    caller: &str,
    new_owner: &str,
) -> CliResult<()> {
    let token: Address = token.parse()?;
    let caller: Address = caller.parse()?;
    let new_owner: Address = new_owner.parse()?;

    state.manager.transfer_ownership(&token, caller, new_owner)?;
    state.save()?;

    println!("✅ Ownership of {} transferred to {}", token, new_owner);

    Ok(())
}

/// Show a balance
pub fn cmd_balance(state: &AppState, token: &str, account: &str) -> CliResult<()> {
    let token: Address = token.parse()?;
    let account: Address = account.parse()?;

    let balance = state.manager.balance_of(&token, &account)?;
    println!("💰 Balance of {}: {}", account, balance);

    Ok(())
}

/// Show an allowance
pub fn cmd_allowance(state: &AppState, token: &str, owner: &str, spender: &str) -> CliResult<()> {
    let token: Address = token.parse()?;
    let owner: Address = owner.parse()?;
    let spender: Address = spender.parse()?;

    let allowance = state.manager.allowance(&token, &owner, &spender)?;
    println!("🔑 Allowance of {} for {}: {}", owner, spender, allowance);

    Ok(())
}

/// Show token info
pub fn cmd_info(state: &AppState, token: &str) -> CliResult<()> {
    let address: Address = token.parse()?;

    match state.manager.get(&address) {
        Some(token) => {
            println!("🪙 Token: {}", address);
            println!("   Name: {} ({})", token.name(), token.symbol());
            println!("   Decimals: {}", token.decimals());
            println!("   Total supply: {}", token.total_supply());
            println!("   Owner: {}", token.owner());
            println!("   Paused: {}", token.paused());
            println!("   Holders: {}", token.holder_count());
            println!("   Events: {}", token.events().len());
        }
        None => println!("❌ Token not found: {}", address),
    }

    Ok(())
}

/// List all tokens
pub fn cmd_list(state: &AppState) -> CliResult<()> {
    let tokens = state.manager.list();
    if tokens.is_empty() {
        println!("🪙 No tokens deployed yet.");
    } else {
        println!("🪙 Deployed tokens ({}):", tokens.len());
        for (address, token) in tokens {
            println!("   {} - {} ({})", address, token.name(), token.symbol());
        }
    }

    Ok(())
}

/// Show the event log for a token
pub fn cmd_events(state: &AppState, token: &str, count: usize) -> CliResult<()> {
    let address: Address = token.parse()?;

    let events = state.manager.events(&address)?;
    println!("📜 Events for {} (showing last {}):", address, count);
    for record in events.iter().rev().take(count).rev() {
        println!("   [{}] {:?}", record.timestamp, record.event);
    }

    Ok(())
}
