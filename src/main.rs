//! Token-Ledger CLI Application
//!
//! A command-line interface for deploying and operating fungible tokens.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use token_ledger::api::{create_router, ApiState, WsBroadcaster};
use token_ledger::cli::{self, AppState};
use token_ledger::ledger::LedgerManager;
use token_ledger::storage::{Storage, StorageConfig};
use tokio::sync::RwLock;

#[derive(Parser)]
#[command(name = "ledger")]
#[command(author = "Darshan")]
#[command(version = "0.1.0")]
#[command(about = "An ERC-20 style token ledger with pause and blacklist controls", long_about = None)]
struct Cli {
    /// Data directory for ledger storage
    #[arg(short, long, default_value = ".ledger_data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy a new token
    Deploy {
        /// Token name
        #[arg(long)]
        name: String,

        /// Token symbol
        #[arg(long)]
        symbol: String,

        /// Decimal places (0-18)
        #[arg(long, default_value = "18")]
        decimals: u8,

        /// Initial supply in whole units (scaled by 10^decimals)
        #[arg(long, default_value = "0")]
        supply: u128,

        /// Deployer address (becomes the owner)
        #[arg(long)]
        deployer: String,
    },

    /// Transfer tokens
    Transfer {
        /// Token address
        #[arg(short, long)]
        token: String,

        /// Sender address
        #[arg(short, long)]
        from: String,

        /// Recipient address
        #[arg(long)]
        to: String,

        /// Amount to transfer
        #[arg(short, long)]
        amount: u128,
    },

    /// Approve a spender
    Approve {
        /// Token address
        #[arg(short, long)]
        token: String,

        /// Allowance owner
        #[arg(short, long)]
        from: String,

        /// Spender address
        #[arg(short, long)]
        spender: String,

        /// Allowance amount (overwrites any prior value)
        #[arg(short, long)]
        amount: u128,
    },

    /// Transfer tokens on behalf of another account
    TransferFrom {
        /// Token address
        #[arg(short, long)]
        token: String,

        /// Spender (the caller, must have allowance)
        #[arg(short, long)]
        spender: String,

        /// Source address
        #[arg(long)]
        source: String,

        /// Recipient address
        #[arg(long)]
        to: String,

        /// Amount to transfer
        #[arg(short, long)]
        amount: u128,
    },

    /// Increase a spender's allowance
    IncreaseAllowance {
        /// Token address
        #[arg(short, long)]
        token: String,

        /// Allowance owner
        #[arg(short, long)]
        from: String,

        /// Spender address
        #[arg(short, long)]
        spender: String,

        /// Amount to add
        #[arg(short, long)]
        delta: u128,
    },

    /// Decrease a spender's allowance
    DecreaseAllowance {
        /// Token address
        #[arg(short, long)]
        token: String,

        /// Allowance owner
        #[arg(short, long)]
        from: String,

        /// Spender address
        #[arg(short, long)]
        spender: String,

        /// Amount to subtract
        #[arg(short, long)]
        delta: u128,
    },

    /// Mint new tokens (owner-only)
    Mint {
        /// Token address
        #[arg(short, long)]
        token: String,

        /// Caller address (must be the owner)
        #[arg(short, long)]
        caller: String,

        /// Recipient account
        #[arg(long)]
        account: String,

        /// Amount to mint
        #[arg(short, long)]
        amount: u128,
    },

    /// Burn tokens (owner-only)
    Burn {
        /// Token address
        #[arg(short, long)]
        token: String,

        /// Caller address (must be the owner)
        #[arg(short, long)]
        caller: String,

        /// Account to burn from
        #[arg(long)]
        account: String,

        /// Amount to burn
        #[arg(short, long)]
        amount: u128,
    },

    /// Pause a token (owner-only)
    Pause {
        /// Token address
        #[arg(short, long)]
        token: String,

        /// Caller address (must be the owner)
        #[arg(short, long)]
        caller: String,
    },

    /// Unpause a token (owner-only)
    Unpause {
        /// Token address
        #[arg(short, long)]
        token: String,

        /// Caller address (must be the owner)
        #[arg(short, long)]
        caller: String,
    },

    /// Blacklist an account (owner-only)
    Blacklist {
        /// Token address
        #[arg(short, long)]
        token: String,

        /// Caller address (must be the owner)
        #[arg(short, long)]
        caller: String,

        /// Account to blacklist
        #[arg(long)]
        account: String,
    },

    /// Remove an account from the blacklist (owner-only)
    Unblacklist {
        /// Token address
        #[arg(short, long)]
        token: String,

        /// Caller address (must be the owner)
        #[arg(short, long)]
        caller: String,

        /// Account to unblacklist
        #[arg(long)]
        account: String,
    },

    /// Transfer token ownership (owner-only)
    TransferOwnership {
        /// Token address
        #[arg(short, long)]
        token: String,

        /// Caller address (must be the owner)
        #[arg(short, long)]
        caller: String,

        /// New owner address
        #[arg(long)]
        new_owner: String,
    },

    /// Show a balance
    Balance {
        /// Token address
        #[arg(short, long)]
        token: String,

        /// Account address
        #[arg(long)]
        account: String,
    },

    /// Show an allowance
    Allowance {
        /// Token address
        #[arg(short, long)]
        token: String,

        /// Allowance owner
        #[arg(long)]
        owner: String,

        /// Spender address
        #[arg(short, long)]
        spender: String,
    },

    /// Show token info
    Info {
        /// Token address
        #[arg(short, long)]
        token: String,
    },

    /// List all tokens
    List,

    /// Show the event log for a token
    Events {
        /// Token address
        #[arg(short, long)]
        token: String,

        /// Number of events to show
        #[arg(short, long, default_value = "20")]
        count: usize,
    },

    /// REST API server
    Api {
        #[command(subcommand)]
        action: ApiCommands,
    },
}

#[derive(Subcommand)]
enum ApiCommands {
    /// Start the REST API server
    Start {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Handle API commands with tokio runtime
    if let Commands::Api { ref action } = cli.command {
        return run_api_command(action, &cli.data_dir);
    }

    // Initialize application state
    let mut state = AppState::new(cli.data_dir.clone())?;

    // Process commands
    match cli.command {
        Commands::Api { .. } => unreachable!(),

        Commands::Deploy {
            name,
            symbol,
            decimals,
            supply,
            deployer,
        } => {
            cli::cmd_deploy(&mut state, &name, &symbol, decimals, supply, &deployer)?;
        }

        Commands::Transfer {
            token,
            from,
            to,
            amount,
        } => {
            cli::cmd_transfer(&mut state, &token, &from, &to, amount)?;
        }

        Commands::Approve {
            token,
            from,
            spender,
            amount,
        } => {
            cli::cmd_approve(&mut state, &token, &from, &spender, amount)?;
        }

        Commands::TransferFrom {
            token,
            spender,
            source,
            to,
            amount,
        } => {
            cli::cmd_transfer_from(&mut state, &token, &spender, &source, &to, amount)?;
        }

        Commands::IncreaseAllowance {
            token,
            from,
            spender,
            delta,
        } => {
            cli::cmd_change_allowance(&mut state, &token, &from, &spender, delta, true)?;
        }

        Commands::DecreaseAllowance {
            token,
            from,
            spender,
            delta,
        } => {
            cli::cmd_change_allowance(&mut state, &token, &from, &spender, delta, false)?;
        }

        Commands::Mint {
            token,
            caller,
            account,
            amount,
        } => {
            cli::cmd_mint(&mut state, &token, &caller, &account, amount)?;
        }

        Commands::Burn {
            token,
            caller,
            account,
            amount,
        } => {
            cli::cmd_burn(&mut state, &token, &caller, &account, amount)?;
        }

        Commands::Pause { token, caller } => {
            cli::cmd_set_paused(&mut state, &token, &caller, true)?;
        }

        Commands::Unpause { token, caller } => {
            cli::cmd_set_paused(&mut state, &token, &caller, false)?;
        }

        Commands::Blacklist {
            token,
            caller,
            account,
        } => {
            cli::cmd_set_blacklisted(&mut state, &token, &caller, &account, true)?;
        }

        Commands::Unblacklist {
            token,
            caller,
            account,
        } => {
            cli::cmd_set_blacklisted(&mut state, &token, &caller, &account, false)?;
        }

        Commands::TransferOwnership {
            token,
            caller,
            new_owner,
        } => {
            cli::cmd_transfer_ownership(&mut state, &token, &caller, &new_owner)?;
        }

        Commands::Balance { token, account } => {
            cli::cmd_balance(&state, &token, &account)?;
        }

        Commands::Allowance {
            token,
            owner,
            spender,
        } => {
            cli::cmd_allowance(&state, &token, &owner, &spender)?;
        }

        Commands::Info { token } => {
            cli::cmd_info(&state, &token)?;
        }

        Commands::List => {
            cli::cmd_list(&state)?;
        }

        Commands::Events { token, count } => {
            cli::cmd_events(&state, &token, count)?;
        }
    }

    Ok(())
}

fn run_api_command(action: &ApiCommands, data_dir: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;

    rt.block_on(async {
        match action {
            ApiCommands::Start { port } => {
                // Initialize storage
                let storage_config = StorageConfig {
                    data_dir: data_dir.clone(),
                    ..Default::default()
                };
                let storage = Arc::new(Storage::new(storage_config)?);

                // Load or create the registry
                let manager = if storage.exists() {
                    println!("📂 Loading existing ledger...");
                    Arc::new(RwLock::new(storage.load()?))
                } else {
                    println!("📂 Creating new ledger...");
                    let manager = LedgerManager::new();
                    storage.save(&manager)?;
                    Arc::new(RwLock::new(manager))
                };

                // Create WebSocket broadcaster
                let ws_broadcaster = Arc::new(WsBroadcaster::new());

                // Create API state
                let state = ApiState {
                    ledger: manager.clone(),
                    storage: storage.clone(),
                    ws_broadcaster,
                };

                // Clone state for shutdown handler
                let shutdown_state = state.clone();

                // Create router
                let app = create_router(state);

                // Start server
                let addr = format!("0.0.0.0:{}", port);
                println!("🚀 REST API server starting on http://localhost:{}", port);
                println!();
                println!("📖 Available endpoints:");
                println!("   GET  /health                                      - Health check");
                println!("   GET  /ws                                          - WebSocket events");
                println!("   GET  /api/tokens                                  - List tokens");
                println!("   POST /api/tokens                                  - Deploy token");
                println!("   GET  /api/tokens/{{addr}}                           - Token info");
                println!("   GET  /api/tokens/{{addr}}/balance/{{account}}         - Balance");
                println!("   GET  /api/tokens/{{addr}}/allowance/{{owner}}/{{spender}} - Allowance");
                println!("   GET  /api/tokens/{{addr}}/events                    - Event log");
                println!("   POST /api/tokens/{{addr}}/transfer                  - Transfer");
                println!("   POST /api/tokens/{{addr}}/approve                   - Approve");
                println!("   POST /api/tokens/{{addr}}/transfer-from             - Delegated transfer");
                println!("   POST /api/tokens/{{addr}}/allowance/increase        - Increase allowance");
                println!("   POST /api/tokens/{{addr}}/allowance/decrease        - Decrease allowance");
                println!("   POST /api/tokens/{{addr}}/mint                      - Mint (owner)");
                println!("   POST /api/tokens/{{addr}}/burn                      - Burn (owner)");
                println!("   POST /api/tokens/{{addr}}/pause                     - Pause (owner)");
                println!("   POST /api/tokens/{{addr}}/unpause                   - Unpause (owner)");
                println!("   POST /api/tokens/{{addr}}/blacklist                 - Blacklist (owner)");
                println!("   POST /api/tokens/{{addr}}/unblacklist               - Unblacklist (owner)");
                println!("   POST /api/tokens/{{addr}}/ownership                 - Transfer ownership (owner)");
                println!();

                // Handle Ctrl+C with graceful shutdown
                tokio::spawn(async move {
                    tokio::signal::ctrl_c().await.ok();
                    println!("\n📴 Shutting down API server...");

                    // Save the registry before exit
                    println!("💾 Saving ledger...");
                    let manager = shutdown_state.ledger.read().await;
                    match shutdown_state.storage.save(&manager) {
                        Ok(()) => println!("✅ Ledger saved successfully!"),
                        Err(e) => log::error!("Failed to save ledger: {}", e),
                    }

                    std::process::exit(0);
                });

                let listener = tokio::net::TcpListener::bind(&addr).await?;
                axum::serve(listener, app).await?;
            }
        }

        Ok::<(), Box<dyn std::error::Error>>(())
    })?;

    Ok(())
}
