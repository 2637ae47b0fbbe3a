use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use wallet_gateway::TransactionMethod;

/// walletctl: command-line access to the wallet backends.
#[derive(Parser, Debug)]
#[command(name = "walletctl", version)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// File holding the persisted session
    #[arg(long, default_value = ".walletctl-session.json", global = true)]
    pub session_file: PathBuf,

    /// Output as JSON instead of TSV
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and persist the session
    Login(LoginArgs),

    /// Log in to the admin console (requires ROLE_ADMIN)
    AdminLogin(LoginArgs),

    /// Drop the persisted session
    Logout,

    /// Create an account
    Register(RegisterArgs),

    /// Show the current session
    Whoami,

    /// Look up a user by phone number or username
    User {
        /// Phone number or username
        identifier: String,
    },

    /// Show a balance
    Balance {
        #[arg(value_enum)]
        account: BalanceAccount,
    },

    /// Show the signed-in user with wallet and bank balances
    Dashboard,

    /// Credit a bank account
    AddMoney {
        /// Bank account number
        account: String,

        /// Amount to add
        #[arg(allow_hyphen_values = true)]
        amount: Decimal,
    },

    /// Send money
    Send(SendArgs),

    /// List all transactions (admin)
    Transactions,
}

/// Arguments for `login` and `admin-login`.
#[derive(Parser, Debug)]
pub struct LoginArgs {
    /// Phone number or username
    pub identifier: String,

    /// Password; falls back to WALLET_PASSWORD
    #[arg(long)]
    pub password: Option<String>,
}

/// Arguments for the `register` subcommand.
#[derive(Parser, Debug)]
pub struct RegisterArgs {
    /// Full name
    #[arg(long)]
    pub name: String,

    /// Username
    #[arg(long)]
    pub username: String,

    /// Email address
    #[arg(long)]
    pub email: String,

    /// Country calling code
    #[arg(long, default_value = "+1")]
    pub country_code: String,

    /// Phone number, digits only
    #[arg(long)]
    pub phone: String,

    /// Password; falls back to WALLET_PASSWORD
    #[arg(long)]
    pub password: Option<String>,
}

/// Arguments for the `send` subcommand.
#[derive(Parser, Debug)]
pub struct SendArgs {
    /// Receiver phone number or account
    pub receiver: String,

    /// Amount to send
    #[arg(allow_hyphen_values = true)]
    pub amount: Decimal,

    /// Transaction method (e.g. USER_TO_USER, BANK_TO_WALLET)
    #[arg(long, default_value = "USER_TO_USER")]
    pub method: TransactionMethod,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum BalanceAccount {
    Wallet,
    Bank,
}
