mod cli;
mod error;
mod output;

use std::sync::Arc;

use clap::Parser;
use cli::{BalanceAccount, Cli, Command};
use error::CliError;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tracing::info;
use wallet_gateway::{
    Credentials, FileStore, GatewayAdmin, GatewayConfig, GatewayError, SessionHandle,
    SignupProfile, TransactionMethod, WalletGateway,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = cli
        .log_level
        .parse::<tracing_subscriber::filter::LevelFilter>()
        .unwrap_or(tracing_subscriber::filter::LevelFilter::INFO);

    tracing_subscriber::fmt()
        .with_max_level(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let _ = dotenvy::dotenv(); // load .env if present

    if let Err(e) = run(cli).await {
        tracing::error!(error = %e, "command failed");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = GatewayConfig::from_env();
    info!(
        user = %config.user_url,
        wallet = %config.wallet_url,
        bank = %config.bank_url,
        transaction = %config.transaction_url,
        "using backend services"
    );

    let session = SessionHandle::with_store(FileStore::new(&cli.session_file))?;
    let gateway = Arc::new(WalletGateway::with_session(&config, session)?);

    let value = match cli.command {
        Command::Login(args) => {
            let password = password(args.password)?;
            let outcome = gateway
                .login(&Credentials::new(args.identifier.clone(), password))
                .await?;
            json!({
                "state": gateway.session().state(),
                "identity": args.identifier,
                "user": outcome.user,
            })
        }

        Command::AdminLogin(args) => {
            let password = password(args.password)?;
            let credentials = Credentials::new(args.identifier.clone(), password);
            GatewayAdmin::login(Arc::clone(&gateway), &credentials).await?;
            json!({
                "state": gateway.session().state(),
                "identity": args.identifier,
                "admin": true,
            })
        }

        Command::Logout => {
            gateway.logout();
            json!({ "state": gateway.session().state() })
        }

        Command::Register(args) => {
            let profile = SignupProfile {
                name: args.name,
                user_name: args.username,
                email: args.email,
                country_code: args.country_code,
                phone_number: args.phone,
                password: password(args.password)?,
            };
            match gateway.register(&profile).await? {
                Some(user) => serde_json::to_value(user)?,
                None => json!({ "registered": true }),
            }
        }

        Command::Whoami => match gateway.session().current() {
            Some(session) => json!({
                "state": gateway.session().state(),
                "identity": session.identity,
                "userId": session.user_id,
                "roles": session.roles,
            }),
            None => json!({ "state": gateway.session().state() }),
        },

        Command::User { identifier } => serde_json::to_value(gateway.get_user(&identifier).await?)?,

        Command::Balance { account } => {
            let (name, balance) = match account {
                BalanceAccount::Wallet => ("wallet", gateway.get_wallet_balance().await?),
                BalanceAccount::Bank => ("bank", gateway.get_bank_balance().await?),
            };
            json!({ "account": name, "balance": balance })
        }

        Command::Dashboard => {
            let snapshot = gateway.dashboard().await?;
            json!({
                "user": snapshot.user,
                "walletBalance": settled(&snapshot.wallet_balance),
                "bankBalance": settled(&snapshot.bank_balance),
            })
        }

        Command::AddMoney { account, amount } => {
            gateway.add_bank_money(&account, amount).await?;
            json!({ "account": account, "added": amount })
        }

        Command::Send(args) => {
            let created = if args.method == TransactionMethod::AdminToUser {
                GatewayAdmin::from_session(Arc::clone(&gateway))?
                    .send_to_user(&args.receiver, args.amount)
                    .await?
            } else {
                gateway
                    .initiate_transaction(&args.receiver, args.amount, args.method)
                    .await?
            };
            match created {
                Some(tx) => serde_json::to_value(tx)?,
                None => json!({
                    "receiver": args.receiver,
                    "amount": args.amount,
                    "method": args.method,
                    "initiated": true,
                }),
            }
        }

        Command::Transactions => {
            let admin = GatewayAdmin::from_session(Arc::clone(&gateway))?;
            serde_json::to_value(admin.transactions().await?)?
        }
    };

    let mut stdout = std::io::stdout().lock();
    output::write_value(&value, cli.json, &mut stdout)
}

fn password(flag: Option<String>) -> Result<String, CliError> {
    flag.or_else(|| std::env::var("WALLET_PASSWORD").ok())
        .ok_or(CliError::MissingPassword)
}

/// A balance that may have failed, rendered without aborting the command.
fn settled(balance: &Result<Decimal, GatewayError>) -> Value {
    match balance {
        Ok(amount) => json!(amount),
        Err(e) => json!({ "error": e.to_string() }),
    }
}
