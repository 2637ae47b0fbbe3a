use thiserror::Error;
use wallet_gateway::GatewayError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no password given: pass --password or set WALLET_PASSWORD")]
    MissingPassword,
}
