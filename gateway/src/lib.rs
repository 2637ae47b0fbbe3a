pub mod admin;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod rest;
pub mod session;
pub mod types;
pub mod utils;

// ---- Top-level re-exports for ergonomic usage ----

// Gateway + admin console
pub use admin::GatewayAdmin;
pub use client::WalletGateway;
pub use config::{GatewayConfig, Service};
pub use dashboard::DashboardSnapshot;
pub use error::{GatewayError, Result};

// REST client
pub use rest::GatewayHttpClient;

// Session
pub use session::{
    FileStore, MemoryStore, Session, SessionEvent, SessionHandle, SessionState, SessionStore,
    SessionSubscription, SignOutReason,
};

// Wire types
pub use types::{
    AddMoneyRequest, Credentials, EntityId, LoginOutcome, SignupProfile, Transaction,
    TransactionMethod, TransferRequest, UserView,
};
