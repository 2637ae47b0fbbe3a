pub mod balance;
pub mod enums;
pub mod transaction;
pub mod user;

pub use balance::BalanceResponse;
pub use enums::TransactionMethod;
pub use transaction::{AddMoneyRequest, Transaction, TransferRequest};
pub use user::{
    Credentials, EntityId, LoginOutcome, LoginResponse, SignupProfile, UserView, ADMIN_ROLE,
    MIN_PASSWORD_LEN,
};
