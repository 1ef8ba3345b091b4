// 8.0.2: result types and errors for engine operations.

use crate::account::AccountError;
use crate::order::RequestError;
use crate::store::StoreError;
use crate::types::{AccountId, Cash, Price, Quantity, Symbol};
use serde::{Deserialize, Serialize};

/// One holding row joined with its quote metadata, as served by the
/// portfolio view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioEntry {
    pub account_id: AccountId,
    pub symbol: Symbol,
    pub stock_name: String,
    pub quantity: Quantity,
    pub average_price: Price,
    pub current_price: Price,
    pub market_value: Cash,
    pub unrealized_pnl: Cash,
}

// every error is terminal for its request. nothing here is retried by the
// engine itself; a failed settlement leaves no mutation behind.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EngineError {
    #[error("Invalid request: {0}")]
    InvalidInput(#[from] RequestError),

    #[error("Account {0:?} not found")]
    AccountNotFound(AccountId),

    #[error("Stock {0} not found")]
    StockNotFound(Symbol),

    #[error("Insufficient funds: cost {cost}, balance {balance}")]
    InsufficientFunds { cost: Cash, balance: Cash },

    #[error("Insufficient holdings: requested {requested}, held {held}")]
    InsufficientHoldings { requested: Quantity, held: u64 },

    /// Lock contention on the account gate. Not produced by the blocking
    /// gate in this crate; callers that wrap settlement with a lock timeout
    /// map their timeout onto this variant. Safe to retry.
    #[error("Settlement lock contention on account {0:?}")]
    ConcurrencyConflict(AccountId),

    #[error("Account error: {0}")]
    Account(#[from] AccountError),

    /// Persistence fault. The settlement was rolled back in full.
    #[error("Store failure: {0}")]
    Store(#[from] StoreError),
}
