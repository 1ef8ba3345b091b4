// 4.0: order records and request validation.
//
// An Order is the immutable receipt of one executed settlement. It is written
// once, inside the settlement commit, and never updated or deleted.
// An OrderRequest is the validated input: constructing one rejects malformed
// requests before the engine touches any account or quote state.

use crate::types::{AccountId, OrderId, OrderStatus, Price, Quantity, Side, Symbol, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub account_id: AccountId,
    pub symbol: Symbol,
    pub side: Side,
    pub quantity: Quantity,
    pub executed_price: Price,
    pub status: OrderStatus,
    pub created_at: Timestamp,
}

/// A validated settlement request. Invalid sides are unrepresentable by
/// construction; zero quantities and blank symbols are rejected here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    pub account_id: AccountId,
    pub symbol: Symbol,
    pub side: Side,
    pub quantity: Quantity,
}

impl OrderRequest {
    pub fn new(
        account_id: AccountId,
        symbol: &str,
        side: Side,
        quantity: u64,
    ) -> Result<Self, RequestError> {
        let symbol = Symbol::new(symbol);
        if symbol.is_empty() {
            return Err(RequestError::EmptySymbol);
        }
        let quantity = Quantity::new(quantity).ok_or(RequestError::ZeroQuantity)?;

        Ok(Self {
            account_id,
            symbol,
            side,
            quantity,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("symbol must not be empty")]
    EmptySymbol,

    #[error("quantity must be a positive integer")]
    ZeroQuantity,

    #[error("amount must be positive")]
    NonPositiveAmount,
}
