//! Order settlement. The one mutating entry point of the engine.
//!
//! A settlement runs as a single atomic unit: the account gate is held for
//! the whole read-check-commit sequence, every mutation is staged into one
//! batch, and the batch commits or rolls back as a whole. The order record
//! only reaches the ledger after the store commit has succeeded.

use super::core::BrokerEngine;
use super::results::EngineError;
use crate::holding::{Holding, SellOutcome};
use crate::order::{Order, OrderRequest};
use crate::store::{HoldingOp, SettleBatch};
use crate::types::{Cash, OrderStatus, Side, Timestamp};

impl BrokerEngine {
    /// Execute one order against the current quote.
    ///
    /// Preconditions (quantity, side, symbol shape) are enforced by
    /// `OrderRequest::new` before any account or quote state is read.
    /// Account existence, quote existence, funds, and holdings are checked
    /// here, under the account's gate lock, against a snapshot that stays
    /// valid until the commit because the lock is held throughout.
    pub fn settle(&self, request: OrderRequest) -> Result<Order, EngineError> {
        let OrderRequest {
            account_id,
            symbol,
            side,
            quantity,
        } = request;

        self.gate.with_account(account_id, || {
            let account = self
                .store
                .get_account(account_id)
                .ok_or(EngineError::AccountNotFound(account_id))?;

            // momentary snapshot of the quote; this is the execution price
            let price = self
                .quotes
                .quote(&symbol)
                .ok_or_else(|| EngineError::StockNotFound(symbol.clone()))?;

            let cost = Cash::new(price.value() * quantity.as_decimal());

            let batch = match side {
                Side::Buy => {
                    if account.balance < cost {
                        return Err(EngineError::InsufficientFunds {
                            cost,
                            balance: account.balance,
                        });
                    }
                    let holding = match self.store.get_holding(account_id, &symbol) {
                        Some(existing) => existing.apply_buy(quantity, price),
                        None => Holding::open(account_id, symbol.clone(), quantity, price),
                    };
                    SettleBatch {
                        account_id,
                        balance_delta: Cash::new(-cost.value()),
                        holding: HoldingOp::Upsert(holding),
                    }
                }
                Side::Sell => {
                    let held = self.store.get_holding(account_id, &symbol);
                    let outcome = held.as_ref().and_then(|h| h.apply_sell(quantity));
                    match outcome {
                        Some(SellOutcome::Reduced(rest)) => SettleBatch {
                            account_id,
                            balance_delta: cost,
                            holding: HoldingOp::Upsert(rest),
                        },
                        Some(SellOutcome::Closed) => SettleBatch {
                            account_id,
                            balance_delta: cost,
                            holding: HoldingOp::Delete(symbol.clone()),
                        },
                        None => {
                            return Err(EngineError::InsufficientHoldings {
                                requested: quantity,
                                held: held.map(|h| h.quantity.get()).unwrap_or(0),
                            })
                        }
                    }
                }
            };

            let order = Order {
                id: self.next_order_id(),
                account_id,
                symbol: symbol.clone(),
                side,
                quantity,
                executed_price: price,
                status: OrderStatus::Complete,
                created_at: Timestamp::now(),
            };

            // commit is all-or-nothing; a failure here means nothing was
            // applied and the order never reaches the ledger
            self.store.commit(batch)?;
            self.ledger.append(order.clone());

            tracing::info!(
                order = order.id.0,
                account = account_id.0,
                %side,
                symbol = %symbol,
                %quantity,
                executed_price = %price,
                "order settled"
            );

            Ok(order)
        })
    }
}
