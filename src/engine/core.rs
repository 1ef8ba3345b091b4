// 8.1: broker engine. owns the store, the order ledger, the account gate,
// and the injected price source. all methods take &self: the engine is shared
// across threads and relies on the gate plus store locking for isolation.

use super::results::{EngineError, PortfolioEntry};
use crate::account::{Account, AccountError};
use crate::gate::AccountGate;
use crate::ledger::OrderLedger;
use crate::order::{Order, RequestError};
use crate::stock::PriceSource;
use crate::store::LedgerStore;
use crate::types::{AccountId, Cash, OrderId, Price, Symbol, Timestamp};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub struct BrokerEngine {
    pub(super) store: LedgerStore,
    pub(super) ledger: OrderLedger,
    pub(super) gate: AccountGate,
    pub(super) quotes: Arc<dyn PriceSource>,
    next_account_id: AtomicU64,
    next_order_id: AtomicU64,
}

impl BrokerEngine {
    pub fn new(quotes: Arc<dyn PriceSource>) -> Self {
        Self {
            store: LedgerStore::new(),
            ledger: OrderLedger::new(),
            gate: AccountGate::new(),
            quotes,
            next_account_id: AtomicU64::new(1),
            next_order_id: AtomicU64::new(1),
        }
    }

    pub(super) fn next_order_id(&self) -> OrderId {
        OrderId(self.next_order_id.fetch_add(1, Ordering::Relaxed))
    }

    pub fn create_account(&self, owner: impl Into<String>, opening_balance: Cash) -> Result<AccountId, EngineError> {
        if opening_balance.is_negative() {
            return Err(EngineError::InvalidInput(RequestError::NonPositiveAmount));
        }
        let id = AccountId(self.next_account_id.fetch_add(1, Ordering::Relaxed));
        let account = Account::new(id, owner, opening_balance, Timestamp::now());
        self.store.insert_account(account);
        tracing::info!(account = id.0, "account created");
        Ok(id)
    }

    pub fn get_account(&self, account_id: AccountId) -> Option<Account> {
        self.store.get_account(account_id)
    }

    pub fn deposit(&self, account_id: AccountId, amount: Cash) -> Result<Cash, EngineError> {
        if amount.value() <= rust_decimal::Decimal::ZERO {
            return Err(EngineError::InvalidInput(RequestError::NonPositiveAmount));
        }
        self.gate.with_account(account_id, || {
            if self.store.get_account(account_id).is_none() {
                return Err(EngineError::AccountNotFound(account_id));
            }
            let new_balance = self.store.adjust_balance(account_id, amount)?;
            tracing::info!(account = account_id.0, %amount, %new_balance, "deposit");
            Ok(new_balance)
        })
    }

    pub fn withdraw(&self, account_id: AccountId, amount: Cash) -> Result<Cash, EngineError> {
        if amount.value() <= rust_decimal::Decimal::ZERO {
            return Err(EngineError::InvalidInput(RequestError::NonPositiveAmount));
        }
        self.gate.with_account(account_id, || {
            let account = self
                .store
                .get_account(account_id)
                .ok_or(EngineError::AccountNotFound(account_id))?;
            if amount > account.balance {
                return Err(EngineError::Account(AccountError::InsufficientBalance {
                    requested: amount,
                    available: account.balance,
                }));
            }
            let new_balance = self
                .store
                .adjust_balance(account_id, Cash::new(-amount.value()))?;
            tracing::info!(account = account_id.0, %amount, %new_balance, "withdrawal");
            Ok(new_balance)
        })
    }

    /// Order history for one account, newest first.
    pub fn get_orders(&self, account_id: AccountId) -> Vec<Order> {
        self.ledger.list_by_account(account_id)
    }

    /// Portfolio view: every holding joined with its stock name and current
    /// quote, symbol-ordered.
    pub fn get_holdings(&self, account_id: AccountId) -> Result<Vec<PortfolioEntry>, EngineError> {
        if self.store.get_account(account_id).is_none() {
            return Err(EngineError::AccountNotFound(account_id));
        }

        let entries = self
            .store
            .list_holdings(account_id)
            .into_iter()
            .filter_map(|holding| {
                let stock = self.quotes.stock(&holding.symbol)?;
                Some(PortfolioEntry {
                    account_id: holding.account_id,
                    symbol: holding.symbol.clone(),
                    stock_name: stock.name,
                    quantity: holding.quantity,
                    average_price: holding.average_price,
                    current_price: stock.current_price,
                    market_value: holding.market_value(stock.current_price),
                    unrealized_pnl: holding.unrealized_pnl(stock.current_price),
                })
            })
            .collect();

        Ok(entries)
    }

    pub fn get_quote(&self, symbol: &Symbol) -> Option<Price> {
        self.quotes.quote(symbol)
    }

    /// Arm a one-shot store fault for the next settlement commit. Exercises
    /// the full rollback path end to end.
    pub fn inject_commit_fault(&self, fault: crate::store::CommitFault) {
        self.store.inject_commit_fault(fault);
    }
}
