// 6.0: ledger store. owns the account and holding tables.
//
// Settlement never writes through this store piecemeal. The engine computes
// everything it wants to change, stages it in a SettleBatch, and commits the
// batch in one critical section. A commit either applies every mutation or
// none of them, so no reader can observe a half-settled account.
//
// Reads are point-in-time snapshots (cloned rows). Isolation between
// settlements on the same account comes from the AccountGate, which holds the
// account locked across the engine's read-check-commit sequence.

use crate::account::Account;
use crate::holding::Holding;
use crate::types::{AccountId, Cash, Symbol};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;

#[derive(Debug, Default)]
struct Tables {
    accounts: HashMap<AccountId, Account>,
    holdings: HashMap<(AccountId, Symbol), Holding>,
}

// 6.1: staged mutations for one settlement. balance delta is signed:
// negative for buys, positive for sells.
#[derive(Debug, Clone)]
pub struct SettleBatch {
    pub account_id: AccountId,
    pub balance_delta: Cash,
    pub holding: HoldingOp,
}

#[derive(Debug, Clone)]
pub enum HoldingOp {
    /// Insert or replace the (account, symbol) row.
    Upsert(Holding),
    /// Remove the row entirely. Used when a sell closes the position.
    Delete(Symbol),
}

// 6.2: one-shot fault points for exercising the rollback path in tests.
// AfterBalanceWrite fails mid-commit, after the balance has been applied,
// which forces the store to undo work it already did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitFault {
    BeforeWrite,
    AfterBalanceWrite,
}

#[derive(Debug, Default)]
pub struct LedgerStore {
    tables: RwLock<Tables>,
    fault: Mutex<Option<CommitFault>>,
}

impl LedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_account(&self, account: Account) {
        self.tables.write().accounts.insert(account.id, account);
    }

    pub fn get_account(&self, account_id: AccountId) -> Option<Account> {
        self.tables.read().accounts.get(&account_id).cloned()
    }

    /// Apply a signed delta to an account balance. Used by deposits and
    /// withdrawals; the caller validates funds under the account gate, the
    /// store only requires that the account exists.
    pub fn adjust_balance(&self, account_id: AccountId, delta: Cash) -> Result<Cash, StoreError> {
        let mut tables = self.tables.write();
        let account = tables
            .accounts
            .get_mut(&account_id)
            .ok_or(StoreError::UnknownAccount(account_id))?;
        account.balance = account.balance.add(delta);
        debug_assert!(!account.balance.is_negative());
        Ok(account.balance)
    }

    pub fn get_holding(&self, account_id: AccountId, symbol: &Symbol) -> Option<Holding> {
        self.tables
            .read()
            .holdings
            .get(&(account_id, symbol.clone()))
            .cloned()
    }

    /// All holdings for one account, symbol-ordered.
    pub fn list_holdings(&self, account_id: AccountId) -> Vec<Holding> {
        let tables = self.tables.read();
        let mut rows: Vec<Holding> = tables
            .holdings
            .values()
            .filter(|h| h.account_id == account_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        rows
    }

    // 6.3: atomic settlement commit. the write lock is held for the whole
    // apply, and any failure inside it restores what was already written,
    // so intermediate state is never observable.
    pub fn commit(&self, batch: SettleBatch) -> Result<(), StoreError> {
        let mut tables = self.tables.write();
        let fault = self.fault.lock().take();

        if fault == Some(CommitFault::BeforeWrite) {
            return Err(StoreError::CommitFailed);
        }

        let account = tables
            .accounts
            .get_mut(&batch.account_id)
            .ok_or(StoreError::UnknownAccount(batch.account_id))?;
        let prior_balance = account.balance;
        account.balance = account.balance.add(batch.balance_delta);
        debug_assert!(!account.balance.is_negative());

        if fault == Some(CommitFault::AfterBalanceWrite) {
            account.balance = prior_balance;
            return Err(StoreError::CommitFailed);
        }

        match batch.holding {
            HoldingOp::Upsert(holding) => {
                debug_assert_eq!(holding.account_id, batch.account_id);
                tables
                    .holdings
                    .insert((holding.account_id, holding.symbol.clone()), holding);
            }
            HoldingOp::Delete(symbol) => {
                tables.holdings.remove(&(batch.account_id, symbol));
            }
        }

        Ok(())
    }

    /// Arm a one-shot commit fault. The next commit consumes it.
    pub fn inject_commit_fault(&self, fault: CommitFault) {
        *self.fault.lock() = Some(fault);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Account {0:?} not present in store")]
    UnknownAccount(AccountId),

    #[error("Store commit failed")]
    CommitFailed,
}
