//! Account and cash balance management.
//!
//! An account holds a single cash balance. The balance only moves through
//! deposits, withdrawals, and committed settlements; nothing else touches it.

use crate::types::{AccountId, Cash, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub owner: String,
    pub balance: Cash,
    pub created_at: Timestamp,
}

impl Account {
    pub fn new(id: AccountId, owner: impl Into<String>, opening_balance: Cash, timestamp: Timestamp) -> Self {
        debug_assert!(!opening_balance.is_negative());
        Self {
            id,
            owner: owner.into(),
            balance: opening_balance,
            created_at: timestamp,
        }
    }

    pub fn deposit(&mut self, amount: Cash) {
        self.balance = self.balance.add(amount);
    }

    pub fn withdraw(&mut self, amount: Cash) -> Result<(), AccountError> {
        if amount > self.balance {
            return Err(AccountError::InsufficientBalance {
                requested: amount,
                available: self.balance,
            });
        }
        self.balance = self.balance.sub(amount);
        Ok(())
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum AccountError {
    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: Cash, available: Cash },
}
