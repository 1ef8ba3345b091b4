// 7.0: concurrency gate. at most one in-flight settlement per account.
//
// Each account gets its own mutex, created on first use. Holding it across
// the whole read-check-commit sequence makes settlements on one account
// serializable; settlements on different accounts never contend.

use crate::types::AccountId;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct AccountGate {
    locks: Mutex<HashMap<AccountId, Arc<Mutex<()>>>>,
}

impl AccountGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding the account's lock. The registry lock is only
    /// held long enough to fetch or create the per-account mutex, so two
    /// accounts settling at once block each other only on that brief lookup.
    pub fn with_account<R>(&self, account_id: AccountId, f: impl FnOnce() -> R) -> R {
        let lock = {
            let mut locks = self.locks.lock();
            Arc::clone(locks.entry(account_id).or_default())
        };
        let _guard = lock.lock();
        f()
    }
}
