// 5.0: order ledger. append-only audit log of executed orders.
// there is no update or delete: once an order lands here it never changes.

use crate::order::Order;
use crate::types::AccountId;
use parking_lot::RwLock;

#[derive(Debug, Default)]
pub struct OrderLedger {
    orders: RwLock<Vec<Order>>,
}

impl OrderLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an executed order. Infallible: the settlement engine only calls
    /// this after its store commit has succeeded.
    pub fn append(&self, order: Order) {
        self.orders.write().push(order);
    }

    /// All orders for one account, newest first. Returned records are clones;
    /// the log itself cannot be mutated through this view.
    pub fn list_by_account(&self, account_id: AccountId) -> Vec<Order> {
        self.orders
            .read()
            .iter()
            .rev()
            .filter(|o| o.account_id == account_id)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.orders.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.read().is_empty()
    }
}
