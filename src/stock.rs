// 3.0: quote table. the engine never writes prices; an external feed does.
//
// The engine reads prices through the PriceSource trait so tests can inject
// deterministic quotes. A settlement takes whatever price the source reports
// at read time: the quote is a momentary snapshot, not a reservation.

use crate::types::{Price, Symbol};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub symbol: Symbol,
    pub name: String,
    pub current_price: Price,
}

/// Read-only price lookup the settlement engine depends on.
pub trait PriceSource: Send + Sync {
    fn quote(&self, symbol: &Symbol) -> Option<Price>;

    fn stock(&self, symbol: &Symbol) -> Option<Stock>;
}

// 3.1: default in-memory quote table. BTreeMap keeps listings symbol-ordered.
#[derive(Debug, Default)]
pub struct QuoteBoard {
    stocks: RwLock<BTreeMap<Symbol, Stock>>,
}

impl QuoteBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_stock(&self, symbol: Symbol, name: impl Into<String>, price: Price) {
        let stock = Stock {
            symbol: symbol.clone(),
            name: name.into(),
            current_price: price,
        };
        self.stocks.write().insert(symbol, stock);
    }

    /// Feed-side price update. Unknown symbols are ignored rather than
    /// implicitly listed.
    pub fn set_price(&self, symbol: &Symbol, price: Price) -> bool {
        let mut stocks = self.stocks.write();
        match stocks.get_mut(symbol) {
            Some(stock) => {
                stock.current_price = price;
                true
            }
            None => false,
        }
    }

    pub fn list_stocks(&self) -> Vec<Stock> {
        self.stocks.read().values().cloned().collect()
    }
}

impl PriceSource for QuoteBoard {
    fn quote(&self, symbol: &Symbol) -> Option<Price> {
        self.stocks.read().get(symbol).map(|s| s.current_price)
    }

    fn stock(&self, symbol: &Symbol) -> Option<Stock> {
        self.stocks.read().get(symbol).cloned()
    }
}
