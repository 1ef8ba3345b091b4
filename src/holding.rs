// 2.0: holding struct and the cost-basis math. one row per (account, symbol).
// buys recompute the weighted average, sells never touch it. a row with zero
// shares is a bug: full sells delete the row instead.

use crate::types::{AccountId, Cash, Price, Quantity, Symbol};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holding {
    pub account_id: AccountId,
    pub symbol: Symbol,
    pub quantity: Quantity,
    pub average_price: Price,
}

impl Holding {
    pub fn open(account_id: AccountId, symbol: Symbol, quantity: Quantity, price: Price) -> Self {
        Self {
            account_id,
            symbol,
            quantity,
            average_price: price,
        }
    }

    // 2.1: buy on top of an existing position. the new average is the
    // cost-weighted mean of the old basis and the fresh shares, computed in
    // full-precision decimal. (a0*q0 + p*q) / (q0 + q)
    pub fn apply_buy(&self, quantity: Quantity, price: Price) -> Self {
        let q0 = self.quantity.as_decimal();
        let q = quantity.as_decimal();
        let blended = (self.average_price.value() * q0 + price.value() * q) / (q0 + q);

        Self {
            account_id: self.account_id,
            symbol: self.symbol.clone(),
            quantity: Quantity::new_unchecked(self.quantity.get() + quantity.get()),
            average_price: Price::new_unchecked(blended),
        }
    }

    // 2.2: sell out of the position. partial sells keep the average; selling
    // every share closes the row. None means the request exceeds the position.
    pub fn apply_sell(&self, quantity: Quantity) -> Option<SellOutcome> {
        if quantity.get() > self.quantity.get() {
            return None;
        }
        if quantity.get() == self.quantity.get() {
            return Some(SellOutcome::Closed);
        }
        Some(SellOutcome::Reduced(Self {
            account_id: self.account_id,
            symbol: self.symbol.clone(),
            quantity: Quantity::new_unchecked(self.quantity.get() - quantity.get()),
            average_price: self.average_price,
        }))
    }

    pub fn cost_basis(&self) -> Cash {
        Cash::new(self.average_price.value() * self.quantity.as_decimal())
    }

    pub fn market_value(&self, current_price: Price) -> Cash {
        Cash::new(current_price.value() * self.quantity.as_decimal())
    }

    pub fn unrealized_pnl(&self, current_price: Price) -> Cash {
        self.market_value(current_price).sub(self.cost_basis())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SellOutcome {
    /// Shares remain after the sell; average price is unchanged.
    Reduced(Holding),
    /// The entire position was sold. The row must be deleted.
    Closed,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn holding(qty: u64, avg: rust_decimal::Decimal) -> Holding {
        Holding::open(
            AccountId(1),
            Symbol::new("AAPL"),
            Quantity::new(qty).unwrap(),
            Price::new_unchecked(avg),
        )
    }

    #[test]
    fn buy_recomputes_weighted_average() {
        // 10 @ 100 then 10 @ 200 -> 20 @ 150
        let h = holding(10, dec!(100));
        let topped = h.apply_buy(Quantity::new(10).unwrap(), Price::new_unchecked(dec!(200)));

        assert_eq!(topped.quantity.get(), 20);
        assert_eq!(topped.average_price.value(), dec!(150));
    }

    #[test]
    fn uneven_buy_average_is_exact() {
        // 3 @ 10 then 1 @ 20 -> 4 @ 12.5
        let h = holding(3, dec!(10));
        let topped = h.apply_buy(Quantity::new(1).unwrap(), Price::new_unchecked(dec!(20)));

        assert_eq!(topped.quantity.get(), 4);
        assert_eq!(topped.average_price.value(), dec!(12.5));
    }

    #[test]
    fn partial_sell_keeps_average() {
        let h = holding(10, dec!(150));
        match h.apply_sell(Quantity::new(4).unwrap()) {
            Some(SellOutcome::Reduced(rest)) => {
                assert_eq!(rest.quantity.get(), 6);
                assert_eq!(rest.average_price.value(), dec!(150));
            }
            other => panic!("expected Reduced, got {:?}", other),
        }
    }

    #[test]
    fn full_sell_closes_position() {
        let h = holding(10, dec!(150));
        assert_eq!(h.apply_sell(Quantity::new(10).unwrap()), Some(SellOutcome::Closed));
    }

    #[test]
    fn oversell_is_rejected() {
        let h = holding(10, dec!(150));
        assert_eq!(h.apply_sell(Quantity::new(11).unwrap()), None);
    }

    #[test]
    fn pnl_against_current_price() {
        let h = holding(10, dec!(100));
        let mark = Price::new_unchecked(dec!(120));

        assert_eq!(h.cost_basis().value(), dec!(1000));
        assert_eq!(h.market_value(mark).value(), dec!(1200));
        assert_eq!(h.unrealized_pnl(mark).value(), dec!(200));
    }
}
