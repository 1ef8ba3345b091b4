//! Per-account serializability tests.
//!
//! The contract: two concurrent settlements on one account never interleave
//! their read-check-write sequences, and settlements on different accounts
//! proceed in parallel. These tests race real threads against the engine.

use broker_core::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::thread;

fn market() -> Arc<QuoteBoard> {
    let board = Arc::new(QuoteBoard::new());
    board.add_stock(Symbol::new("AAPL"), "Apple Inc.", Price::new_unchecked(dec!(100)));
    board
}

#[test]
fn concurrent_buys_cannot_overdraft() {
    // each buy costs 1000; the balance covers one and a half. exactly one
    // of the two racing buys may settle, never both.
    for _ in 0..50 {
        let engine = Arc::new(BrokerEngine::new(market()));
        let account = engine.create_account("eve", Cash::new(dec!(1500))).unwrap();

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let engine = Arc::clone(&engine);
                thread::spawn(move || {
                    engine.settle(OrderRequest::new(account, "AAPL", Side::Buy, 10).unwrap())
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let successes = results.iter().filter(|r| r.is_ok()).count();

        assert_eq!(successes, 1, "exactly one of two racing buys must settle");
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(EngineError::InsufficientFunds { .. }))));

        assert_eq!(engine.get_account(account).unwrap().balance.value(), dec!(500));
        assert_eq!(engine.get_orders(account).len(), 1);
        let holdings = engine.get_holdings(account).unwrap();
        assert_eq!(holdings[0].quantity.get(), 10);
    }
}

#[test]
fn concurrent_sells_cannot_oversell() {
    for _ in 0..50 {
        let engine = Arc::new(BrokerEngine::new(market()));
        let account = engine.create_account("eve", Cash::new(dec!(1000))).unwrap();
        engine
            .settle(OrderRequest::new(account, "AAPL", Side::Buy, 10).unwrap())
            .unwrap();

        // two racing sells of the full position: one closes it, one rejects
        let handles: Vec<_> = (0..2)
            .map(|_| {
                let engine = Arc::clone(&engine);
                thread::spawn(move || {
                    engine.settle(OrderRequest::new(account, "AAPL", Side::Sell, 10).unwrap())
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let successes = results.iter().filter(|r| r.is_ok()).count();

        assert_eq!(successes, 1);
        assert!(engine.get_holdings(account).unwrap().is_empty());
        assert_eq!(engine.get_account(account).unwrap().balance.value(), dec!(1000));
    }
}

#[test]
fn distinct_accounts_settle_in_parallel() {
    let engine = Arc::new(BrokerEngine::new(market()));
    let accounts: Vec<AccountId> = (0..8)
        .map(|i| {
            engine
                .create_account(format!("trader-{i}"), Cash::new(dec!(100000)))
                .unwrap()
        })
        .collect();

    let handles: Vec<_> = accounts
        .iter()
        .copied()
        .map(|account| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                for _ in 0..50 {
                    engine
                        .settle(OrderRequest::new(account, "AAPL", Side::Buy, 1).unwrap())
                        .unwrap();
                    engine
                        .settle(OrderRequest::new(account, "AAPL", Side::Sell, 1).unwrap())
                        .unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    // every account bought and sold at the same price: balances are whole again
    for account in accounts {
        assert_eq!(engine.get_account(account).unwrap().balance.value(), dec!(100000));
        assert!(engine.get_holdings(account).unwrap().is_empty());
        assert_eq!(engine.get_orders(account).len(), 100);
    }
}

#[test]
fn hammered_account_conserves_cash() {
    let engine = Arc::new(BrokerEngine::new(market()));
    let account = engine.create_account("eve", Cash::new(dec!(10000))).unwrap();

    // 4 buyers and 4 sellers race on one account. rejections are fine; what
    // matters is that the surviving order log reconciles exactly.
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let engine = Arc::clone(&engine);
            let side = if i % 2 == 0 { Side::Buy } else { Side::Sell };
            thread::spawn(move || {
                for _ in 0..100 {
                    let _ = engine.settle(OrderRequest::new(account, "AAPL", side, 3).unwrap());
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let balance = engine.get_account(account).unwrap().balance;
    assert!(!balance.is_negative());

    let mut expected = dec!(10000);
    let mut net_shares: i64 = 0;
    for order in engine.get_orders(account) {
        let cost = order.executed_price.value() * order.quantity.as_decimal();
        match order.side {
            Side::Buy => {
                expected -= cost;
                net_shares += order.quantity.get() as i64;
            }
            Side::Sell => {
                expected += cost;
                net_shares -= order.quantity.get() as i64;
            }
        }
    }
    assert_eq!(balance.value(), expected);
    assert!(net_shares >= 0);

    let held: i64 = engine
        .get_holdings(account)
        .unwrap()
        .iter()
        .map(|h| h.quantity.get() as i64)
        .sum();
    assert_eq!(held, net_shares);
}

#[test]
fn racing_buys_blend_a_consistent_average() {
    let engine = Arc::new(BrokerEngine::new(market()));
    let account = engine.create_account("eve", Cash::new(dec!(100000))).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                for _ in 0..25 {
                    engine
                        .settle(OrderRequest::new(account, "AAPL", Side::Buy, 1).unwrap())
                        .unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    // constant price: the blended average must come out exact
    let holdings = engine.get_holdings(account).unwrap();
    assert_eq!(holdings[0].quantity.get(), 100);
    assert_eq!(holdings[0].average_price.value(), Decimal::from(100));
    assert_eq!(engine.get_account(account).unwrap().balance.value(), dec!(90000));
}
