//! Brokerage Ledger Core Simulation.
//!
//! Demonstrates the settlement lifecycle: deposits, buys and sells against
//! live quotes, weighted-average cost basis, portfolio views, rejection
//! paths, and the per-account serializability guarantee under contention.

use broker_core::*;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::thread;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    println!("Brokerage Ledger Core Simulation");
    println!("Atomic Settlement, Per-Account Serialization\n");

    scenario_1_basic_settlement();
    scenario_2_weighted_average();
    scenario_3_portfolio_view();
    scenario_4_rejections();
    scenario_5_settlement_race();

    println!("\nAll simulations completed successfully.");
}

fn listed_board() -> Arc<QuoteBoard> {
    let board = Arc::new(QuoteBoard::new());
    board.add_stock(Symbol::new("AAPL"), "Apple Inc.", Price::new_unchecked(dec!(180)));
    board.add_stock(Symbol::new("MSFT"), "Microsoft Corp.", Price::new_unchecked(dec!(400)));
    board
}

/// Deposit, buy, partial sell, full sell.
fn scenario_1_basic_settlement() {
    println!("Scenario 1: Basic Settlement\n");

    let board = listed_board();
    let engine = BrokerEngine::new(board.clone());

    let alice = engine.create_account("alice", Cash::new(dec!(5000))).unwrap();
    engine.deposit(alice, Cash::new(dec!(5000))).unwrap();
    println!("  Alice opens with $5,000 and deposits $5,000 more");

    let buy = engine
        .settle(OrderRequest::new(alice, "AAPL", Side::Buy, 10).unwrap())
        .unwrap();
    println!("  BUY 10 AAPL @ ${} -> balance ${}", buy.executed_price, engine.get_account(alice).unwrap().balance);

    let sell = engine
        .settle(OrderRequest::new(alice, "AAPL", Side::Sell, 4).unwrap())
        .unwrap();
    println!("  SELL 4 AAPL @ ${} -> balance ${}", sell.executed_price, engine.get_account(alice).unwrap().balance);

    engine
        .settle(OrderRequest::new(alice, "AAPL", Side::Sell, 6).unwrap())
        .unwrap();
    println!("  SELL remaining 6 AAPL -> position closed, {} holdings left", engine.get_holdings(alice).unwrap().len());
    println!("  Order history: {} records\n", engine.get_orders(alice).len());
}

/// Buying at two prices blends the cost basis.
fn scenario_2_weighted_average() {
    println!("Scenario 2: Weighted-Average Cost Basis\n");

    let board = listed_board();
    board.set_price(&Symbol::new("AAPL"), Price::new_unchecked(dec!(100)));
    let engine = BrokerEngine::new(board.clone());

    let bob = engine.create_account("bob", Cash::new(dec!(10000))).unwrap();

    engine.settle(OrderRequest::new(bob, "AAPL", Side::Buy, 10).unwrap()).unwrap();
    println!("  Buy 10 @ $100");

    board.set_price(&Symbol::new("AAPL"), Price::new_unchecked(dec!(200)));
    engine.settle(OrderRequest::new(bob, "AAPL", Side::Buy, 10).unwrap()).unwrap();
    println!("  Price moves, buy 10 @ $200");

    let holdings = engine.get_holdings(bob).unwrap();
    println!("  Position: {} shares @ ${} average\n", holdings[0].quantity, holdings[0].average_price);
}

/// Holdings joined with quotes, with unrealized PnL.
fn scenario_3_portfolio_view() {
    println!("Scenario 3: Portfolio View\n");

    let board = listed_board();
    let engine = BrokerEngine::new(board.clone());
    let carol = engine.create_account("carol", Cash::new(dec!(50000))).unwrap();

    engine.settle(OrderRequest::new(carol, "AAPL", Side::Buy, 50).unwrap()).unwrap();
    engine.settle(OrderRequest::new(carol, "MSFT", Side::Buy, 20).unwrap()).unwrap();

    board.set_price(&Symbol::new("AAPL"), Price::new_unchecked(dec!(195)));
    board.set_price(&Symbol::new("MSFT"), Price::new_unchecked(dec!(380)));

    for entry in engine.get_holdings(carol).unwrap() {
        println!(
            "  {} ({}): {} @ ${} avg, now ${}, value ${}, pnl ${}",
            entry.symbol, entry.stock_name, entry.quantity, entry.average_price,
            entry.current_price, entry.market_value, entry.unrealized_pnl,
        );
    }
    println!();
}

/// Every rejection leaves state untouched.
fn scenario_4_rejections() {
    println!("Scenario 4: Rejection Paths\n");

    let board = listed_board();
    let engine = BrokerEngine::new(board);
    let dave = engine.create_account("dave", Cash::new(dec!(100))).unwrap();

    let broke = engine.settle(OrderRequest::new(dave, "AAPL", Side::Buy, 10).unwrap());
    println!("  Underfunded buy: {}", broke.unwrap_err());

    let short = engine.settle(OrderRequest::new(dave, "AAPL", Side::Sell, 1).unwrap());
    println!("  Sell with no position: {}", short.unwrap_err());

    let bad = OrderRequest::new(dave, "AAPL", Side::Buy, 0);
    println!("  Zero quantity: {}", bad.unwrap_err());

    println!("  Balance still ${}\n", engine.get_account(dave).unwrap().balance);
}

/// Two concurrent buys against 1.5x the cost of one: exactly one settles.
fn scenario_5_settlement_race() {
    println!("Scenario 5: Settlement Race\n");

    let board = listed_board();
    board.set_price(&Symbol::new("AAPL"), Price::new_unchecked(dec!(100)));
    let engine = Arc::new(BrokerEngine::new(board));

    // each buy costs $1,000; the balance covers one and a half
    let eve = engine.create_account("eve", Cash::new(dec!(1500))).unwrap();

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                engine.settle(OrderRequest::new(eve, "AAPL", Side::Buy, 10).unwrap())
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let successes = results.iter().filter(|r| r.is_ok()).count();

    println!("  {} of 2 concurrent buys settled", successes);
    println!("  Final balance: ${}", engine.get_account(eve).unwrap().balance);
    println!("  Order ledger holds {} record(s)", engine.get_orders(eve).len());
}
