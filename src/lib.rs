// broker-core: brokerage ledger and order settlement engine.
// settlement-first architecture: atomic balance/holding mutation under
// per-account serialization takes priority. prices come from an injected
// read-only quote source; all money math is full-precision decimal.
//
// file map (search X.0 for structs, X.1+ for logic):
//   1.x types.rs: primitives: AccountId, Symbol, Price, Cash, Quantity, Side
//   2.x holding.rs: positions and weighted-average cost basis math
//   3.x stock.rs: quote table, PriceSource trait
//   4.x order.rs: immutable order records, request validation
//   5.x ledger.rs: append-only order ledger (audit log)
//   6.x store.rs: account/holding tables, atomic settlement commit
//   7.x gate.rs: per-account concurrency gate
//   8.x engine/: broker engine: settlement, cash movements, read views
//   10.x account.rs: account and cash balance

// core ledger modules
pub mod account;
pub mod engine;
pub mod holding;
pub mod ledger;
pub mod order;
pub mod stock;
pub mod store;
pub mod types;

// concurrency
pub mod gate;

// re exports for convenience
pub use account::*;
pub use engine::*;
pub use gate::*;
pub use holding::*;
pub use ledger::*;
pub use order::*;
pub use stock::*;
pub use store::*;
pub use types::*;
