// 8.0: settlement engine. coordinates account admin, cash movements, and
// atomic order settlement against the ledger store and the order ledger.
// per-account isolation comes from the gate; everything else is shared-read.

mod core;
mod results;
mod settle;

pub use core::BrokerEngine;
pub use results::{EngineError, PortfolioEntry};
