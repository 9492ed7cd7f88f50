//! Payments and account statements.

mod ledger;
mod statement;

pub use ledger::*;
pub use statement::*;
