//! Transactions: the income and expense records at the core of the
//! application, their persistence, in-memory ledgers and filtering.

mod db;
mod endpoints;
mod filter;
mod ledger;
mod models;

pub use db::create_transaction_table;
pub(crate) use endpoints::{
    create_transaction_endpoint, delete_transaction_endpoint, get_transactions_endpoint,
    update_transaction_endpoint, with_ledger,
};
pub use filter::TransactionFilter;
pub use ledger::TransactionLedger;
pub use models::{
    Transaction, TransactionData, TransactionId, TransactionKind, TransactionPatch,
};
