//! Compound filtering of transaction lists.

use time::Date;

use crate::transaction::{Transaction, TransactionKind};

/// A set of criteria for narrowing down a list of transactions.
///
/// Every criterion left as `None` passes all transactions, so the default
/// filter returns the list unchanged. Criteria that are set must all match
/// for a transaction to be kept.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransactionFilter {
    /// Keep only transactions of this kind.
    pub kind: Option<TransactionKind>,
    /// Keep only transactions with exactly this category name.
    pub category: Option<String>,
    /// Keep only transactions on or after this date.
    pub date_from: Option<Date>,
    /// Keep only transactions on or before this date.
    pub date_to: Option<Date>,
    /// Keep only transactions whose description or category contains this
    /// text, ignoring case.
    pub search: Option<String>,
}

impl TransactionFilter {
    /// Whether `transaction` satisfies every criterion that is set.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        if let Some(kind) = self.kind
            && transaction.kind != kind
        {
            return false;
        }

        if let Some(category) = &self.category
            && &transaction.category != category
        {
            return false;
        }

        if let Some(date_from) = self.date_from
            && transaction.date < date_from
        {
            return false;
        }

        if let Some(date_to) = self.date_to
            && transaction.date > date_to
        {
            return false;
        }

        if let Some(search) = &self.search {
            let needle = search.to_lowercase();

            if !transaction.description.to_lowercase().contains(&needle)
                && !transaction.category.to_lowercase().contains(&needle)
            {
                return false;
            }
        }

        true
    }

    /// Keep the transactions in `transactions` that match the filter,
    /// preserving their order.
    pub fn apply(&self, transactions: &[Transaction]) -> Vec<Transaction> {
        transactions
            .iter()
            .filter(|transaction| self.matches(transaction))
            .cloned()
            .collect()
    }
}
