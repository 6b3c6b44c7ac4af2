//! An in-memory view of one user's transactions, kept in sync with the
//! database.
//!
//! Each signed-in user gets a ledger that mirrors their rows in the
//! transaction table. Reads are served from the ledger, writes go to the
//! database first and the ledger is only modified once the database write
//! succeeds. A failed write leaves the ledger untouched.

use rusqlite::Connection;

use crate::{
    Error,
    transaction::{
        Transaction, TransactionData, TransactionId, TransactionPatch,
        db::{create_transaction, delete_transaction, list_transactions, update_transaction},
    },
    user::UserID,
};

/// One user's transactions, most recent date first.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionLedger {
    user_id: UserID,
    transactions: Vec<Transaction>,
}

impl TransactionLedger {
    /// Create an empty ledger for the user with `user_id`.
    ///
    /// Call [TransactionLedger::load] to populate it from the database.
    pub fn new(user_id: UserID) -> Self {
        Self {
            user_id,
            transactions: Vec::new(),
        }
    }

    /// The ID of the user the ledger belongs to.
    pub fn user_id(&self) -> UserID {
        self.user_id
    }

    /// The transactions in the ledger, most recent date first.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Replace the ledger contents with the user's rows from the database.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is an SQL
    /// error. The ledger is emptied on failure so stale data is never served.
    pub fn load(&mut self, connection: &Connection) -> Result<(), Error> {
        match list_transactions(self.user_id, connection) {
            Ok(transactions) => {
                self.transactions = transactions;
                Ok(())
            }
            Err(error) => {
                self.transactions.clear();
                Err(error)
            }
        }
    }

    /// Create a new transaction and put it at the head of the ledger.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is an SQL
    /// error. The ledger is left untouched on failure.
    pub fn create(
        &mut self,
        data: &TransactionData,
        connection: &Connection,
    ) -> Result<Transaction, Error> {
        let transaction = create_transaction(self.user_id, data, connection)?;

        self.transactions.insert(0, transaction.clone());

        Ok(transaction)
    }

    /// Apply `patch` to the transaction with `id`, replacing it in place in
    /// the ledger.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::UpdateMissingTransaction] if `id` does not refer to one of
    ///   the user's transactions,
    /// - or [Error::SqlError] if there is some other SQL error.
    ///
    /// The ledger is left untouched on failure.
    pub fn update(
        &mut self,
        id: TransactionId,
        patch: &TransactionPatch,
        connection: &Connection,
    ) -> Result<Transaction, Error> {
        let updated = update_transaction(id, self.user_id, patch, connection)?;

        if let Some(entry) = self
            .transactions
            .iter_mut()
            .find(|transaction| transaction.id == id)
        {
            *entry = updated.clone();
        }

        Ok(updated)
    }

    /// Delete the transaction with `id` and remove it from the ledger.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DeleteMissingTransaction] if `id` does not refer to one of
    ///   the user's transactions,
    /// - or [Error::SqlError] if there is some other SQL error.
    ///
    /// The ledger is left untouched on failure.
    pub fn delete(&mut self, id: TransactionId, connection: &Connection) -> Result<(), Error> {
        delete_transaction(id, self.user_id, connection)?;

        self.transactions.retain(|transaction| transaction.id != id);

        Ok(())
    }
}
