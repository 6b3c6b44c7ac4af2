//! Database queries for creating, listing, updating and deleting transactions.

use rusqlite::{Connection, Row, params_from_iter, types::Value};

use crate::{
    Error,
    format::canonical_date,
    transaction::{Transaction, TransactionData, TransactionId, TransactionPatch},
    user::UserID,
};

/// The column list shared by every query that returns transaction rows.
const TRANSACTION_COLUMNS: &str = "id, user_id, date, description, category, kind, amount";

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                date TEXT NOT NULL,
                description TEXT NOT NULL,
                category TEXT NOT NULL,
                kind TEXT NOT NULL,
                amount REAL NOT NULL,
                created_at TEXT NOT NULL DEFAULT (datetime('now')),
                updated_at TEXT NOT NULL DEFAULT (datetime('now')),
                FOREIGN KEY(user_id) REFERENCES user(id) ON DELETE CASCADE
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('transaction', 0)",
        (),
    )?;

    // Composite index used by the transaction list and dashboard queries.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);",
        (),
    )?;

    Ok(())
}

/// Create a new transaction in the database for the user with `user_id`.
///
/// The caller is expected to have validated `data` with
/// [TransactionData::validate] first.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn create_transaction(
    user_id: UserID,
    data: &TransactionData,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "INSERT INTO \"transaction\" (user_id, date, description, category, kind, amount)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            (
                user_id.as_i64(),
                data.date,
                &data.description,
                &data.category,
                data.kind,
                data.amount,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Get all transactions belonging to the user with `user_id`, most recent
/// date first.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn list_transactions(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\"
             WHERE user_id = :user_id
             ORDER BY date DESC, id DESC"
        ))?
        .query_map(&[(":user_id", &user_id.as_i64())], map_transaction_row)?
        .map(|row_result| row_result.map_err(|error| error.into()))
        .collect()
}

/// Apply `patch` to the transaction with `id`, keeping unset fields unchanged.
///
/// The transaction must belong to the user with `user_id`, a transaction owned
/// by another user is treated the same as a missing one.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingTransaction] if `id` does not refer to a transaction
///   owned by `user_id`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    user_id: UserID,
    patch: &TransactionPatch,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let mut set_clauses = Vec::new();
    let mut params: Vec<Value> = Vec::new();

    if let Some(date) = patch.date {
        set_clauses.push("date = ?");
        params.push(Value::Text(canonical_date(date)));
    }

    if let Some(description) = &patch.description {
        set_clauses.push("description = ?");
        params.push(Value::Text(description.clone()));
    }

    if let Some(category) = &patch.category {
        set_clauses.push("category = ?");
        params.push(Value::Text(category.clone()));
    }

    if let Some(kind) = patch.kind {
        set_clauses.push("kind = ?");
        params.push(Value::Text(kind.as_str().to_owned()));
    }

    if let Some(amount) = patch.amount {
        set_clauses.push("amount = ?");
        params.push(Value::Real(amount));
    }

    set_clauses.push("updated_at = datetime('now')");

    let query = format!(
        "UPDATE \"transaction\" SET {}
         WHERE id = ? AND user_id = ?
         RETURNING {TRANSACTION_COLUMNS}",
        set_clauses.join(", ")
    );
    params.push(Value::Integer(id));
    params.push(Value::Integer(user_id.as_i64()));

    connection
        .prepare(&query)?
        .query_row(params_from_iter(params), map_transaction_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingTransaction,
            error => error.into(),
        })
}

/// Delete the transaction with `id` from the database.
///
/// The transaction must belong to the user with `user_id`, a transaction owned
/// by another user is treated the same as a missing one.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingTransaction] if `id` does not refer to a transaction
///   owned by `user_id`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_transaction(
    id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
        (id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

/// Map a database row to a Transaction.
fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let raw_user_id = row.get(1)?;

    Ok(Transaction {
        id: row.get(0)?,
        user_id: UserID::new(raw_user_id),
        date: row.get(2)?,
        description: row.get(3)?,
        category: row.get(4)?,
        kind: row.get(5)?,
        amount: row.get(6)?,
    })
}
