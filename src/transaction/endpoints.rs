//! The endpoints for listing, creating, updating and deleting transactions.

use std::collections::hash_map::Entry;

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    format::{currency, display_date, parse_date},
    transaction::{
        Transaction, TransactionData, TransactionFilter, TransactionId, TransactionLedger,
        TransactionPatch,
    },
    user::UserID,
};

/// A transaction as returned by the API, with ready-to-display date and
/// amount strings alongside the raw values.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    /// The transaction itself.
    #[serde(flatten)]
    pub transaction: Transaction,
    /// The transaction date in dd/MM/yyyy form, e.g. "24/08/2026".
    pub date_display: String,
    /// The amount as a currency string, e.g. "$1,234.50".
    pub amount_display: String,
}

impl From<Transaction> for TransactionResponse {
    fn from(transaction: Transaction) -> Self {
        let date_display = display_date(transaction.date);
        let amount_display = currency(transaction.amount);

        Self {
            transaction,
            date_display,
            amount_display,
        }
    }
}

/// The filter criteria accepted by the transaction list endpoint as query
/// parameters.
///
/// Empty strings are treated the same as absent parameters so that HTML form
/// clients can submit every field unconditionally. The kind also accepts
/// "all", which matches both kinds.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionQuery {
    kind: Option<String>,
    category: Option<String>,
    date_from: Option<String>,
    date_to: Option<String>,
    search: Option<String>,
}

impl TransactionQuery {
    /// Convert the raw query parameters into a [TransactionFilter].
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidKind] if `kind` is not "income", "expense" or "all",
    /// - or [Error::InvalidDate] if a date parameter is not a valid
    ///   `YYYY-MM-DD` date.
    fn into_filter(self) -> Result<TransactionFilter, Error> {
        let kind = match self.kind.as_deref() {
            None | Some("") | Some("all") => None,
            Some(text) => Some(text.parse()?),
        };

        let date_from = match self.date_from.as_deref() {
            None | Some("") => None,
            Some(text) => Some(parse_date(text)?),
        };

        let date_to = match self.date_to.as_deref() {
            None | Some("") => None,
            Some(text) => Some(parse_date(text)?),
        };

        Ok(TransactionFilter {
            kind,
            category: self.category.filter(|category| !category.is_empty()),
            date_from,
            date_to,
            search: self.search.filter(|search| !search.trim().is_empty()),
        })
    }
}

/// Run `operation` against the signed-in user's ledger.
///
/// The ledger is created and loaded from the database the first time the
/// user touches a transaction endpoint and kept until they sign out.
/// Mutations update it in place, list reads reload it first.
///
/// # Panics
///
/// Panics if the lock for the database connection or the ledger map is
/// already held by the same thread.
pub(crate) fn with_ledger<T>(
    state: &AppState,
    user_id: UserID,
    operation: impl FnOnce(&mut TransactionLedger, &Connection) -> Result<T, Error>,
) -> Result<T, Error> {
    let connection = state.db_connection.lock().unwrap();
    let mut ledgers = state.ledgers.lock().unwrap();

    let ledger = match ledgers.entry(user_id) {
        Entry::Occupied(entry) => entry.into_mut(),
        Entry::Vacant(entry) => {
            let mut ledger = TransactionLedger::new(user_id);
            ledger.load(&connection)?;
            entry.insert(ledger)
        }
    };

    operation(ledger, &connection)
}

/// A route handler for listing the signed-in user's transactions, filtered
/// by the query parameters.
pub async fn get_transactions_endpoint(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<TransactionQuery>,
) -> Result<Json<Vec<TransactionResponse>>, Error> {
    let filter = query.into_filter()?;

    let transactions = with_ledger(&state, user_id, |ledger, connection| {
        ledger.load(connection)?;
        Ok(filter.apply(ledger.transactions()))
    })?;

    Ok(Json(
        transactions.into_iter().map(TransactionResponse::from).collect(),
    ))
}

/// A route handler for creating a new transaction for the signed-in user.
pub async fn create_transaction_endpoint(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserID>,
    Json(data): Json<TransactionData>,
) -> Result<impl IntoResponse, Error> {
    data.validate()?;

    let transaction = with_ledger(&state, user_id, |ledger, connection| {
        ledger.create(&data, connection)
    })?;

    tracing::debug!("user {user_id} created transaction {}", transaction.id);

    Ok((
        StatusCode::CREATED,
        Json(TransactionResponse::from(transaction)),
    ))
}

/// A route handler for applying a partial update to one of the signed-in
/// user's transactions.
pub async fn update_transaction_endpoint(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
    Json(patch): Json<TransactionPatch>,
) -> Result<Json<TransactionResponse>, Error> {
    patch.validate()?;

    let transaction = with_ledger(&state, user_id, |ledger, connection| {
        ledger.update(transaction_id, &patch, connection)
    })?;

    Ok(Json(TransactionResponse::from(transaction)))
}

/// A route handler for deleting one of the signed-in user's transactions.
pub async fn delete_transaction_endpoint(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<StatusCode, Error> {
    with_ledger(&state, user_id, |ledger, connection| {
        ledger.delete(transaction_id, connection)
    })?;

    tracing::debug!("user {user_id} deleted transaction {transaction_id}");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod query_tests {
    use time::macros::date;

    use crate::{
        Error,
        transaction::{TransactionFilter, TransactionKind},
    };

    use super::TransactionQuery;

    #[test]
    fn empty_query_gives_pass_through_filter() {
        let query = TransactionQuery::default();

        assert_eq!(query.into_filter(), Ok(TransactionFilter::default()));
    }

    #[test]
    fn empty_strings_are_treated_as_absent() {
        let query = TransactionQuery {
            kind: Some("".to_owned()),
            category: Some("".to_owned()),
            date_from: Some("".to_owned()),
            date_to: Some("".to_owned()),
            search: Some("  ".to_owned()),
        };

        assert_eq!(query.into_filter(), Ok(TransactionFilter::default()));
    }

    #[test]
    fn all_kind_matches_both_kinds() {
        let query = TransactionQuery {
            kind: Some("all".to_owned()),
            ..Default::default()
        };

        assert_eq!(query.into_filter().unwrap().kind, None);
    }

    #[test]
    fn parses_full_query() {
        let query = TransactionQuery {
            kind: Some("expense".to_owned()),
            category: Some("Transporte".to_owned()),
            date_from: Some("2026-01-01".to_owned()),
            date_to: Some("2026-06-30".to_owned()),
            search: Some("bus".to_owned()),
        };

        let filter = query.into_filter().unwrap();

        assert_eq!(filter.kind, Some(TransactionKind::Expense));
        assert_eq!(filter.category, Some("Transporte".to_owned()));
        assert_eq!(filter.date_from, Some(date!(2026 - 01 - 01)));
        assert_eq!(filter.date_to, Some(date!(2026 - 06 - 30)));
        assert_eq!(filter.search, Some("bus".to_owned()));
    }

    #[test]
    fn rejects_unknown_kind() {
        let query = TransactionQuery {
            kind: Some("transfer".to_owned()),
            ..Default::default()
        };

        assert_eq!(
            query.into_filter(),
            Err(Error::InvalidKind("transfer".to_owned()))
        );
    }

    #[test]
    fn rejects_malformed_dates() {
        let query = TransactionQuery {
            date_from: Some("01/02/2026".to_owned()),
            ..Default::default()
        };

        assert_eq!(
            query.into_filter(),
            Err(Error::InvalidDate("01/02/2026".to_owned()))
        );
    }
}
