//! The core data models for transactions.

use std::fmt::Display;
use std::str::FromStr;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, user::UserID};

/// An alias for transaction IDs.
pub type TransactionId = i64;

/// Whether a transaction brings money in or takes money out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money earned, e.g. salary or freelance work.
    Income,
    /// Money spent, e.g. groceries or rent.
    Expense,
}

impl TransactionKind {
    /// The lowercase string form used in the database and API payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            _ => Err(Error::InvalidKind(text.to_owned())),
        }
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(error.to_string().into()))
    }
}

/// An income or expense, i.e. an event where money was either earned or spent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The ID of the user that owns the transaction.
    pub user_id: UserID,
    /// When the transaction happened.
    pub date: Date,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The name of the category the transaction belongs to, e.g. "Transporte".
    pub category: String,
    /// Whether the transaction is income or an expense.
    pub kind: TransactionKind,
    /// The amount of money earned or spent, always greater than zero.
    pub amount: f64,
}

/// The fields needed to create a new transaction.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransactionData {
    /// When the transaction happened. Defaults to today (UTC) when omitted.
    #[serde(default = "crate::format::current_date")]
    pub date: Date,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The name of the category the transaction belongs to.
    pub category: String,
    /// Whether the transaction is income or an expense.
    pub kind: TransactionKind,
    /// The amount of money earned or spent.
    pub amount: f64,
}

impl TransactionData {
    /// Check that the fields describe a valid transaction.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NonPositiveAmount] if `amount` is zero or negative,
    /// - or [Error::EmptyDescription] if `description` is blank,
    /// - or [Error::EmptyCategoryName] if `category` is blank.
    pub fn validate(&self) -> Result<(), Error> {
        if self.amount <= 0.0 {
            return Err(Error::NonPositiveAmount(self.amount));
        }

        if self.description.trim().is_empty() {
            return Err(Error::EmptyDescription);
        }

        if self.category.trim().is_empty() {
            return Err(Error::EmptyCategoryName);
        }

        Ok(())
    }
}

/// A partial update to an existing transaction.
///
/// Fields left as `None` keep their current value.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct TransactionPatch {
    /// The new transaction date, if any.
    pub date: Option<Date>,
    /// The new description, if any.
    pub description: Option<String>,
    /// The new category name, if any.
    pub category: Option<String>,
    /// The new transaction kind, if any.
    pub kind: Option<TransactionKind>,
    /// The new amount, if any.
    pub amount: Option<f64>,
}

impl TransactionPatch {
    /// Check that the fields that are present describe valid values.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NonPositiveAmount] if `amount` is zero or negative,
    /// - or [Error::EmptyDescription] if `description` is blank,
    /// - or [Error::EmptyCategoryName] if `category` is blank.
    pub fn validate(&self) -> Result<(), Error> {
        if let Some(amount) = self.amount
            && amount <= 0.0
        {
            return Err(Error::NonPositiveAmount(amount));
        }

        if let Some(description) = &self.description
            && description.trim().is_empty()
        {
            return Err(Error::EmptyDescription);
        }

        if let Some(category) = &self.category
            && category.trim().is_empty()
        {
            return Err(Error::EmptyCategoryName);
        }

        Ok(())
    }

    /// Whether the patch leaves every field unchanged.
    pub fn is_empty(&self) -> bool {
        self == &TransactionPatch::default()
    }
}
