//! Centavo is a small self-hosted web app for tracking personal income and
//! expenses.
//!
//! This library provides a JSON API for recording transactions, managing
//! expense categories, and viewing aggregated dashboard statistics.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod auth;
mod category;
mod dashboard;
mod db;
mod endpoints;
mod format;
mod logging;
mod password;
mod routing;
mod state;
mod transaction;
mod user;

pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use password::{PasswordHash, ValidatedPassword};
pub use routing::build_router;
pub use state::AppState;
pub use user::{User, UserID, get_user_by_id};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user provided an email and password combination that does not
    /// match a registered user.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Either the user ID or expiry cookie is missing from the cookie jar in
    /// the request.
    #[error("no cookies in the cookie jar :(")]
    CookieMissing,

    /// There was an error parsing the date in the cookie or creating the new
    /// expiry date time.
    ///
    /// Callers should pass in the original error as a string and the date
    /// string that caused the error.
    #[error("could not format expiry cookie date-time string \"{1}\": {0}")]
    InvalidDateFormat(String, String),

    /// An email address was used at sign-up that does not look like an email
    /// address.
    #[error("\"{0}\" is not a valid email address")]
    InvalidEmail(String),

    /// The email address used at sign-up already belongs to an account.
    #[error("the email address is already registered")]
    EmailTaken,

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// An empty or whitespace-only string was used to create a category name.
    #[error("category name cannot be empty")]
    EmptyCategoryName,

    /// The category name already exists in the user's effective category set.
    #[error("the category \"{0}\" already exists")]
    DuplicateCategory(String),

    /// An empty description was used to create a transaction.
    #[error("transaction description cannot be empty")]
    EmptyDescription,

    /// A zero or negative amount was used to create or update a transaction.
    #[error("{0} is not a valid amount, amounts must be greater than zero")]
    NonPositiveAmount(f64),

    /// A date string could not be parsed as a calendar date.
    ///
    /// Dates are expected in the canonical `YYYY-MM-DD` form.
    #[error("could not parse \"{0}\" as a date")]
    InvalidDate(String),

    /// A transaction kind string was neither `income` nor `expense`.
    #[error("\"{0}\" is not a valid transaction kind")]
    InvalidKind(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Tried to update a transaction that does not exist or belongs to
    /// another user.
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist or belongs to
    /// another user.
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.email") =>
            {
                Error::EmailTaken
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status_code, message) = match &self {
            Error::InvalidCredentials | Error::CookieMissing => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }
            Error::NotFound
            | Error::UpdateMissingTransaction
            | Error::DeleteMissingTransaction => (StatusCode::NOT_FOUND, self.to_string()),
            Error::InvalidEmail(_)
            | Error::EmailTaken
            | Error::TooWeak(_)
            | Error::EmptyCategoryName
            | Error::DuplicateCategory(_)
            | Error::EmptyDescription
            | Error::NonPositiveAmount(_) => (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()),
            Error::InvalidDate(_) | Error::InvalidKind(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred, check the server logs for more details."
                        .to_owned(),
                )
            }
        };

        (status_code, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::Error;

    #[test]
    fn validation_errors_are_unprocessable_entity() {
        let cases = [
            Error::NonPositiveAmount(0.0),
            Error::EmptyCategoryName,
            Error::DuplicateCategory("Comida".to_owned()),
            Error::EmailTaken,
        ];

        for error in cases {
            let response = error.into_response();
            assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        }
    }

    #[test]
    fn missing_rows_are_not_found() {
        let response = Error::UpdateMissingTransaction.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn sql_errors_are_not_shown_to_the_client() {
        let response = Error::SqlError(rusqlite::Error::InvalidQuery).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
