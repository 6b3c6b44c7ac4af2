//! The endpoints for signing up, signing in and out, and checking the
//! current session.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error, PasswordHash,
    auth::cookie::{get_user_id_from_auth_cookie, invalidate_auth_cookie, set_auth_cookie},
    user::{UserID, create_user, get_user_by_email, get_user_by_id, validate_email},
};

/// The credentials sent by the client to register or sign in.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    /// The user's email address, used as their log-in name.
    pub email: String,
    /// The user's password in plain text.
    pub password: String,
}

/// The signed-in user returned by the auth endpoints.
#[derive(Debug, Serialize)]
pub struct SessionInfo {
    /// The ID of the signed-in user.
    pub user_id: UserID,
    /// The email address of the signed-in user.
    pub email: String,
}

/// A route handler for registering a new account.
///
/// On success the new user is signed in straight away, so the response
/// carries the auth cookies along with the session info.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn sign_up(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Json(credentials): Json<Credentials>,
) -> Result<Response, Error> {
    validate_email(&credentials.email)?;
    let password_hash =
        PasswordHash::from_raw_password(&credentials.password, PasswordHash::DEFAULT_COST)?;

    let user = {
        let connection = state.db_connection.lock().unwrap();
        create_user(&credentials.email, password_hash, &connection)?
    };

    tracing::info!("new account registered for user {}", user.id);

    let jar = set_auth_cookie(jar, user.id, state.cookie_duration)?;

    Ok((
        StatusCode::CREATED,
        jar,
        Json(SessionInfo {
            user_id: user.id,
            email: user.email,
        }),
    )
        .into_response())
}

/// A route handler for signing in a registered user.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn sign_in(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Json(credentials): Json<Credentials>,
) -> Result<Response, Error> {
    let user = {
        let connection = state.db_connection.lock().unwrap();
        get_user_by_email(&credentials.email, &connection).map_err(|error| match error {
            Error::NotFound => Error::InvalidCredentials,
            error => error,
        })?
    };

    let password_is_correct = user
        .password_hash
        .verify(&credentials.password)
        .map_err(|error| Error::HashingError(error.to_string()))?;

    if !password_is_correct {
        return Err(Error::InvalidCredentials);
    }

    let jar = set_auth_cookie(jar, user.id, state.cookie_duration)?;

    Ok((
        jar,
        Json(SessionInfo {
            user_id: user.id,
            email: user.email,
        }),
    )
        .into_response())
}

/// A route handler for signing out the current user.
///
/// Invalidates the auth cookies and drops the user's in-memory ledger. Always
/// succeeds, signing out without a valid session is a no-op.
///
/// # Panics
///
/// Panics if the lock for the ledger map is already held by the same thread.
pub async fn sign_out(State(state): State<AppState>, jar: PrivateCookieJar) -> Response {
    if let Ok(user_id) = get_user_id_from_auth_cookie(&jar) {
        state.ledgers.lock().unwrap().remove(&user_id);
        tracing::debug!("user {user_id} signed out");
    }

    (invalidate_auth_cookie(jar), StatusCode::OK).into_response()
}

/// A route handler for checking who is currently signed in.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn session(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
) -> Result<Json<SessionInfo>, Error> {
    let user_id = get_user_id_from_auth_cookie(&jar)?;

    let user = {
        let connection = state.db_connection.lock().unwrap();
        get_user_by_id(user_id, &connection).map_err(|error| match error {
            Error::NotFound => Error::InvalidCredentials,
            error => error,
        })?
    };

    Ok(Json(SessionInfo {
        user_id: user.id,
        email: user.email,
    }))
}
