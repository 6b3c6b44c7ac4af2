//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};

use crate::{
    AppState, Error,
    auth::{auth_guard, session, sign_in, sign_out, sign_up},
    category::{create_category_endpoint, get_categories_endpoint},
    dashboard::get_dashboard_endpoint,
    endpoints,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_transactions_endpoint,
        update_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::SIGN_UP, post(sign_up))
        .route(endpoints::SIGN_IN, post(sign_in))
        .route(endpoints::SIGN_OUT, post(sign_out))
        .route(endpoints::SESSION, get(session));

    let protected_routes = Router::new()
        .route(
            endpoints::TRANSACTIONS,
            get(get_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            put(update_transaction_endpoint).delete(delete_transaction_endpoint),
        )
        .route(
            endpoints::CATEGORIES,
            get(get_categories_endpoint).post(create_category_endpoint),
        )
        .route(endpoints::DASHBOARD, get(get_dashboard_endpoint))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    protected_routes
        .merge(unprotected_routes)
        .fallback(not_found)
        .with_state(state)
}

async fn not_found() -> Response {
    Error::NotFound.into_response()
}

#[cfg(test)]
mod router_tests {
    use std::sync::{Arc, Mutex};

    use axum::http::StatusCode;
    use axum_test::{TestResponse, TestServer};
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{AppState, build_router, db::initialize, endpoints};

    const STRONG_PASSWORD: &str = "correcthorsebatterystaple";

    fn get_test_server() -> TestServer {
        let conn = Connection::open_in_memory().expect("Could not create database");
        initialize(&conn).expect("Could not initialize database");

        let state = AppState::new("42", Arc::new(Mutex::new(conn)));

        TestServer::new(build_router(state))
    }

    /// Register an account and return the response carrying the auth cookies.
    async fn sign_up(server: &TestServer, email: &str) -> TestResponse {
        let response = server
            .post(endpoints::SIGN_UP)
            .json(&json!({ "email": email, "password": STRONG_PASSWORD }))
            .await;

        response.assert_status(StatusCode::CREATED);

        response
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let server = get_test_server();

        let response = server.get("/api/nope").await;

        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn sign_up_then_session_returns_the_user() {
        let server = get_test_server();
        let cookies = sign_up(&server, "foo@bar.baz").await.cookies();

        let response = server.get(endpoints::SESSION).add_cookies(cookies).await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["email"], "foo@bar.baz");
    }

    #[tokio::test]
    async fn sign_up_rejects_weak_password() {
        let server = get_test_server();

        let response = server
            .post(endpoints::SIGN_UP)
            .json(&json!({ "email": "foo@bar.baz", "password": "hunter2" }))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn sign_up_rejects_invalid_email() {
        let server = get_test_server();

        let response = server
            .post(endpoints::SIGN_UP)
            .json(&json!({ "email": "not-an-email", "password": STRONG_PASSWORD }))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn sign_up_rejects_duplicate_email() {
        let server = get_test_server();
        sign_up(&server, "foo@bar.baz").await;

        let response = server
            .post(endpoints::SIGN_UP)
            .json(&json!({ "email": "foo@bar.baz", "password": STRONG_PASSWORD }))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn sign_in_with_wrong_password_is_unauthorized() {
        let server = get_test_server();
        sign_up(&server, "foo@bar.baz").await;

        let response = server
            .post(endpoints::SIGN_IN)
            .json(&json!({ "email": "foo@bar.baz", "password": "wrong password 123" }))
            .await;

        response.assert_status_unauthorized();
    }

    #[tokio::test]
    async fn sign_in_with_unknown_email_is_unauthorized() {
        let server = get_test_server();

        let response = server
            .post(endpoints::SIGN_IN)
            .json(&json!({ "email": "nobody@bar.baz", "password": STRONG_PASSWORD }))
            .await;

        response.assert_status_unauthorized();
    }

    #[tokio::test]
    async fn sign_in_returns_session_cookies() {
        let server = get_test_server();
        sign_up(&server, "foo@bar.baz").await;

        let response = server
            .post(endpoints::SIGN_IN)
            .json(&json!({ "email": "foo@bar.baz", "password": STRONG_PASSWORD }))
            .await;

        response.assert_status_ok();

        let protected = server
            .get(endpoints::TRANSACTIONS)
            .add_cookies(response.cookies())
            .await;
        protected.assert_status_ok();
    }

    #[tokio::test]
    async fn protected_routes_require_a_session() {
        let server = get_test_server();

        for path in [
            endpoints::TRANSACTIONS,
            endpoints::CATEGORIES,
            endpoints::DASHBOARD,
        ] {
            let response = server.get(path).await;
            response.assert_status_unauthorized();
        }
    }

    #[tokio::test]
    async fn transaction_crud_round_trip() {
        let server = get_test_server();
        let cookies = sign_up(&server, "foo@bar.baz").await.cookies();

        // Create
        let response = server
            .post(endpoints::TRANSACTIONS)
            .add_cookies(cookies.clone())
            .json(&json!({
                "date": "2026-03-14",
                "description": "Weekly groceries",
                "category": "Alimentación",
                "kind": "expense",
                "amount": 54.2
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let created: Value = response.json();
        assert_eq!(created["description"], "Weekly groceries");
        assert_eq!(created["date_display"], "14/03/2026");
        assert_eq!(created["amount_display"], "$54.20");
        let id = created["id"].as_i64().unwrap();

        // Update
        let response = server
            .put(&endpoints::format_endpoint(endpoints::TRANSACTION, id))
            .add_cookies(cookies.clone())
            .json(&json!({ "amount": 60.0 }))
            .await;
        response.assert_status_ok();
        let updated: Value = response.json();
        assert_eq!(updated["amount"], 60.0);
        assert_eq!(updated["description"], "Weekly groceries");

        // List
        let response = server
            .get(endpoints::TRANSACTIONS)
            .add_cookies(cookies.clone())
            .await;
        response.assert_status_ok();
        let transactions: Vec<Value> = response.json();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0]["amount"], 60.0);

        // Delete
        let response = server
            .delete(&endpoints::format_endpoint(endpoints::TRANSACTION, id))
            .add_cookies(cookies.clone())
            .await;
        response.assert_status(StatusCode::NO_CONTENT);

        let response = server
            .get(endpoints::TRANSACTIONS)
            .add_cookies(cookies)
            .await;
        let transactions: Vec<Value> = response.json();
        assert!(transactions.is_empty());
    }

    #[tokio::test]
    async fn create_transaction_rejects_zero_amount() {
        let server = get_test_server();
        let cookies = sign_up(&server, "foo@bar.baz").await.cookies();

        let response = server
            .post(endpoints::TRANSACTIONS)
            .add_cookies(cookies)
            .json(&json!({
                "date": "2026-03-14",
                "description": "Free stuff",
                "category": "Otros",
                "kind": "expense",
                "amount": 0.0
            }))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn users_cannot_touch_each_others_transactions() {
        let server = get_test_server();
        let alice = sign_up(&server, "alice@example.com").await.cookies();
        let bob = sign_up(&server, "bob@example.com").await.cookies();

        let response = server
            .post(endpoints::TRANSACTIONS)
            .add_cookies(alice.clone())
            .json(&json!({
                "date": "2026-03-14",
                "description": "Rent",
                "category": "Vivienda",
                "kind": "expense",
                "amount": 800.0
            }))
            .await;
        let id = response.json::<Value>()["id"].as_i64().unwrap();

        let response = server
            .put(&endpoints::format_endpoint(endpoints::TRANSACTION, id))
            .add_cookies(bob.clone())
            .json(&json!({ "description": "Hijacked" }))
            .await;
        response.assert_status_not_found();

        let response = server
            .delete(&endpoints::format_endpoint(endpoints::TRANSACTION, id))
            .add_cookies(bob.clone())
            .await;
        response.assert_status_not_found();

        let response = server.get(endpoints::TRANSACTIONS).add_cookies(bob).await;
        let transactions: Vec<Value> = response.json();
        assert!(transactions.is_empty());
    }

    #[tokio::test]
    async fn transaction_list_honours_filters() {
        let server = get_test_server();
        let cookies = sign_up(&server, "foo@bar.baz").await.cookies();

        let rows = [
            ("2026-03-10", "Monthly salary", "Sueldo", "income", 2500.0),
            (
                "2026-03-08",
                "Supermarket run",
                "Alimentación",
                "expense",
                85.3,
            ),
            ("2026-02-20", "Bus card top-up", "Transporte", "expense", 20.0),
        ];
        for (date, description, category, kind, amount) in rows {
            server
                .post(endpoints::TRANSACTIONS)
                .add_cookies(cookies.clone())
                .json(&json!({
                    "date": date,
                    "description": description,
                    "category": category,
                    "kind": kind,
                    "amount": amount
                }))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let response = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("kind", "expense")
            .add_query_param("date_from", "2026-03-01")
            .add_cookies(cookies.clone())
            .await;
        response.assert_status_ok();
        let transactions: Vec<Value> = response.json();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0]["description"], "Supermarket run");

        let response = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("search", "BUS")
            .add_cookies(cookies.clone())
            .await;
        let transactions: Vec<Value> = response.json();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0]["category"], "Transporte");

        let response = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("kind", "transfer")
            .add_cookies(cookies)
            .await;
        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn categories_start_with_the_defaults_and_grow() {
        let server = get_test_server();
        let cookies = sign_up(&server, "foo@bar.baz").await.cookies();

        let response = server
            .get(endpoints::CATEGORIES)
            .add_cookies(cookies.clone())
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        let categories = body["categories"].as_array().unwrap();
        assert_eq!(categories.len(), 12);
        assert_eq!(categories[0], "Alimentación");

        let response = server
            .post(endpoints::CATEGORIES)
            .add_cookies(cookies.clone())
            .json(&json!({ "name": "Mascotas" }))
            .await;
        response.assert_status(StatusCode::CREATED);

        let response = server
            .post(endpoints::CATEGORIES)
            .add_cookies(cookies.clone())
            .json(&json!({ "name": "Mascotas" }))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

        let response = server
            .get(endpoints::CATEGORIES)
            .add_cookies(cookies)
            .await;
        let body: Value = response.json();
        let categories = body["categories"].as_array().unwrap();
        assert_eq!(categories.len(), 13);
        assert_eq!(categories[12], "Mascotas");
    }

    #[tokio::test]
    async fn dashboard_aggregates_the_ledger() {
        let server = get_test_server();
        let cookies = sign_up(&server, "foo@bar.baz").await.cookies();

        let rows = [
            ("Salary", "Sueldo", "income", 1000.0),
            ("Groceries", "Alimentación", "expense", 200.0),
            ("More groceries", "Alimentación", "expense", 300.0),
            ("Bus pass", "Transporte", "expense", 500.0),
        ];
        for (description, category, kind, amount) in rows {
            server
                .post(endpoints::TRANSACTIONS)
                .add_cookies(cookies.clone())
                .json(&json!({
                    "date": "2026-03-14",
                    "description": description,
                    "category": category,
                    "kind": kind,
                    "amount": amount
                }))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let response = server
            .get(endpoints::DASHBOARD)
            .add_cookies(cookies)
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["stats"]["total_income"], 1000.0);
        assert_eq!(body["stats"]["total_expenses"], 1000.0);
        assert_eq!(body["stats"]["balance"], 0.0);
        assert_eq!(body["stats"]["transaction_count"], 4);
        assert_eq!(body["stats_display"]["total_income"], "$1,000.00");

        let breakdown = body["expense_breakdown"].as_array().unwrap();
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0]["category"], "Alimentación");
        assert_eq!(breakdown[0]["amount"], 500.0);
        assert_eq!(breakdown[0]["percentage"], 50.0);
        assert_eq!(breakdown[1]["category"], "Transporte");
    }

    #[tokio::test]
    async fn sign_out_invalidates_the_session() {
        let server = get_test_server();
        let cookies = sign_up(&server, "foo@bar.baz").await.cookies();

        let response = server
            .post(endpoints::SIGN_OUT)
            .add_cookies(cookies)
            .await;
        response.assert_status_ok();

        let response = server
            .get(endpoints::SESSION)
            .add_cookies(response.cookies())
            .await;
        response.assert_status_unauthorized();
    }
}
