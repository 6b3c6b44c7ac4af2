//! The endpoint serving the dashboard summary.

use axum::{Extension, Json, extract::State};
use serde::Serialize;

use crate::{
    AppState, Error,
    dashboard::{CategoryExpense, DashboardStats, compute_stats, expense_breakdown},
    format::currency,
    transaction::with_ledger,
    user::UserID,
};

/// The dashboard summary returned to the client.
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    /// The headline numbers.
    pub stats: DashboardStats,
    /// The headline numbers as currency strings, e.g. "$1,234.50".
    pub stats_display: DashboardStatsDisplay,
    /// The largest expense categories, largest first.
    pub expense_breakdown: Vec<CategoryExpense>,
}

/// The headline numbers formatted for display.
#[derive(Debug, Serialize)]
pub struct DashboardStatsDisplay {
    /// The sum of all income amounts as a currency string.
    pub total_income: String,
    /// The sum of all expense amounts as a currency string.
    pub total_expenses: String,
    /// Income minus expenses as a currency string.
    pub balance: String,
}

/// A route handler for the signed-in user's dashboard summary.
pub async fn get_dashboard_endpoint(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<DashboardResponse>, Error> {
    let transactions = with_ledger(&state, user_id, |ledger, connection| {
        ledger.load(connection)?;
        Ok(ledger.transactions().to_vec())
    })?;

    let stats = compute_stats(&transactions);
    let stats_display = DashboardStatsDisplay {
        total_income: currency(stats.total_income),
        total_expenses: currency(stats.total_expenses),
        balance: currency(stats.balance),
    };

    Ok(Json(DashboardResponse {
        stats,
        stats_display,
        expense_breakdown: expense_breakdown(&transactions),
    }))
}
