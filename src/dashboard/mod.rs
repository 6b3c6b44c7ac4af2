//! The dashboard: summary statistics and the expense breakdown by category.

mod aggregation;
mod endpoints;

pub use aggregation::{BREAKDOWN_LIMIT, CategoryExpense, DashboardStats, compute_stats, expense_breakdown};
pub(crate) use endpoints::get_dashboard_endpoint;
