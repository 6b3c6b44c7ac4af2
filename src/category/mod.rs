//! Expense categories: the built-in defaults, user-defined categories and
//! the registry that combines the two.

mod db;
mod endpoints;
mod models;
mod registry;

pub use db::create_category_table;
pub(crate) use endpoints::{create_category_endpoint, get_categories_endpoint};
pub use models::{Category, CategoryName, DEFAULT_CATEGORIES};
pub use registry::CategoryRegistry;
