//! The endpoints for listing and creating expense categories.

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    category::{Category, CategoryName, CategoryRegistry},
    user::UserID,
};

/// The user's effective category set returned by the list endpoint.
#[derive(Debug, Serialize)]
pub struct CategoryListResponse {
    /// The effective category names, defaults first.
    pub categories: Vec<String>,
    /// The categories the user created themselves.
    pub custom: Vec<Category>,
}

/// The request body for creating a new category.
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    /// The name of the new category.
    pub name: String,
}

/// A route handler for listing the signed-in user's categories.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn get_categories_endpoint(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<CategoryListResponse>, Error> {
    let connection = state.db_connection.lock().unwrap();
    let registry = CategoryRegistry::load(user_id, &connection)?;

    Ok(Json(CategoryListResponse {
        categories: registry.names(),
        custom: registry.custom_categories().to_vec(),
    }))
}

/// A route handler for creating a new category for the signed-in user.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn create_category_endpoint(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserID>,
    Json(request): Json<CreateCategoryRequest>,
) -> Result<impl IntoResponse, Error> {
    let name = CategoryName::new(&request.name)?;

    let connection = state.db_connection.lock().unwrap();
    let mut registry = CategoryRegistry::load(user_id, &connection)?;
    let category = registry.add(name, &connection)?;

    Ok((StatusCode::CREATED, Json(category)))
}
