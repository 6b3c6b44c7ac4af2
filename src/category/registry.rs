//! The registry that combines the built-in default categories with a user's
//! own categories.

use rusqlite::Connection;

use crate::{
    Error,
    category::{
        Category, CategoryName, DEFAULT_CATEGORIES,
        db::{create_category, get_categories_by_user},
    },
    user::UserID,
};

/// One user's effective category set: the [DEFAULT_CATEGORIES] plus their
/// own categories from the database.
///
/// Names are compared exactly, so "Mascotas" and "mascotas" are two
/// different categories.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRegistry {
    user_id: UserID,
    custom: Vec<Category>,
}

impl CategoryRegistry {
    /// Load the registry for the user with `user_id` from the database.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is an SQL
    /// error.
    pub fn load(user_id: UserID, connection: &Connection) -> Result<Self, Error> {
        let custom = get_categories_by_user(user_id, connection)?;

        Ok(Self { user_id, custom })
    }

    /// The user's categories from the database, oldest first.
    pub fn custom_categories(&self) -> &[Category] {
        &self.custom
    }

    /// The effective category names: the defaults in their fixed order,
    /// followed by the user's own categories oldest first.
    ///
    /// A user category that shadows a default appears once, in the default's
    /// position.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = DEFAULT_CATEGORIES
            .iter()
            .map(|name| (*name).to_owned())
            .collect();

        for category in &self.custom {
            let name = category.name.to_string();

            if !names.contains(&name) {
                names.push(name);
            }
        }

        names
    }

    /// Whether `name` is in the user's effective category set.
    pub fn contains(&self, name: &str) -> bool {
        DEFAULT_CATEGORIES.contains(&name)
            || self
                .custom
                .iter()
                .any(|category| category.name.as_ref() == name)
    }

    /// Add a new category for the user, storing it in the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DuplicateCategory] if `name` is already in the effective set,
    /// - or [Error::SqlError] if there is some other SQL error.
    ///
    /// The registry is left untouched on failure.
    pub fn add(
        &mut self,
        name: CategoryName,
        connection: &Connection,
    ) -> Result<Category, Error> {
        if self.contains(name.as_ref()) {
            return Err(Error::DuplicateCategory(name.to_string()));
        }

        let category = create_category(name, self.user_id, connection)?;

        self.custom.push(category.clone());

        Ok(category)
    }
}
