//! The data models for expense categories.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{Error, user::UserID};

/// An alias for category IDs.
pub type CategoryId = i64;

/// The categories every user starts with.
///
/// These are compiled in rather than stored per user, so they cannot be
/// renamed or deleted and new accounts need no seeding step.
pub const DEFAULT_CATEGORIES: [&str; 12] = [
    "Alimentación",
    "Transporte",
    "Vivienda",
    "Salud",
    "Educación",
    "Entretenimiento",
    "Compras",
    "Servicios",
    "Sueldo",
    "Freelance",
    "Inversiones",
    "Otros",
];

/// The name of a category.
///
/// Category names are case sensitive and must contain at least one
/// non-whitespace character.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create and validate a category name.
    ///
    /// Leading and trailing whitespace is trimmed.
    ///
    /// # Errors
    /// Returns an [Error::EmptyCategoryName] if `name` is empty or contains
    /// only whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let trimmed = name.trim();

        if trimmed.is_empty() {
            return Err(Error::EmptyCategoryName);
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Create a new `CategoryName` without any validation.
    ///
    /// The caller should ensure that `name` is not empty.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because
    /// if an invalid name is provided it may cause incorrect behaviour but
    /// will not affect memory safety.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A category that a user created themselves, as opposed to one of the
/// [DEFAULT_CATEGORIES].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,
    /// The name of the category, e.g. "Mascotas".
    pub name: CategoryName,
    /// The ID of the user that created the category.
    pub user_id: UserID,
}
