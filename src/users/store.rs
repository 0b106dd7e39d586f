//! Fixed in-memory user dataset.

use serde::Serialize;

/// A user record as served by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl User {
    fn new(id: i64, name: &str, email: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            email: email.to_string(),
        }
    }
}

/// Immutable, ordered sequence of users built once at startup.
#[derive(Debug, Clone)]
pub struct UserStore {
    users: Vec<User>,
}

impl UserStore {
    /// Build the store with the three demo records.
    pub fn seeded() -> Self {
        Self {
            users: vec![
                User::new(1, "Alice", "alice@example.com"),
                User::new(2, "Bob", "bob@example.com"),
                User::new(3, "Charlie", "charlie@example.com"),
            ],
        }
    }

    /// All users, in insertion order.
    pub fn all(&self) -> &[User] {
        &self.users
    }

    pub fn find(&self, id: i64) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::seeded()
    }
}
