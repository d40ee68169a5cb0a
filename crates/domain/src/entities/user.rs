use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static USERNAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("username pattern is valid"));

/// Account owning a set of lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

impl User {
    pub fn new(id: i32, username: String, password_hash: String) -> Self {
        Self {
            id,
            username,
            password_hash,
        }
    }

    /// Letters, digits and underscores only; never empty.
    pub fn is_valid_username(username: &str) -> bool {
        USERNAME_PATTERN.is_match(username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_pattern() {
        assert!(User::is_valid_username("alice_01"));
        assert!(!User::is_valid_username(""));
        assert!(!User::is_valid_username("alice smith"));
        assert!(!User::is_valid_username("bob!"));
        assert!(!User::is_valid_username("line\nbreak"));
    }
}
