use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Teacher,
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Teacher => "teacher",
            Role::Student => "student",
        }
    }

    /// Landing page of the frontend after login.
    pub fn home_path(&self) -> &'static str {
        match self {
            Role::Teacher => "/admin",
            Role::Student => "/student",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    pub id: String,
    pub nama: String,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(nama: &str, username: &str, password_hash: &str, role: Role) -> Self {
        let now = Utc::now();
        User {
            id: Uuid::new_v4().to_string(),
            nama: nama.to_string(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            role,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_creation() {
        let user = User::new("Siti Aminah", "siti", "$argon2id$hash", Role::Student);

        assert_eq!(user.nama, "Siti Aminah");
        assert_eq!(user.username, "siti");
        assert_eq!(user.role, Role::Student);
        assert!(user.is_active);
        assert_eq!(user.created_at, user.updated_at);
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Teacher).unwrap(), "\"teacher\"");
        let parsed: Role = serde_json::from_str("\"student\"").unwrap();
        assert_eq!(parsed, Role::Student);
    }

    #[test]
    fn test_role_rejects_unknown_variant() {
        assert!(serde_json::from_str::<Role>("\"admin\"").is_err());
    }
}
