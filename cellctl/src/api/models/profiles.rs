//! API request/response models for profiles.

use crate::db::models::profiles::ProfileDBResponse;
use crate::types::ProfileId;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Role of a staff or leader account
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Hash, ToSchema)]
#[sqlx(type_name = "profile_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Pastor,
    Leader,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Pastor => "pastor",
            Role::Leader => "leader",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: ProfileId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub active: bool,
}

impl From<ProfileDBResponse> for ProfileResponse {
    fn from(db: ProfileDBResponse) -> Self {
        Self {
            id: db.id,
            name: db.name,
            email: db.email,
            role: db.role,
            active: db.active,
        }
    }
}

/// The authenticated caller, resolved from the trusted proxy header
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CurrentUser {
    #[schema(value_type = String, format = "uuid")]
    pub id: ProfileId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<ProfileDBResponse> for CurrentUser {
    fn from(db: ProfileDBResponse) -> Self {
        Self {
            id: db.id,
            name: db.name,
            email: db.email,
            role: db.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Pastor).unwrap(), "\"pastor\"");
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
        assert_eq!(Role::Leader.to_string(), "leader");
    }
}
