use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account-wide grants a non-admin user may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    CreateAll,
    ViewAll,
    EditAll,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::CreateAll => "create_all",
            Permission::ViewAll => "view_all",
            Permission::EditAll => "edit_all",
        }
    }
}

impl FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create_all" => Ok(Permission::CreateAll),
            "view_all" => Ok(Permission::ViewAll),
            "edit_all" => Ok(Permission::EditAll),
            other => Err(format!("unknown permission: {other}")),
        }
    }
}

/// Entities whose rows carry an owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Expense,
    Client,
    Vendor,
    Invoice,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Expense => "expense",
            EntityType::Client => "client",
            EntityType::Vendor => "vendor",
            EntityType::Invoice => "invoice",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Authenticated user for the duration of one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: Uuid,
    pub account_id: Uuid,
    pub is_admin: bool,
    pub permissions: Vec<Permission>,
}

impl From<models::user::Model> for CurrentUser {
    fn from(u: models::user::Model) -> Self {
        let permissions = u
            .permission_names()
            .into_iter()
            .filter_map(|p| p.parse().ok())
            .collect();
        Self { id: u.id, account_id: u.account_id, is_admin: u.is_admin, permissions }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_model(permissions: &str) -> models::user::Model {
        models::user::Model {
            id: Uuid::new_v4(),
            account_id: Uuid::new_v4(),
            email: "u@example.com".into(),
            name: "U".into(),
            is_admin: false,
            permissions: permissions.into(),
            created_at: chrono::Utc::now().into(),
            deleted_at: None,
        }
    }

    #[test]
    fn unknown_permission_names_are_dropped() {
        let user = CurrentUser::from(user_model("view_all, fly_planes,create_all"));
        assert_eq!(user.permissions, vec![Permission::ViewAll, Permission::CreateAll]);
    }

    #[test]
    fn permission_names_round_trip() {
        for p in [Permission::CreateAll, Permission::ViewAll, Permission::EditAll] {
            assert_eq!(p.as_str().parse::<Permission>(), Ok(p));
        }
    }
}
